//! Cutting signatures into band keys.

use crate::config::BandLayout;

/// Key of one band: its values joined by single spaces.
pub fn band_key(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One key per band, in band order. Trailing entries beyond the last full
/// band are ignored.
pub fn band_keys(signature: &[u64], layout: &BandLayout) -> Vec<String> {
    if layout.rows_per_band == 0 {
        return Vec::new();
    }
    signature
        .chunks_exact(layout.rows_per_band)
        .take(layout.bands)
        .map(band_key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_space_joined() {
        assert_eq!(band_key(&[3, 14, 0]), "3 14 0");
        assert_eq!(band_key(&[7]), "7");
    }

    #[test]
    fn signature_is_cut_in_order() {
        let keys = band_keys(&[1, 2, 3, 4, 5, 6], &BandLayout::new(3, 2));
        assert_eq!(keys, vec!["1 2", "3 4", "5 6"]);
    }

    #[test]
    fn remainder_rows_are_dropped() {
        let keys = band_keys(&[1, 2, 3, 4, 5, 6, 7], &BandLayout::new(2, 3));
        assert_eq!(keys, vec!["1 2 3", "4 5 6"]);
    }

    #[test]
    fn sentinel_signature_has_sentinel_keys() {
        let keys = band_keys(&[u64::MAX; 4], &BandLayout::new(2, 2));
        let max = u64::MAX.to_string();
        assert_eq!(keys[0], format!("{max} {max}"));
    }
}
