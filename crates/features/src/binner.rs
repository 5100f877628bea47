//! Ordinal binning of continuous attributes into labeled classes.
//!
//! A range `[lower, upper]` is split into `n` bins of width
//! `trunc((upper - lower) / n)`. Labels are `"<i>_<name>"` with `i` starting
//! at 1. Values below `lower` fall into the first bin and values at or above
//! the last computed edge, `lower + (n - 1) * width`, fall into the last bin,
//! so the last bin is a catch-all for everything beyond the range too.
//!
//! The width is truncated to a whole number. When the range is narrower than
//! `n`, the width is zero and every value at or above `lower` lands in the
//! last bin.

use serde::{Deserialize, Serialize};

use crate::config::FeatureError;

/// Format the label of bin `index` (1-based) for feature `name`.
pub fn format_label(index: usize, name: &str) -> String {
    format!("{index}_{name}")
}

/// Label `value` with its ordinal bin over `[lower, upper]` split into `bins`.
pub fn bin_label(
    value: f64,
    lower: f64,
    upper: f64,
    bins: usize,
    name: &str,
) -> Result<String, FeatureError> {
    check_range(name, lower, upper, bins)?;
    if !value.is_finite() {
        return Err(FeatureError::NonFiniteValue {
            feature: name.to_string(),
        });
    }
    Ok(format_label(bin_index(value, lower, upper, bins), name))
}

fn check_range(name: &str, lower: f64, upper: f64, bins: usize) -> Result<(), FeatureError> {
    if bins == 0 {
        return Err(FeatureError::InvalidBinCount {
            feature: name.to_string(),
            bins,
        });
    }
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(FeatureError::InvalidRange {
            feature: name.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

fn bin_index(value: f64, lower: f64, upper: f64, bins: usize) -> usize {
    let width = ((upper - lower) / bins as f64).trunc();

    if value < lower {
        return 1;
    }
    if value >= lower + width * (bins - 1) as f64 {
        return bins;
    }
    for i in 1..bins {
        let lo = lower + width * (i - 1) as f64;
        let hi = lower + width * i as f64;
        if value >= lo && value < hi {
            return i;
        }
    }
    bins
}

/// A fitted binner for one named attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Binner {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub bins: usize,
}

impl Binner {
    /// Create a binner over an explicit range.
    pub fn new(
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        bins: usize,
    ) -> Result<Self, FeatureError> {
        let name = name.into();
        check_range(&name, lower, upper, bins)?;
        Ok(Self {
            name,
            lower,
            upper,
            bins,
        })
    }

    /// Create a binner whose range is the min and max of a reference column.
    pub fn from_reference<I>(
        name: impl Into<String>,
        values: I,
        bins: usize,
    ) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = f64>,
    {
        let name = name.into();
        let mut range: Option<(f64, f64)> = None;
        for value in values {
            if !value.is_finite() {
                return Err(FeatureError::NonFiniteValue { feature: name });
            }
            range = Some(match range {
                None => (value, value),
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
            });
        }
        let (lower, upper) = range.ok_or_else(|| FeatureError::EmptyReference {
            feature: name.clone(),
        })?;
        Self::new(name, lower, upper, bins)
    }

    /// Label `value` with its bin.
    pub fn label(&self, value: f64) -> Result<String, FeatureError> {
        bin_label(value, self.lower, self.upper, self.bins, &self.name)
    }
}
