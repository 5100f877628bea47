//! Exact set similarity.

use std::hash::Hash;

use hashbrown::HashSet;

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`.
///
/// Two empty sets score 0.0, not NaN.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|v| large.contains(*v)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Jaccard similarity of two token lists, treated as sets.
pub fn jaccard_tokens<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    jaccard(&a, &b)
}
