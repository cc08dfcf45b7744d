pub mod catalog;
pub mod identity;

/// Mean of the collected rating values, rounded to two decimal places.
/// `None` when there are none.
pub(crate) fn round2_mean(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    let mean = sum as f64 / values.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
