//! Deviation and thermodynamic transforms.

use metabolyx_kb::ReferenceRange;

/// Range-derived z-score analogue: `(value - center) / spread`.
/// A zero spread yields 0 instead of dividing.
pub fn deviation(value: f64, center: f64, spread: f64) -> f64 {
    if spread == 0.0 {
        return 0.0;
    }
    (value - center) / spread
}

/// Deviation of `value` against a reference interval, which spans ±2.
pub fn range_deviation(value: f64, range: &ReferenceRange) -> f64 {
    deviation(value, range.center(), range.spread())
}

/// Saturating transform of ΔG: `min(|ΔG| / scale, cap)`.
pub fn thermodynamic_score(delta_g: f64, scale: f64, cap: f64) -> f64 {
    (delta_g.abs() / scale).min(cap)
}
