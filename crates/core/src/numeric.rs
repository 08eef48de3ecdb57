//! Small numeric helpers shared by the scorers and the wait-time model.

/// Length of the intersection of two closed ranges, never negative.
pub fn range_overlap(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.1.min(b.1) - a.0.max(b.0)).max(0.0)
}

/// Whether `value` lies inside the closed range `[min, max]`.
pub fn within(value: f64, range: (f64, f64)) -> bool {
    value >= range.0 && value <= range.1
}

/// Clamp to the unit interval. NaN collapses to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
