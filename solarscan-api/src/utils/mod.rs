//! Numeric helpers shared by the calculators
//!
//! Rounding is half away from zero throughout (`f64::round` on the scaled value).

/// Round `value` to `decimals` places, halves away from zero
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to whole won, halves away from zero
pub fn round_to_won(value: f64) -> i64 {
    value.round() as i64
}
