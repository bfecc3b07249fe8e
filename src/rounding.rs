//! Decimal rounding filter, applied once after all chunk merges complete.

/// Round every distance in `distances` to `round_decimal` fractional digits,
/// half-away-from-zero. `round_decimal == -1` is a no-op (matches the
/// original system's "disabled" sentinel).
pub fn round_in_place(distances: &mut [f32], round_decimal: i32) {
    if round_decimal == -1 {
        return;
    }
    debug_assert!(round_decimal >= 0);
    let multiplier = 10f32.powi(round_decimal);
    for d in distances.iter_mut() {
        if d.is_finite() {
            *d = (*d * multiplier).round() / multiplier;
        }
    }
}
