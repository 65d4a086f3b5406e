//! Linear-congruential generators whose state lives in `AiState`.
//!
//! Two distinct sequences are used: one for decision draws and one for the
//! evade direction sign. Both wrap at 2^32.

/// Advance the decision generator. Returns a value in [0, 1] and the new state.
pub fn next_random(state: u32) -> (f64, u32) {
    let next = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    (next as f64 / u32::MAX as f64, next)
}

/// Advance the sign generator. Returns +1 for even states, -1 for odd.
pub fn next_random_sign(state: u32) -> (f64, u32) {
    let next = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
    let sign = if next % 2 == 0 { 1.0 } else { -1.0 };
    (sign, next)
}
