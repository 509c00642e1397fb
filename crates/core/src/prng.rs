//! Seedable Xorshift64 generator used for spawn jitter.
//!
//! Particle birth positions are the only random input to the simulation, so a
//! session seeded with the same value replays bit-identically.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A zero seed is a fixed point of xorshift (it would emit zeros forever),
/// so it is swapped for a non-zero constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        let state = match seed {
            0 => Self::ZERO_SEED_REPLACEMENT,
            s => s,
        };
        Self { state }
    }

    /// Advances the state and returns the next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform f64 in [0, 1), built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform offset in `[-width / 2, width / 2)`.
    ///
    /// A `width` of zero always yields 0.0.
    pub fn next_signed(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }
}
