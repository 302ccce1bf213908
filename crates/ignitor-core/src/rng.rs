//! Deterministic PRNG for ignition and instability draws.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, good statistical
//! properties, and trivially serializable. Every probabilistic decision in
//! the core is a single synchronous [`SimRng::roll`], so a seeded run
//! replays exactly.

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// One uniform draw against a success probability.
    ///
    /// Returns `true` iff the sample lands at or below `probability`.
    /// Probabilities at or past the endpoints short-circuit without
    /// consuming a draw: `p <= 0` is always `false`, `p >= 1` always `true`.
    pub fn roll(&mut self, probability: Fixed64) -> bool {
        if probability <= Fixed64::ZERO {
            return false;
        }
        if probability >= Fixed64::from_num(1) {
            return true;
        }
        // For p in (0, 1) the Q32.32 raw bits hold the fraction scaled to
        // [0, 2^32); compare a uniform u32 against it.
        let sample = (self.next_u64() >> 32) as u64;
        sample < probability.to_bits() as u64
    }

    /// Get the internal state (for snapshots).
    pub fn state(&self) -> u64 {
        self.state
    }
}
