//! RNG module - deterministic randomness for spawn selection
//!
//! A small LCG keeps sessions reproducible: the same seed and the same
//! sequence of drops always produce the same spawn values.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    ///
    /// Uses the high bits, which cycle far slower than the low bits of an LCG.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index on empty range");
        let wide = u64::from(self.next_u32()) * len as u64;
        (wide >> 32) as usize
    }

    /// Current internal state (usable as a seed to resume the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
