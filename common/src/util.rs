use serde::{Deserialize, Serialize};

/// Source of randomness for food placement.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`. `bound` must be non-zero.
    fn next_below(&mut self, bound: u32) -> u32 {
        // Multiply-shift keeps the bias negligible for grid-sized bounds
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }
}

// Simple pseudorandom number generator using xorshift algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        // Ensure we don't start with 0 state as xorshift doesn't work with 0
        let state = if seed == 0 { 0x1234567890abcdef } else { seed };
        PseudoRandom { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        // xorshift64 algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }
}

impl RandomSource for PseudoRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
