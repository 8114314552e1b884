//! Seedable shuffle source used by question selection.
//!
//! Given the same seed the generated sequence is identical, so a randomised
//! paper can be reproduced by recording the seed.

use uuid::Uuid;

/// xorshift64 generator. Not cryptographically secure.
#[derive(Debug, Clone)]
pub struct ShuffleRng {
    state: u64,
}

impl ShuffleRng {
    /// A zero seed is replaced with 1.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, bound)` via rejection sampling. `bound` must be non-zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "bound must be non-zero");
        let bound = bound.max(1) as u64;
        let threshold = u64::MAX - (u64::MAX % bound);
        loop {
            let value = self.next_u64();
            if value < threshold {
                return (value % bound) as usize;
            }
        }
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }

    /// A uniformly random permutation of `0..len`.
    pub fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        self.shuffle(&mut order);
        order
    }
}

/// Non-zero seed folded from a fresh v4 UUID.
pub fn fresh_seed() -> u64 {
    let raw = Uuid::new_v4().as_u128();
    match (raw as u64) ^ ((raw >> 64) as u64) {
        0 => 1,
        seed => seed,
    }
}
