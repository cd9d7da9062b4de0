//! RNG module - deterministic randomness and block spawning
//!
//! Every random decision the engine makes (block values, targets) goes through an
//! injectable [`rand::RngCore`], and every block id comes from an injectable
//! [`IdSource`]. Tests and replays use [`SimpleRng`] with a fixed seed, the
//! terminal host uses an entropy-seeded `StdRng`.

use rand::{Rng, RngCore};

use crate::grid::Block;
use crate::types::{BlockId, MAX_BLOCK_VALUE, MIN_BLOCK_VALUE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
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
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Source of fresh block ids
pub trait IdSource {
    fn next_id(&mut self) -> BlockId;

    /// Mark an externally supplied id as taken so it is never handed out.
    fn reserve(&mut self, _used: BlockId) {}
}

/// Monotonic id source: 1, 2, 3, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        self.next = self.next.wrapping_add(1);
        BlockId(self.next)
    }

    fn reserve(&mut self, used: BlockId) {
        self.next = self.next.max(used.0);
    }
}

/// Anything that can produce a fresh block for a cell.
///
/// The grid only ever asks for blocks through this trait, which lets tests
/// script exact values.
pub trait BlockSource {
    fn spawn(&mut self, row: u8, col: u8) -> Block;
}

/// Production block source: random values from `R`, ids from `I`
#[derive(Debug, Clone)]
pub struct BlockSpawner<R, I> {
    rng: R,
    ids: I,
}

impl<R: RngCore, I: IdSource> BlockSpawner<R, I> {
    pub fn new(rng: R, ids: I) -> Self {
        Self { rng, ids }
    }

    /// Uniform block value in `MIN_BLOCK_VALUE..=MAX_BLOCK_VALUE`
    pub fn roll_value(&mut self) -> u8 {
        self.rng.gen_range(MIN_BLOCK_VALUE..=MAX_BLOCK_VALUE)
    }

    /// Uniform target in `min..=max`
    pub fn roll_target(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }

    pub fn reserve_id(&mut self, used: BlockId) {
        self.ids.reserve(used);
    }
}

impl<R: RngCore, I: IdSource> BlockSource for BlockSpawner<R, I> {
    fn spawn(&mut self, row: u8, col: u8) -> Block {
        let value = self.roll_value();
        Block {
            id: self.ids.next_id(),
            value,
            row,
            col,
        }
    }
}
