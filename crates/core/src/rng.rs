//! RNG module - seeded randomness for food placement
//!
//! Every session owns one [`SessionRng`]. Seeding it explicitly makes a whole
//! game reproducible (tests, benchmarks, remote agents replaying an episode);
//! the host seeds it from the OS when no seed is configured.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Seeded random source for one session
#[derive(Debug, Clone)]
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread-local OS-backed generator
    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    /// The seed this generator started from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for SessionRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
