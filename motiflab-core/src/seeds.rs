//! Deterministic RNG derivation.
//!
//! A master seed expands into per-(label, index) sub-seeds via BLAKE3
//! hashing. Derivation is hash-based rather than sequential, so sub-seeds
//! are identical regardless of the order in which consumers ask for them.
//! Parallel permutation repetitions therefore reproduce exactly for a given
//! master seed, independent of thread count or scheduling.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic sub-seed factory for one run.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for (`label`, `index`).
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// A seeded StdRng for (`label`, `index`).
    pub fn rng_for(&self, label: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, index))
    }
}
