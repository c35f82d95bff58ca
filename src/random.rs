//! Random source construction.
//!
//! All randomness in a run flows through a single generator passed by
//! `&mut` into every operation. This module only decides how that
//! generator is seeded.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a 64-bit seed.
///
/// Two generators created from the same seed produce identical streams,
/// which makes whole runs reproducible.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a fresh seed from the thread-local entropy source.
pub fn random_seed() -> u64 {
    rand::random()
}
