//! Adapter from derived seeds to a downstream deterministic RNG.
//!
//! Consumers feed `deterministic_seed` values into stochastic procedures
//! such as resampling or momentum smearing. Fixing the stream construction
//! here keeps those draws reproducible wherever the seed travels.

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

/// Deterministic RNG stream for one event or object seed.
pub fn seed_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
