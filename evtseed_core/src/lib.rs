//! Deterministic seed derivation for collision-event batches.
//!
//! Events and their sub-objects (jets, leptons, ...) receive reproducible
//! pseudo-random 64-bit seeds derived purely from their identifying fields,
//! a fixed prime table and a SHA-256 mixing step. Seeds are bit-identical
//! across repeated runs, parallel workers, batch chunkings and processing
//! order, which makes downstream stochastic procedures auditable and
//! diffable. The hash serves only as a mixing function; nothing here is a
//! security primitive.

pub mod batch;
pub mod digest;
pub mod driver;
pub mod event_seed;
pub mod object_seed;
pub mod primes;
pub mod rng;
pub mod schema;

pub use crate::batch::{Collection, EventBatch, SeedError};
pub use crate::digest::{digest_to_u64, BOOTSTRAP_HEX_CHARS, MAX_HEX_CHARS, SEED_HEX_CHARS};
pub use crate::driver::SeedEngine;
pub use crate::event_seed::EventSeedBuilder;
pub use crate::object_seed::ObjectSeedBuilder;
pub use crate::primes::PrimeTable;
pub use crate::rng::seed_rng;
pub use crate::schema::{
    ObjectField, SeedSchema, EVENT_COLUMN, LUMINOSITY_BLOCK_COLUMN, OBJECT_STEP_PRIME_INDEX,
    PRIME_OFFSET, RUN_COLUMN, VALUE_OFFSET,
};
