//! Per-event seed construction.
//!
//! Strategy, following the reference producer:
//!
//! 1. bootstrap from the required identifiers multiplied with fixed primes,
//! 2. mix in every present optional scalar and collection count,
//! 3. mix in a positional aggregate of every present per-object field,
//! 4. finalize through the digest mixer.
//!
//! All intermediate arithmetic is unsigned 64-bit with silent wraparound;
//! the wraparound is part of the contract, not an overflow bug, and checked
//! arithmetic would diverge from the reference values.

use log::warn;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::batch::{EventBatch, SeedError};
use crate::digest::{digest_to_u64, BOOTSTRAP_HEX_CHARS, SEED_HEX_CHARS};
use crate::primes::PrimeTable;
use crate::schema::{
    SeedSchema, EVENT_COLUMN, LUMINOSITY_BLOCK_COLUMN, PRIME_OFFSET, RUN_COLUMN, VALUE_OFFSET,
};

/// Logs a degraded-feature warning at most once per process per key.
pub(crate) fn warn_absent_once(key: &str) {
    static WARNED: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));
    if let Ok(mut warned) = WARNED.lock() {
        if warned.insert(key.to_string()) {
            warn!("optional input '{key}' not found in batch for seed calculation");
        }
    }
}

/// Per-event values of one resolved global feature.
enum GlobalValues<'a> {
    Scalar(&'a [u64]),
    Counts(&'a [usize]),
}

struct GlobalFeature<'a> {
    position: u64,
    values: GlobalValues<'a>,
}

impl GlobalFeature<'_> {
    fn value(&self, event_index: usize) -> u64 {
        match self.values {
            GlobalValues::Scalar(values) => values[event_index],
            GlobalValues::Counts(counts) => counts[event_index] as u64,
        }
    }
}

struct ObjectFeature<'a> {
    position: u64,
    rows: &'a [Vec<i64>],
}

/// Derives one `u64` seed per event from a batch.
#[derive(Clone, Copy, Debug)]
pub struct EventSeedBuilder {
    primes: PrimeTable,
    schema: SeedSchema,
}

impl EventSeedBuilder {
    pub fn new(primes: PrimeTable, schema: SeedSchema) -> Self {
        Self { primes, schema }
    }

    /// Seeds every event of `batch`.
    ///
    /// Fails only on malformed input (a missing required column); absent
    /// optional features are warned once and excluded from the mixing for
    /// the whole batch. Events are independent, so the per-event map runs
    /// in parallel and is bit-identical to a sequential evaluation.
    pub fn seed_batch(&self, batch: &EventBatch) -> Result<Vec<u64>, SeedError> {
        let run = batch.require_column(RUN_COLUMN)?;
        let luminosity_block = batch.require_column(LUMINOSITY_BLOCK_COLUMN)?;
        let event = batch.require_column(EVENT_COLUMN)?;

        let globals = self.resolve_global_features(batch);
        let objects = self.resolve_object_features(batch);

        let seeds = (0..batch.len())
            .into_par_iter()
            .map(|index| {
                self.seed_event(
                    run[index],
                    luminosity_block[index],
                    event[index],
                    index,
                    &globals,
                    &objects,
                )
            })
            .collect();
        Ok(seeds)
    }

    /// Probes the schema's optional scalars and collection counts against
    /// the batch. Positions are assigned by presence: an absent feature
    /// shifts every later one.
    fn resolve_global_features<'a>(&self, batch: &'a EventBatch) -> Vec<GlobalFeature<'a>> {
        let mut features = Vec::new();
        let mut position = VALUE_OFFSET;
        for &name in self.schema.scalar_features {
            match batch.column(name) {
                Some(values) => {
                    features.push(GlobalFeature {
                        position,
                        values: GlobalValues::Scalar(values),
                    });
                    position += 1;
                }
                None => warn_absent_once(name),
            }
        }
        let simulation_only: &[&str] = if batch.is_simulation() {
            self.schema.simulation_only_collections
        } else {
            &[]
        };
        for &name in self.schema.count_collections.iter().chain(simulation_only) {
            match batch.collection(name) {
                Some(collection) => {
                    features.push(GlobalFeature {
                        position,
                        values: GlobalValues::Counts(collection.counts()),
                    });
                    position += 1;
                }
                None => warn_absent_once(name),
            }
        }
        features
    }

    /// Probes the per-object field list. Unlike the global pass, positions
    /// here are fixed by list index: an absent field skips the mixing but
    /// still consumes its slot.
    fn resolve_object_features<'a>(&self, batch: &'a EventBatch) -> Vec<ObjectFeature<'a>> {
        let mut features = Vec::new();
        for (index, spec) in self.schema.object_fields.iter().enumerate() {
            let position = VALUE_OFFSET + index as u64;
            let rows = batch
                .collection(spec.collection)
                .and_then(|collection| collection.field(spec.field));
            match rows {
                Some(rows) => features.push(ObjectFeature { position, rows }),
                None => warn_absent_once(&format!("{}.{}", spec.collection, spec.field)),
            }
        }
        features
    }

    fn seed_event(
        &self,
        run: u64,
        luminosity_block: u64,
        event: u64,
        event_index: usize,
        globals: &[GlobalFeature<'_>],
        objects: &[ObjectFeature<'_>],
    ) -> u64 {
        let bootstrap = self
            .primes
            .prime_at(7)
            .wrapping_mul(event)
            .wrapping_add(self.primes.prime_at(5).wrapping_mul(run))
            .wrapping_add(self.primes.prime_at(3).wrapping_mul(luminosity_block));
        let mut seed = digest_to_u64(bootstrap, BOOTSTRAP_HEX_CHARS);

        for feature in globals {
            let adjusted = feature.value(event_index).wrapping_add(feature.position);
            let prime = self.primes.prime_at(adjusted.wrapping_add(PRIME_OFFSET));
            seed = seed.wrapping_add(prime.wrapping_mul(adjusted));
        }

        for feature in objects {
            let hashed = object_field_aggregate(&feature.rows[event_index], feature.position);
            let prime = self.primes.prime_at(hashed.wrapping_add(PRIME_OFFSET));
            seed = seed.wrapping_add(prime.wrapping_mul(hashed));
        }

        digest_to_u64(seed, SEED_HEX_CHARS)
    }
}

/// Collapses one event's per-object values into a single scalar:
/// `n + Σ v·loc + Σ v²·loc` with `v` shifted by the feature position and
/// `loc` the 1-based object index. Signed sentinel values (e.g. `-1`
/// cross-reference indices) wrap into `u64` space via two's complement.
fn object_field_aggregate(row: &[i64], position: u64) -> u64 {
    let mut aggregate = row.len() as u64;
    for (index, &value) in row.iter().enumerate() {
        let location = index as u64 + 1;
        let adjusted = (value as u64).wrapping_add(position);
        aggregate = aggregate
            .wrapping_add(adjusted.wrapping_mul(location))
            .wrapping_add(adjusted.wrapping_mul(adjusted).wrapping_mul(location));
    }
    aggregate
}
