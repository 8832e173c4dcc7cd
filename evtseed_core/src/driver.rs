//! Composite driver sequencing the event and object seed builders.

use log::debug;
use std::collections::HashSet;

use crate::batch::{EventBatch, SeedError};
use crate::event_seed::EventSeedBuilder;
use crate::object_seed::ObjectSeedBuilder;
use crate::primes::PrimeTable;
use crate::schema::SeedSchema;

/// Immutable seed-derivation configuration: the prime table, the schema and
/// the two builders wired to them. Construct once per process and share
/// freely; there is no mutable state.
#[derive(Clone, Copy, Debug)]
pub struct SeedEngine {
    schema: SeedSchema,
    event_builder: EventSeedBuilder,
    object_builder: ObjectSeedBuilder,
}

impl SeedEngine {
    pub fn new(primes: PrimeTable, schema: SeedSchema) -> Self {
        Self {
            schema,
            event_builder: EventSeedBuilder::new(primes, schema),
            object_builder: ObjectSeedBuilder::new(primes, schema),
        }
    }

    /// Engine for the CMS NanoAOD reference schema.
    pub fn nanoaod() -> Self {
        Self::new(PrimeTable::reference(), SeedSchema::nanoaod())
    }

    pub fn schema(&self) -> &SeedSchema {
        &self.schema
    }

    pub fn event_builder(&self) -> &EventSeedBuilder {
        &self.event_builder
    }

    pub fn object_builder(&self) -> &ObjectSeedBuilder {
        &self.object_builder
    }

    /// Event seeds only, without touching the batch.
    pub fn event_seeds(&self, batch: &EventBatch) -> Result<Vec<u64>, SeedError> {
        self.event_builder.seed_batch(batch)
    }

    /// Object seeds only, for event seeds computed earlier.
    pub fn object_seeds(&self, batch: &EventBatch, event_seeds: &[u64]) -> Option<Vec<Vec<u64>>> {
        self.object_builder.seed_batch(batch, event_seeds)
    }

    /// One pass over the batch: derive event seeds, then object seeds
    /// reusing them, and attach both as `deterministic_seed` columns.
    pub fn attach_seeds(&self, batch: &mut EventBatch) -> Result<(), SeedError> {
        let event_seeds = self.event_builder.seed_batch(batch)?;
        log_distinct("event", event_seeds.iter());

        if let Some(object_seeds) = self.object_builder.seed_batch(batch, &event_seeds) {
            log_distinct("object", object_seeds.iter().flatten());
            batch.set_object_seeds(self.schema.object_seed_collection, object_seeds);
        }

        batch.set_event_seeds(event_seeds);
        Ok(())
    }
}

fn log_distinct<'a>(kind: &str, seeds: impl Iterator<Item = &'a u64>) {
    if log::log_enabled!(log::Level::Debug) {
        let mut total = 0usize;
        let mut distinct = HashSet::new();
        for seed in seeds {
            total += 1;
            distinct.insert(*seed);
        }
        debug!("{kind} seeds: {total} derived, {} distinct", distinct.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Collection;
    use crate::schema::{EVENT_COLUMN, LUMINOSITY_BLOCK_COLUMN, RUN_COLUMN};

    fn small_batch() -> EventBatch {
        EventBatch::new(2)
            .with_column(RUN_COLUMN, vec![1, 1])
            .unwrap()
            .with_column(LUMINOSITY_BLOCK_COLUMN, vec![1, 2])
            .unwrap()
            .with_column(EVENT_COLUMN, vec![1, 2])
            .unwrap()
    }

    #[test]
    fn attach_populates_event_and_object_columns() {
        let mut batch = small_batch()
            .with_collection("Jet", Collection::from_counts(vec![2, 1]))
            .unwrap();
        SeedEngine::nanoaod().attach_seeds(&mut batch).unwrap();
        let event_seeds = batch.event_seeds().unwrap();
        assert_eq!(event_seeds.len(), 2);
        let object_seeds = batch.collection("Jet").unwrap().object_seeds().unwrap();
        assert_eq!(object_seeds[0].len(), 2);
        assert_eq!(object_seeds[1].len(), 1);
        let engine = SeedEngine::nanoaod();
        assert_eq!(
            object_seeds[1][0],
            engine.object_builder().object_seed(event_seeds[1], 0)
        );
    }

    #[test]
    fn attach_without_target_collection_sets_only_event_seeds() {
        let mut batch = small_batch();
        SeedEngine::nanoaod().attach_seeds(&mut batch).unwrap();
        assert!(batch.event_seeds().is_some());
    }

    #[test]
    fn attach_propagates_malformed_input() {
        let mut batch = EventBatch::new(1).with_column(RUN_COLUMN, vec![1]).unwrap();
        assert!(SeedEngine::nanoaod().attach_seeds(&mut batch).is_err());
        assert!(batch.event_seeds().is_none());
    }
}
