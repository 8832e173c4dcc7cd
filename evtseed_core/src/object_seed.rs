//! Per-object seed construction.
//!
//! Object seeds reuse the owning event's final seed: each object at local
//! index `j` gets `digest(E + prime_at(E) * (j + prime_at(50)), 16)`. The
//! builder never imposes an ordering; the local index is whatever order the
//! collection presents, which the selection layer keeps stable.

use rayon::prelude::*;

use crate::batch::EventBatch;
use crate::digest::{digest_to_u64, SEED_HEX_CHARS};
use crate::event_seed::warn_absent_once;
use crate::primes::PrimeTable;
use crate::schema::{SeedSchema, OBJECT_STEP_PRIME_INDEX};

/// Derives one `u64` seed per object of the schema's target collection.
#[derive(Clone, Copy, Debug)]
pub struct ObjectSeedBuilder {
    primes: PrimeTable,
    schema: SeedSchema,
}

impl ObjectSeedBuilder {
    pub fn new(primes: PrimeTable, schema: SeedSchema) -> Self {
        Self { primes, schema }
    }

    /// Seed for a single object given its owning event's seed and 0-based
    /// local index within the collection.
    pub fn object_seed(&self, event_seed: u64, local_index: u64) -> u64 {
        let prime = self.primes.prime_at(event_seed);
        let step = local_index.wrapping_add(self.primes.prime_at(OBJECT_STEP_PRIME_INDEX));
        digest_to_u64(
            event_seed.wrapping_add(prime.wrapping_mul(step)),
            SEED_HEX_CHARS,
        )
    }

    /// Seeds every object of the target collection, reusing the already
    /// computed event seeds. A batch without the collection is a no-op:
    /// `None`, never an error.
    pub fn seed_batch(
        &self,
        batch: &EventBatch,
        event_seeds: &[u64],
    ) -> Option<Vec<Vec<u64>>> {
        let collection = match batch.collection(self.schema.object_seed_collection) {
            Some(collection) => collection,
            None => {
                warn_absent_once(self.schema.object_seed_collection);
                return None;
            }
        };
        debug_assert_eq!(event_seeds.len(), collection.len());
        let seeds = event_seeds
            .par_iter()
            .zip(collection.counts().par_iter())
            .map(|(&event_seed, &count)| {
                (0..count as u64)
                    .map(|local_index| self.object_seed(event_seed, local_index))
                    .collect()
            })
            .collect();
        Some(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Collection;

    fn builder() -> ObjectSeedBuilder {
        ObjectSeedBuilder::new(PrimeTable::reference(), SeedSchema::nanoaod())
    }

    const EVENT_SEED: u64 = 13082129665886096593;

    #[test]
    fn known_answers_for_the_reference_event_seed() {
        let builder = builder();
        assert_eq!(builder.object_seed(EVENT_SEED, 0), 7059672760779450181);
        assert_eq!(builder.object_seed(EVENT_SEED, 1), 15961906413953885387);
        assert_eq!(builder.object_seed(EVENT_SEED, 5), 6945242033259225294);
    }

    #[test]
    fn same_index_always_reproduces_the_same_seed() {
        let builder = builder();
        for local_index in 0..32 {
            assert_eq!(
                builder.object_seed(EVENT_SEED, local_index),
                builder.object_seed(EVENT_SEED, local_index)
            );
        }
    }

    #[test]
    fn different_local_indices_give_different_seeds() {
        let builder = builder();
        let mut seen = std::collections::HashSet::new();
        for local_index in 0..64 {
            assert!(seen.insert(builder.object_seed(EVENT_SEED, local_index)));
        }
    }

    #[test]
    fn batch_rows_follow_the_collection_counts() {
        let batch = EventBatch::new(3)
            .with_collection("Jet", Collection::from_counts(vec![2, 0, 3]))
            .unwrap();
        let event_seeds = [EVENT_SEED, 1, 2];
        let seeds = builder().seed_batch(&batch, &event_seeds).unwrap();
        assert_eq!(
            seeds.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![2, 0, 3]
        );
        assert_eq!(seeds[0][1], builder().object_seed(EVENT_SEED, 1));
    }

    #[test]
    fn absent_collection_is_a_no_op() {
        let batch = EventBatch::new(2);
        assert!(builder().seed_batch(&batch, &[1, 2]).is_none());
    }
}
