//! Columnar event batches and the seed-derivation error taxonomy.
//!
//! A batch is an ordered set of events carried as named integer columns
//! plus named variable-length object collections. Presence of an optional
//! column or collection is batch-wide metadata: either every event has it
//! or none does. Derived seeds are attached to the batch as additional
//! columns and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("required column '{name}' is missing from the batch")]
    MissingRequiredColumn { name: &'static str },

    #[error("column '{name}' carries {found} entries but the batch holds {expected} events")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "collection '{collection}' carries {found} per-event counts \
         but the batch holds {expected} events"
    )]
    CollectionLengthMismatch {
        collection: String,
        expected: usize,
        found: usize,
    },

    #[error("field '{field}' carries rows for {found} events but its collection covers {expected}")]
    FieldRowsMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "field '{field}' carries {found} values for event {event_index} \
         but the collection counts {expected}"
    )]
    ObjectFieldLengthMismatch {
        field: String,
        event_index: usize,
        expected: usize,
        found: usize,
    },
}

/// A variable-length object collection (e.g. the jets of each event).
///
/// Per-object integer fields are jagged rows aligned with the per-event
/// object counts. NanoAOD-style cross-reference fields may carry `-1`
/// sentinels; they enter the seed mixing through two's-complement
/// conversion to `u64`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    counts: Vec<usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Vec<Vec<i64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deterministic_seed: Option<Vec<Vec<u64>>>,
}

impl Collection {
    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self {
            counts,
            fields: BTreeMap::new(),
            deterministic_seed: None,
        }
    }

    /// Adds a per-object integer field, checked against the object counts.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        rows: Vec<Vec<i64>>,
    ) -> Result<Self, SeedError> {
        let name = name.into();
        if rows.len() != self.counts.len() {
            return Err(SeedError::FieldRowsMismatch {
                field: name,
                expected: self.counts.len(),
                found: rows.len(),
            });
        }
        for (event_index, (row, &count)) in rows.iter().zip(&self.counts).enumerate() {
            if row.len() != count {
                return Err(SeedError::ObjectFieldLengthMismatch {
                    field: name,
                    event_index,
                    expected: count,
                    found: row.len(),
                });
            }
        }
        self.fields.insert(name, rows);
        Ok(self)
    }

    /// Number of events covered by this collection.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn field(&self, name: &str) -> Option<&[Vec<i64>]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Per-object seeds attached by the driver, if any.
    pub fn object_seeds(&self) -> Option<&[Vec<u64>]> {
        self.deterministic_seed.as_deref()
    }

    pub(crate) fn set_object_seeds(&mut self, seeds: Vec<Vec<u64>>) {
        debug_assert_eq!(seeds.len(), self.counts.len());
        self.deterministic_seed = Some(seeds);
    }
}

/// An ordered batch of events, stored column-wise.
///
/// Required identifying columns (`run`, `luminosityBlock`, `event`) live in
/// the same flat-column map as optional scalar features; the seed builders
/// distinguish them only by treating their absence as fatal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    len: usize,
    #[serde(default)]
    is_simulation: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    columns: BTreeMap<String, Vec<u64>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    collections: BTreeMap<String, Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deterministic_seed: Option<Vec<u64>>,
}

impl EventBatch {
    /// An empty recorded-data batch of `len` events.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    /// An empty simulated batch of `len` events. Simulation-only
    /// collections are eligible for seed mixing only on such batches.
    pub fn simulation(len: usize) -> Self {
        Self {
            len,
            is_simulation: true,
            ..Self::default()
        }
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<u64>,
    ) -> Result<Self, SeedError> {
        let name = name.into();
        if values.len() != self.len {
            return Err(SeedError::ColumnLengthMismatch {
                name,
                expected: self.len,
                found: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        collection: Collection,
    ) -> Result<Self, SeedError> {
        let name = name.into();
        if collection.len() != self.len {
            return Err(SeedError::CollectionLengthMismatch {
                collection: name,
                expected: self.len,
                found: collection.len(),
            });
        }
        self.collections.insert(name, collection);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_simulation(&self) -> bool {
        self.is_simulation
    }

    pub fn column(&self, name: &str) -> Option<&[u64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Flat column lookup whose absence is malformed input.
    pub fn require_column(&self, name: &'static str) -> Result<&[u64], SeedError> {
        self.column(name)
            .ok_or(SeedError::MissingRequiredColumn { name })
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Per-event seeds attached by the driver, if any.
    pub fn event_seeds(&self) -> Option<&[u64]> {
        self.deterministic_seed.as_deref()
    }

    pub(crate) fn set_event_seeds(&mut self, seeds: Vec<u64>) {
        debug_assert_eq!(seeds.len(), self.len);
        self.deterministic_seed = Some(seeds);
    }

    pub(crate) fn set_object_seeds(&mut self, collection: &str, seeds: Vec<Vec<u64>>) {
        if let Some(target) = self.collections.get_mut(collection) {
            target.set_object_seeds(seeds);
        }
    }

    /// Re-checks every column and collection length, for batches that
    /// bypassed the checked builders (e.g. deserialized input).
    pub fn validate(&self) -> Result<(), SeedError> {
        for (name, values) in &self.columns {
            if values.len() != self.len {
                return Err(SeedError::ColumnLengthMismatch {
                    name: name.clone(),
                    expected: self.len,
                    found: values.len(),
                });
            }
        }
        for (name, collection) in &self.collections {
            if collection.len() != self.len {
                return Err(SeedError::CollectionLengthMismatch {
                    collection: name.clone(),
                    expected: self.len,
                    found: collection.len(),
                });
            }
            for (field, rows) in &collection.fields {
                if rows.len() != collection.counts.len() {
                    return Err(SeedError::FieldRowsMismatch {
                        field: format!("{name}.{field}"),
                        expected: collection.counts.len(),
                        found: rows.len(),
                    });
                }
                for (event_index, (row, &count)) in
                    rows.iter().zip(&collection.counts).enumerate()
                {
                    if row.len() != count {
                        return Err(SeedError::ObjectFieldLengthMismatch {
                            field: format!("{name}.{field}"),
                            event_index,
                            expected: count,
                            found: row.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
