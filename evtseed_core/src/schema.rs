//! Canonical column lists driving the presence-based feature enumeration.
//!
//! The schema is resolved against a batch exactly once; per-event code only
//! walks the resolved feature list. Enumeration positions in the global
//! scalar pass are assigned by presence, so adding or removing an optional
//! column from a schema shifts every later feature and changes all
//! downstream seeds. That coupling is deliberate and must not be
//! "stabilized" away.

pub const RUN_COLUMN: &str = "run";
pub const LUMINOSITY_BLOCK_COLUMN: &str = "luminosityBlock";
pub const EVENT_COLUMN: &str = "event";

/// Position assigned to the first mixed feature.
pub const VALUE_OFFSET: u64 = 3;

/// Offset applied before every prime-table lookup in the mixing passes.
pub const PRIME_OFFSET: u64 = 15;

/// Fixed prime-table position mixed into every object-seed step.
pub const OBJECT_STEP_PRIME_INDEX: u64 = 50;

/// A per-object integer field addressed as `collection.field`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectField {
    pub collection: &'static str,
    pub field: &'static str,
}

impl ObjectField {
    pub const fn new(collection: &'static str, field: &'static str) -> Self {
        Self { collection, field }
    }
}

const NANOAOD_SCALAR_FEATURES: &[&str] = &["Pileup.nPU"];

const NANOAOD_COUNT_COLLECTIONS: &[&str] = &[
    "Jet", "FatJet", "SubJet", "Photon", "Muon", "Electron", "Tau", "SV",
];

const NANOAOD_SIMULATION_ONLY_COLLECTIONS: &[&str] = &["GenJet", "GenPart"];

const NANOAOD_OBJECT_FIELDS: &[ObjectField] = &[
    ObjectField::new("Electron", "jetIdx"),
    ObjectField::new("Electron", "seediPhiOriY"),
    ObjectField::new("Tau", "jetIdx"),
    ObjectField::new("Tau", "decayMode"),
    ObjectField::new("Muon", "jetIdx"),
    ObjectField::new("Muon", "nStations"),
    ObjectField::new("Jet", "nConstituents"),
    ObjectField::new("Jet", "nElectrons"),
    ObjectField::new("Jet", "nMuons"),
];

/// Ordered feature lists consulted by the seed builders.
#[derive(Clone, Copy, Debug)]
pub struct SeedSchema {
    /// Optional flat integer columns, mixed first when present.
    pub scalar_features: &'static [&'static str],
    /// Collections whose per-event object counts are mixed, in order.
    pub count_collections: &'static [&'static str],
    /// Count collections only eligible on simulated batches.
    pub simulation_only_collections: &'static [&'static str],
    /// Per-object fields for the aggregate pass; positions here are fixed
    /// by list index, absent fields skip but still consume their slot.
    pub object_fields: &'static [ObjectField],
    /// Collection whose objects receive their own seeds.
    pub object_seed_collection: &'static str,
}

impl SeedSchema {
    pub const fn new(
        scalar_features: &'static [&'static str],
        count_collections: &'static [&'static str],
        simulation_only_collections: &'static [&'static str],
        object_fields: &'static [ObjectField],
        object_seed_collection: &'static str,
    ) -> Self {
        Self {
            scalar_features,
            count_collections,
            simulation_only_collections,
            object_fields,
            object_seed_collection,
        }
    }

    /// The CMS NanoAOD reference schema; seeds derived under it match the
    /// original producer bit-for-bit.
    pub const fn nanoaod() -> Self {
        Self::new(
            &NANOAOD_SCALAR_FEATURES,
            &NANOAOD_COUNT_COLLECTIONS,
            &NANOAOD_SIMULATION_ONLY_COLLECTIONS,
            &NANOAOD_OBJECT_FIELDS,
            "Jet",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanoaod_lists_keep_their_reference_order() {
        let schema = SeedSchema::nanoaod();
        assert_eq!(schema.scalar_features, ["Pileup.nPU"]);
        assert_eq!(schema.count_collections[0], "Jet");
        assert_eq!(schema.count_collections[7], "SV");
        assert_eq!(schema.simulation_only_collections, ["GenJet", "GenPart"]);
        assert_eq!(schema.object_fields.len(), 9);
        assert_eq!(
            schema.object_fields[0],
            ObjectField::new("Electron", "jetIdx")
        );
        assert_eq!(schema.object_fields[8], ObjectField::new("Jet", "nMuons"));
        assert_eq!(schema.object_seed_collection, "Jet");
    }
}
