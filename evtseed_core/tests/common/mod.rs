//! Shared batch fixtures for the integration tests.
//!
//! `full_batch` selects events by index from one fixed three-event dataset,
//! which lets the determinism tests rebuild arbitrary chunkings and
//! permutations of the very same events.

// Each integration-test binary pulls in only part of these fixtures.
#![allow(dead_code)]

use evtseed_core::{
    Collection, EventBatch, EVENT_COLUMN, LUMINOSITY_BLOCK_COLUMN, RUN_COLUMN,
};

pub const RUN: [u64; 3] = [316145, 316145, 316146];
pub const LUMINOSITY_BLOCK: [u64; 3] = [89, 89, 90];
pub const EVENT: [u64; 3] = [1234567, 1234568, 99000001];
pub const PILEUP: [u64; 3] = [32, 27, 41];

fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

fn jets(indices: &[usize]) -> Collection {
    let counts: [usize; 3] = [3, 0, 2];
    let n_constituents: [&[i64]; 3] = [&[21, 14, 9], &[], &[17, 11]];
    let n_electrons: [&[i64]; 3] = [&[0, 1, 0], &[], &[2, 0]];
    let n_muons: [&[i64]; 3] = [&[1, 0, 0], &[], &[0, 1]];
    Collection::from_counts(pick(&counts, indices))
        .with_field("nConstituents", rows(&n_constituents, indices))
        .unwrap()
        .with_field("nElectrons", rows(&n_electrons, indices))
        .unwrap()
        .with_field("nMuons", rows(&n_muons, indices))
        .unwrap()
}

fn rows(values: &[&[i64]; 3], indices: &[usize]) -> Vec<Vec<i64>> {
    indices.iter().map(|&i| values[i].to_vec()).collect()
}

/// The reference three-event batch with every optional input present,
/// restricted to `indices` (in that order).
pub fn full_batch(indices: &[usize], simulation: bool) -> EventBatch {
    full_batch_with_pileup(indices, simulation, true)
}

/// Same dataset with the pileup column withheld, for exercising the
/// presence-dependent position shift.
pub fn full_batch_without_pileup(indices: &[usize], simulation: bool) -> EventBatch {
    full_batch_with_pileup(indices, simulation, false)
}

fn full_batch_with_pileup(indices: &[usize], simulation: bool, pileup: bool) -> EventBatch {
    let base = if simulation {
        EventBatch::simulation(indices.len())
    } else {
        EventBatch::new(indices.len())
    };
    let muons = Collection::from_counts(pick(&[1, 2, 0], indices))
        .with_field("jetIdx", rows(&[&[0], &[1, -1], &[]], indices))
        .unwrap()
        .with_field("nStations", rows(&[&[3], &[2, 4], &[]], indices))
        .unwrap();
    let electrons = Collection::from_counts(pick(&[2, 0, 1], indices))
        .with_field("jetIdx", rows(&[&[1, -1], &[], &[0]], indices))
        .unwrap()
        .with_field("seediPhiOriY", rows(&[&[17, -4], &[], &[23]], indices))
        .unwrap();
    let taus = Collection::from_counts(pick(&[0, 1, 0], indices))
        .with_field("jetIdx", rows(&[&[], &[2], &[]], indices))
        .unwrap()
        .with_field("decayMode", rows(&[&[], &[10], &[]], indices))
        .unwrap();
    let mut batch = base
        .with_column(RUN_COLUMN, pick(&RUN, indices))
        .unwrap()
        .with_column(LUMINOSITY_BLOCK_COLUMN, pick(&LUMINOSITY_BLOCK, indices))
        .unwrap()
        .with_column(EVENT_COLUMN, pick(&EVENT, indices))
        .unwrap();
    if pileup {
        batch = batch
            .with_column("Pileup.nPU", pick(&PILEUP, indices))
            .unwrap();
    }
    batch
        .with_collection("Jet", jets(indices))
        .unwrap()
        .with_collection("Muon", muons)
        .unwrap()
        .with_collection("Electron", electrons)
        .unwrap()
        .with_collection("Tau", taus)
        .unwrap()
        .with_collection("FatJet", Collection::from_counts(pick(&[1, 0, 0], indices)))
        .unwrap()
        .with_collection("SubJet", Collection::from_counts(pick(&[2, 0, 0], indices)))
        .unwrap()
        .with_collection("Photon", Collection::from_counts(pick(&[0, 2, 1], indices)))
        .unwrap()
        .with_collection("SV", Collection::from_counts(pick(&[1, 1, 0], indices)))
        .unwrap()
        .with_collection("GenJet", Collection::from_counts(pick(&[4, 2, 3], indices)))
        .unwrap()
        .with_collection("GenPart", Collection::from_counts(pick(&[55, 40, 61], indices)))
        .unwrap()
}

/// Two events with nothing beyond the required identifiers.
pub fn minimal_batch() -> EventBatch {
    EventBatch::new(2)
        .with_column(RUN_COLUMN, vec![1, 1])
        .unwrap()
        .with_column(LUMINOSITY_BLOCK_COLUMN, vec![1, 2])
        .unwrap()
        .with_column(EVENT_COLUMN, vec![1, 2])
        .unwrap()
}
