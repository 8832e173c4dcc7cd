use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, LevelFilter};
use rand_core::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

use evtseed_core::{
    seed_rng, Collection, EventBatch, SeedEngine, EVENT_COLUMN, LUMINOSITY_BLOCK_COLUMN,
    RUN_COLUMN,
};

#[derive(Parser)]
#[command(name = "evtseed", author, version, about = "Deterministic event/object seed CLI")]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach deterministic seeds to a JSON batch file.
    Seed {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Recompute the seeds of an already-seeded batch and compare.
    Verify {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Seed a synthetic batch inline and print the results.
    Demo {
        #[arg(long, default_value_t = 4)]
        events: usize,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    match cli.command {
        Commands::Seed { input, out } => cmd_seed(&input, &out),
        Commands::Verify { input } => cmd_verify(&input),
        Commands::Demo { events, out } => cmd_demo(events, out.as_deref()),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn cmd_seed(input: &Path, out: &Path) -> Result<()> {
    let mut batch = load_batch(input)?;
    let engine = SeedEngine::nanoaod();
    engine
        .attach_seeds(&mut batch)
        .with_context(|| format!("seeding batch from {}", input.display()))?;
    save_batch(out, &batch)?;
    println!(
        "Seeded {} events from {} and wrote them to {}",
        batch.len(),
        input.display(),
        out.display()
    );
    Ok(())
}

fn cmd_verify(input: &Path) -> Result<()> {
    let batch = load_batch(input)?;
    let stored = match batch.event_seeds() {
        Some(stored) => stored,
        None => bail!("{} carries no deterministic_seed column", input.display()),
    };
    let engine = SeedEngine::nanoaod();
    let recomputed = engine
        .event_seeds(&batch)
        .with_context(|| format!("recomputing seeds for {}", input.display()))?;
    let mismatches = stored
        .iter()
        .zip(&recomputed)
        .filter(|(stored, fresh)| stored != fresh)
        .count();
    if mismatches > 0 {
        bail!(
            "{} of {} stored event seeds do not reproduce",
            mismatches,
            stored.len()
        );
    }
    if let Some(jets) = batch
        .collection(engine.schema().object_seed_collection)
        .and_then(Collection::object_seeds)
    {
        let fresh = engine
            .object_seeds(&batch, &recomputed)
            .unwrap_or_default();
        if jets != fresh.as_slice() {
            bail!("stored object seeds do not reproduce");
        }
    }
    println!(
        "All {} event seeds in {} reproduce exactly",
        stored.len(),
        input.display()
    );
    Ok(())
}

fn cmd_demo(events: usize, out: Option<&Path>) -> Result<()> {
    let mut batch = synthetic_batch(events)?;
    let engine = SeedEngine::nanoaod();
    engine.attach_seeds(&mut batch).context("seeding demo batch")?;
    let event_seeds = batch.event_seeds().expect("seeds just attached");
    let jet_seeds = batch
        .collection("Jet")
        .and_then(Collection::object_seeds)
        .expect("jet seeds just attached");
    for (index, (&seed, jets)) in event_seeds.iter().zip(jet_seeds).enumerate() {
        let mut rng = seed_rng(seed);
        println!(
            "Event {index}: seed {seed:#018x}, first draw {:#018x}, {} jet seed(s)",
            rng.next_u64(),
            jets.len()
        );
        for (jet, &jet_seed) in jets.iter().enumerate() {
            debug!("  jet {jet}: seed {jet_seed:#018x}");
        }
    }
    if let Some(path) = out {
        save_batch(path, &batch)?;
        println!("Wrote the seeded batch to {}", path.display());
    }
    Ok(())
}

fn synthetic_batch(events: usize) -> Result<EventBatch> {
    let counts: Vec<usize> = (0..events).map(|i| 1 + i % 3).collect();
    let constituents = counts
        .iter()
        .enumerate()
        .map(|(i, &n)| (0..n as i64).map(|j| 7 + j + (i as i64 % 5)).collect())
        .collect();
    let jets = Collection::from_counts(counts).with_field("nConstituents", constituents)?;
    let batch = EventBatch::simulation(events)
        .with_column(RUN_COLUMN, vec![316145; events])?
        .with_column(
            LUMINOSITY_BLOCK_COLUMN,
            (0..events).map(|i| 80 + i as u64 / 8).collect(),
        )?
        .with_column(EVENT_COLUMN, (0..events).map(|i| 1_000_000 + i as u64).collect())?
        .with_column("Pileup.nPU", (0..events).map(|i| 25 + (i as u64 * 11) % 30).collect())?
        .with_collection("Jet", jets)?;
    Ok(batch)
}

fn load_batch(path: &Path) -> Result<EventBatch> {
    let data =
        fs::read(path).with_context(|| format!("reading batch from {}", path.display()))?;
    let batch: EventBatch = serde_json::from_slice(&data)
        .with_context(|| format!("parsing batch from {}", path.display()))?;
    batch
        .validate()
        .with_context(|| format!("validating batch from {}", path.display()))?;
    Ok(batch)
}

fn save_batch(path: &Path, batch: &EventBatch) -> Result<()> {
    let serialized = serde_json::to_string_pretty(batch)?;
    fs::write(path, serialized)
        .with_context(|| format!("writing batch to {}", path.display()))?;
    Ok(())
}
