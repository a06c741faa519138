//! grid: end-to-end facility siting on a synthetic street grid.
//!
//! Builds a 12 × 10 grid split by a river with two bridges, joins a set of
//! census tracts onto its intersections, and sites `K` facilities with the
//! HiGHS backend.
//!
//! ```text
//! cargo run -p grid --release -- [config.toml] [output-dir]
//! ```
//!
//! Without a config file the defaults are used (K = 6, N = 3, r = 0.4,
//! general model with a 200-person candidate threshold).  Set `RUST_LOG=debug`
//! for per-stage detail.

mod network;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use siting_core::SitingConfig;
use siting_output::persist::{save_matrix, save_population};
use siting_output::{CsvWriter, ResultWriter};
use siting_pipeline::{
    HighsBackend, PipelineBuilder, PipelineError, PipelineObserver, SitingOutcome, Stage,
};
use siting_population::aggregate_by_nearest_node;
use siting_solve::SolveError;

use network::{BLOCK_M, COLS, ROWS, build_network, census_tracts};

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints one line per finished stage.
struct StagePrinter;

impl PipelineObserver for StagePrinter {
    fn on_stage_end(&mut self, stage: Stage, elapsed: Duration) {
        println!("  {:<16} {:>9.3} ms", stage.to_string(), elapsed.as_secs_f64() * 1e3);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<SitingConfig> {
    let Some(path) = path else {
        return Ok(SitingConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: SitingConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("output/grid"));

    let config = load_config(config_path.as_deref())?;

    println!("=== grid: facility siting ===");
    println!(
        "Grid: {COLS} × {ROWS} intersections, {BLOCK_M} m blocks  |  K = {}",
        config.facility_count
    );
    println!();

    // 1. Road network and census join.
    let network = build_network()?;
    let tracts = census_tracts();
    let population = aggregate_by_nearest_node(&network, &tracts)?;
    info!(
        nodes  = network.node_count(),
        edges  = network.edge_count(),
        tracts = tracts.len(),
        people = population.values().sum::<f64>(),
        "inputs ready"
    );

    // 2. Pipeline.
    let mut pipeline = PipelineBuilder::new(config, network, population, HighsBackend).build()?;

    let t0 = Instant::now();
    println!("Stages:");
    let outcome = run_with_fallback(&mut pipeline)?;
    println!("Finished in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 3. Export.
    std::fs::create_dir_all(&out_dir)?;
    write_outputs(&out_dir, &outcome, pipeline.distance_matrix())?;

    // 4. Summary.
    println!("{:<6} {:<8} {:>8} {:>10} {:>10}", "Rank", "Node", "Weight", "x (m)", "y (m)");
    println!("{}", "-".repeat(46));
    for site in outcome.table.selected() {
        println!(
            "{:<6} {:<8} {:>8.4} {:>10.1} {:>10.1}",
            site.rank, site.node.0, site.weight, site.x, site.y
        );
    }
    println!();
    println!("Objective: {:.1} person-metres", outcome.result.objective);
    println!("Results written to {}", out_dir.display());

    Ok(())
}

/// Run once; if there are fewer candidates than `K`, site as many as there
/// are and run again on the cached matrix.
fn run_with_fallback(
    pipeline: &mut siting_pipeline::Pipeline<HighsBackend>,
) -> Result<SitingOutcome> {
    match pipeline.run(&mut StagePrinter) {
        Err(PipelineError::Solve(SolveError::InsufficientCandidates { available, requested }))
            if available > 0 =>
        {
            warn!(available, requested, "too few candidates, lowering K");
            pipeline.set_facility_count(available)?;
            Ok(pipeline.run(&mut StagePrinter)?)
        }
        other => Ok(other?),
    }
}

fn write_outputs(
    dir:     &Path,
    outcome: &SitingOutcome,
    matrix:  Option<&siting_network::DistanceMatrix>,
) -> Result<()> {
    let mut csv = CsvWriter::with_delimiter(&dir.join("sites.csv"), b';')?;
    csv.write_table(&outcome.table)?;
    csv.finish()?;

    save_population(&dir.join("population.json"), &outcome.population)?;
    if let Some(m) = matrix {
        save_matrix(&dir.join("matrix.json"), m)?;
    }
    Ok(())
}
