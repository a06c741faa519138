//! JSON snapshots of the expensive intermediate stages.
//!
//! The distance matrix is stored as `{source: {target: distance}}` with
//! `null` for unreachable pairs; the finalized population as
//! `{node: count}`.  Floats are written with `serde_json`'s round-trip
//! formatting, so a restored matrix is bit-identical to the saved one.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use siting_network::DistanceMatrix;
use siting_population::FinalPopulation;

use crate::{OutputError, OutputResult};

type MatrixSnapshot = BTreeMap<u32, BTreeMap<u32, Option<f64>>>;
type PopulationSnapshot = BTreeMap<u32, u64>;

// ── Distance matrix ───────────────────────────────────────────────────────────

pub fn write_matrix<W: Write>(sink: W, matrix: &DistanceMatrix) -> OutputResult<()> {
    let n = matrix.len() as u32;
    let snapshot: MatrixSnapshot = (0..n)
        .map(|i| {
            let row = matrix.row(siting_core::NodeId(i));
            let targets = (0..n)
                .map(|j| {
                    let d = row[j as usize];
                    (j, d.is_finite().then_some(d))
                })
                .collect();
            (i, targets)
        })
        .collect();
    serde_json::to_writer(sink, &snapshot)?;
    Ok(())
}

/// Restore a matrix written by [`write_matrix`].
///
/// # Errors
///
/// [`OutputError::Snapshot`] unless sources and targets both cover exactly
/// `0..n`; [`OutputError::Network`] for negative distances or a non-zero
/// diagonal.
pub fn read_matrix<R: Read>(source: R) -> OutputResult<DistanceMatrix> {
    let snapshot: MatrixSnapshot = serde_json::from_reader(source)?;
    let n = snapshot.len();

    let mut rows = Vec::with_capacity(n);
    for (expected, (i, targets)) in snapshot.into_iter().enumerate() {
        if i as usize != expected {
            return Err(OutputError::Snapshot(format!("missing source node {expected}")));
        }
        if targets.len() != n || targets.keys().enumerate().any(|(e, &j)| j as usize != e) {
            return Err(OutputError::Snapshot(format!(
                "row {i} does not cover targets 0..{n}"
            )));
        }
        rows.push(targets.into_values().collect());
    }
    Ok(DistanceMatrix::from_rows(rows)?)
}

pub fn save_matrix(path: &Path, matrix: &DistanceMatrix) -> OutputResult<()> {
    debug!(path = %path.display(), nodes = matrix.len(), "saving distance matrix");
    let mut sink = BufWriter::new(File::create(path)?);
    write_matrix(&mut sink, matrix)?;
    sink.flush()?;
    Ok(())
}

pub fn load_matrix(path: &Path) -> OutputResult<DistanceMatrix> {
    let matrix = read_matrix(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), nodes = matrix.len(), "loaded distance matrix");
    Ok(matrix)
}

// ── Population ────────────────────────────────────────────────────────────────

pub fn write_population<W: Write>(sink: W, population: &FinalPopulation) -> OutputResult<()> {
    let snapshot: PopulationSnapshot = population
        .counts()
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as u32, c))
        .collect();
    serde_json::to_writer(sink, &snapshot)?;
    Ok(())
}

/// Restore a population over `node_count` nodes.  Nodes absent from the
/// snapshot hold zero.
///
/// # Errors
///
/// [`OutputError::Snapshot`] for a node id `>= node_count`.
pub fn read_population<R: Read>(source: R, node_count: usize) -> OutputResult<FinalPopulation> {
    let snapshot: PopulationSnapshot = serde_json::from_reader(source)?;
    let mut counts = vec![0u64; node_count];
    for (node, count) in snapshot {
        let slot = counts.get_mut(node as usize).ok_or_else(|| {
            OutputError::Snapshot(format!("node {node} outside 0..{node_count}"))
        })?;
        *slot = count;
    }
    Ok(FinalPopulation::from_counts(counts))
}

pub fn save_population(path: &Path, population: &FinalPopulation) -> OutputResult<()> {
    debug!(path = %path.display(), total = population.total(), "saving population");
    let mut sink = BufWriter::new(File::create(path)?);
    write_population(&mut sink, population)?;
    sink.flush()?;
    Ok(())
}

pub fn load_population(path: &Path, node_count: usize) -> OutputResult<FinalPopulation> {
    read_population(BufReader::new(File::open(path)?), node_count)
}
