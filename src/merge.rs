//! Collapse column clusters into a quotient graph.
//!
//! Every row that touches two or more clusters becomes one row of the
//! quotient; rows touching the same set of clusters are merged into the
//! first of them. Columns of the quotient are the distinct cluster ids.

use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::matrix::Matrix;
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Entries with a smaller magnitude do not tie a row to a cluster.
pub const CLUSTER_EPSILON: f64 = 1e-7;

/// The cluster-connectivity graph as a new matrix and mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotient {
    pub matrix: Matrix,
    pub mapping: Mapping,
}

impl Quotient {
    /// Matrix and mapping text, both with size headers. `None` when no row
    /// survived the merge, since a zero-height matrix cannot be read back.
    pub fn to_texts(&self) -> Option<(String, String)> {
        if self.matrix.height() == 0 {
            return None;
        }
        let header = Some((self.matrix.height(), self.matrix.width()));
        Some((self.matrix.to_text(true), self.mapping.to_text(header)))
    }

    /// Write the matrix to `path` and the mapping to `<stem>.mapping.txt`.
    /// Returns `false` and writes nothing for an empty quotient.
    pub fn write_to(&self, path: &Path) -> Result<bool> {
        let Some((matrix_text, mapping_text)) = self.to_texts() else {
            warn!("Merged graph has no rows; not writing {:?}", path);
            return Ok(false);
        };
        let mapping_path = path.with_extension("mapping.txt");
        std::fs::write(path, matrix_text)?;
        std::fs::write(&mapping_path, mapping_text)?;
        info!("Merged matrix saved to {:?}, mapping to {:?}", path, mapping_path);
        Ok(true)
    }
}

/// Merging is undefined without a cluster assignment; fail before any input is read.
pub fn check_merge_request(merge: bool, has_mapping: bool) -> Result<()> {
    if merge && !has_mapping {
        return Err(Error::MissingMapping);
    }
    Ok(())
}

/// Sorted, deduplicated cluster ids reachable from one row.
pub fn cluster_set(row: &[f64], mapping: &Mapping) -> Vec<i64> {
    let mut set: Vec<i64> = row
        .iter()
        .enumerate()
        .filter(|(_, v)| v.abs() >= CLUSTER_EPSILON)
        .map(|(j, _)| mapping.cluster_of(j))
        .collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Compute the quotient of `matrix` under the column clusters in `mapping`.
pub fn merge_clusters(matrix: &Matrix, mapping: Option<&Mapping>) -> Result<Quotient> {
    let mapping = mapping.ok_or(Error::MissingMapping)?;
    mapping.check_columns(matrix.width())?;

    let clusters = mapping.clusters();
    debug!("Merging {} columns into {} clusters", matrix.width(), clusters.len());

    let sets: Vec<Vec<i64>> = matrix
        .rows()
        .par_iter()
        .map(|row| cluster_set(row, mapping))
        .collect();

    let mut seen: FxHashSet<&[i64]> = FxHashSet::default();
    let mut kept: Vec<&[i64]> = Vec::new();
    for set in &sets {
        if set.len() < 2 {
            continue;
        }
        if seen.insert(set.as_slice()) {
            kept.push(set.as_slice());
        }
    }

    let rows: Vec<Vec<f64>> = kept
        .iter()
        .map(|set| {
            clusters
                .iter()
                .map(|c| if set.binary_search(c).is_ok() { 1.0 } else { 0.0 })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        warn!("No row connects two clusters; the merged graph has no row vertices");
    }
    info!(
        "Merged {} rows into {} inter-cluster rows over {} clusters",
        matrix.height(),
        rows.len(),
        clusters.len()
    );

    Ok(Quotient {
        matrix: Matrix::with_width(clusters.len(), rows),
        mapping: Mapping::new(clusters),
    })
}
