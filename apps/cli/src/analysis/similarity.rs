use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::queries::code_sets;
use crate::data::Snapshot;

/// Jaccard index `|a ∩ b| / |a ∪ b|`.
///
/// Two empty sets score 0. When exactly one set is empty there is nothing to
/// compare against and the result is `None`.
#[allow(clippy::cast_precision_loss)]
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> Option<f64> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(0.0),
        (true, false) | (false, true) => None,
        (false, false) => {
            let intersection = a.intersection(b).count();
            let union = a.len() + b.len() - intersection;
            Some(intersection as f64 / union as f64)
        }
    }
}

/// Pairwise similarity of every region against every other, in region order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    regions: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl SimilarityMatrix {
    /// Every cell is computed from its own pair of sets, so `(i, j)` and
    /// `(j, i)` are identical without any mirroring pass.
    pub fn from_sets<T: Ord>(labelled: &[(String, BTreeSet<T>)]) -> Self {
        let regions = labelled.iter().map(|(name, _)| name.clone()).collect();
        let cells = labelled
            .iter()
            .map(|(_, a)| labelled.iter().map(|(_, b)| jaccard(a, b)).collect())
            .collect();
        Self { regions, cells }
    }

    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_sets(&code_sets(snapshot))
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn index_of(&self, region: &str) -> Option<usize> {
        self.regions.iter().position(|name| name == region)
    }

    pub fn at(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i)?.get(j).copied().flatten()
    }

    /// Similarity by region name; `None` for unknown regions or missing data
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.at(self.index_of(a)?, self.index_of(b)?)
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarRegion {
    pub region: String,
    pub score: f64,
}

/// The `k` regions most similar to `target`, best first.
///
/// Equal scores keep region order. Regions without a score are left out, as
/// is the target itself.
pub fn most_similar(matrix: &SimilarityMatrix, target: &str, k: usize) -> Vec<SimilarRegion> {
    let Some(t) = matrix.index_of(target) else {
        return Vec::new();
    };

    let mut ranked: Vec<SimilarRegion> = matrix
        .regions()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != t)
        .filter_map(|(i, name)| {
            matrix.at(t, i).map(|score| SimilarRegion {
                region: name.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}
