use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::similarity::SimilarityMatrix;

/// Number of groups the regions are clustered into unless configured
pub const DEFAULT_CLUSTER_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clustering {
    pub clusters: Vec<Cluster>,
    /// Region name -> cluster id
    pub assignments: BTreeMap<String, usize>,
}

impl Clustering {
    pub fn cluster_of(&self, region: &str) -> Option<usize> {
        self.assignments.get(region).copied()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Greedy average-linkage agglomeration down to `target` clusters.
///
/// Each step scans every pair of active clusters in index order and merges
/// the pair with the strictly highest linkage; the first pair found wins a
/// tie, and the later cluster is folded into the earlier one. A `target` of
/// zero is treated as one.
///
/// Pairs without a score are left out of the linkage average rather than
/// counted as zero, so regions with no declared codes do not drag down the
/// clusters they are compared against and merge last.
pub fn cluster_regions(matrix: &SimilarityMatrix, target: usize) -> Clustering {
    let target = target.max(1);
    let mut members: Vec<Vec<usize>> = (0..matrix.len()).map(|i| vec![i]).collect();
    let mut active: Vec<usize> = (0..matrix.len()).collect();

    while active.len() > target {
        let Some((keep, absorb)) = best_pair(matrix, &members, &active) else {
            break;
        };
        let absorbed = std::mem::take(&mut members[active[absorb]]);
        members[active[keep]].extend(absorbed);
        active.remove(absorb);
    }

    let names = matrix.regions();
    let clusters: Vec<Cluster> = active
        .iter()
        .enumerate()
        .map(|(id, &slot)| Cluster {
            id,
            members: members[slot].iter().map(|&i| names[i].clone()).collect(),
        })
        .collect();

    let assignments = clusters
        .iter()
        .flat_map(|cluster| {
            cluster
                .members
                .iter()
                .map(move |name| (name.clone(), cluster.id))
        })
        .collect();

    Clustering {
        clusters,
        assignments,
    }
}

/// Mean similarity over the member pairs that have a score. `None` when no
/// pair between the two clusters is comparable.
#[allow(clippy::cast_precision_loss)]
fn average_linkage(matrix: &SimilarityMatrix, a: &[usize], b: &[usize]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for &x in a {
        for &y in b {
            if let Some(score) = matrix.at(x, y) {
                sum += score;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Positions in `active` of the pair to merge next
fn best_pair(
    matrix: &SimilarityMatrix,
    members: &[Vec<usize>],
    active: &[usize],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, Option<f64>)> = None;
    for a in 0..active.len() {
        for b in (a + 1)..active.len() {
            let linkage = average_linkage(matrix, &members[active[a]], &members[active[b]]);
            let better = match best {
                None => true,
                Some((_, _, current)) => outranks(linkage, current),
            };
            if better {
                best = Some((a, b, linkage));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Any score beats no score; scores compare strictly
fn outranks(candidate: Option<f64>, current: Option<f64>) -> bool {
    match (candidate, current) {
        (Some(c), Some(b)) => c > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
