//! Cross-region findings built on top of the similarity and collaboration
//! matrices.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::collaboration::CollaborationMatrix;
use crate::analysis::similarity::SimilarityMatrix;
use crate::data::queries::{code_set, domains};
use crate::data::Snapshot;

/// A code counts as widely shared when at least this many regions declare it
pub const WIDELY_SHARED_MIN_REGIONS: usize = 5;
pub const WIDELY_SHARED_LIMIT: usize = 8;

pub const BLIND_SPOT_MIN_SIMILARITY: f64 = 0.15;
pub const BLIND_SPOT_MAX_COLLABORATION: u64 = 20;
pub const BLIND_SPOT_LIMIT: usize = 5;
pub const TOP_COLLABORATION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFrequency {
    pub code: String,
    pub count: usize,
    pub regions: Vec<String>,
}

/// How many regions declare each code, most common first. Ties keep the
/// order in which codes were first seen walking the catalogue.
pub fn code_frequency(snapshot: &Snapshot) -> Vec<CodeFrequency> {
    let mut slots: BTreeMap<String, usize> = BTreeMap::new();
    let mut frequency: Vec<CodeFrequency> = Vec::new();

    for region in &snapshot.regions {
        for code in code_set(snapshot, &region.name) {
            let slot = *slots.entry(code.clone()).or_insert_with(|| {
                frequency.push(CodeFrequency {
                    code,
                    count: 0,
                    regions: Vec::new(),
                });
                frequency.len() - 1
            });
            frequency[slot].count += 1;
            frequency[slot].regions.push(region.name.clone());
        }
    }

    frequency.sort_by(|a, b| b.count.cmp(&a.count));
    frequency
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecializationOverview {
    pub total_domains: usize,
    pub distinct_codes: usize,
    pub domains_per_region: Vec<(String, usize)>,
    pub widely_shared: Vec<CodeFrequency>,
    pub unique_to_one_region: usize,
    pub frequency: Vec<CodeFrequency>,
}

pub fn specialization_overview(snapshot: &Snapshot) -> SpecializationOverview {
    let domains_per_region: Vec<(String, usize)> = snapshot
        .regions
        .iter()
        .map(|region| (region.name.clone(), domains(snapshot, &region.name).len()))
        .collect();
    let frequency = code_frequency(snapshot);

    SpecializationOverview {
        total_domains: domains_per_region.iter().map(|(_, count)| count).sum(),
        distinct_codes: frequency.len(),
        widely_shared: frequency
            .iter()
            .filter(|entry| entry.count >= WIDELY_SHARED_MIN_REGIONS)
            .take(WIDELY_SHARED_LIMIT)
            .cloned()
            .collect(),
        unique_to_one_region: frequency.iter().filter(|entry| entry.count == 1).count(),
        domains_per_region,
        frequency,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPair {
    pub a: String,
    pub b: String,
    pub similarity: f64,
}

/// The `n` most similar region pairs; pairs without a score are skipped
pub fn top_pairs(matrix: &SimilarityMatrix, n: usize) -> Vec<RegionPair> {
    let names = matrix.regions();
    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if let Some(similarity) = matrix.at(i, j) {
                pairs.push(RegionPair {
                    a: names[i].clone(),
                    b: names[j].clone(),
                    similarity,
                });
            }
        }
    }
    pairs.sort_by(|x, y| y.similarity.total_cmp(&x.similarity));
    pairs.truncate(n);
    pairs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairProfile {
    pub a: String,
    pub b: String,
    pub similarity: Option<f64>,
    pub collaboration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationGaps {
    /// Similar strategies but little joint work
    pub blind_spots: Vec<PairProfile>,
    pub top_collaborations: Vec<PairProfile>,
    pub hub: String,
    pub hub_pairs: Vec<PairProfile>,
    /// Fraction of all joint projects that involve the hub; `None` when the
    /// hub is not a known region or there is no collaboration at all
    pub hub_share: Option<f64>,
    pub pairs: Vec<PairProfile>,
}

/// Compares strategic similarity with actual collaboration for every pair
#[allow(clippy::cast_precision_loss)]
pub fn collaboration_gaps(
    similarity: &SimilarityMatrix,
    collaboration: &CollaborationMatrix,
    hub: &str,
) -> CollaborationGaps {
    let names = similarity.regions();
    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            pairs.push(PairProfile {
                a: names[i].clone(),
                b: names[j].clone(),
                similarity: similarity.at(i, j),
                collaboration: collaboration.get(&names[i], &names[j]).unwrap_or(0),
            });
        }
    }

    let mut blind_spots: Vec<PairProfile> = pairs
        .iter()
        .filter(|p| {
            p.similarity.is_some_and(|s| s > BLIND_SPOT_MIN_SIMILARITY)
                && p.collaboration < BLIND_SPOT_MAX_COLLABORATION
        })
        .cloned()
        .collect();
    blind_spots.sort_by(|x, y| {
        y.similarity
            .unwrap_or_default()
            .total_cmp(&x.similarity.unwrap_or_default())
    });
    blind_spots.truncate(BLIND_SPOT_LIMIT);

    let mut top_collaborations = pairs.clone();
    top_collaborations.sort_by(|x, y| y.collaboration.cmp(&x.collaboration));
    top_collaborations.truncate(TOP_COLLABORATION_LIMIT);

    let mut hub_pairs: Vec<PairProfile> = pairs
        .iter()
        .filter(|p| p.a == hub || p.b == hub)
        .cloned()
        .collect();
    hub_pairs.sort_by(|x, y| y.collaboration.cmp(&x.collaboration));

    let total: u64 = pairs.iter().map(|p| p.collaboration).sum();
    let hub_total: u64 = hub_pairs.iter().map(|p| p.collaboration).sum();
    let hub_known = names.iter().any(|name| name == hub);
    let hub_share = (hub_known && total > 0).then(|| hub_total as f64 / total as f64);

    CollaborationGaps {
        blind_spots,
        top_collaborations,
        hub: hub.to_string(),
        hub_pairs,
        hub_share,
        pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_data::*;

    #[test]
    fn code_frequency_counts_regions() {
        let snapshot = sample_snapshot();
        let frequency = code_frequency(&snapshot);

        let counts: Vec<_> = frequency
            .iter()
            .map(|f| (f.code.as_str(), f.count))
            .collect();
        // Praha contributes 21, 62, 63, 72 first; ties keep that order
        assert_eq!(
            counts,
            [
                ("21", 2),
                ("62", 2),
                ("63", 2),
                ("72", 2),
                ("29", 1),
                ("30", 1),
                ("26", 1)
            ]
        );
        assert_eq!(frequency[0].regions, [PRAHA, STREDOCESKY]);
    }

    #[test]
    fn overview_totals() {
        let overview = specialization_overview(&sample_snapshot());

        assert_eq!(overview.total_domains, 7);
        assert_eq!(overview.distinct_codes, 7);
        assert_eq!(overview.unique_to_one_region, 3);
        assert!(overview.widely_shared.is_empty());
        assert_eq!(
            overview.domains_per_region[3],
            (MORAVSKOSLEZSKY.to_string(), 0)
        );
    }

    #[test]
    fn top_pairs_skip_unscored() {
        let matrix = SimilarityMatrix::for_snapshot(&sample_snapshot());
        let pairs = top_pairs(&matrix, 10);

        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].a.as_str(), pairs[0].b.as_str()), (PRAHA, JIHOMORAVSKY));
        assert_eq!(pairs[1].similarity, 1.0 / 6.0);
        assert_eq!(pairs[2].similarity, 0.0);
        assert_eq!(top_pairs(&matrix, 1).len(), 1);
    }

    #[test]
    fn gaps_find_blind_spots_and_hub_share() {
        let snapshot = sample_snapshot();
        let similarity = SimilarityMatrix::for_snapshot(&snapshot);
        let (collaboration, _) = CollaborationMatrix::for_snapshot(&snapshot);

        let gaps = collaboration_gaps(&similarity, &collaboration, PRAHA);

        assert_eq!(gaps.pairs.len(), 6);
        assert_eq!(gaps.blind_spots.len(), 1);
        assert_eq!(gaps.blind_spots[0].b, STREDOCESKY);
        assert_eq!(gaps.blind_spots[0].collaboration, 12);

        assert_eq!(gaps.top_collaborations[0].collaboration, 120);
        assert_eq!(gaps.top_collaborations[1].collaboration, 15);

        let hub_counts: Vec<_> = gaps.hub_pairs.iter().map(|p| p.collaboration).collect();
        assert_eq!(hub_counts, [120, 12, 0]);
        assert_eq!(gaps.hub_share, Some(132.0 / 147.0));
    }

    #[test]
    fn hub_share_is_none_without_collaboration() {
        let snapshot = sample_snapshot();
        let similarity = SimilarityMatrix::for_snapshot(&snapshot);
        let (collaboration, _) = CollaborationMatrix::build(&snapshot.region_names(), &[]);

        let gaps = collaboration_gaps(&similarity, &collaboration, PRAHA);
        assert_eq!(gaps.hub_share, None);
    }

    #[test]
    fn hub_share_is_none_for_unknown_hub() {
        let snapshot = sample_snapshot();
        let similarity = SimilarityMatrix::for_snapshot(&snapshot);
        let (collaboration, _) = CollaborationMatrix::for_snapshot(&snapshot);

        let gaps = collaboration_gaps(&similarity, &collaboration, "praha");
        assert!(gaps.hub_pairs.is_empty());
        assert_eq!(gaps.hub_share, None);
    }
}
