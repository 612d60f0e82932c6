use serde::Serialize;

use crate::data::{CollaborationRecord, Snapshot};

/// Why a collaboration record was left out of the matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "region", rename_all = "snake_case")]
pub enum SkipReason {
    UnknownRegion(String),
    SameRegion(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub record: CollaborationRecord,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    pub region: String,
    pub count: u64,
}

/// Symmetric region x region count of joint projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaborationMatrix {
    regions: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl CollaborationMatrix {
    /// Writes every usable record into both `(a, b)` and `(b, a)`; a later
    /// record for the same pair replaces the earlier count. Records that do
    /// not name two distinct known regions are returned for the caller to
    /// report.
    pub fn build(
        regions: &[String],
        records: &[CollaborationRecord],
    ) -> (Self, Vec<SkippedRecord>) {
        let n = regions.len();
        let mut matrix = Self {
            regions: regions.to_vec(),
            counts: vec![vec![0; n]; n],
        };
        let mut skipped = Vec::new();

        for record in records {
            let (i, j) = match (
                matrix.index_of(&record.region_a),
                matrix.index_of(&record.region_b),
            ) {
                (Some(i), Some(j)) if i != j => (i, j),
                (Some(_), Some(_)) => {
                    skipped.push(SkippedRecord {
                        record: record.clone(),
                        reason: SkipReason::SameRegion(record.region_a.clone()),
                    });
                    continue;
                }
                (None, _) => {
                    skipped.push(SkippedRecord {
                        record: record.clone(),
                        reason: SkipReason::UnknownRegion(record.region_a.clone()),
                    });
                    continue;
                }
                (_, None) => {
                    skipped.push(SkippedRecord {
                        record: record.clone(),
                        reason: SkipReason::UnknownRegion(record.region_b.clone()),
                    });
                    continue;
                }
            };
            matrix.counts[i][j] = record.count;
            matrix.counts[j][i] = record.count;
        }

        (matrix, skipped)
    }

    pub fn for_snapshot(snapshot: &Snapshot) -> (Self, Vec<SkippedRecord>) {
        Self::build(&snapshot.region_names(), &snapshot.collaborations)
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    pub fn index_of(&self, region: &str) -> Option<usize> {
        self.regions.iter().position(|name| name == region)
    }

    /// Count for a pair of regions in either order; `None` if a name is unknown
    pub fn get(&self, a: &str, b: &str) -> Option<u64> {
        Some(self.counts[self.index_of(a)?][self.index_of(b)?])
    }

    /// Regions the given one has worked with, most joint projects first.
    /// Equal counts keep catalogue order.
    pub fn partners(&self, region: &str) -> Vec<Partner> {
        let Some(i) = self.index_of(region) else {
            return Vec::new();
        };

        let mut partners: Vec<Partner> = self.counts[i]
            .iter()
            .enumerate()
            .filter(|&(j, &count)| j != i && count > 0)
            .map(|(j, &count)| Partner {
                region: self.regions[j].clone(),
                count,
            })
            .collect();
        partners.sort_by(|a, b| b.count.cmp(&a.count));
        partners
    }

    /// Sum over unordered pairs
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().skip(i + 1))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_data::*;

    fn record(a: &str, b: &str, count: u64) -> CollaborationRecord {
        CollaborationRecord {
            region_a: a.to_string(),
            region_b: b.to_string(),
            count,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn single_record_fills_both_cells() {
        let (matrix, skipped) =
            CollaborationMatrix::build(&names(&["X", "Y", "Z"]), &[record("X", "Y", 7)]);

        assert!(skipped.is_empty());
        assert_eq!(matrix.get("X", "Y"), Some(7));
        assert_eq!(matrix.get("Y", "X"), Some(7));
        assert_eq!(matrix.get("X", "Z"), Some(0));
        assert_eq!(matrix.get("X", "W"), None);
        assert_eq!(matrix.total(), 7);
    }

    #[test]
    fn unknown_and_self_records_are_skipped() {
        let (matrix, skipped) = CollaborationMatrix::build(
            &names(&["X", "Y"]),
            &[
                record("X", "W", 3),
                record("V", "Y", 4),
                record("Y", "Y", 9),
                record("Y", "X", 2),
            ],
        );

        let reasons: Vec<_> = skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            [
                SkipReason::UnknownRegion("W".to_string()),
                SkipReason::UnknownRegion("V".to_string()),
                SkipReason::SameRegion("Y".to_string()),
            ]
        );
        assert_eq!(matrix.get("X", "Y"), Some(2));
        assert_eq!(matrix.get("Y", "Y"), Some(0));
    }

    #[test]
    fn partners_sorted_by_count_then_catalogue_order() {
        let (matrix, _) = CollaborationMatrix::build(
            &names(&["A", "B", "C", "D", "E"]),
            &[
                record("A", "D", 5),
                record("C", "A", 9),
                record("A", "B", 5),
            ],
        );

        let partners = matrix.partners("A");
        let order: Vec<_> = partners
            .iter()
            .map(|p| (p.region.as_str(), p.count))
            .collect();
        assert_eq!(order, [("C", 9), ("B", 5), ("D", 5)]);
        assert!(matrix.partners("E").is_empty());
        assert!(matrix.partners("nowhere").is_empty());
    }

    #[test]
    fn sample_matrix_is_symmetric() {
        let snapshot = sample_snapshot();
        let (matrix, skipped) = CollaborationMatrix::for_snapshot(&snapshot);

        assert_eq!(skipped.len(), 1);
        assert_eq!(
            skipped[0].reason,
            SkipReason::UnknownRegion("Kraj Vysočina".to_string())
        );

        let rows = matrix.rows();
        for (i, row) in rows.iter().enumerate() {
            for (j, count) in row.iter().enumerate() {
                assert_eq!(*count, rows[j][i]);
            }
        }
        assert_eq!(matrix.get(PRAHA, STREDOCESKY), Some(12));
        assert_eq!(matrix.get(STREDOCESKY, PRAHA), Some(12));
        assert_eq!(matrix.total(), 147);
    }
}
