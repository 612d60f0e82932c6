//! Pure computations over a loaded [`Snapshot`](crate::data::Snapshot).
//!
//! Nothing here performs I/O or keeps state between calls; the same snapshot
//! always produces the same output.

pub mod aggregation;
pub mod clustering;
pub mod collaboration;
pub mod insights;
pub mod portfolio;
pub mod similarity;

pub use aggregation::{region_summary, share, trend, RegionSummary, TrendPoint};
pub use clustering::{cluster_regions, Cluster, Clustering};
pub use collaboration::{CollaborationMatrix, Partner, SkippedRecord};
pub use similarity::{jaccard, most_similar, SimilarRegion, SimilarityMatrix};
