pub mod loader;
pub mod models;
pub mod queries;
#[cfg(test)]
pub mod test_data;

pub use loader::{DataError, RawSources};
pub use models::{
    CollaborationRecord, Domain, Economy, EntityCounts, ProjectPortfolio, ProjectStats, Region, RegionDomains,
    Snapshot, StatTable,
};
