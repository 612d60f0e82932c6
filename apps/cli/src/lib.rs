// Export our modules for use in binaries and tests
pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod report;

pub use data::{Region, Snapshot};
pub use domain::{TableKind, NATIONAL_TOTAL};
