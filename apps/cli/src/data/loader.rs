use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::data::models::{
    AggregatesFile, DomainsFile, Economy, EconomyFile, RegionCatalogFile, Snapshot, StatTable,
    StatTablesFile,
};
use crate::domain::NATIONAL_TOTAL;

pub const REGIONS_FILE: &str = "kraje_kodovnik.json";
pub const DOMAINS_FILE: &str = "domeny_kraje.json";
pub const STATISTICS_FILE: &str = "csu_vav_kraje.json";
pub const ECONOMY_FILE: &str = "hdp_populace_kraje.json";
pub const AGGREGATES_FILE: &str = "agregaty_kraje.json";

/// Errors raised while turning the published JSON files into a [`Snapshot`]
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("region catalogue is empty")]
    NoRegions,

    #[error("region `{0}` appears more than once in the catalogue")]
    DuplicateRegion(String),

    #[error("table `{0}` has no `{NATIONAL_TOTAL}` row")]
    MissingNationalTotal(String),
}

/// Raw file contents, before parsing. The economy and aggregate files are
/// optional; without them the corresponding analyses report no data.
#[derive(Debug, Clone, Default)]
pub struct RawSources {
    pub regions: String,
    pub domains: String,
    pub statistics: String,
    pub economy: Option<String>,
    pub aggregates: Option<String>,
}

impl RawSources {
    pub fn read(dir: &Path) -> Result<Self, DataError> {
        Ok(Self {
            regions: read_required(dir, REGIONS_FILE)?,
            domains: read_required(dir, DOMAINS_FILE)?,
            statistics: read_required(dir, STATISTICS_FILE)?,
            economy: read_optional(dir, ECONOMY_FILE)?,
            aggregates: read_optional(dir, AGGREGATES_FILE)?,
        })
    }
}

fn read_required(dir: &Path, file: &str) -> Result<String, DataError> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })
}

fn read_optional(dir: &Path, file: &str) -> Result<Option<String>, DataError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::info!(file, "optional data file not found, continuing without it");
        return Ok(None);
    }
    read_required(dir, file).map(Some)
}

fn parse<T: DeserializeOwned>(file: &'static str, raw: &str) -> Result<T, DataError> {
    serde_json::from_str(raw).map_err(|source| DataError::Parse { file, source })
}

impl Snapshot {
    /// Reads and validates every data file in `dir`
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let sources = RawSources::read(dir)?;
        Self::from_sources(&sources)
    }

    pub fn from_sources(sources: &RawSources) -> Result<Self, DataError> {
        let catalog: RegionCatalogFile = parse(REGIONS_FILE, &sources.regions)?;
        let domains: DomainsFile = parse(DOMAINS_FILE, &sources.domains)?;
        let statistics: StatTablesFile = parse(STATISTICS_FILE, &sources.statistics)?;

        let economy = match &sources.economy {
            Some(raw) => economy_tables(parse(ECONOMY_FILE, raw)?),
            None => Economy::default(),
        };
        let aggregates = match &sources.aggregates {
            Some(raw) => parse(AGGREGATES_FILE, raw)?,
            None => AggregatesFile::default(),
        };

        if catalog.regions.is_empty() {
            return Err(DataError::NoRegions);
        }
        let mut seen = BTreeSet::new();
        for region in &catalog.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(DataError::DuplicateRegion(region.name.clone()));
            }
        }
        for name in domains.regions.keys() {
            if !seen.contains(name.as_str()) {
                tracing::debug!(region = %name, "domains declared for a region outside the catalogue");
            }
        }

        let mut tables = Vec::with_capacity(statistics.tables.len());
        for table in statistics.tables {
            if !table.rows.contains_key(NATIONAL_TOTAL) {
                return Err(DataError::MissingNationalTotal(table.name));
            }
            tables.push(StatTable::with_rows(table.name, table.rows));
        }
        for table in &tables {
            for region in catalog.regions.iter().filter(|r| !table.has_row(&r.name)) {
                tracing::debug!(table = %table.name, region = %region.name, "region has no row in table");
            }
        }

        tracing::debug!(
            regions = catalog.regions.len(),
            tables = tables.len(),
            entities = aggregates.entities.len(),
            collaborations = aggregates.collaborations.len(),
            "snapshot loaded"
        );

        Ok(Self {
            regions: catalog.regions,
            domains: domains.regions,
            tables,
            economy,
            portfolios: aggregates.portfolios,
            entities: aggregates.entities,
            collaborations: aggregates.collaborations,
        })
    }
}

fn economy_tables(file: EconomyFile) -> Economy {
    let mut economy = Economy {
        gdp: StatTable::new("HDP (mil. Kč)"),
        population: StatTable::new("Populace"),
    };
    for (region, row) in file.regions {
        for (year, value) in row.gdp {
            economy.gdp.insert(&region, &year, value);
        }
        for (year, value) in row.population {
            economy.population.insert(&region, &year, value);
        }
    }
    economy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_data::sample_sources;
    use crate::domain::TableKind;

    #[test]
    fn loads_sample_sources() -> Result<(), DataError> {
        let snapshot = Snapshot::from_sources(&sample_sources())?;

        assert_eq!(snapshot.regions.len(), 4);
        assert_eq!(snapshot.regions[0].name, "Hl. m. Praha");
        assert!(snapshot.table(TableKind::Expenditure).is_some());
        assert_eq!(
            snapshot.economy.population.value("Hl. m. Praha", "2024"),
            Some(1_384_732.0)
        );
        assert_eq!(snapshot.collaborations.len(), 4);

        let entities = snapshot.entities("Hl. m. Praha").unwrap_or_default();
        assert_eq!(entities.total, 1450);
        assert_eq!(entities.companies_ltd, 820);
        assert_eq!(entities.research_institutes, 45);
        // missing keys read as zero
        assert_eq!(snapshot.entities("Jihomoravský kraj").map(|e| e.other), Some(0));
        assert_eq!(snapshot.entities("Moravskoslezský kraj"), None);
        Ok(())
    }

    #[test]
    fn optional_files_may_be_absent() -> Result<(), DataError> {
        let sources = RawSources {
            economy: None,
            aggregates: None,
            ..sample_sources()
        };
        let snapshot = Snapshot::from_sources(&sources)?;

        assert!(snapshot.collaborations.is_empty());
        assert!(snapshot.portfolios.is_empty());
        assert!(snapshot.entities.is_empty());
        assert_eq!(snapshot.economy.gdp.value("Hl. m. Praha", "2024"), None);
        Ok(())
    }

    #[test]
    fn rejects_duplicate_regions() {
        let sources = RawSources {
            regions: r#"{"kraje": [
                {"kod_nuts": "CZ010", "nazev": "Hl. m. Praha", "zkratka": "PHA"},
                {"kod_nuts": "CZ011", "nazev": "Hl. m. Praha", "zkratka": "PH2"}
            ]}"#
            .to_string(),
            ..sample_sources()
        };

        let err = Snapshot::from_sources(&sources).unwrap_err();
        assert!(matches!(err, DataError::DuplicateRegion(name) if name == "Hl. m. Praha"));
    }

    #[test]
    fn rejects_table_without_national_total() {
        let sources = RawSources {
            statistics: r#"{"tabulky": [
                {"nazev": "Výdaje na VaV", "kraje": {"Hl. m. Praha": {"2024": 1.0}}}
            ]}"#
            .to_string(),
            ..sample_sources()
        };

        let err = Snapshot::from_sources(&sources).unwrap_err();
        assert!(matches!(err, DataError::MissingNationalTotal(_)));
    }

    #[test]
    fn rejects_empty_catalogue_and_reports_parse_errors() {
        let empty = RawSources {
            regions: r#"{"kraje": []}"#.to_string(),
            ..sample_sources()
        };
        assert!(matches!(
            Snapshot::from_sources(&empty),
            Err(DataError::NoRegions)
        ));

        let broken = RawSources {
            domains: "{not json".to_string(),
            ..sample_sources()
        };
        assert!(matches!(
            Snapshot::from_sources(&broken),
            Err(DataError::Parse { file: DOMAINS_FILE, .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = Snapshot::load(Path::new("/nonexistent/ris3-data")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains(REGIONS_FILE));
    }
}
