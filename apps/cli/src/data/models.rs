use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{TableKind, NATIONAL_TOTAL};

/// Year-indexed values of one row. Keys are fixed-width year strings, so the
/// map's order is chronological.
pub type YearSeries = BTreeMap<String, Option<f64>>;

/// A region from the region catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename(deserialize = "kod_nuts"))]
    pub id: String,
    #[serde(rename(deserialize = "nazev"))]
    pub name: String,
    #[serde(rename(deserialize = "zkratka"))]
    pub short_label: String,
}

/// A declared specialisation domain and the activity codes attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(rename(deserialize = "nazev"))]
    pub name: String,
    #[serde(rename(deserialize = "popis"), default)]
    pub description: Option<String>,
    #[serde(rename(deserialize = "cz_nace"), default)]
    pub codes: Vec<String>,
}

/// Everything a region declares about its specialisation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDomains {
    #[serde(rename(deserialize = "domeny"), default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub emerging: Vec<String>,
}

/// A region x year table with a national-total row.
///
/// Tables are assembled once at the load boundary and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatTable {
    pub name: String,
    rows: BTreeMap<String, YearSeries>,
}

impl StatTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: BTreeMap<String, YearSeries>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Adds or replaces a single cell
    pub fn insert(&mut self, region: &str, year: &str, value: Option<f64>) {
        self.rows
            .entry(region.to_string())
            .or_default()
            .insert(year.to_string(), value);
    }

    /// The value for a region and year; `None` when the row, the year or the
    /// value itself is missing
    pub fn value(&self, region: &str, year: &str) -> Option<f64> {
        self.rows.get(region)?.get(year).copied().flatten()
    }

    pub fn national_total(&self, year: &str) -> Option<f64> {
        self.value(NATIONAL_TOTAL, year)
    }

    pub fn row(&self, region: &str) -> Option<&YearSeries> {
        self.rows.get(region)
    }

    pub fn has_row(&self, region: &str) -> bool {
        self.rows.contains_key(region)
    }

    pub fn is_titled(&self, kind: TableKind) -> bool {
        self.name.contains(kind.title_fragment())
    }
}

/// Regional GDP (millions of CZK) and population
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Economy {
    pub gdp: StatTable,
    pub population: StatTable,
}

/// Number of projects and their cost (thousands of CZK)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(rename(deserialize = "pocet"), default)]
    pub count: u64,
    #[serde(rename(deserialize = "naklady"), default)]
    pub cost: f64,
}

/// Pre-aggregated project activity of one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPortfolio {
    /// Keyed by FORD field group
    #[serde(rename(deserialize = "po_ford_skupina"), default)]
    pub by_field: BTreeMap<String, ProjectStats>,
    /// Keyed by funding provider
    #[serde(rename(deserialize = "po_poskytovatelich"), default)]
    pub by_funder: BTreeMap<String, ProjectStats>,
    #[serde(rename(deserialize = "po_letech"), default)]
    pub by_year: BTreeMap<String, ProjectStats>,
}

/// R&D entities with funded projects in a region, by legal form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    #[serde(rename(deserialize = "celkem"), default)]
    pub total: u64,
    /// Limited liability companies
    #[serde(rename(deserialize = "firmy_sro"), default)]
    pub companies_ltd: u64,
    /// Joint-stock companies
    #[serde(rename(deserialize = "firmy_as"), default)]
    pub companies_plc: u64,
    #[serde(rename(deserialize = "vs"), default)]
    pub universities: u64,
    /// Public research institutions (v.v.i.)
    #[serde(rename(deserialize = "vvi"), default)]
    pub research_institutes: u64,
    #[serde(rename(deserialize = "ostatni"), default)]
    pub other: u64,
}

/// Number of projects two regions took part in together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationRecord {
    #[serde(rename(deserialize = "kraj_a"))]
    pub region_a: String,
    #[serde(rename(deserialize = "kraj_b"))]
    pub region_b: String,
    #[serde(rename(deserialize = "spolecne_projekty"))]
    pub count: u64,
}

/// Immutable snapshot of all loaded reference data.
///
/// Every analysis takes the snapshot by reference; nothing mutates it after
/// [`Snapshot::load`](crate::data::Snapshot::load) returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Catalogue order, used for every deterministic tie-break
    pub regions: Vec<Region>,
    pub domains: BTreeMap<String, RegionDomains>,
    pub tables: Vec<StatTable>,
    pub economy: Economy,
    pub portfolios: BTreeMap<String, ProjectPortfolio>,
    pub entities: BTreeMap<String, EntityCounts>,
    pub collaborations: Vec<CollaborationRecord>,
}

impl Snapshot {
    /// First statistical table whose title names the given kind
    pub fn table(&self, kind: TableKind) -> Option<&StatTable> {
        self.tables.iter().find(|table| table.is_titled(kind))
    }

    pub fn region_names(&self) -> Vec<String> {
        self.regions.iter().map(|region| region.name.clone()).collect()
    }

    pub fn portfolio(&self, region: &str) -> Option<&ProjectPortfolio> {
        self.portfolios.get(region)
    }

    pub fn entities(&self, region: &str) -> Option<EntityCounts> {
        self.entities.get(region).copied()
    }
}

// Shapes of the JSON files as published. Only the loader sees these.

#[derive(Debug, Deserialize)]
pub(crate) struct RegionCatalogFile {
    #[serde(rename = "kraje")]
    pub regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainsFile {
    #[serde(rename = "kraje", default)]
    pub regions: BTreeMap<String, RegionDomains>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatTablesFile {
    #[serde(rename = "tabulky")]
    pub tables: Vec<StatTableFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatTableFile {
    #[serde(rename = "nazev")]
    pub name: String,
    #[serde(rename = "kraje", default)]
    pub rows: BTreeMap<String, YearSeries>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EconomyFile {
    #[serde(rename = "kraje", default)]
    pub regions: BTreeMap<String, EconomyRowFile>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EconomyRowFile {
    #[serde(rename = "hdp_mil_kc", default)]
    pub gdp: YearSeries,
    #[serde(rename = "populace", default)]
    pub population: YearSeries,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AggregatesFile {
    #[serde(rename = "projekty_po_krajich", default)]
    pub portfolios: BTreeMap<String, ProjectPortfolio>,
    #[serde(rename = "subjekty_po_krajich", default)]
    pub entities: BTreeMap<String, EntityCounts>,
    #[serde(rename = "spoluprace_mezi_kraji", default)]
    pub collaborations: Vec<CollaborationRecord>,
}
