//! Small four-region data set shared by the unit tests.
//!
//! Code sets: Praha {21, 62, 63, 72}, Středočeský {21, 29, 30},
//! Jihomoravský {26, 62, 63, 72}, Moravskoslezský {} (emerging only).

use crate::data::loader::RawSources;
use crate::data::models::Snapshot;

pub const PRAHA: &str = "Hl. m. Praha";
pub const STREDOCESKY: &str = "Středočeský kraj";
pub const JIHOMORAVSKY: &str = "Jihomoravský kraj";
pub const MORAVSKOSLEZSKY: &str = "Moravskoslezský kraj";

const REGIONS: &str = r#"{
  "kraje": [
    {"kod_nuts": "CZ010", "nazev": "Hl. m. Praha", "zkratka": "PHA"},
    {"kod_nuts": "CZ020", "nazev": "Středočeský kraj", "zkratka": "STC"},
    {"kod_nuts": "CZ064", "nazev": "Jihomoravský kraj", "zkratka": "JHM"},
    {"kod_nuts": "CZ080", "nazev": "Moravskoslezský kraj", "zkratka": "MSK"}
  ]
}"#;

const DOMAINS: &str = r#"{
  "kraje": {
    "Hl. m. Praha": {
      "domeny": [
        {"nazev": "Digitální ekonomika", "popis": "Software a data", "cz_nace": ["62", "63"]},
        {"nazev": "Life sciences", "cz_nace": ["21", "72"]}
      ],
      "emerging": []
    },
    "Středočeský kraj": {
      "domeny": [
        {"nazev": "Automotive", "cz_nace": ["29", "30"]},
        {"nazev": "Farmacie", "cz_nace": ["21"]}
      ]
    },
    "Jihomoravský kraj": {
      "domeny": [
        {"nazev": "ICT", "cz_nace": ["62", "63"]},
        {"nazev": "Přístroje", "cz_nace": ["26", "72"]},
        {"nazev": "Kreativní odvětví", "cz_nace": []}
      ]
    },
    "Moravskoslezský kraj": {
      "domeny": [],
      "emerging": ["Vodíkové technologie"]
    }
  }
}"#;

const STATISTICS: &str = r#"{
  "tabulky": [
    {
      "nazev": "Pracoviště VaV (počet)",
      "kraje": {
        "ČR celkem": {"2024": 3000},
        "Hl. m. Praha": {"2024": 900}
      }
    },
    {
      "nazev": "Pracovníci VaV (FTE)",
      "kraje": {
        "ČR celkem": {"2024": 80000},
        "Hl. m. Praha": {"2024": 30000},
        "Jihomoravský kraj": {"2024": 12000}
      }
    },
    {
      "nazev": "Výdaje na VaV celkem (mil. Kč)",
      "kraje": {
        "ČR celkem": {"2024": 1000, "2022": 1000, "2023": 1200},
        "Hl. m. Praha": {"2024": 250, "2022": 400, "2023": 450},
        "Středočeský kraj": {"2024": 150},
        "Jihomoravský kraj": {"2024": 200, "2023": null},
        "Moravskoslezský kraj": {"2024": null}
      }
    }
  ]
}"#;

const ECONOMY: &str = r#"{
  "kraje": {
    "Hl. m. Praha": {
      "hdp_mil_kc": {"2024": 125000},
      "populace": {"2024": 1384732}
    },
    "Středočeský kraj": {
      "hdp_mil_kc": {"2024": 0},
      "populace": {"2024": 1455940}
    },
    "Jihomoravský kraj": {
      "hdp_mil_kc": {"2024": 100000},
      "populace": {"2024": 0}
    }
  }
}"#;

const AGGREGATES: &str = r#"{
  "projekty_po_krajich": {
    "Hl. m. Praha": {
      "po_ford_skupina": {
        "1xx": {"pocet": 10, "naklady": 5000},
        "2xx": {"pocet": 20, "naklady": 12000},
        "3xx": {"pocet": 5, "naklady": 500},
        "5xx": {"pocet": 3, "naklady": 2500}
      },
      "po_poskytovatelich": {
        "GA ČR": {"pocet": 12, "naklady": 8000},
        "TA ČR": {"pocet": 20, "naklady": 9000},
        "MŠMT": {"pocet": 6, "naklady": 3000}
      },
      "po_letech": {
        "2023": {"pocet": 15, "naklady": 9000},
        "2021": {"pocet": 8, "naklady": 4000},
        "2022": {"pocet": 15, "naklady": 7000}
      }
    },
    "Středočeský kraj": {
      "po_ford_skupina": {}
    }
  },
  "subjekty_po_krajich": {
    "Hl. m. Praha": {
      "celkem": 1450, "firmy_sro": 820, "firmy_as": 210,
      "vs": 12, "vvi": 45, "ostatni": 363
    },
    "Jihomoravský kraj": {"celkem": 600, "firmy_sro": 400, "vs": 5}
  },
  "spoluprace_mezi_kraji": [
    {"kraj_a": "Hl. m. Praha", "kraj_b": "Jihomoravský kraj", "spolecne_projekty": 120},
    {"kraj_a": "Středočeský kraj", "kraj_b": "Hl. m. Praha", "spolecne_projekty": 12},
    {"kraj_a": "Jihomoravský kraj", "kraj_b": "Moravskoslezský kraj", "spolecne_projekty": 15},
    {"kraj_a": "Hl. m. Praha", "kraj_b": "Kraj Vysočina", "spolecne_projekty": 5}
  ]
}"#;

pub fn sample_sources() -> RawSources {
    RawSources {
        regions: REGIONS.to_string(),
        domains: DOMAINS.to_string(),
        statistics: STATISTICS.to_string(),
        economy: Some(ECONOMY.to_string()),
        aggregates: Some(AGGREGATES.to_string()),
    }
}

#[allow(clippy::expect_used)]
pub fn sample_snapshot() -> Snapshot {
    Snapshot::from_sources(&sample_sources()).expect("sample data is valid")
}
