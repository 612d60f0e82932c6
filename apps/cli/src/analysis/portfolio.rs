use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::queries::domains;
use crate::data::{ProjectPortfolio, ProjectStats, Snapshot};

/// Fields above this share of a region's project cost count as strong
pub const STRONG_FIELD_THRESHOLD: f64 = 0.1;

/// How many leading fields the concentration measure looks at
pub const CONCENTRATION_TOP: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: u64,
    pub cost: f64,
}

fn ranked_by_cost(entries: &BTreeMap<String, ProjectStats>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries
        .iter()
        .map(|(name, stats)| RankedEntry {
            name: name.clone(),
            count: stats.count,
            cost: stats.cost,
        })
        .collect();
    ranked.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    ranked
}

fn total_cost(entries: &BTreeMap<String, ProjectStats>) -> f64 {
    entries.values().map(|stats| stats.cost).sum()
}

/// Funding providers by project cost, largest first
pub fn top_funders(portfolio: &ProjectPortfolio, n: usize) -> Vec<RankedEntry> {
    let mut ranked = ranked_by_cost(&portfolio.by_funder);
    ranked.truncate(n);
    ranked
}

/// FORD field groups by project cost, largest first
pub fn top_fields(portfolio: &ProjectPortfolio, n: usize) -> Vec<RankedEntry> {
    let mut ranked = ranked_by_cost(&portfolio.by_field);
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearActivity {
    pub year: String,
    pub count: u64,
    pub cost: f64,
}

pub fn project_trend(portfolio: &ProjectPortfolio) -> Vec<YearActivity> {
    portfolio
        .by_year
        .iter()
        .map(|(year, stats)| YearActivity {
            year: year.clone(),
            count: stats.count,
            cost: stats.cost,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldShare {
    pub field: String,
    pub count: u64,
    pub cost: f64,
    pub share: f64,
}

/// Fields whose share of the region's total project cost exceeds
/// `threshold`, largest share first. Empty when the region has no cost.
pub fn strong_fields(portfolio: &ProjectPortfolio, threshold: f64) -> Vec<FieldShare> {
    let total = total_cost(&portfolio.by_field);
    if total <= 0.0 {
        return Vec::new();
    }

    let mut strong: Vec<FieldShare> = portfolio
        .by_field
        .iter()
        .map(|(field, stats)| FieldShare {
            field: field.clone(),
            count: stats.count,
            cost: stats.cost,
            share: stats.cost / total,
        })
        .filter(|entry| entry.share > threshold)
        .collect();
    strong.sort_by(|a, b| b.share.total_cmp(&a.share));
    strong
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConcentration {
    pub top_fields: Vec<RankedEntry>,
    pub total_cost: f64,
    /// `None` when the region's projects have no recorded cost
    pub top_share: Option<f64>,
}

/// How much of the region's project money goes to its leading fields
pub fn field_concentration(portfolio: &ProjectPortfolio) -> Option<FieldConcentration> {
    if portfolio.by_field.is_empty() {
        return None;
    }
    let total = total_cost(&portfolio.by_field);
    let top_fields = top_fields(portfolio, CONCENTRATION_TOP);
    let top_cost: f64 = top_fields.iter().map(|entry| entry.cost).sum();

    Some(FieldConcentration {
        top_share: (total > 0.0).then(|| top_cost / total),
        total_cost: total,
        top_fields,
    })
}

/// Declared domains next to where project money actually goes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyContrast {
    pub region: String,
    pub short_label: String,
    pub domains: Vec<String>,
    pub concentration: FieldConcentration,
}

/// One entry per region that both declares domains and has field data
pub fn strategy_contrast(snapshot: &Snapshot) -> Vec<StrategyContrast> {
    snapshot
        .regions
        .iter()
        .filter_map(|region| {
            let declared = domains(snapshot, &region.name);
            if declared.is_empty() {
                return None;
            }
            let concentration = field_concentration(snapshot.portfolio(&region.name)?)?;
            Some(StrategyContrast {
                region: region.name.clone(),
                short_label: region.short_label.clone(),
                domains: declared.iter().map(|domain| domain.name.clone()).collect(),
                concentration,
            })
        })
        .collect()
}

/// A region's strong research fields next to its declared domains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStrengths {
    pub region: String,
    pub short_label: String,
    pub strong_fields: Vec<FieldShare>,
    pub domains: Vec<String>,
}

/// Regions with at least one field above `threshold`
pub fn field_strengths(snapshot: &Snapshot, threshold: f64) -> Vec<FieldStrengths> {
    snapshot
        .regions
        .iter()
        .filter_map(|region| {
            let strong = strong_fields(snapshot.portfolio(&region.name)?, threshold);
            if strong.is_empty() {
                return None;
            }
            Some(FieldStrengths {
                region: region.name.clone(),
                short_label: region.short_label.clone(),
                strong_fields: strong,
                domains: domains(snapshot, &region.name)
                    .iter()
                    .map(|domain| domain.name.clone())
                    .collect(),
            })
        })
        .collect()
}
