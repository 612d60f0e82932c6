use serde::Serialize;

use crate::data::{EntityCounts, Snapshot, StatTable};
use crate::domain::TableKind;

/// Expenditure is published in millions of CZK; per-capita figures are in CZK.
pub const MILLIONS_TO_UNITS: f64 = 1_000_000.0;

/// Scale for "per 1000 inhabitants" rates
pub const PER_THOUSAND: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: String,
    pub value: f64,
}

/// `numerator / denominator`, or `None` when either side is missing, the
/// denominator is zero, or the quotient is not finite
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// The region's share of the national total for one year
pub fn share(table: &StatTable, region: &str, year: &str) -> Option<f64> {
    ratio(table.value(region, year), table.national_total(year))
}

/// R&D expenditure relative to GDP
pub fn intensity(expenditure: &StatTable, gdp: &StatTable, region: &str, year: &str) -> Option<f64> {
    ratio(expenditure.value(region, year), gdp.value(region, year))
}

/// Value per inhabitant, converting millions to units first
pub fn per_capita(
    values: &StatTable,
    population: &StatTable,
    region: &str,
    year: &str,
) -> Option<f64> {
    ratio(
        values.value(region, year).map(|value| value * MILLIONS_TO_UNITS),
        population.value(region, year),
    )
}

/// Value per 1000 inhabitants
pub fn per_thousand(
    values: &StatTable,
    population: &StatTable,
    region: &str,
    year: &str,
) -> Option<f64> {
    ratio(values.value(region, year), population.value(region, year))
        .map(|rate| rate * PER_THOUSAND)
        .filter(|rate| rate.is_finite())
}

/// Years with a value for the region, oldest first. Calling again restarts
/// the sequence.
pub fn trend<'a>(table: &'a StatTable, region: &str) -> impl Iterator<Item = TrendPoint> + 'a {
    table
        .row(region)
        .into_iter()
        .flatten()
        .filter_map(|(year, value)| {
            value.map(|value| TrendPoint {
                year: year.clone(),
                value,
            })
        })
}

/// Share of the national total per year, oldest first; years where the
/// share cannot be computed are dropped
pub fn share_trend<'a>(
    table: &'a StatTable,
    region: &str,
) -> impl Iterator<Item = TrendPoint> + 'a {
    table
        .row(region)
        .into_iter()
        .flatten()
        .filter_map(move |(year, value)| {
            ratio(*value, table.national_total(year)).map(|share| TrendPoint {
                year: year.clone(),
                value: share,
            })
        })
}

/// R&D indicators of one region for one year. Every field is independent:
/// a missing table or value leaves only the fields that depend on it empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub id: String,
    pub short_label: String,
    pub year: String,
    pub workplaces: Option<f64>,
    pub personnel_fte: Option<f64>,
    pub expenditure: Option<f64>,
    pub expenditure_share: Option<f64>,
    pub personnel_share: Option<f64>,
    pub intensity: Option<f64>,
    pub expenditure_per_capita: Option<f64>,
    pub personnel_per_thousand: Option<f64>,
    pub population: Option<f64>,
    pub gdp: Option<f64>,
    /// R&D entities by legal form; `None` without aggregate data
    pub entities: Option<EntityCounts>,
}

pub fn region_summary(snapshot: &Snapshot, region: &str, year: &str) -> RegionSummary {
    let expenditure = snapshot.table(TableKind::Expenditure);
    let personnel = snapshot.table(TableKind::PersonnelFte);
    let workplaces = snapshot.table(TableKind::Workplaces);
    let economy = &snapshot.economy;

    let (id, short_label) = snapshot
        .regions
        .iter()
        .find(|r| r.name == region)
        .map(|r| (r.id.clone(), r.short_label.clone()))
        .unwrap_or_default();

    RegionSummary {
        region: region.to_string(),
        id,
        short_label,
        year: year.to_string(),
        workplaces: workplaces.and_then(|t| t.value(region, year)),
        personnel_fte: personnel.and_then(|t| t.value(region, year)),
        expenditure: expenditure.and_then(|t| t.value(region, year)),
        expenditure_share: expenditure.and_then(|t| share(t, region, year)),
        personnel_share: personnel.and_then(|t| share(t, region, year)),
        intensity: expenditure.and_then(|t| intensity(t, &economy.gdp, region, year)),
        expenditure_per_capita: expenditure
            .and_then(|t| per_capita(t, &economy.population, region, year)),
        personnel_per_thousand: personnel
            .and_then(|t| per_thousand(t, &economy.population, region, year)),
        population: economy.population.value(region, year),
        gdp: economy.gdp.value(region, year),
        entities: snapshot.entities(region),
    }
}

/// Summaries of every region, largest expenditure first. Regions without an
/// expenditure figure go last, in catalogue order.
pub fn all_region_summaries(snapshot: &Snapshot, year: &str) -> Vec<RegionSummary> {
    let mut summaries: Vec<RegionSummary> = snapshot
        .regions
        .iter()
        .map(|region| region_summary(snapshot, &region.name, year))
        .collect();

    summaries.sort_by(|a, b| match (a.expenditure, b.expenditure) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    summaries
}
