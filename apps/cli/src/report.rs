use std::fmt::{self, Write as _};

use color_eyre::eyre::{eyre, Result};
use serde::Serialize;

use crate::analysis::aggregation::{all_region_summaries, share_trend};
use crate::analysis::clustering::cluster_regions;
use crate::analysis::collaboration::SkippedRecord;
use crate::analysis::insights::{
    collaboration_gaps, specialization_overview, top_pairs, CollaborationGaps, RegionPair,
    SpecializationOverview,
};
use crate::analysis::portfolio::{
    field_concentration, field_strengths, project_trend, strategy_contrast, strong_fields,
    top_fields, top_funders, FieldConcentration, FieldShare, FieldStrengths, RankedEntry,
    StrategyContrast, YearActivity, STRONG_FIELD_THRESHOLD,
};
use crate::analysis::{
    most_similar, region_summary, trend, Clustering, CollaborationMatrix, Partner,
    RegionSummary, SimilarRegion, SimilarityMatrix, TrendPoint,
};
use crate::cli::Command;
use crate::config::AppConfig;
use crate::data::queries::{domains, emerging, find_region, RegionMatch};
use crate::data::{ProjectPortfolio, Region, Snapshot};
use crate::domain::TableKind;

#[derive(Debug, Serialize)]
struct RegionListing {
    id: String,
    name: String,
    short_label: String,
    domains: usize,
    emerging: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SimilarReport {
    region: String,
    similar: Vec<SimilarRegion>,
}

#[derive(Debug, Serialize)]
struct TrendReport {
    region: String,
    table: TableKind,
    share: bool,
    points: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
struct PartnersReport {
    region: String,
    total: u64,
    partners: Vec<Partner>,
}

#[derive(Debug, Serialize)]
struct InsightsReport {
    overview: SpecializationOverview,
    clusters: Clustering,
    top_pairs: Vec<RegionPair>,
    gaps: CollaborationGaps,
    field_strengths: Vec<FieldStrengths>,
    strategy_contrast: Vec<StrategyContrast>,
}

#[derive(Debug, Serialize)]
struct PortfolioReport {
    region: String,
    top_funders: Vec<RankedEntry>,
    top_fields: Vec<RankedEntry>,
    strong_fields: Vec<FieldShare>,
    concentration: Option<FieldConcentration>,
    trend: Vec<YearActivity>,
}

/// Runs one command against the snapshot and prints the result
pub fn run(command: &Command, snapshot: &Snapshot, config: &AppConfig, json: bool) -> Result<()> {
    let output = render(command, snapshot, config, json)?;
    print!("{output}");
    Ok(())
}

/// Runs one command and returns its output as text or pretty JSON
pub fn render(
    command: &Command,
    snapshot: &Snapshot,
    config: &AppConfig,
    json: bool,
) -> Result<String> {
    match command {
        Command::Regions => {
            let listing: Vec<RegionListing> = snapshot
                .regions
                .iter()
                .map(|region| RegionListing {
                    id: region.id.clone(),
                    name: region.name.clone(),
                    short_label: region.short_label.clone(),
                    domains: domains(snapshot, &region.name).len(),
                    emerging: emerging(snapshot, &region.name).to_vec(),
                })
                .collect();
            emit(listing.as_slice(), json, render_regions)
        }
        Command::Similarity => {
            let matrix = SimilarityMatrix::for_snapshot(snapshot);
            emit(&matrix, json, render_similarity)
        }
        Command::Similar { region, k } => {
            let region = resolve(snapshot, region)?;
            let matrix = SimilarityMatrix::for_snapshot(snapshot);
            let report = SimilarReport {
                region: region.name.clone(),
                similar: most_similar(&matrix, &region.name, k.unwrap_or(config.top_k)),
            };
            emit(&report, json, render_similar)
        }
        Command::Clusters { count } => {
            let matrix = SimilarityMatrix::for_snapshot(snapshot);
            let clustering = cluster_regions(&matrix, count.unwrap_or(config.cluster_count));
            emit(&clustering, json, render_clusters)
        }
        Command::Summary { region, year } => {
            let year = year.as_deref().unwrap_or(&config.year);
            match region {
                Some(region) => {
                    let region = resolve(snapshot, region)?;
                    let summary = region_summary(snapshot, &region.name, year);
                    emit(&summary, json, render_summary)
                }
                None => {
                    let summaries = all_region_summaries(snapshot, year);
                    emit(summaries.as_slice(), json, render_summaries)
                }
            }
        }
        Command::Trend {
            region,
            table,
            share,
        } => {
            let region = resolve(snapshot, region)?;
            let source = snapshot
                .table(*table)
                .ok_or_else(|| eyre!("the data has no `{}` table", table.label()))?;
            let points = if *share {
                share_trend(source, &region.name).collect()
            } else {
                trend(source, &region.name).collect()
            };
            let report = TrendReport {
                region: region.name.clone(),
                table: *table,
                share: *share,
                points,
            };
            emit(&report, json, render_trend)
        }
        Command::Collab { region } => {
            let (matrix, skipped) = CollaborationMatrix::for_snapshot(snapshot);
            log_skipped(&skipped);
            match region {
                Some(region) => {
                    let region = resolve(snapshot, region)?;
                    let partners = matrix.partners(&region.name);
                    let report = PartnersReport {
                        region: region.name.clone(),
                        total: partners.iter().map(|p| p.count).sum(),
                        partners,
                    };
                    emit(&report, json, render_partners)
                }
                None => emit(&matrix, json, render_collaboration),
            }
        }
        Command::Insights { pairs } => {
            let hub = resolve(snapshot, &config.hub_region)?;
            let similarity = SimilarityMatrix::for_snapshot(snapshot);
            let (collaboration, skipped) = CollaborationMatrix::for_snapshot(snapshot);
            log_skipped(&skipped);
            let report = InsightsReport {
                overview: specialization_overview(snapshot),
                clusters: cluster_regions(&similarity, config.cluster_count),
                top_pairs: top_pairs(&similarity, *pairs),
                gaps: collaboration_gaps(&similarity, &collaboration, &hub.name),
                field_strengths: field_strengths(snapshot, STRONG_FIELD_THRESHOLD),
                strategy_contrast: strategy_contrast(snapshot),
            };
            emit(&report, json, render_insights)
        }
        Command::Portfolio { region, limit } => {
            let region = resolve(snapshot, region)?;
            let limit = limit.unwrap_or(config.top_k);
            let empty = ProjectPortfolio::default();
            let portfolio = snapshot.portfolio(&region.name).unwrap_or_else(|| {
                tracing::info!(region = %region.name, "no project data for region");
                &empty
            });
            let report = PortfolioReport {
                region: region.name.clone(),
                top_funders: top_funders(portfolio, limit),
                top_fields: top_fields(portfolio, limit),
                strong_fields: strong_fields(portfolio, STRONG_FIELD_THRESHOLD),
                concentration: field_concentration(portfolio),
                trend: project_trend(portfolio),
            };
            emit(&report, json, render_portfolio)
        }
    }
}

fn emit<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    text: fn(&T) -> Result<String, fmt::Error>,
) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(value)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(text(value)?)
    }
}

fn resolve<'a>(snapshot: &'a Snapshot, ident: &str) -> Result<&'a Region> {
    match find_region(snapshot, ident) {
        Some(RegionMatch::Exact(region)) => Ok(region),
        Some(RegionMatch::Fuzzy(region)) => {
            tracing::info!(query = ident, region = %region.name, "resolved region by fuzzy match");
            Ok(region)
        }
        None => Err(eyre!("unknown region `{ident}`")),
    }
}

fn log_skipped(skipped: &[SkippedRecord]) {
    for entry in skipped {
        tracing::warn!(
            region_a = %entry.record.region_a,
            region_b = %entry.record.region_b,
            count = entry.record.count,
            reason = ?entry.reason,
            "collaboration record ignored"
        );
    }
}

fn number(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0))
}

fn render_regions(regions: &[RegionListing]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for region in regions {
        write!(
            out,
            "{:<7} {:<4} {:<28} {} domains",
            region.id, region.short_label, region.name, region.domains
        )?;
        if !region.emerging.is_empty() {
            write!(out, " (emerging: {})", region.emerging.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

fn render_similarity(matrix: &SimilarityMatrix) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{:<28}", "")?;
    for index in 1..=matrix.len() {
        write!(out, "{index:>6}")?;
    }
    writeln!(out)?;

    for (index, (name, row)) in matrix.regions().iter().zip(matrix.rows()).enumerate() {
        write!(out, "{:>2}. {name:<24}", index + 1)?;
        for cell in row {
            write!(out, "{:>6}", number(*cell, 2))?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

fn render_similar(report: &SimilarReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Most similar to {}", report.region)?;
    if report.similar.is_empty() {
        writeln!(out, "(no comparable regions)")?;
    }
    for entry in &report.similar {
        writeln!(out, "- {:<28} {:.3}", entry.region, entry.score)?;
    }
    Ok(out)
}

fn render_clusters(clustering: &Clustering) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for cluster in &clustering.clusters {
        writeln!(out, "Cluster {}:", cluster.id + 1)?;
        for member in &cluster.members {
            writeln!(out, "- {member}")?;
        }
    }
    Ok(out)
}

fn write_summary(out: &mut String, summary: &RegionSummary) -> fmt::Result {
    writeln!(out, "{} ({}), {}", summary.region, summary.id, summary.year)?;
    writeln!(out, "  Workplaces:            {}", number(summary.workplaces, 0))?;
    writeln!(out, "  Personnel (FTE):       {}", number(summary.personnel_fte, 0))?;
    writeln!(out, "  Expenditure (mil. CZK): {}", number(summary.expenditure, 1))?;
    writeln!(out, "  Share of expenditure:  {}", percent(summary.expenditure_share))?;
    writeln!(out, "  Share of personnel:    {}", percent(summary.personnel_share))?;
    writeln!(out, "  Intensity (of GDP):    {}", percent(summary.intensity))?;
    writeln!(
        out,
        "  Per capita (CZK):      {}",
        number(summary.expenditure_per_capita, 0)
    )?;
    writeln!(
        out,
        "  FTE per 1000:          {}",
        number(summary.personnel_per_thousand, 2)
    )?;
    if let Some(entities) = &summary.entities {
        writeln!(out, "  R&D entities:          {}", entities.total)?;
        writeln!(
            out,
            "    s.r.o. {}, a.s. {}, universities {}, v.v.i. {}, other {}",
            entities.companies_ltd,
            entities.companies_plc,
            entities.universities,
            entities.research_institutes,
            entities.other
        )?;
    }
    Ok(())
}

fn render_summary(summary: &RegionSummary) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, summary)?;
    Ok(out)
}

fn render_summaries(summaries: &[RegionSummary]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<4} {:>12} {:>8} {:>9} {:>11}",
        "", "mil. CZK", "share", "of GDP", "CZK/cap"
    )?;
    for summary in summaries {
        writeln!(
            out,
            "{:<4} {:>12} {:>8} {:>9} {:>11}",
            summary.short_label,
            number(summary.expenditure, 1),
            percent(summary.expenditure_share),
            percent(summary.intensity),
            number(summary.expenditure_per_capita, 0)
        )?;
    }
    Ok(out)
}

fn render_trend(report: &TrendReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let unit = if report.share { ", share of national total" } else { "" };
    writeln!(out, "{}: {}{unit}", report.region, report.table.label())?;
    for point in &report.points {
        let value = if report.share {
            percent(Some(point.value))
        } else {
            number(Some(point.value), 1)
        };
        writeln!(out, "  {} {value:>12}", point.year)?;
    }
    Ok(out)
}

fn render_partners(report: &PartnersReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{}: {} joint projects with other regions",
        report.region, report.total
    )?;
    for partner in &report.partners {
        writeln!(out, "- {:<28} {:>6}", partner.region, partner.count)?;
    }
    Ok(out)
}

fn render_collaboration(matrix: &CollaborationMatrix) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{:<28}", "")?;
    for index in 1..=matrix.regions().len() {
        write!(out, "{index:>6}")?;
    }
    writeln!(out)?;

    for (index, (name, row)) in matrix.regions().iter().zip(matrix.rows()).enumerate() {
        write!(out, "{:>2}. {name:<24}", index + 1)?;
        for count in row {
            write!(out, "{count:>6}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Total joint projects: {}", matrix.total())?;
    Ok(out)
}

fn render_insights(report: &InsightsReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let overview = &report.overview;

    writeln!(out, "Specialisation domains")?;
    writeln!(out, "======================")?;
    writeln!(out, "Declared domains: {}", overview.total_domains)?;
    writeln!(out, "Distinct activity codes: {}", overview.distinct_codes)?;
    writeln!(out, "Codes declared by one region only: {}", overview.unique_to_one_region)?;
    for entry in &overview.widely_shared {
        writeln!(out, "- {} shared by {} regions", entry.code, entry.count)?;
    }

    writeln!(out, "\nClusters")?;
    for cluster in &report.clusters.clusters {
        writeln!(out, "- {}: {}", cluster.id + 1, cluster.members.join(", "))?;
    }

    writeln!(out, "\nMost similar pairs")?;
    for pair in &report.top_pairs {
        writeln!(out, "- {} / {}: {:.3}", pair.a, pair.b, pair.similarity)?;
    }

    let gaps = &report.gaps;
    writeln!(out, "\nSimilar strategy, little collaboration")?;
    if gaps.blind_spots.is_empty() {
        writeln!(out, "(none)")?;
    }
    for pair in &gaps.blind_spots {
        writeln!(
            out,
            "- {} / {}: similarity {}, {} joint projects",
            pair.a,
            pair.b,
            number(pair.similarity, 3),
            pair.collaboration
        )?;
    }

    writeln!(out, "\nStrongest collaboration")?;
    for pair in gaps.top_collaborations.iter().filter(|p| p.collaboration > 0) {
        writeln!(out, "- {} / {}: {}", pair.a, pair.b, pair.collaboration)?;
    }
    writeln!(
        out,
        "\nShare of collaboration involving {}: {}",
        gaps.hub,
        percent(gaps.hub_share)
    )?;

    writeln!(out, "\nDeclared domains and project money")?;
    for entry in &report.strategy_contrast {
        writeln!(
            out,
            "- {}: top {} fields take {} ({})",
            entry.short_label,
            entry.concentration.top_fields.len(),
            percent(entry.concentration.top_share),
            entry.domains.join(", ")
        )?;
    }
    for entry in &report.field_strengths {
        let fields: Vec<&str> = entry.strong_fields.iter().map(|f| f.field.as_str()).collect();
        writeln!(out, "- {} strong fields: {}", entry.short_label, fields.join(", "))?;
    }
    Ok(out)
}

fn render_portfolio(report: &PortfolioReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{} project portfolio", report.region)?;

    writeln!(out, "\nTop funders (thousand CZK)")?;
    for entry in &report.top_funders {
        writeln!(out, "- {:<32} {:>5} {:>14.0}", entry.name, entry.count, entry.cost)?;
    }

    writeln!(out, "\nTop fields (thousand CZK)")?;
    for entry in &report.top_fields {
        writeln!(out, "- {:<32} {:>5} {:>14.0}", entry.name, entry.count, entry.cost)?;
    }

    if let Some(concentration) = &report.concentration {
        writeln!(
            out,
            "\nTop {} fields take {} of project cost",
            concentration.top_fields.len(),
            percent(concentration.top_share)
        )?;
    }

    writeln!(out, "\nStrong fields")?;
    for field in &report.strong_fields {
        writeln!(out, "- {:<32} {}", field.field, percent(Some(field.share)))?;
    }

    writeln!(out, "\nProjects by year")?;
    for year in &report.trend {
        writeln!(out, "  {} {:>5} {:>14.0}", year.year, year.count, year.cost)?;
    }
    Ok(out)
}
