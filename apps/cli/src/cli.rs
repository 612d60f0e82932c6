use clap::{Parser, Subcommand};

use crate::config::{is_year, DATA_DIR_VAR, DEBUG_VAR};
use crate::domain::TableKind;

#[derive(Debug, Parser)]
#[command(
    name = "ris3-mapa",
    version,
    about = "Specialisation similarity, clusters and R&D statistics of Czech regions"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the data directory
    #[arg(long = "data-dir", value_name = "PATH", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List regions in catalogue order
    Regions,

    /// Pairwise Jaccard similarity of declared activity codes
    Similarity,

    /// Regions whose declared codes are closest to REGION
    Similar {
        region: String,
        /// Number of regions to list
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Group regions by average-linkage clustering
    Clusters {
        /// Number of clusters
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// R&D indicators for one region, or all regions by expenditure
    Summary {
        region: Option<String>,
        /// Four-digit year, defaults to RIS3_YEAR
        #[arg(long, value_parser = parse_year)]
        year: Option<String>,
    },

    /// Year series of a statistical table for REGION
    Trend {
        region: String,
        /// workplaces, personnel or expenditure
        #[arg(long, default_value = "expenditure", value_parser = parse_table_kind)]
        table: TableKind,
        /// Report the share of the national total instead of raw values
        #[arg(long)]
        share: bool,
    },

    /// Joint projects of REGION, or the whole matrix
    Collab { region: Option<String> },

    /// Code frequency, most similar pairs and collaboration gaps
    Insights {
        /// Number of top pairs to list
        #[arg(short = 'n', long, default_value_t = 10)]
        pairs: usize,
    },

    /// Funders, fields and yearly activity of REGION's projects
    Portfolio {
        region: String,
        /// Number of funders and fields to list
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn parse_table_kind(value: &str) -> Result<TableKind, String> {
    TableKind::parse(value).ok_or_else(|| {
        let names: Vec<&str> = TableKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown table `{value}`, expected one of {}", names.join(", "))
    })
}

fn parse_year(value: &str) -> Result<String, String> {
    let value = value.trim();
    if is_year(value) {
        Ok(value.to_string())
    } else {
        Err(format!("`{value}` is not a four-digit year"))
    }
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(dir) = &self.data_dir {
            std::env::set_var(DATA_DIR_VAR, dir);
        }
        if self.debug {
            std::env::set_var(DEBUG_VAR, "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parses_subcommands_with_global_flags() -> Result<(), clap::Error> {
        let args = CliArgs::try_parse_from(["ris3-mapa", "similar", "praha", "-k", "3", "--json"])?;
        assert!(args.json);
        assert_eq!(
            args.command,
            Command::Similar {
                region: "praha".to_string(),
                k: Some(3)
            }
        );

        let args = CliArgs::try_parse_from([
            "ris3-mapa",
            "--data-dir",
            "/tmp/data",
            "trend",
            "JHM",
            "--table",
            "fte",
            "--share",
        ])?;
        assert_eq!(args.data_dir.as_deref(), Some("/tmp/data"));
        assert_eq!(
            args.command,
            Command::Trend {
                region: "JHM".to_string(),
                table: TableKind::PersonnelFte,
                share: true
            }
        );
        Ok(())
    }

    #[test]
    fn summary_year_must_have_four_digits() -> Result<(), clap::Error> {
        let args = CliArgs::try_parse_from(["ris3-mapa", "summary", "PHA", "--year", "2023"])?;
        assert_eq!(
            args.command,
            Command::Summary {
                region: Some("PHA".to_string()),
                year: Some("2023".to_string())
            }
        );

        assert!(CliArgs::try_parse_from(["ris3-mapa", "summary", "--year", "24"]).is_err());
        assert!(CliArgs::try_parse_from(["ris3-mapa", "summary", "--year", "20x4"]).is_err());
        Ok(())
    }

    #[test]
    fn rejects_unknown_table() {
        let result = CliArgs::try_parse_from(["ris3-mapa", "trend", "JHM", "--table", "gdp"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }
}
