use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::analysis::clustering::DEFAULT_CLUSTER_COUNT;

pub const DATA_DIR_VAR: &str = "RIS3_DATA_DIR";
pub const CLUSTERS_VAR: &str = "RIS3_CLUSTERS";
pub const TOP_K_VAR: &str = "RIS3_TOP_K";
pub const YEAR_VAR: &str = "RIS3_YEAR";
pub const HUB_VAR: &str = "RIS3_HUB";
pub const DEBUG_VAR: &str = "RIS3_DEBUG";

/// Settings for one run of the analyses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the published JSON files
    pub data_dir: PathBuf,
    pub cluster_count: usize,
    pub top_k: usize,
    /// Reference year for single-year summaries
    pub year: String,
    /// Region whose share of all collaboration is reported
    pub hub_region: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./public/data"),
            cluster_count: DEFAULT_CLUSTER_COUNT,
            top_k: 5,
            year: "2024".to_string(),
            hub_region: "Hl. m. Praha".to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the config from a variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            data_dir: lookup(DATA_DIR_VAR).map_or(defaults.data_dir, PathBuf::from),
            cluster_count: parse_var(&lookup, CLUSTERS_VAR, defaults.cluster_count)?,
            top_k: parse_var(&lookup, TOP_K_VAR, defaults.top_k)?,
            year: lookup(YEAR_VAR).unwrap_or(defaults.year),
            hub_region: lookup(HUB_VAR).unwrap_or(defaults.hub_region),
        };

        if config.cluster_count == 0 {
            return Err(eyre!("{CLUSTERS_VAR} must be at least 1"));
        }
        if config.top_k == 0 {
            return Err(eyre!("{TOP_K_VAR} must be at least 1"));
        }
        if !is_year(&config.year) {
            return Err(eyre!("{YEAR_VAR} must be a four-digit year, got `{}`", config.year));
        }

        Ok(config)
    }
}

/// Years are four ASCII digits, matching the keys of the published tables
pub fn is_year(value: &str) -> bool {
    value.len() == 4 && value.chars().all(|c| c.is_ascii_digit())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| eyre!("invalid {key}=`{raw}`: {e}")),
        None => Ok(default),
    }
}

/// Initializes the application configuration from `.env` and the environment
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig::from_lookup(|key| env::var(key).ok())
}

/// Whether debug logging was requested through the environment
pub fn debug_enabled() -> bool {
    env::var(DEBUG_VAR).is_ok_and(|value| !value.is_empty() && value != "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cluster_count, 4);
        Ok(())
    }

    #[test]
    fn overrides_from_variables() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/ris3"),
            (CLUSTERS_VAR, " 3 "),
            (TOP_K_VAR, "2"),
            (YEAR_VAR, "2022"),
            (HUB_VAR, "Jihomoravský kraj"),
        ]))?;

        assert_eq!(config.data_dir, PathBuf::from("/srv/ris3"));
        assert_eq!(config.cluster_count, 3);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.year, "2022");
        assert_eq!(config.hub_region, "Jihomoravský kraj");
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(AppConfig::from_lookup(lookup(&[(CLUSTERS_VAR, "four")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(CLUSTERS_VAR, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(TOP_K_VAR, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(YEAR_VAR, "24")])).is_err());
    }
}
