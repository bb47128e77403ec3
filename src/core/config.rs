use super::enrich::{DEFAULT_GROWTH_WINDOW, GapPolicy};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const TABLE_FILE_NAME: &str = "indicators.csv";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WorldBankProviderConfig {
    pub base_url: String,
    pub source: u32,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for WorldBankProviderConfig {
    fn default() -> Self {
        WorldBankProviderConfig {
            base_url: "https://api.worldbank.org/v2".to_string(),
            source: 2,
            per_page: 2000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub growth_window: usize,
    pub gap_policy: GapPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            growth_window: DEFAULT_GROWTH_WINDOW,
            gap_policy: GapPolicy::Adjacent,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub provider: WorldBankProviderConfig,
    pub countries: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
    pub table_path: Option<String>,
    pub dashboard: DashboardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: WorldBankProviderConfig::default(),
            countries: vec!["PRT".to_string(), "ESP".to_string()],
            start_year: 1996,
            end_year: 2024,
            table_path: None,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path` when given, else the default config file, else built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    debug!(
                        "No config at {}, using built-in defaults",
                        default_path.display()
                    );
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "macrodash", "macrodash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Location of the persisted indicator table.
    pub fn table_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.table_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "macrodash", "macrodash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join(TABLE_FILE_NAME))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            bail!("At least one country code must be configured");
        }
        if self.start_year > self.end_year {
            bail!(
                "start_year ({}) must not be after end_year ({})",
                self.start_year,
                self.end_year
            );
        }
        if self.provider.per_page == 0 {
            bail!("provider.per_page must be greater than zero");
        }
        if self.dashboard.growth_window == 0 {
            bail!("dashboard.growth_window must be greater than zero");
        }
        Ok(())
    }
}
