use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use std::time::Duration;
use tracing::debug;

fn default_base_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TseProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for TseProviderConfig {
    fn default() -> Self {
        TseProviderConfig {
            base_url: default_base_url(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub tse: TseProviderConfig,
}

/// Candidate-date window probed at the start of each year.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProbeConfig {
    /// First day of month 01 probed (inclusive).
    pub first_day: u32,
    /// Last day of month 01 probed (inclusive).
    pub last_day: u32,
    /// Pause between two consecutive probes.
    pub delay_ms: u64,
    /// The stock query spans day 01 up to this day of month 01.
    pub stock_window_end_day: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            first_day: 4,
            last_day: 15,
            delay_ms: 500,
            stock_window_end_day: 30,
        }
    }
}

impl ProbeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_day == 0 || self.last_day > 31 || self.first_day > self.last_day {
            bail!(
                "Invalid probe window: days {}..={} must lie within 1..=31",
                self.first_day,
                self.last_day
            );
        }
        if self.stock_window_end_day == 0 || self.stock_window_end_day > 31 {
            bail!(
                "Invalid stock window end day: {}",
                self.stock_window_end_day
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StockConfig {
    pub symbol: String,
}

impl Default for StockConfig {
    fn default() -> Self {
        StockConfig {
            symbol: "فملی".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub stock: StockConfig,
    /// Extra or corrected annual inflation rates, merged over the built-in table.
    #[serde(default)]
    pub inflation: BTreeMap<i32, f64>,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "yearly-growth", "yearly-growth")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "yearly-growth", "yearly-growth")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.probe.validate()?;
        if self.stock.symbol.trim().is_empty() {
            bail!("Stock symbol must not be empty");
        }
        Ok(())
    }
}
