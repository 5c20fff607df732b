use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::timeframe::{TimeframeSpec, TimeframeTable};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "OHLC_TIMEFRAME_CONFIG";
/// CLI keyword that selects every configured timeframe; not usable as a label.
pub const ALL_TIMEFRAMES: &str = "all";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    /// Overrides the standard 5m/15m/1h table when non-empty.
    #[serde(default)]
    pub timeframes: Vec<TimeframeSpec>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            timeframe: default_timeframe(),
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_timeframe() -> String {
    "5m".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid config {}", config_path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let table = self.timeframe_table()?;
        if table.contains(ALL_TIMEFRAMES) {
            bail!("timeframe label '{}' is reserved", ALL_TIMEFRAMES);
        }
        if !table.contains(&self.chart.timeframe) {
            bail!(
                "chart.timeframe '{}' is not one of the configured timeframes ({})",
                self.chart.timeframe,
                table.labels().collect::<Vec<_>>().join(", ")
            );
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn timeframe_table(&self) -> Result<TimeframeTable> {
        if self.timeframes.is_empty() {
            return Ok(TimeframeTable::standard());
        }
        TimeframeTable::new(self.timeframes.clone()).context("timeframes table is invalid")
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        let minutes = self.chart.utc_offset_minutes;
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| {
                format!(
                    "chart.utc_offset_minutes {} is outside +/-24h",
                    minutes
                )
            })
    }
}
