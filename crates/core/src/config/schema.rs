//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Output locations
    #[serde(default)]
    pub general: GeneralConfig,

    /// Archive parsing behavior
    #[serde(default)]
    pub parse: ParseConfig,

    /// Analytics tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Reject values the tools cannot work with
    pub fn validate(&self) -> Result<()> {
        let distance = self.analysis.cluster_max_distance_km;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(Error::config_validation(format!(
                "analysis.cluster_max_distance_km must be a positive number, got {}",
                distance
            )));
        }
        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory exports are written to when no explicit output is given
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pretty_json: true,
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

/// Archive parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Keep each placemark's raw markup as an `originalElement` property
    #[serde(default)]
    pub keep_source_markup: bool,

    /// Copy `ExtendedData` values into placemark properties
    #[serde(default = "default_true")]
    pub extended_data: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            keep_source_markup: false,
            extended_data: true,
        }
    }
}

/// Analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum distance from a cluster seed for a point to join it
    #[serde(default = "default_cluster_distance")]
    pub cluster_max_distance_km: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cluster_max_distance_km: default_cluster_distance(),
        }
    }
}

fn default_cluster_distance() -> f64 {
    1.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Include the event target in log lines
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_target: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
