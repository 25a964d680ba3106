//! Configuration management for the itinerary engine
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Density clustering parameters
    #[serde(default)]
    pub clustering: ClusteringConfig,
    /// Per-day category baselines used for shortfall detection
    #[serde(default)]
    pub balancer: BalancerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Density clustering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Neighborhood radius in meters
    #[serde(default = "default_eps_meters")]
    pub eps_meters: f64,
    /// Minimum neighbor count for a core point
    #[serde(default = "default_min_pts")]
    pub min_pts: usize,
}

/// Per-day minimum candidate counts before multiplying by trip duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancerConfig {
    #[serde(default = "default_spot_per_day")]
    pub spot: usize,
    #[serde(default = "default_food_per_day")]
    pub food: usize,
    #[serde(default = "default_cafe_per_day")]
    pub cafe: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_eps_meters() -> f64 {
    800.0
}

fn default_min_pts() -> usize {
    3
}

fn default_spot_per_day() -> usize {
    4
}

fn default_food_per_day() -> usize {
    3
}

fn default_cafe_per_day() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            eps_meters: default_eps_meters(),
            min_pts: default_min_pts(),
        }
    }
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            spot: default_spot_per_day(),
            food: default_food_per_day(),
            cafe: default_cafe_per_day(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from the given path, or the default config
    /// location when `None`, layered under `TRIPCRAFT_` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("tripcraft.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPCRAFT_CLUSTERING__EPS_METERS=500 overrides clustering.eps_meters
        builder = builder.add_source(
            Environment::with_prefix("TRIPCRAFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcraft").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.clustering.eps_meters == 0.0 {
            self.clustering.eps_meters = default_eps_meters();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let eps = self.clustering.eps_meters;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(
                PlannerError::config("Clustering eps_meters must be a positive number").into(),
            );
        }

        if eps > 50_000.0 {
            return Err(
                PlannerError::config("Clustering eps_meters cannot exceed 50000 meters").into(),
            );
        }

        if self.clustering.min_pts > 100 {
            return Err(PlannerError::config("Clustering min_pts cannot exceed 100").into());
        }

        let per_day = self.balancer.spot + self.balancer.food + self.balancer.cafe;
        if per_day > 50 {
            return Err(PlannerError::config(
                "Balancer baselines cannot require more than 50 places per day",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
