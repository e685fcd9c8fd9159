//! Configuration management for the BuckTrax prediction engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with BUCKTRAX_ prefix

use config::{Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Sighting aggregation and corridor mining tunables
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Feature-aware route synthesis tunables
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Log output configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct PredictionConfig {
    /// Photos within this many minutes of a sighting's first photo join it
    #[validate(range(min = 1, max = 1440))]
    pub sighting_window_minutes: u32,

    /// Maximum gap between two sightings for them to form a transition
    #[validate(range(min = 1, max = 10080))]
    pub corridor_time_window_minutes: u32,

    /// Maximum great-circle distance between two sightings of a transition
    #[validate(range(min = 1.0))]
    pub corridor_max_distance_meters: f64,

    /// A sighting is associated with the nearest feature within this distance
    #[validate(range(min = 0.0))]
    pub feature_proximity_meters: f64,

    /// Raise weights to the power of 1.5 before averaging corridor endpoints
    pub amplify_feature_weights: bool,

    /// Share of a corridor's transitions a segment needs to join its pattern
    #[validate(range(min = 0.0, max = 1.0))]
    pub pattern_share_threshold: f64,

    /// Below this many sightings the prediction is flagged as low-data
    pub minimum_sightings_threshold: usize,

    /// Below this many transitions the prediction is flagged as low-data
    pub minimum_transitions_threshold: u32,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct RoutingConfig {
    /// Insert feature waypoints at all
    pub enabled: bool,

    /// Straight-line distance below which routes stay direct
    #[validate(range(min = 0.0))]
    pub minimum_distance_meters: f64,

    /// Features this close to either endpoint are not used as waypoints
    #[validate(range(min = 0.0))]
    pub proximity_threshold_meters: f64,

    /// Extra travel allowed, as a fraction of the direct distance
    #[validate(range(min = 0.0, max = 10.0))]
    pub max_detour_fraction: f64,

    #[validate(range(max = 20))]
    pub max_waypoints: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
}

/// Log output formatter
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("BUCKTRAX_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("log.format", "pretty")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BUCKTRAX_ prefix)
            .add_source(
                Environment::with_prefix("BUCKTRAX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every section
    pub fn validate(&self) -> AppResult<()> {
        self.prediction.validate()?;
        self.routing.validate()?;
        Ok(())
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            sighting_window_minutes: 15,
            corridor_time_window_minutes: 240,
            corridor_max_distance_meters: 2000.0,
            feature_proximity_meters: 100.0,
            amplify_feature_weights: false,
            pattern_share_threshold: 0.30,
            minimum_sightings_threshold: 5,
            minimum_transitions_threshold: 2,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_distance_meters: 400.0,
            proximity_threshold_meters: 100.0,
            max_detour_fraction: 0.30,
            max_waypoints: 2,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
        }
    }
}
