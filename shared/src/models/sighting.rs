//! Sighting models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GpsCoordinates;

/// Weather conditions captured alongside a photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<i32>,
    pub wind_speed_mps: Option<Decimal>,
    pub wind_direction_deg: Option<i32>,
    pub pressure_hpa: Option<i32>,
    pub conditions: Option<String>,
}

/// A raw tagged photo event from a trail camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingEvent {
    pub photo_id: Uuid,
    pub camera_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: GpsCoordinates,
    pub weather: Option<WeatherSnapshot>,
}

/// One camera visit: one or more photo events collapsed into the first one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sighting {
    /// Photo that anchors the visit
    pub photo_id: Uuid,
    pub camera_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: GpsCoordinates,
    pub weather: Option<WeatherSnapshot>,
    /// Nearest mapped feature, when one is close enough
    pub feature_id: Option<Uuid>,
    pub photo_count: usize,
}

impl Sighting {
    /// Start a sighting anchored at `event`
    pub fn anchored_at(event: &SightingEvent) -> Self {
        Self {
            photo_id: event.photo_id,
            camera_id: event.camera_id,
            timestamp: event.timestamp,
            location: event.location,
            weather: event.weather.clone(),
            feature_id: None,
            photo_count: 1,
        }
    }
}
