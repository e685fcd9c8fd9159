//! Travel route models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GpsCoordinates;

/// What a route point stands for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    CameraLocation,
    FeatureWaypoint,
    Sighting,
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::CameraLocation => write!(f, "Camera Location"),
            LocationType::FeatureWaypoint => write!(f, "Feature Waypoint"),
            LocationType::Sighting => write!(f, "Sighting"),
        }
    }
}

/// One stop on a synthesized route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutePoint {
    pub location_id: Uuid,
    pub name: String,
    pub location_type: LocationType,
    pub coordinates: GpsCoordinates,
    pub visit_time: Option<DateTime<Utc>>,
}
