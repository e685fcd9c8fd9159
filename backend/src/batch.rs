//! Batch predictions over property snapshots exported by the storage layer

use serde::{Deserialize, Serialize};
use shared::{
    FeatureWeight, FeatureWeightListing, PropertyPrediction, RoutePoint, SeasonOverride,
    SeasonOverrideListing,
};

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{FeatureWeightService, PredictionRequest, PredictionService, SeasonService};

/// Everything the engine needs about one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySnapshot {
    #[serde(flatten)]
    pub request: PredictionRequest,
    #[serde(default)]
    pub season_overrides: Vec<SeasonOverride>,
    #[serde(default)]
    pub feature_weights: Vec<FeatureWeight>,
    /// Where the hunter starts; enables route synthesis
    pub route_start: Option<RoutePoint>,
}

/// Results for one property
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub prediction: PropertyPrediction,
    pub route: Option<Vec<RoutePoint>>,
    pub seasons: Vec<SeasonOverrideListing>,
    pub weights: Vec<FeatureWeightListing>,
}

/// Input files may hold one snapshot or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapshotInput {
    Many(Vec<PropertySnapshot>),
    One(Box<PropertySnapshot>),
}

impl SnapshotInput {
    pub fn into_snapshots(self) -> Vec<PropertySnapshot> {
        match self {
            SnapshotInput::Many(snapshots) => snapshots,
            SnapshotInput::One(snapshot) => vec![*snapshot],
        }
    }
}

/// Compute the full report for one property snapshot
pub fn run_snapshot(snapshot: PropertySnapshot, config: &Config) -> AppResult<PropertyReport> {
    let property_id = snapshot.request.property_id;

    let mut weights = FeatureWeightService::from_rows(snapshot.feature_weights);
    weights.materialize(property_id);

    let service = PredictionService::new(
        SeasonService::from_overrides(snapshot.season_overrides),
        weights,
        config.prediction.clone(),
        config.routing.clone(),
    );

    let prediction = service.predict(&snapshot.request)?;
    let route = match &snapshot.route_start {
        Some(start) => service.route_to_default_segment(
            start,
            &prediction,
            &snapshot.request.features,
            snapshot.request.timezone_offset_minutes,
        )?,
        None => None,
    };

    Ok(PropertyReport {
        seasons: service.seasons().list_overrides(property_id),
        weights: service
            .weights()
            .list_weights(property_id, &snapshot.request.features, prediction.season),
        prediction,
        route,
    })
}
