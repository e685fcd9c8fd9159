//! Prediction orchestration for one property:
//! sightings -> feature association -> corridors -> time segments -> routes

use chrono::{FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    validate_coordinates, validate_utc_offset_minutes, validate_weight, DateRange,
    FeatureGeometry, GpsCoordinates, PropertyFeature, PropertyPrediction, RoutePoint, Season,
    Sighting, SightingEvent,
};
use uuid::Uuid;

use crate::config::{PredictionConfig, RoutingConfig};
use crate::error::{AppError, AppResult};
use crate::services::corridor::CorridorMiner;
use crate::services::feature_weight::FeatureWeightService;
use crate::services::route::RouteSynthesizer;
use crate::services::season::SeasonService;
use crate::services::sighting::SightingAggregator;
use crate::services::time_segment::{default_segment_index, is_insufficient_data, TimeSegmentPredictor};

/// Inputs for one property's prediction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub property_id: Uuid,
    pub features: Vec<PropertyFeature>,
    pub events: Vec<SightingEvent>,
    /// Only events on these days are considered
    pub date_range: Option<DateRange>,
    /// Explicit season context; resolved from `reference_date` when absent
    pub season: Option<Season>,
    /// Date used to resolve the primary season; defaults to the latest event
    pub reference_date: Option<NaiveDate>,
    /// Fixed offset of the property's local time from UTC
    #[serde(default)]
    pub timezone_offset_minutes: i32,
}

/// Prediction service for one snapshot of season and weight settings
#[derive(Debug, Clone)]
pub struct PredictionService {
    seasons: SeasonService,
    weights: FeatureWeightService,
    prediction: PredictionConfig,
    routing: RoutingConfig,
}

impl PredictionService {
    pub fn new(
        seasons: SeasonService,
        weights: FeatureWeightService,
        prediction: PredictionConfig,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            seasons,
            weights,
            prediction,
            routing,
        }
    }

    pub fn seasons(&self) -> &SeasonService {
        &self.seasons
    }

    pub fn weights(&self) -> &FeatureWeightService {
        &self.weights
    }

    fn utc_offset(minutes: i32) -> AppResult<FixedOffset> {
        validate_utc_offset_minutes(minutes)
            .map_err(|e| AppError::validation("timezone_offset_minutes", e))?;
        FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            AppError::validation("timezone_offset_minutes", "UTC offset is out of range")
        })
    }

    /// Season context for a request.
    ///
    /// Without an explicit season or reference date, the latest event inside
    /// the request's date range decides; an empty range falls back to its end
    /// date.
    pub fn resolve_season(&self, request: &PredictionRequest) -> Option<Season> {
        if request.season.is_some() {
            return request.season;
        }
        let latest_event = |range: Option<&DateRange>| {
            request
                .events
                .iter()
                .map(|e| e.timestamp)
                .filter(|t| range.map_or(true, |r| r.contains(t)))
                .max()
                .map(|t| t.date_naive())
        };
        let date = request.reference_date.or_else(|| match &request.date_range {
            Some(range) => latest_event(Some(range)).or(Some(range.end)),
            None => latest_event(None),
        })?;
        self.seasons.primary_season(date, Some(request.property_id))
    }

    /// Reject out-of-range locations and weight overrides before any work
    fn validate_request(request: &PredictionRequest) -> AppResult<()> {
        for (index, event) in request.events.iter().enumerate() {
            validate_coordinates(&event.location)
                .map_err(|e| AppError::validation(format!("events[{}].location", index), e))?;
        }

        for (index, feature) in request.features.iter().enumerate() {
            if let Some(weight) = feature.weight_override {
                validate_weight(weight).map_err(|e| {
                    AppError::validation(
                        format!("features[{}].weight_override", index),
                        format!("{} for {}", e, feature.display_name()),
                    )
                })?;
            }

            let coordinates: &[GpsCoordinates] = match &feature.geometry {
                FeatureGeometry::Point { coordinates } => std::slice::from_ref(coordinates),
                FeatureGeometry::Polygon { ring } => ring.as_slice(),
            };
            for point in coordinates {
                validate_coordinates(point).map_err(|e| {
                    AppError::validation(format!("features[{}].geometry", index), e)
                })?;
            }
        }
        Ok(())
    }

    /// Run the full pipeline for one property
    pub fn predict(&self, request: &PredictionRequest) -> AppResult<PropertyPrediction> {
        let offset = Self::utc_offset(request.timezone_offset_minutes)?;
        Self::validate_request(request)?;
        let season = self.resolve_season(request);

        let aggregator = SightingAggregator::new(self.prediction.sighting_window_minutes);
        let mut sightings = match &request.date_range {
            Some(range) => aggregator.aggregate_within(&request.events, range),
            None => aggregator.aggregate(&request.events),
        };

        let miner = CorridorMiner::new(self.prediction.clone()).with_utc_offset(offset);
        miner.associate_features(&mut sightings, &request.features);

        let weights = self.weights.all_effective_weights(&request.features, season);
        let mined = miner.mine(&sightings, &request.features, &weights);

        let segments = TimeSegmentPredictor::new(offset).predict(&sightings, &mined.corridors);
        let default_index = default_segment_index(&segments);
        let insufficient =
            is_insufficient_data(sightings.len(), mined.total_transitions, &self.prediction);

        if insufficient {
            tracing::warn!(
                property_id = %request.property_id,
                sightings = sightings.len(),
                transitions = mined.total_transitions,
                "Insufficient data for a confident prediction"
            );
        }
        tracing::info!(
            property_id = %request.property_id,
            season = season.map(|s| s.as_str()),
            sightings = sightings.len(),
            corridors = mined.corridors.len(),
            default_segment = %segments[default_index].segment,
            "Prediction computed"
        );

        Ok(PropertyPrediction {
            property_id: request.property_id,
            season,
            total_sightings: sightings.len(),
            total_transitions: mined.total_transitions,
            insufficient_data: insufficient,
            segments,
            default_segment_index: default_index,
            corridors: mined.corridors,
            sightings,
            generated_at: Utc::now(),
        })
    }

    /// Full route from `start` to `sighting`, end point included
    pub fn route_to(
        &self,
        start: &RoutePoint,
        sighting: &Sighting,
        features: &[PropertyFeature],
        season: Option<Season>,
    ) -> Vec<RoutePoint> {
        let weights = self.weights.all_effective_weights(features, season);
        let mut route = RouteSynthesizer::new(self.routing.clone())
            .synthesize(start, sighting, features, &weights);
        route.push(RouteSynthesizer::end_point(sighting));
        route
    }

    /// Route to the most recent sighting of the prediction's default segment
    pub fn route_to_default_segment(
        &self,
        start: &RoutePoint,
        prediction: &PropertyPrediction,
        features: &[PropertyFeature],
        timezone_offset_minutes: i32,
    ) -> AppResult<Option<Vec<RoutePoint>>> {
        let offset = Self::utc_offset(timezone_offset_minutes)?;
        let Some(segment) = prediction.default_segment().map(|s| s.segment) else {
            return Ok(None);
        };

        // Sightings are stored newest first
        let target = prediction
            .sightings
            .iter()
            .find(|s| segment.contains_hour(s.timestamp.with_timezone(&offset).hour()));

        Ok(target.map(|sighting| self.route_to(start, sighting, features, prediction.season)))
    }
}
