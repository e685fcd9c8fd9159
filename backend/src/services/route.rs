//! Route synthesis: travel paths from a known location to a predicted sighting

use std::collections::HashMap;

use chrono::Duration;
use shared::{GpsCoordinates, LocationType, PropertyFeature, RoutePoint, Sighting};
use uuid::Uuid;

use crate::config::RoutingConfig;
use crate::distance::{feature_anchor, haversine_meters};

/// A feature that may be inserted between the endpoints
#[derive(Debug, Clone)]
struct Candidate<'a> {
    feature: &'a PropertyFeature,
    anchor: GpsCoordinates,
    weight: f64,
    added_detour: f64,
    from_start: f64,
}

/// Inserts transit-feature waypoints between a start point and a sighting
#[derive(Debug, Clone, Default)]
pub struct RouteSynthesizer {
    config: RoutingConfig,
}

impl RouteSynthesizer {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Route point for the sighting a route ends at
    pub fn end_point(sighting: &Sighting) -> RoutePoint {
        RoutePoint {
            location_id: sighting.photo_id,
            name: "Predicted sighting".to_string(),
            location_type: LocationType::Sighting,
            coordinates: sighting.location,
            visit_time: Some(sighting.timestamp),
        }
    }

    /// Start point followed by any selected waypoints. The caller appends the
    /// end point.
    pub fn synthesize(
        &self,
        start: &RoutePoint,
        end: &Sighting,
        features: &[PropertyFeature],
        weights: &HashMap<Uuid, f64>,
    ) -> Vec<RoutePoint> {
        let direct = haversine_meters(&start.coordinates, &end.location);

        if !self.config.enabled
            || self.config.max_waypoints == 0
            || direct < self.config.minimum_distance_meters
        {
            tracing::debug!(direct_meters = direct, "Using direct route");
            return vec![start.clone()];
        }

        let budget = direct * self.config.max_detour_fraction;
        let mut candidates = self.candidates(start, end, features, weights, direct, budget);
        candidates.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.added_detour.total_cmp(&b.added_detour))
                .then_with(|| a.feature.id.cmp(&b.feature.id))
        });

        let mut selected: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            if selected.len() >= self.config.max_waypoints {
                break;
            }
            let mut tentative = selected.clone();
            tentative.push(candidate);
            tentative.sort_by(|a, b| a.from_start.total_cmp(&b.from_start));

            if path_length(start, end, &tentative) - direct <= budget {
                selected = tentative;
            }
        }

        tracing::debug!(
            direct_meters = direct,
            waypoints = selected.len(),
            "Synthesized feature-aware route"
        );

        let mut route = vec![start.clone()];
        route.extend(self.waypoints(start, end, &selected));
        route
    }

    fn candidates<'a>(
        &self,
        start: &RoutePoint,
        end: &Sighting,
        features: &'a [PropertyFeature],
        weights: &HashMap<Uuid, f64>,
        direct: f64,
        budget: f64,
    ) -> Vec<Candidate<'a>> {
        features
            .iter()
            .filter(|feature| feature.classification.is_transit())
            .filter_map(|feature| {
                let anchor = feature_anchor(&feature.geometry)?;
                let from_start = haversine_meters(&start.coordinates, &anchor);
                let to_end = haversine_meters(&anchor, &end.location);

                if from_start <= self.config.proximity_threshold_meters
                    || to_end <= self.config.proximity_threshold_meters
                {
                    return None;
                }

                let added_detour = from_start + to_end - direct;
                if added_detour > budget {
                    return None;
                }

                let weight = weights.get(&feature.id).copied().unwrap_or_else(|| {
                    feature
                        .weight_override
                        .unwrap_or_else(|| feature.classification.default_weight())
                });

                Some(Candidate {
                    feature,
                    anchor,
                    weight,
                    added_detour,
                    from_start,
                })
            })
            .collect()
    }

    fn waypoints(&self, start: &RoutePoint, end: &Sighting, selected: &[Candidate]) -> Vec<RoutePoint> {
        let total = path_length(start, end, selected);
        let timing = start
            .visit_time
            .filter(|t| *t <= end.timestamp && total > 0.0)
            .map(|t| (t, end.timestamp - t));

        let mut travelled = 0.0;
        let mut previous = start.coordinates;
        selected
            .iter()
            .map(|candidate| {
                travelled += haversine_meters(&previous, &candidate.anchor);
                previous = candidate.anchor;

                let visit_time = timing.map(|(departure, span)| {
                    let offset_ms = (span.num_milliseconds() as f64 * travelled / total) as i64;
                    departure + Duration::milliseconds(offset_ms)
                });

                RoutePoint {
                    location_id: candidate.feature.id,
                    name: candidate.feature.display_name(),
                    location_type: LocationType::FeatureWaypoint,
                    coordinates: candidate.anchor,
                    visit_time,
                }
            })
            .collect()
    }
}

/// Length of start -> waypoints -> end in meters
fn path_length(start: &RoutePoint, end: &Sighting, waypoints: &[Candidate]) -> f64 {
    let mut length = 0.0;
    let mut previous = start.coordinates;
    for waypoint in waypoints {
        length += haversine_meters(&previous, &waypoint.anchor);
        previous = waypoint.anchor;
    }
    length + haversine_meters(&previous, &end.location)
}
