//! Route synthesis tests
//!
//! Start at a camera, end at a sighting 2 km due north, and place transit
//! features around the straight line between them.

use std::collections::HashMap;

use bucktrax_backend::config::RoutingConfig;
use bucktrax_backend::distance::haversine_meters;
use bucktrax_backend::services::RouteSynthesizer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    ClassificationType, FeatureGeometry, GpsCoordinates, LocationType, PropertyFeature,
    RoutePoint, Sighting,
};
use uuid::Uuid;

const METERS_PER_DEGREE: f64 = 111_195.0;
const BASE: GpsCoordinates = GpsCoordinates {
    latitude: 38.5,
    longitude: -90.5,
};

fn offset(north_m: f64, east_m: f64) -> GpsCoordinates {
    let lon_scale = METERS_PER_DEGREE * BASE.latitude.to_radians().cos();
    GpsCoordinates::new(
        BASE.latitude + north_m / METERS_PER_DEGREE,
        BASE.longitude + east_m / lon_scale,
    )
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 8, hour, minute, 0).unwrap()
}

fn start(visit_time: Option<DateTime<Utc>>) -> RoutePoint {
    RoutePoint {
        location_id: Uuid::new_v4(),
        name: "Ridge Camera".to_string(),
        location_type: LocationType::CameraLocation,
        coordinates: BASE,
        visit_time,
    }
}

fn sighting_at(location: GpsCoordinates) -> Sighting {
    Sighting {
        photo_id: Uuid::new_v4(),
        camera_id: Uuid::new_v4(),
        timestamp: at(7, 0),
        location,
        weather: None,
        feature_id: None,
        photo_count: 1,
    }
}

fn feature(classification: ClassificationType, location: GpsCoordinates) -> PropertyFeature {
    PropertyFeature {
        id: Uuid::new_v4(),
        property_id: Uuid::new_v4(),
        classification,
        geometry: FeatureGeometry::Point {
            coordinates: location,
        },
        name: None,
        notes: None,
        weight_override: None,
    }
}

fn weights(entries: &[(&PropertyFeature, f64)]) -> HashMap<Uuid, f64> {
    entries.iter().map(|(f, w)| (f.id, *w)).collect()
}

fn route_length(route: &[RoutePoint], end: &Sighting) -> f64 {
    let mut length = 0.0;
    for pair in route.windows(2) {
        length += haversine_meters(&pair[0].coordinates, &pair[1].coordinates);
    }
    route
        .last()
        .map(|last| length + haversine_meters(&last.coordinates, &end.location))
        .unwrap_or(length)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_disabled_routing_is_direct() {
        let end = sighting_at(offset(2000.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(1000.0, 50.0));
        let synthesizer = RouteSynthesizer::new(RoutingConfig {
            enabled: false,
            ..RoutingConfig::default()
        });

        let route = synthesizer.synthesize(&start(None), &end, &[saddle], &HashMap::new());
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].location_type, LocationType::CameraLocation);
    }

    #[test]
    fn test_short_routes_stay_direct() {
        let end = sighting_at(offset(300.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(150.0, 20.0));

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &[saddle], &HashMap::new());
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_zero_waypoints_is_direct() {
        let end = sighting_at(offset(2000.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(1000.0, 50.0));
        let synthesizer = RouteSynthesizer::new(RoutingConfig {
            max_waypoints: 0,
            ..RoutingConfig::default()
        });

        let route = synthesizer.synthesize(&start(None), &end, &[saddle], &HashMap::new());
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_only_transit_features_become_waypoints() {
        let end = sighting_at(offset(2000.0, 0.0));
        let bedding = feature(ClassificationType::BeddingArea, offset(1000.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(1000.0, 80.0));
        let features = vec![bedding.clone(), saddle.clone()];
        let weights = weights(&[(&bedding, 0.95), (&saddle, 0.8)]);

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &features, &weights);
        assert_eq!(route.len(), 2);
        assert_eq!(route[1].location_id, saddle.id);
        assert_eq!(route[1].location_type, LocationType::FeatureWaypoint);
        assert_eq!(route[1].name, "Saddle");
    }

    #[test]
    fn test_candidates_beyond_detour_budget_are_skipped() {
        let end = sighting_at(offset(2000.0, 0.0));
        // ~1600 m of extra travel against a 600 m budget
        let funnel = feature(ClassificationType::Funnel, offset(1000.0, 1500.0));

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &[funnel], &HashMap::new());
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_combined_detour_stays_within_budget() {
        let end = sighting_at(offset(2000.0, 0.0));
        // Each adds ~440 m alone, together well over 600 m
        let east = feature(ClassificationType::PinchPoint, offset(1000.0, 700.0));
        let west = feature(ClassificationType::Saddle, offset(1000.0, -700.0));
        let features = vec![east.clone(), west.clone()];
        let weights = weights(&[(&east, 0.9), (&west, 0.7)]);

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &features, &weights);
        assert_eq!(route.len(), 2);
        assert_eq!(route[1].location_id, east.id);

        let direct = haversine_meters(&BASE, &end.location);
        assert!(route_length(&route, &end) - direct <= direct * 0.3);
    }

    #[test]
    fn test_max_waypoints_keeps_heaviest() {
        let end = sighting_at(offset(2000.0, 0.0));
        let a = feature(ClassificationType::Bench, offset(500.0, 20.0));
        let b = feature(ClassificationType::Draw, offset(1000.0, 20.0));
        let c = feature(ClassificationType::TravelCorridor, offset(1500.0, 20.0));
        let features = vec![a.clone(), b.clone(), c.clone()];
        let weights = weights(&[(&a, 0.3), (&b, 0.9), (&c, 0.7)]);

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &features, &weights);
        let ids: Vec<Uuid> = route[1..].iter().map(|p| p.location_id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }

    #[test]
    fn test_waypoints_ordered_along_path() {
        let end = sighting_at(offset(2000.0, 0.0));
        let near = feature(ClassificationType::CreekCrossing, offset(500.0, 30.0));
        let far = feature(ClassificationType::FenceCrossing, offset(1500.0, -30.0));
        let features = vec![far.clone(), near.clone()];
        // The farther waypoint is chosen first but still visited second
        let weights = weights(&[(&near, 0.6), (&far, 0.9)]);

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &features, &weights);
        assert_eq!(route.len(), 3);
        assert_eq!(route[1].location_id, near.id);
        assert_eq!(route[2].location_id, far.id);
    }

    #[test]
    fn test_equal_weights_prefer_smaller_detour() {
        let end = sighting_at(offset(2000.0, 0.0));
        let straight = feature(ClassificationType::Saddle, offset(1000.0, 10.0));
        let bent = feature(ClassificationType::Saddle, offset(1000.0, 400.0));
        let features = vec![bent.clone(), straight.clone()];
        let synthesizer = RouteSynthesizer::new(RoutingConfig {
            max_waypoints: 1,
            ..RoutingConfig::default()
        });

        let route = synthesizer.synthesize(&start(None), &end, &features, &HashMap::new());
        assert_eq!(route[1].location_id, straight.id);
    }

    #[test]
    fn test_features_near_endpoints_are_excluded() {
        let end = sighting_at(offset(2000.0, 0.0));
        let by_start = feature(ClassificationType::Saddle, offset(50.0, 0.0));
        let by_end = feature(ClassificationType::Funnel, offset(1960.0, 0.0));

        let route = RouteSynthesizer::default().synthesize(
            &start(None),
            &end,
            &[by_start, by_end],
            &HashMap::new(),
        );
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_missing_weights_fall_back_to_feature() {
        let end = sighting_at(offset(2000.0, 0.0));
        let mut plain = feature(ClassificationType::Bench, offset(1000.0, 20.0));
        plain.weight_override = Some(0.95);
        let funnel = feature(ClassificationType::Funnel, offset(1200.0, 20.0));
        let synthesizer = RouteSynthesizer::new(RoutingConfig {
            max_waypoints: 1,
            ..RoutingConfig::default()
        });

        let route = synthesizer.synthesize(&start(None), &end, &[funnel, plain.clone()], &HashMap::new());
        assert_eq!(route[1].location_id, plain.id);
    }

    #[test]
    fn test_visit_times_are_interpolated() {
        let end = sighting_at(offset(2000.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(1000.0, 0.0));

        let route = RouteSynthesizer::default().synthesize(
            &start(Some(at(6, 0))),
            &end,
            &[saddle],
            &HashMap::new(),
        );
        let visit = route[1].visit_time.unwrap();
        let expected = at(6, 30);
        assert!((visit - expected).num_seconds().abs() <= 5);
    }

    #[test]
    fn test_no_visit_times_without_departure() {
        let end = sighting_at(offset(2000.0, 0.0));
        let saddle = feature(ClassificationType::Saddle, offset(1000.0, 0.0));

        let route = RouteSynthesizer::default().synthesize(&start(None), &end, &[saddle], &HashMap::new());
        assert_eq!(route.len(), 2);
        assert!(route[1].visit_time.is_none());
    }

    #[test]
    fn test_end_point_marks_sighting() {
        let end = sighting_at(offset(2000.0, 0.0));
        let point = RouteSynthesizer::end_point(&end);
        assert_eq!(point.location_id, end.photo_id);
        assert_eq!(point.location_type, LocationType::Sighting);
        assert_eq!(point.visit_time, Some(end.timestamp));
        assert_eq!(point.coordinates, end.location);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn classification_strategy() -> impl Strategy<Value = ClassificationType> {
        prop::sample::select(ClassificationType::ALL.to_vec())
    }

    fn features_strategy() -> impl Strategy<Value = Vec<(ClassificationType, f64, f64)>> {
        prop::collection::vec(
            (classification_strategy(), -500.0f64..2500.0, -1500.0f64..1500.0),
            0..15,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Waypoints are transit features, capped in number, within the detour budget
        #[test]
        fn prop_route_respects_limits(
            placed in features_strategy(),
            end_north in 0.0f64..4000.0,
            max_waypoints in 0usize..4
        ) {
            let end = sighting_at(offset(end_north, 0.0));
            let features: Vec<PropertyFeature> = placed
                .iter()
                .map(|(class, north, east)| feature(*class, offset(*north, *east)))
                .collect();
            let config = RoutingConfig {
                max_waypoints,
                ..RoutingConfig::default()
            };
            let synthesizer = RouteSynthesizer::new(config.clone());

            let route = synthesizer.synthesize(&start(Some(at(6, 0))), &end, &features, &HashMap::new());

            prop_assert!(route.len() <= max_waypoints + 1);
            prop_assert_eq!(route[0].location_type, LocationType::CameraLocation);

            let by_id: HashMap<Uuid, &PropertyFeature> = features.iter().map(|f| (f.id, f)).collect();
            for point in &route[1..] {
                prop_assert!(by_id[&point.location_id].classification.is_transit());
                let visit = point.visit_time.unwrap();
                prop_assert!(visit >= at(6, 0) && visit <= at(7, 0) + Duration::seconds(1));
            }

            let direct = haversine_meters(&BASE, &end.location);
            prop_assert!(route_length(&route, &end) - direct <= direct * config.max_detour_fraction + 1e-6);
        }
    }
}
