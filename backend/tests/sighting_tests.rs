//! Sighting aggregation tests
//!
//! Verifies the anchored 15-minute window and per-camera independence.

use bucktrax_backend::services::SightingAggregator;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use shared::{DateRange, GpsCoordinates, SightingEvent};
use uuid::Uuid;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 8, hour, minute, 0).unwrap()
}

fn event(camera_id: Uuid, timestamp: DateTime<Utc>) -> SightingEvent {
    SightingEvent {
        photo_id: Uuid::new_v4(),
        camera_id,
        timestamp,
        location: GpsCoordinates::new(38.5, -90.5),
        weather: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_burst_collapses_to_anchor() {
        let camera = Uuid::new_v4();
        let events = vec![
            event(camera, at(7, 5)),
            event(camera, at(7, 6)),
            event(camera, at(7, 8)),
            event(camera, at(7, 22)),
        ];

        let sightings = SightingAggregator::default().aggregate(&events);

        assert_eq!(sightings.len(), 2);
        // Newest first
        assert_eq!(sightings[0].photo_id, events[3].photo_id);
        assert_eq!(sightings[0].timestamp, at(7, 22));
        assert_eq!(sightings[0].photo_count, 1);
        assert_eq!(sightings[1].photo_id, events[0].photo_id);
        assert_eq!(sightings[1].timestamp, at(7, 5));
        assert_eq!(sightings[1].photo_count, 3);
    }

    #[test]
    fn test_window_is_anchored_not_rolling() {
        let camera = Uuid::new_v4();
        // Consecutive gaps of 10 minutes: a rolling gap rule would keep one sighting
        let events = vec![
            event(camera, at(6, 0)),
            event(camera, at(6, 10)),
            event(camera, at(6, 20)),
        ];

        let sightings = SightingAggregator::default().aggregate(&events);
        assert_eq!(sightings.len(), 2);
        assert_eq!(sightings[1].timestamp, at(6, 0));
        assert_eq!(sightings[1].photo_count, 2);
        assert_eq!(sightings[0].timestamp, at(6, 20));
    }

    #[test]
    fn test_exactly_fifteen_minutes_joins() {
        let camera = Uuid::new_v4();
        let events = vec![event(camera, at(18, 0)), event(camera, at(18, 15))];
        assert_eq!(SightingAggregator::default().aggregate(&events).len(), 1);

        let events = vec![
            event(camera, at(18, 0)),
            event(camera, at(18, 15) + Duration::seconds(1)),
        ];
        assert_eq!(SightingAggregator::default().aggregate(&events).len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let camera = Uuid::new_v4();
        let events = vec![
            event(camera, at(7, 8)),
            event(camera, at(7, 22)),
            event(camera, at(7, 5)),
        ];

        let sightings = SightingAggregator::default().aggregate(&events);
        assert_eq!(sightings.len(), 2);
        assert_eq!(sightings[1].photo_id, events[2].photo_id);
    }

    #[test]
    fn test_cameras_are_independent() {
        let north = Uuid::new_v4();
        let south = Uuid::new_v4();
        let events = vec![
            event(north, at(7, 0)),
            event(south, at(7, 1)),
            event(north, at(7, 2)),
            event(south, at(7, 3)),
        ];

        let sightings = SightingAggregator::default().aggregate(&events);
        assert_eq!(sightings.len(), 2);
        assert!(sightings.iter().any(|s| s.camera_id == north && s.photo_count == 2));
        assert!(sightings.iter().any(|s| s.camera_id == south && s.photo_count == 2));
    }

    #[test]
    fn test_empty_input() {
        assert!(SightingAggregator::default().aggregate(&[]).is_empty());
    }

    #[test]
    fn test_custom_window() {
        let camera = Uuid::new_v4();
        let events = vec![event(camera, at(7, 0)), event(camera, at(7, 25))];
        assert_eq!(SightingAggregator::new(30).aggregate(&events).len(), 1);
        assert_eq!(SightingAggregator::new(15).aggregate(&events).len(), 2);
    }

    #[test]
    fn test_aggregate_within_range() {
        let camera = Uuid::new_v4();
        let events = vec![
            event(camera, at(7, 0)),
            event(camera, Utc.with_ymd_and_hms(2024, 10, 2, 7, 0, 0).unwrap()),
        ];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
        );

        let sightings = SightingAggregator::default().aggregate_within(&events, &range);
        assert_eq!(sightings.len(), 1);
        assert_eq!(sightings[0].timestamp, at(7, 0));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every photo is counted exactly once and output is newest first
        #[test]
        fn prop_photo_counts_are_conserved(
            offsets in prop::collection::vec(0i64..(6 * 60), 1..40),
            cameras in 1usize..4
        ) {
            let camera_ids: Vec<Uuid> = (0..cameras).map(|_| Uuid::new_v4()).collect();
            let events: Vec<SightingEvent> = offsets
                .iter()
                .enumerate()
                .map(|(i, minutes)| event(camera_ids[i % cameras], at(5, 0) + Duration::minutes(*minutes)))
                .collect();

            let sightings = SightingAggregator::default().aggregate(&events);

            let photos: usize = sightings.iter().map(|s| s.photo_count).sum();
            prop_assert_eq!(photos, events.len());
            for pair in sightings.windows(2) {
                prop_assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }

        /// Two sightings of one camera are always more than the window apart
        #[test]
        fn prop_same_camera_sightings_are_separated(
            offsets in prop::collection::vec(0i64..(3 * 60), 1..30)
        ) {
            let camera = Uuid::new_v4();
            let events: Vec<SightingEvent> = offsets
                .iter()
                .map(|minutes| event(camera, at(5, 0) + Duration::minutes(*minutes)))
                .collect();

            let sightings = SightingAggregator::default().aggregate(&events);
            for pair in sightings.windows(2) {
                prop_assert!(pair[0].timestamp - pair[1].timestamp > Duration::minutes(15));
            }
        }
    }
}
