//! Sighting aggregation: collapse photo bursts into camera visits

use std::collections::HashMap;

use chrono::Duration;
use shared::{DateRange, Sighting, SightingEvent};
use uuid::Uuid;

/// Collapses raw photo events into sightings per camera.
///
/// A sighting is anchored at its first photo; any later photo taken within
/// the window of that anchor joins it, however the photos inside the burst
/// are spaced.
#[derive(Debug, Clone)]
pub struct SightingAggregator {
    window: Duration,
}

impl Default for SightingAggregator {
    fn default() -> Self {
        Self::new(15)
    }
}

impl SightingAggregator {
    pub fn new(window_minutes: u32) -> Self {
        Self {
            window: Duration::minutes(i64::from(window_minutes)),
        }
    }

    /// Aggregate events across all cameras. Result is newest first.
    pub fn aggregate(&self, events: &[SightingEvent]) -> Vec<Sighting> {
        let mut by_camera: HashMap<Uuid, Vec<&SightingEvent>> = HashMap::new();
        for event in events {
            by_camera.entry(event.camera_id).or_default().push(event);
        }

        let mut sightings: Vec<Sighting> = by_camera
            .into_values()
            .flat_map(|camera_events| self.aggregate_camera(camera_events))
            .collect();

        sightings.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.camera_id.cmp(&b.camera_id))
        });

        tracing::debug!(
            events = events.len(),
            sightings = sightings.len(),
            "Aggregated photo events into sightings"
        );
        sightings
    }

    /// Aggregate only events inside `range`
    pub fn aggregate_within(&self, events: &[SightingEvent], range: &DateRange) -> Vec<Sighting> {
        let in_range: Vec<SightingEvent> = events
            .iter()
            .filter(|event| range.contains(&event.timestamp))
            .cloned()
            .collect();
        self.aggregate(&in_range)
    }

    fn aggregate_camera(&self, mut events: Vec<&SightingEvent>) -> Vec<Sighting> {
        events.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.photo_id.cmp(&b.photo_id))
        });

        let mut sightings = Vec::new();
        let mut current: Option<Sighting> = None;

        for event in events {
            if let Some(open) = current.as_mut() {
                if event.timestamp - open.timestamp <= self.window {
                    open.photo_count += 1;
                    continue;
                }
            }
            sightings.extend(current.replace(Sighting::anchored_at(event)));
        }

        sightings.extend(current);
        sightings
    }
}
