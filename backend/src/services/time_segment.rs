//! Time segment prediction: bucket sightings and corridors into the six daily segments

use std::collections::HashMap;

use chrono::{FixedOffset, Offset, Timelike, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{CameraActivity, MovementCorridor, Sighting, TimeSegment, TimeSegmentPrediction};
use uuid::Uuid;

use crate::config::PredictionConfig;

const TOP_CAMERA_LIMIT: usize = 3;

/// Confidence (0-100, one decimal) that a segment's activity is representative
pub fn confidence_score(
    segment_sightings: usize,
    total_sightings: usize,
    segment_corridors: usize,
) -> Decimal {
    let data_confidence = (segment_sightings as f64 / 10.0).min(1.0);
    let proportion_confidence = if total_sightings == 0 {
        0.0
    } else {
        segment_sightings as f64 / total_sightings as f64
    };
    let corridor_bonus = (segment_corridors as f64 / 5.0).min(0.2);

    let raw = ((data_confidence * 0.6 + proportion_confidence * 0.4) * 100.0
        + corridor_bonus * 100.0)
        .min(100.0);

    Decimal::from_f64(raw)
        .unwrap_or_default()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Index of the most informative segment.
///
/// Highest `sighting_count + corridor count` wins; ties go to the earliest
/// tied segment that is not Night.
pub fn default_segment_index(segments: &[TimeSegmentPrediction]) -> usize {
    let Some(max_score) = segments.iter().map(|s| s.activity_score()).max() else {
        return 0;
    };

    let tied: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.activity_score() == max_score)
        .map(|(i, _)| i)
        .collect();

    if tied.len() == 1 {
        return tied[0];
    }
    tied.iter()
        .copied()
        .find(|i| segments[*i].segment != TimeSegment::Night)
        .unwrap_or(tied[0])
}

/// Whether there is too little data for the prediction to be trusted
pub fn is_insufficient_data(
    total_sightings: usize,
    total_transitions: u32,
    config: &PredictionConfig,
) -> bool {
    total_sightings < config.minimum_sightings_threshold
        || total_transitions < config.minimum_transitions_threshold
}

/// Buckets sightings and corridors into the six daily segments
#[derive(Debug, Clone)]
pub struct TimeSegmentPredictor {
    utc_offset: FixedOffset,
}

impl Default for TimeSegmentPredictor {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl TimeSegmentPredictor {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    fn local_hour(&self, sighting: &Sighting) -> u32 {
        sighting.timestamp.with_timezone(&self.utc_offset).hour()
    }

    /// Always returns all six segments, in day order
    pub fn predict(
        &self,
        sightings: &[Sighting],
        corridors: &[MovementCorridor],
    ) -> Vec<TimeSegmentPrediction> {
        let total_sightings = sightings.len();

        TimeSegment::ALL
            .into_iter()
            .map(|segment| {
                let in_segment: Vec<&Sighting> = sightings
                    .iter()
                    .filter(|s| segment.contains_hour(self.local_hour(s)))
                    .collect();
                let segment_corridors: Vec<MovementCorridor> = corridors
                    .iter()
                    .filter(|c| c.has_pattern(segment))
                    .cloned()
                    .collect();

                TimeSegmentPrediction {
                    segment,
                    name: segment.display_name().to_string(),
                    hour_range: segment.hour_range(),
                    start_hour: segment.start_hour(),
                    end_hour: segment.end_hour(),
                    sighting_count: in_segment.len(),
                    confidence_score: confidence_score(
                        in_segment.len(),
                        total_sightings,
                        segment_corridors.len(),
                    ),
                    corridors: segment_corridors,
                    top_cameras: top_cameras(&in_segment),
                }
            })
            .collect()
    }
}

fn top_cameras(sightings: &[&Sighting]) -> Vec<CameraActivity> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for sighting in sightings {
        *counts.entry(sighting.camera_id).or_default() += 1;
    }

    let mut activity: Vec<CameraActivity> = counts
        .into_iter()
        .map(|(camera_id, sighting_count)| CameraActivity {
            camera_id,
            sighting_count,
        })
        .collect();
    activity.sort_by(|a, b| {
        b.sighting_count
            .cmp(&a.sighting_count)
            .then_with(|| a.camera_id.cmp(&b.camera_id))
    });
    activity.truncate(TOP_CAMERA_LIMIT);
    activity
}
