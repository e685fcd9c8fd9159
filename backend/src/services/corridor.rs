//! Corridor mining: movement between features across consecutive sightings

use std::collections::HashMap;

use chrono::{FixedOffset, Offset, Timelike, Utc};
use shared::{MovementCorridor, PropertyFeature, Sighting, TimeSegment};
use uuid::Uuid;

use crate::config::PredictionConfig;
use crate::distance::{distance_to_feature, haversine_meters};

const AMPLIFY_EXPONENT: f64 = 1.5;

/// Output of one mining pass
#[derive(Debug, Clone, Default)]
pub struct CorridorMiningResult {
    /// Highest score first
    pub corridors: Vec<MovementCorridor>,
    pub total_transitions: u32,
}

/// Transitions seen for one unordered feature pair
struct PairStats {
    start: Uuid,
    end: Uuid,
    forward: u32,
    reverse: u32,
    hours: [u32; 24],
}

impl PairStats {
    fn new(start: Uuid, end: Uuid) -> Self {
        Self {
            start,
            end,
            forward: 0,
            reverse: 0,
            hours: [0; 24],
        }
    }

    fn total(&self) -> u32 {
        self.forward + self.reverse
    }
}

/// Score of a corridor from its transition count and endpoint weights
pub fn corridor_score(transition_count: u32, start_weight: f64, end_weight: f64, amplify: bool) -> f64 {
    let (start, end) = if amplify {
        (start_weight.powf(AMPLIFY_EXPONENT), end_weight.powf(AMPLIFY_EXPONENT))
    } else {
        (start_weight, end_weight)
    };
    f64::from(transition_count) * (start + end) / 2.0
}

/// Segments holding more than `threshold` of a histogram's mass
pub fn time_of_day_pattern(hours: &[u32; 24], threshold: f64) -> Vec<TimeSegment> {
    let total: u32 = hours.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    TimeSegment::ALL
        .into_iter()
        .filter(|segment| {
            let in_segment: u32 = (0..24u32)
                .filter(|h| segment.contains_hour(*h))
                .map(|h| hours[h as usize])
                .sum();
            f64::from(in_segment) / f64::from(total) > threshold
        })
        .collect()
}

/// Detects feature-to-feature transitions and ranks them as corridors
#[derive(Debug, Clone)]
pub struct CorridorMiner {
    config: PredictionConfig,
    utc_offset: FixedOffset,
}

impl CorridorMiner {
    pub fn new(config: PredictionConfig) -> Self {
        Self {
            config,
            utc_offset: Utc.fix(),
        }
    }

    /// Bucket hours in the property's local time instead of UTC
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// Nearest feature within the proximity threshold
    pub fn nearest_feature(&self, sighting: &Sighting, features: &[PropertyFeature]) -> Option<Uuid> {
        features
            .iter()
            .filter_map(|feature| {
                distance_to_feature(&sighting.location, &feature.geometry).map(|d| (d, feature.id))
            })
            .filter(|(distance, _)| *distance <= self.config.feature_proximity_meters)
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Fill in `feature_id` on every sighting
    pub fn associate_features(&self, sightings: &mut [Sighting], features: &[PropertyFeature]) {
        for sighting in sightings.iter_mut() {
            sighting.feature_id = self.nearest_feature(sighting, features);
        }
    }

    /// Mine corridors from sightings that already carry their feature association.
    ///
    /// `weights` holds effective feature weights (season-scoped when the caller
    /// has a season); features missing from it fall back to their
    /// classification default.
    pub fn mine(
        &self,
        sightings: &[Sighting],
        features: &[PropertyFeature],
        weights: &HashMap<Uuid, f64>,
    ) -> CorridorMiningResult {
        let mut associated: Vec<(&Sighting, Uuid)> = sightings
            .iter()
            .filter_map(|s| s.feature_id.map(|id| (s, id)))
            .collect();
        associated.sort_by(|a, b| {
            a.0.timestamp
                .cmp(&b.0.timestamp)
                .then_with(|| a.0.camera_id.cmp(&b.0.camera_id))
        });

        let max_gap = chrono::Duration::minutes(i64::from(self.config.corridor_time_window_minutes));
        let mut pairs: HashMap<(Uuid, Uuid), PairStats> = HashMap::new();

        for window in associated.windows(2) {
            let (a, a_feature) = window[0];
            let (b, b_feature) = window[1];

            if a_feature == b_feature {
                continue;
            }
            if b.timestamp - a.timestamp > max_gap {
                continue;
            }
            if haversine_meters(&a.location, &b.location) > self.config.corridor_max_distance_meters {
                continue;
            }

            let key = if a_feature < b_feature {
                (a_feature, b_feature)
            } else {
                (b_feature, a_feature)
            };
            let stats = pairs
                .entry(key)
                .or_insert_with(|| PairStats::new(a_feature, b_feature));
            if stats.start == a_feature {
                stats.forward += 1;
            } else {
                stats.reverse += 1;
            }
            let hour = b.timestamp.with_timezone(&self.utc_offset).hour();
            stats.hours[hour as usize] += 1;
        }

        let features_by_id: HashMap<Uuid, &PropertyFeature> =
            features.iter().map(|f| (f.id, f)).collect();
        let weight_of = |id: Uuid| -> f64 {
            weights.get(&id).copied().unwrap_or_else(|| {
                features_by_id
                    .get(&id)
                    .map(|f| f.weight_override.unwrap_or_else(|| f.classification.default_weight()))
                    .unwrap_or(0.0)
            })
        };
        let name_of = |id: Uuid| -> String {
            features_by_id
                .get(&id)
                .map(|f| f.display_name())
                .unwrap_or_else(|| "Unknown feature".to_string())
        };

        let mut corridors: Vec<MovementCorridor> = pairs
            .into_values()
            .filter(|stats| stats.total() > 0)
            .map(|stats| {
                let start_weight = weight_of(stats.start);
                let end_weight = weight_of(stats.end);
                let transition_count = stats.total();
                MovementCorridor {
                    start_feature_id: stats.start,
                    end_feature_id: stats.end,
                    start_feature_name: name_of(stats.start),
                    end_feature_name: name_of(stats.end),
                    transition_count,
                    forward_count: stats.forward,
                    reverse_count: stats.reverse,
                    start_weight,
                    end_weight,
                    corridor_score: corridor_score(
                        transition_count,
                        start_weight,
                        end_weight,
                        self.config.amplify_feature_weights,
                    ),
                    time_of_day_pattern: time_of_day_pattern(
                        &stats.hours,
                        self.config.pattern_share_threshold,
                    ),
                    hour_histogram: stats.hours.to_vec(),
                }
            })
            .collect();

        corridors.sort_by(|a, b| {
            b.corridor_score
                .total_cmp(&a.corridor_score)
                .then_with(|| b.transition_count.cmp(&a.transition_count))
                .then_with(|| a.start_feature_id.cmp(&b.start_feature_id))
                .then_with(|| a.end_feature_id.cmp(&b.end_feature_id))
        });

        let total_transitions: u32 = corridors.iter().map(|c| c.transition_count).sum();
        tracing::debug!(
            associated = associated.len(),
            corridors = corridors.len(),
            total_transitions,
            "Mined movement corridors"
        );

        CorridorMiningResult {
            corridors,
            total_transitions,
        }
    }
}
