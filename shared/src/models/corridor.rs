//! Movement corridor models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TimeSegment;

/// Repeated movement between two distinct features.
///
/// Corridors are undirected; `start_feature_id` is the origin of the first
/// transition observed, and the directional split is kept in
/// `forward_count` / `reverse_count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementCorridor {
    pub start_feature_id: Uuid,
    pub end_feature_id: Uuid,
    pub start_feature_name: String,
    pub end_feature_name: String,
    pub transition_count: u32,
    pub forward_count: u32,
    pub reverse_count: u32,
    pub start_weight: f64,
    pub end_weight: f64,
    pub corridor_score: f64,
    pub time_of_day_pattern: Vec<TimeSegment>,
    /// Transition arrivals per local hour (24 buckets)
    pub hour_histogram: Vec<u32>,
}

impl MovementCorridor {
    pub fn connects(&self, a: Uuid, b: Uuid) -> bool {
        (self.start_feature_id == a && self.end_feature_id == b)
            || (self.start_feature_id == b && self.end_feature_id == a)
    }

    pub fn has_pattern(&self, segment: TimeSegment) -> bool {
        self.time_of_day_pattern.contains(&segment)
    }
}
