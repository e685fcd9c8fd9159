//! Time segment prediction models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MovementCorridor, Season, Sighting};

/// Fixed daily time bucket. Together the six cover all 24 hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TimeSegment {
    EarlyMorning,
    Morning,
    Midday,
    Afternoon,
    Evening,
    /// Wraps midnight: [20, 24) and [0, 5)
    Night,
}

impl TimeSegment {
    pub const ALL: [TimeSegment; 6] = [
        TimeSegment::EarlyMorning,
        TimeSegment::Morning,
        TimeSegment::Midday,
        TimeSegment::Afternoon,
        TimeSegment::Evening,
        TimeSegment::Night,
    ];

    /// First hour of the segment (inclusive)
    pub fn start_hour(&self) -> u32 {
        match self {
            TimeSegment::EarlyMorning => 5,
            TimeSegment::Morning => 8,
            TimeSegment::Midday => 11,
            TimeSegment::Afternoon => 14,
            TimeSegment::Evening => 17,
            TimeSegment::Night => 20,
        }
    }

    /// Hour the segment ends (exclusive)
    pub fn end_hour(&self) -> u32 {
        match self {
            TimeSegment::EarlyMorning => 8,
            TimeSegment::Morning => 11,
            TimeSegment::Midday => 14,
            TimeSegment::Afternoon => 17,
            TimeSegment::Evening => 20,
            TimeSegment::Night => 5,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        match self {
            TimeSegment::Night => hour >= 20 || hour < 5,
            _ => hour >= self.start_hour() && hour < self.end_hour(),
        }
    }

    pub fn for_hour(hour: u32) -> TimeSegment {
        TimeSegment::ALL
            .into_iter()
            .find(|segment| segment.contains_hour(hour))
            .unwrap_or(TimeSegment::Night)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeSegment::EarlyMorning => "Early Morning",
            TimeSegment::Morning => "Morning",
            TimeSegment::Midday => "Midday",
            TimeSegment::Afternoon => "Afternoon",
            TimeSegment::Evening => "Evening",
            TimeSegment::Night => "Night",
        }
    }

    /// Human readable hour range, e.g. "05:00 - 08:00"
    pub fn hour_range(&self) -> String {
        format!("{:02}:00 - {:02}:00", self.start_hour(), self.end_hour())
    }
}

impl std::fmt::Display for TimeSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Sightings recorded by one camera inside a segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraActivity {
    pub camera_id: Uuid,
    pub sighting_count: usize,
}

/// Prediction for one time segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSegmentPrediction {
    pub segment: TimeSegment,
    pub name: String,
    pub hour_range: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub sighting_count: usize,
    pub corridors: Vec<MovementCorridor>,
    /// 0-100, one decimal place
    pub confidence_score: Decimal,
    pub top_cameras: Vec<CameraActivity>,
}

impl TimeSegmentPrediction {
    pub fn activity_score(&self) -> usize {
        self.sighting_count + self.corridors.len()
    }
}

/// Full prediction for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyPrediction {
    pub property_id: Uuid,
    pub season: Option<Season>,
    pub segments: Vec<TimeSegmentPrediction>,
    pub default_segment_index: usize,
    pub corridors: Vec<MovementCorridor>,
    pub sightings: Vec<Sighting>,
    pub total_sightings: usize,
    pub total_transitions: u32,
    pub insufficient_data: bool,
    pub generated_at: DateTime<Utc>,
}

impl PropertyPrediction {
    pub fn default_segment(&self) -> Option<&TimeSegmentPrediction> {
        self.segments.get(self.default_segment_index)
    }
}
