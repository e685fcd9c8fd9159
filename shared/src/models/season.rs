//! Hunting season models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hunting seasons, declared in ordinal order.
///
/// The ordinal decides priority when several seasons claim the same month:
/// the lower ordinal wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    EarlySeason,
    PreRut,
    Rut,
    PostRut,
    LateSeason,
    /// Catch-all season covering the whole year
    YearRound,
}

impl Season {
    /// All seasons in ascending ordinal order
    pub const ALL: [Season; 6] = [
        Season::EarlySeason,
        Season::PreRut,
        Season::Rut,
        Season::PostRut,
        Season::LateSeason,
        Season::YearRound,
    ];

    pub fn ordinal(&self) -> u8 {
        match self {
            Season::EarlySeason => 0,
            Season::PreRut => 1,
            Season::Rut => 2,
            Season::PostRut => 3,
            Season::LateSeason => 4,
            Season::YearRound => 5,
        }
    }

    /// System default calendar months (1-12)
    pub fn default_months(&self) -> &'static [u32] {
        match self {
            Season::EarlySeason => &[9, 10],
            Season::PreRut => &[10],
            Season::Rut => &[11],
            Season::PostRut => &[12],
            Season::LateSeason => &[1, 2],
            Season::YearRound => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Season::EarlySeason => "Early Season",
            Season::PreRut => "Pre-Rut",
            Season::Rut => "Rut",
            Season::PostRut => "Post-Rut",
            Season::LateSeason => "Late Season",
            Season::YearRound => "Year Round",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::EarlySeason => "early_season",
            Season::PreRut => "pre_rut",
            Season::Rut => "rut",
            Season::PostRut => "post_rut",
            Season::LateSeason => "late_season",
            Season::YearRound => "year_round",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str() == s)
            .ok_or_else(|| format!("Unknown season: {}", s))
    }
}

/// Per-property replacement of a season's calendar months
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonOverride {
    pub property_id: Uuid,
    pub season: Season,
    /// Custom months (1-12); empty means the defaults apply
    pub months: Vec<u32>,
    pub updated_at: DateTime<Utc>,
}

/// Season row as shown to property owners
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonOverrideListing {
    pub season: Season,
    pub display_name: String,
    pub default_months: Vec<u32>,
    pub custom_months: Option<Vec<u32>>,
    pub is_overridden: bool,
}
