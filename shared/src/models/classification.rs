//! Property feature classification types

use serde::{Deserialize, Serialize};

/// Broad grouping of classification types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Topographical,
    Food,
    Water,
    BeddingCover,
    Other,
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureCategory::Topographical => write!(f, "Topographical"),
            FeatureCategory::Food => write!(f, "Food"),
            FeatureCategory::Water => write!(f, "Water"),
            FeatureCategory::BeddingCover => write!(f, "Bedding / Cover"),
            FeatureCategory::Other => write!(f, "Other"),
        }
    }
}

/// Classification of a mapped property feature
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationType {
    // Topographical
    Ridge,
    Saddle,
    Funnel,
    PinchPoint,
    Bench,
    Draw,
    CreekCrossing,
    FenceCrossing,
    TravelCorridor,
    // Food
    FoodPlot,
    OakFlat,
    AgField,
    Orchard,
    Browse,
    // Water
    Pond,
    Creek,
    WaterHole,
    // Bedding / cover
    BeddingArea,
    Thicket,
    Clearcut,
    CedarStand,
    // Anything else
    Other,
}

impl ClassificationType {
    pub const ALL: [ClassificationType; 22] = [
        ClassificationType::Ridge,
        ClassificationType::Saddle,
        ClassificationType::Funnel,
        ClassificationType::PinchPoint,
        ClassificationType::Bench,
        ClassificationType::Draw,
        ClassificationType::CreekCrossing,
        ClassificationType::FenceCrossing,
        ClassificationType::TravelCorridor,
        ClassificationType::FoodPlot,
        ClassificationType::OakFlat,
        ClassificationType::AgField,
        ClassificationType::Orchard,
        ClassificationType::Browse,
        ClassificationType::Pond,
        ClassificationType::Creek,
        ClassificationType::WaterHole,
        ClassificationType::BeddingArea,
        ClassificationType::Thicket,
        ClassificationType::Clearcut,
        ClassificationType::CedarStand,
        ClassificationType::Other,
    ];

    pub fn category(&self) -> FeatureCategory {
        use ClassificationType::*;
        match self {
            Ridge | Saddle | Funnel | PinchPoint | Bench | Draw | CreekCrossing
            | FenceCrossing | TravelCorridor => FeatureCategory::Topographical,
            FoodPlot | OakFlat | AgField | Orchard | Browse => FeatureCategory::Food,
            Pond | Creek | WaterHole => FeatureCategory::Water,
            BeddingArea | Thicket | Clearcut | CedarStand => FeatureCategory::BeddingCover,
            Other => FeatureCategory::Other,
        }
    }

    /// System default influence weight in [0, 1]
    pub fn default_weight(&self) -> f64 {
        use ClassificationType::*;
        match self {
            Ridge => 0.6,
            Saddle => 0.8,
            Funnel => 0.9,
            PinchPoint => 0.85,
            Bench => 0.6,
            Draw => 0.6,
            CreekCrossing => 0.8,
            FenceCrossing => 0.7,
            TravelCorridor => 0.75,
            FoodPlot => 0.8,
            OakFlat => 0.85,
            AgField => 0.7,
            Orchard => 0.65,
            Browse => 0.6,
            Pond => 0.6,
            Creek => 0.55,
            WaterHole => 0.65,
            BeddingArea => 0.9,
            Thicket => 0.75,
            Clearcut => 0.7,
            CedarStand => 0.65,
            Other => 0.5,
        }
    }

    /// Whether deer pass through this kind of feature on the way somewhere
    /// else, as opposed to feeding, drinking or bedding in it.
    pub fn is_transit(&self) -> bool {
        use ClassificationType::*;
        matches!(
            self,
            Saddle | Funnel | PinchPoint | Bench | Draw | CreekCrossing | FenceCrossing
                | TravelCorridor
        )
    }

    /// Whether a per-property weight row is kept for this type
    pub fn has_weight_row(&self) -> bool {
        *self != ClassificationType::Other
    }

    pub fn display_name(&self) -> &'static str {
        use ClassificationType::*;
        match self {
            Ridge => "Ridge",
            Saddle => "Saddle",
            Funnel => "Funnel",
            PinchPoint => "Pinch Point",
            Bench => "Bench",
            Draw => "Draw",
            CreekCrossing => "Creek Crossing",
            FenceCrossing => "Fence Crossing",
            TravelCorridor => "Travel Corridor",
            FoodPlot => "Food Plot",
            OakFlat => "Oak Flat",
            AgField => "Agricultural Field",
            Orchard => "Orchard",
            Browse => "Browse",
            Pond => "Pond",
            Creek => "Creek",
            WaterHole => "Water Hole",
            BeddingArea => "Bedding Area",
            Thicket => "Thicket",
            Clearcut => "Clearcut",
            CedarStand => "Cedar Stand",
            Other => "Other",
        }
    }

    /// Map marker color
    pub fn icon_color(&self) -> &'static str {
        match self.category() {
            FeatureCategory::Topographical => "#8B5A2B",
            FeatureCategory::Food => "#4CAF50",
            FeatureCategory::Water => "#2196F3",
            FeatureCategory::BeddingCover => "#795548",
            FeatureCategory::Other => "#9E9E9E",
        }
    }
}

impl std::fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
