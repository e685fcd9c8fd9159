//! Property feature and feature weight models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClassificationType, FeatureCategory, Season};
use crate::types::GpsCoordinates;

/// Shape of a mapped feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureGeometry {
    Point { coordinates: GpsCoordinates },
    /// Exterior ring; closing the ring is optional
    Polygon { ring: Vec<GpsCoordinates> },
}

/// A terrain or resource feature mapped on a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFeature {
    pub id: Uuid,
    pub property_id: Uuid,
    pub classification: ClassificationType,
    pub geometry: FeatureGeometry,
    pub name: Option<String>,
    pub notes: Option<String>,
    /// Per-feature weight; outranks every property-level layer
    pub weight_override: Option<f64>,
}

impl PropertyFeature {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.classification.display_name().to_string())
    }
}

/// Per-property weight row for one classification type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeight {
    pub property_id: Uuid,
    pub classification: ClassificationType,
    pub default_weight: f64,
    pub user_weight: Option<f64>,
    pub seasonal_weights: Option<BTreeMap<Season, f64>>,
    pub is_custom: bool,
    pub updated_at: DateTime<Utc>,
}

impl FeatureWeight {
    /// Fresh row carrying only the system default
    pub fn with_defaults(property_id: Uuid, classification: ClassificationType) -> Self {
        Self {
            property_id,
            classification,
            default_weight: classification.default_weight(),
            user_weight: None,
            seasonal_weights: None,
            is_custom: false,
            updated_at: Utc::now(),
        }
    }

    pub fn seasonal_weight(&self, season: Season) -> Option<f64> {
        self.seasonal_weights
            .as_ref()
            .and_then(|weights| weights.get(&season).copied())
    }

    /// True iff a user weight or at least one seasonal weight is set
    pub fn has_custom_values(&self) -> bool {
        self.user_weight.is_some()
            || self
                .seasonal_weights
                .as_ref()
                .is_some_and(|weights| !weights.is_empty())
    }
}

/// Resolved weight row as shown to property owners
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeightListing {
    pub classification: ClassificationType,
    pub category: FeatureCategory,
    pub display_name: String,
    pub icon_color: String,
    pub default_weight: f64,
    pub user_weight: Option<f64>,
    pub seasonal_weights: BTreeMap<Season, f64>,
    pub effective_weight: f64,
    pub is_custom: bool,
    pub feature_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_row_is_not_custom() {
        let row = FeatureWeight::with_defaults(Uuid::new_v4(), ClassificationType::Funnel);
        assert_eq!(row.default_weight, 0.9);
        assert!(!row.is_custom);
        assert!(!row.has_custom_values());
    }

    #[test]
    fn test_empty_seasonal_map_is_not_custom() {
        let mut row = FeatureWeight::with_defaults(Uuid::new_v4(), ClassificationType::Pond);
        row.seasonal_weights = Some(BTreeMap::new());
        assert!(!row.has_custom_values());

        row.seasonal_weights = Some(BTreeMap::from([(Season::Rut, 0.3)]));
        assert!(row.has_custom_values());
        assert_eq!(row.seasonal_weight(Season::Rut), Some(0.3));
        assert_eq!(row.seasonal_weight(Season::PreRut), None);
    }

    #[test]
    fn test_geometry_is_tagged() {
        let geometry = FeatureGeometry::Point {
            coordinates: GpsCoordinates::new(38.5, -90.2),
        };
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "point");
    }

    #[test]
    fn test_display_name_falls_back_to_classification() {
        let feature = PropertyFeature {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            classification: ClassificationType::OakFlat,
            geometry: FeatureGeometry::Point {
                coordinates: GpsCoordinates::new(38.5, -90.2),
            },
            name: None,
            notes: None,
            weight_override: None,
        };
        assert_eq!(feature.display_name(), "Oak Flat");
    }
}
