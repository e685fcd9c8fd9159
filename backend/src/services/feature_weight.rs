//! Feature weight resolution and per-property weight customization
//!
//! Weights resolve through a fixed priority chain:
//! per-feature override > seasonal weight > user weight > row default > system default.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use shared::{
    validate_seasonal_weights, validate_weight, ClassificationType, FeatureWeight,
    FeatureWeightListing, PropertyFeature, Season,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Feature weight resolver over a snapshot of property weight rows
#[derive(Debug, Clone, Default)]
pub struct FeatureWeightService {
    rows: HashMap<(Uuid, ClassificationType), FeatureWeight>,
}

/// Proposed edit to one layer of a weight row
#[derive(Debug, Clone, PartialEq)]
enum WeightEdit {
    User(Option<f64>),
    Seasonal(Option<BTreeMap<Season, f64>>),
    Reset,
}

impl FeatureWeightService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows loaded by the storage layer. Stored custom flags are
    /// recomputed from the values and empty seasonal maps become `None`.
    pub fn from_rows(rows: impl IntoIterator<Item = FeatureWeight>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.seasonal_weights.as_ref().is_some_and(|w| w.is_empty()) {
                    row.seasonal_weights = None;
                }
                row.is_custom = row.has_custom_values();
                ((row.property_id, row.classification), row)
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, property_id: Uuid, classification: ClassificationType) -> Option<&FeatureWeight> {
        self.rows.get(&(property_id, classification))
    }

    /// Rows of a property in classification order
    pub fn rows_for_property(&self, property_id: Uuid) -> Vec<FeatureWeight> {
        let mut rows: Vec<FeatureWeight> = self
            .rows
            .values()
            .filter(|row| row.property_id == property_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.classification);
        rows
    }

    /// Weight of `classification` on a property, ignoring per-feature overrides
    pub fn classification_weight(
        &self,
        property_id: Uuid,
        classification: ClassificationType,
        season: Option<Season>,
    ) -> f64 {
        match self.row(property_id, classification) {
            Some(row) => season
                .and_then(|s| row.seasonal_weight(s))
                .or(row.user_weight)
                .unwrap_or(row.default_weight),
            None => classification.default_weight(),
        }
    }

    /// Final weight of one feature
    pub fn effective_weight(&self, feature: &PropertyFeature, season: Option<Season>) -> f64 {
        if let Some(weight) = feature.weight_override {
            return weight;
        }
        self.classification_weight(feature.property_id, feature.classification, season)
    }

    /// Bulk form of `effective_weight` keyed by feature id
    pub fn all_effective_weights(
        &self,
        features: &[PropertyFeature],
        season: Option<Season>,
    ) -> HashMap<Uuid, f64> {
        features
            .iter()
            .map(|feature| (feature.id, self.effective_weight(feature, season)))
            .collect()
    }

    /// Insert default rows for every weighted classification the property is
    /// missing. Returns only the rows that were inserted.
    pub fn materialize(&mut self, property_id: Uuid) -> Vec<FeatureWeight> {
        let mut inserted = Vec::new();
        for classification in ClassificationType::ALL.into_iter().filter(|c| c.has_weight_row()) {
            self.rows
                .entry((property_id, classification))
                .or_insert_with(|| {
                    let row = FeatureWeight::with_defaults(property_id, classification);
                    inserted.push(row.clone());
                    row
                });
        }

        if !inserted.is_empty() {
            tracing::debug!(%property_id, inserted = inserted.len(), "Materialized feature weights");
        }
        inserted
    }

    /// Set or clear the user weight layer
    pub fn update_user_weight(
        &mut self,
        property_id: Uuid,
        classification: ClassificationType,
        user_weight: Option<f64>,
    ) -> AppResult<FeatureWeight> {
        if let Some(weight) = user_weight {
            validate_weight(weight).map_err(|e| {
                AppError::validation(
                    "user_weight",
                    format!("{} for {}", e, classification.display_name()),
                )
            })?;
        }
        self.apply(property_id, classification, WeightEdit::User(user_weight))
    }

    /// Set or clear the seasonal weight layer. An empty map clears it.
    pub fn update_seasonal_weights(
        &mut self,
        property_id: Uuid,
        classification: ClassificationType,
        seasonal_weights: Option<BTreeMap<Season, f64>>,
    ) -> AppResult<FeatureWeight> {
        if let Some(weights) = &seasonal_weights {
            validate_seasonal_weights(weights).map_err(|(season, e)| {
                AppError::validation(
                    format!("seasonal_weights.{}", season.as_str()),
                    format!(
                        "{} for {} in {}",
                        e,
                        classification.display_name(),
                        season.display_name()
                    ),
                )
            })?;
        }
        let seasonal_weights = seasonal_weights.filter(|weights| !weights.is_empty());
        self.apply(property_id, classification, WeightEdit::Seasonal(seasonal_weights))
    }

    /// Clear the user and seasonal layers
    pub fn reset_to_default(
        &mut self,
        property_id: Uuid,
        classification: ClassificationType,
    ) -> AppResult<FeatureWeight> {
        self.apply(property_id, classification, WeightEdit::Reset)
    }

    fn apply(
        &mut self,
        property_id: Uuid,
        classification: ClassificationType,
        edit: WeightEdit,
    ) -> AppResult<FeatureWeight> {
        if !classification.has_weight_row() {
            return Err(AppError::validation(
                "classification",
                format!("{} has no adjustable weight", classification.display_name()),
            ));
        }

        let current = self
            .rows
            .get_mut(&(property_id, classification))
            .ok_or_else(|| AppError::NotFound("Feature weight".to_string()))?;

        match diff(current, &edit) {
            Some(updated) => {
                tracing::debug!(
                    %property_id,
                    classification = %classification,
                    is_custom = updated.is_custom,
                    "Feature weight updated"
                );
                *current = updated;
            }
            None => {
                tracing::debug!(%property_id, classification = %classification, "Feature weight unchanged");
            }
        }
        Ok(current.clone())
    }

    /// Resolved weights of every weighted classification for the settings screen
    pub fn list_weights(
        &self,
        property_id: Uuid,
        features: &[PropertyFeature],
        season: Option<Season>,
    ) -> Vec<FeatureWeightListing> {
        let mut feature_counts: HashMap<ClassificationType, usize> = HashMap::new();
        for feature in features.iter().filter(|f| f.property_id == property_id) {
            *feature_counts.entry(feature.classification).or_default() += 1;
        }

        ClassificationType::ALL
            .into_iter()
            .filter(|c| c.has_weight_row())
            .map(|classification| {
                let row = self.row(property_id, classification);
                FeatureWeightListing {
                    classification,
                    category: classification.category(),
                    display_name: classification.display_name().to_string(),
                    icon_color: classification.icon_color().to_string(),
                    default_weight: row
                        .map(|r| r.default_weight)
                        .unwrap_or_else(|| classification.default_weight()),
                    user_weight: row.and_then(|r| r.user_weight),
                    seasonal_weights: row
                        .and_then(|r| r.seasonal_weights.clone())
                        .unwrap_or_default(),
                    effective_weight: self.classification_weight(property_id, classification, season),
                    is_custom: row.is_some_and(|r| r.is_custom),
                    feature_count: feature_counts.get(&classification).copied().unwrap_or(0),
                }
            })
            .collect()
    }
}

/// Compare a proposed edit against the stored row. Returns the row to write,
/// or `None` when the edit would not change anything.
fn diff(current: &FeatureWeight, edit: &WeightEdit) -> Option<FeatureWeight> {
    let mut next = current.clone();
    match edit {
        WeightEdit::User(weight) => next.user_weight = *weight,
        WeightEdit::Seasonal(weights) => next.seasonal_weights = weights.clone(),
        WeightEdit::Reset => {
            next.user_weight = None;
            next.seasonal_weights = None;
        }
    }

    let normalized_current = current
        .seasonal_weights
        .as_ref()
        .filter(|weights| !weights.is_empty());
    if next.user_weight == current.user_weight
        && next.seasonal_weights.as_ref() == normalized_current
    {
        return None;
    }

    next.is_custom = next.has_custom_values();
    next.updated_at = Utc::now();
    Some(next)
}
