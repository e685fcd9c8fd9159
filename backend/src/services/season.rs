//! Season resolution: which calendar months belong to a season on a property

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use shared::{validate_months, Season, SeasonOverride, SeasonOverrideListing};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Season resolver over a snapshot of per-property overrides.
///
/// Overrides are layered over the static defaults on `Season`; an unknown
/// property simply resolves to the defaults.
#[derive(Debug, Clone, Default)]
pub struct SeasonService {
    overrides: HashMap<(Uuid, Season), SeasonOverride>,
}

impl SeasonService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows loaded by the storage layer. Later rows for the same
    /// (property, season) replace earlier ones.
    pub fn from_overrides(overrides: impl IntoIterator<Item = SeasonOverride>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|o| ((o.property_id, o.season), o))
            .collect();
        Self { overrides }
    }

    fn custom_months(&self, season: Season, property_id: Option<Uuid>) -> Option<&[u32]> {
        property_id
            .and_then(|id| self.overrides.get(&(id, season)))
            .map(|o| o.months.as_slice())
            .filter(|months| !months.is_empty())
    }

    /// Effective months of `season` on a property
    pub fn months_for_property(&self, season: Season, property_id: Option<Uuid>) -> Vec<u32> {
        self.custom_months(season, property_id)
            .unwrap_or_else(|| season.default_months())
            .to_vec()
    }

    /// Every season whose effective months contain `date`'s month, ascending by ordinal
    pub fn active_seasons(&self, date: NaiveDate, property_id: Option<Uuid>) -> Vec<Season> {
        let month = date.month();
        Season::ALL
            .into_iter()
            .filter(|season| self.months_for_property(*season, property_id).contains(&month))
            .collect()
    }

    /// Lowest-ordinal active season, if any
    pub fn primary_season(&self, date: NaiveDate, property_id: Option<Uuid>) -> Option<Season> {
        self.active_seasons(date, property_id).into_iter().next()
    }

    /// Create or replace a property's custom months for a season
    pub fn set_override(
        &mut self,
        property_id: Uuid,
        season: Season,
        months: Vec<u32>,
    ) -> AppResult<SeasonOverride> {
        validate_months(&months).map_err(|e| {
            AppError::validation("months", format!("{} for {}", e, season.display_name()))
        })?;

        let mut months = months;
        months.sort_unstable();
        months.dedup();

        let row = SeasonOverride {
            property_id,
            season,
            months,
            updated_at: Utc::now(),
        };
        self.overrides.insert((property_id, season), row.clone());

        tracing::debug!(%property_id, season = season.as_str(), months = ?row.months, "Season override saved");
        Ok(row)
    }

    /// Drop a property's override for a season; returns whether one existed
    pub fn remove_override(&mut self, property_id: Uuid, season: Season) -> bool {
        self.overrides.remove(&(property_id, season)).is_some()
    }

    /// Stored override rows of a property, ascending by season ordinal
    pub fn overrides_for_property(&self, property_id: Uuid) -> Vec<SeasonOverride> {
        let mut rows: Vec<SeasonOverride> = self
            .overrides
            .values()
            .filter(|o| o.property_id == property_id)
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.season);
        rows
    }

    /// One row per season for the property's season settings screen
    pub fn list_overrides(&self, property_id: Uuid) -> Vec<SeasonOverrideListing> {
        Season::ALL
            .into_iter()
            .map(|season| {
                let custom = self.custom_months(season, Some(property_id));
                SeasonOverrideListing {
                    season,
                    display_name: season.display_name().to_string(),
                    default_months: season.default_months().to_vec(),
                    custom_months: custom.map(|m| m.to_vec()),
                    is_overridden: custom.is_some(),
                }
            })
            .collect()
    }
}
