use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::key::TrendKey;

/// A persisted (movie, location) popularity counter.
///
/// Trends are derived data - they can always be rebuilt from orders and are
/// never a source of truth. Identity is the (movie, city, state, country)
/// four-tuple; `date` records the aggregation run that created the row and
/// is NOT part of the identity (merges leave it untouched).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieLocationTrend {
    /// Row identifier
    pub id: Uuid,

    /// Movie this trend counts purchases for
    pub movie_id: Uuid,

    /// Resolved city (sentinel-filled, never empty)
    pub city: String,

    /// Resolved state (sentinel-filled, never empty)
    pub state: String,

    /// Resolved country (sentinel-filled, never empty)
    pub country: String,

    /// Last-seen marker coordinates (overwritten on merge, not averaged)
    pub latitude: f64,
    pub longitude: f64,

    /// Running purchase total; only ever increases
    pub purchase_count: u32,

    /// Date of the aggregation run that created this row
    pub date: NaiveDate,
}

impl MovieLocationTrend {
    /// Create a fresh trend row for a key first observed in this run
    pub fn new(
        key: TrendKey,
        latitude: f64,
        longitude: f64,
        purchase_count: u32,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id: key.movie_id,
            city: key.city,
            state: key.state,
            country: key.country,
            latitude,
            longitude,
            purchase_count,
            date,
        }
    }

    /// The grouping key this row is stored under
    pub fn key(&self) -> TrendKey {
        TrendKey {
            movie_id: self.movie_id,
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}
