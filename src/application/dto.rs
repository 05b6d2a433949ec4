// src/application/dto.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are serialization-friendly shapes for downstream consumers
// - DTOs NEVER leak domain invariants
// - Conversion FROM domain data only (never TO)

use serde::{Deserialize, Serialize};

use crate::repositories::TrendWithMovie;

/// The payload the trend endpoint hands to the map front end: every
/// persisted trend row, no windowing. The HTTP layer serving this is out
/// of scope; it serializes this structure verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFeed {
    pub results: Vec<TrendFeedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFeedEntry {
    pub movie: String,
    pub purchase_count: u32,
    pub location: TrendFeedLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFeedLocation {
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

impl TrendFeed {
    pub fn from_rows(rows: &[TrendWithMovie]) -> Self {
        Self {
            results: rows
                .iter()
                .map(|row| TrendFeedEntry {
                    movie: row.movie_name.clone(),
                    purchase_count: row.trend.purchase_count,
                    location: TrendFeedLocation {
                        city: row.trend.city.clone(),
                        state: row.trend.state.clone(),
                        country: row.trend.country.clone(),
                        lat: row.trend.latitude,
                        lng: row.trend.longitude,
                    },
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trend::{MovieLocationTrend, TrendKey};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn row() -> TrendWithMovie {
        let key = TrendKey {
            movie_id: Uuid::new_v4(),
            city: "Los Angeles".to_string(),
            state: "CA".to_string(),
            country: "USA".to_string(),
        };
        TrendWithMovie {
            trend: MovieLocationTrend::new(
                key,
                34.05,
                -118.24,
                6,
                NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            ),
            movie_name: "Inception".to_string(),
            movie_price: 1500,
        }
    }

    #[test]
    fn test_feed_shape_matches_endpoint_contract() {
        let feed = TrendFeed::from_rows(&[row()]);
        let json = serde_json::to_value(&feed).unwrap();

        assert_eq!(json["results"][0]["movie"], "Inception");
        assert_eq!(json["results"][0]["purchase_count"], 6);
        assert_eq!(json["results"][0]["location"]["city"], "Los Angeles");
        assert_eq!(json["results"][0]["location"]["lat"], 34.05);
        assert_eq!(json["results"][0]["location"]["lng"], -118.24);
    }

    #[test]
    fn test_empty_store_produces_empty_results() {
        let feed = TrendFeed::from_rows(&[]);
        assert!(feed.results.is_empty());
    }
}
