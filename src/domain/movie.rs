// src/domain/movie.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie in the store catalog.
///
/// The catalog itself (images, ratings, reviews) belongs to the storefront;
/// the aggregation engine only needs identity, display name and the current
/// price shown on exported markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Current list price in integer currency units
    pub price: i64,

    /// Free-form description
    pub description: String,
}

impl Movie {
    /// Create a new Movie entity
    pub fn new(name: String, price: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            description: String::new(),
        }
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}
