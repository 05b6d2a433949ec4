use uuid::Uuid;

use crate::domain::order::OrderLocation;

/// Sentinel substituted for missing city/state/country
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Canonical grouping key for trend accumulation and store lookup.
///
/// Two items for the same movie and the same (possibly sentinel-filled)
/// location must resolve to an identical key. Matching is case-sensitive;
/// the only normalization is the sentinel fill for blank fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrendKey {
    pub movie_id: Uuid,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl TrendKey {
    /// Resolve the key for one purchased item: the movie identity plus the
    /// order's place names, with blanks replaced by `UNKNOWN_LOCATION`.
    pub fn resolve(movie_id: Uuid, location: &OrderLocation) -> Self {
        Self {
            movie_id,
            city: fill_blank(location.city.as_deref()),
            state: fill_blank(location.state.as_deref()),
            country: fill_blank(location.country.as_deref()),
        }
    }
}

fn fill_blank(field: Option<&str>) -> String {
    match field {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => UNKNOWN_LOCATION.to_string(),
    }
}

impl std::fmt::Display for TrendKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {}, {}, {}",
            self.movie_id, self.city, self.state, self.country
        )
    }
}
