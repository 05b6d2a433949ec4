use super::entity::MovieLocationTrend;
use crate::domain::{DomainError, DomainResult};

/// Validates all MovieLocationTrend invariants
pub fn validate_trend(trend: &MovieLocationTrend) -> DomainResult<()> {
    validate_location_fields(trend)?;
    validate_coordinates(trend)?;
    Ok(())
}

/// Location field invariants:
/// 1. city/state/country are never blank - missing source fields must have
///    been replaced by the sentinel before the row was built
fn validate_location_fields(trend: &MovieLocationTrend) -> DomainResult<()> {
    for (name, value) in [
        ("city", &trend.city),
        ("state", &trend.state),
        ("country", &trend.country),
    ] {
        if value.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "trend {} must not be blank",
                name
            )));
        }
    }
    Ok(())
}

fn validate_coordinates(trend: &MovieLocationTrend) -> DomainResult<()> {
    if !(-90.0..=90.0).contains(&trend.latitude) {
        return Err(DomainError::CoordinateOutOfRange {
            axis: "latitude",
            value: trend.latitude,
        });
    }
    if !(-180.0..=180.0).contains(&trend.longitude) {
        return Err(DomainError::CoordinateOutOfRange {
            axis: "longitude",
            value: trend.longitude,
        });
    }
    Ok(())
}

/// Critical Trend Invariants:
///
/// 1. Identity is (movie_id, city, state, country) - never the date
/// 2. purchase_count is non-negative (enforced by u32) and only increases
/// 3. Coordinates are last-seen values, overwritten on merge
/// 4. `date` is set at creation and never bumped by a merge
/// 5. Rows are never deleted by the aggregation engine
