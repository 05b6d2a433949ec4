use super::entity::{Item, Order};
use crate::domain::{DomainError, DomainResult};

/// Validates all Order invariants
pub fn validate_order(order: &Order) -> DomainResult<()> {
    if let Some(location) = &order.location {
        validate_coordinates(location.latitude, location.longitude)?;
    }
    Ok(())
}

/// Validates all Item invariants
pub fn validate_item(item: &Item) -> DomainResult<()> {
    if item.quantity == 0 {
        return Err(DomainError::ZeroQuantity);
    }
    Ok(())
}

/// Coordinate invariants (WGS84):
/// 1. Latitude within [-90, 90]
/// 2. Longitude within [-180, 180]
/// 3. Latitude and longitude always travel together (enforced by the
///    `Option<OrderLocation>` shape - there is no half-located order)
fn validate_coordinates(latitude: f64, longitude: f64) -> DomainResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::CoordinateOutOfRange {
            axis: "latitude",
            value: latitude,
        });
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::CoordinateOutOfRange {
            axis: "longitude",
            value: longitude,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderLocation;
    use uuid::Uuid;

    fn located_order(latitude: f64, longitude: f64) -> Order {
        let mut order = Order::new(Uuid::new_v4(), 3000);
        order.set_location(OrderLocation {
            latitude,
            longitude,
            city: Some("Los Angeles".to_string()),
            state: Some("CA".to_string()),
            country: Some("USA".to_string()),
        });
        order
    }

    #[test]
    fn test_order_without_location_is_valid() {
        let order = Order::new(Uuid::new_v4(), 3000);
        assert!(validate_order(&order).is_ok());
    }

    #[test]
    fn test_order_with_valid_coordinates() {
        let order = located_order(34.052235, -118.243683);
        assert!(validate_order(&order).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range_fails() {
        let order = located_order(91.0, 0.0);
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn test_longitude_out_of_range_fails() {
        let order = located_order(0.0, -180.5);
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn test_item_with_positive_quantity() {
        let item = Item::new(Uuid::new_v4(), Uuid::new_v4(), 1500, 3);
        assert!(validate_item(&item).is_ok());
    }

    #[test]
    fn test_item_with_zero_quantity_fails() {
        let item = Item::new(Uuid::new_v4(), Uuid::new_v4(), 1500, 0);
        assert!(validate_item(&item).is_err());
    }
}
