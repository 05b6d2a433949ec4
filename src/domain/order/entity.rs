use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed purchase.
///
/// Orders are written by the storefront at checkout; the location is filled
/// in afterwards by a separate update once the buyer's geolocation is known,
/// so an order may carry no location at item-creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Owning user (the account system is out of scope; this is opaque)
    pub user_id: Uuid,

    /// Order total in integer currency units
    pub total: i64,

    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,

    /// Geographic origin of the purchase, if known.
    /// Present iff both latitude and longitude are known.
    pub location: Option<OrderLocation>,
}

/// Where an order was placed.
///
/// Coordinates are mandatory; the place-name fields are whatever the
/// geocoder returned and may each be missing independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// One purchased line item: quantity of a single movie within one order.
///
/// Items are immutable after creation; `price` is the unit price captured at
/// purchase time, independent of the movie's current list price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Unit price at purchase time, integer currency units
    pub price: i64,

    /// Number of copies purchased (always positive)
    pub quantity: u32,

    /// Owning order
    pub order_id: Uuid,

    /// Purchased movie
    pub movie_id: Uuid,
}

impl Order {
    /// Create a new Order entity without location data
    pub fn new(user_id: Uuid, total: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            total,
            created_at: Utc::now(),
            location: None,
        }
    }

    /// Attach location data after creation (the post-checkout update call)
    pub fn set_location(&mut self, location: OrderLocation) {
        self.location = Some(location);
    }
}

impl Item {
    /// Create a new Item entity
    pub fn new(order_id: Uuid, movie_id: Uuid, price: i64, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            price,
            quantity,
            order_id,
            movie_id,
        }
    }
}
