// src/repositories/order_repository.rs
//
// Order and item persistence
//
// The windowed query is the aggregation engine's sole read path into orders:
// it returns orders whose creation DATE falls inside the inclusive window
// AND that carry coordinates. Orders without coordinates are filtered here,
// not reported upstream.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::order::{Item, Order, OrderLocation};
use crate::error::{AppError, AppResult};

pub trait OrderRepository: Send + Sync {
    fn save(&self, order: &Order) -> AppResult<()>;
    fn save_item(&self, item: &Item) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;
    /// The post-creation location update call. Fails with NotFound if the
    /// order does not exist.
    fn set_location(&self, order_id: Uuid, location: &OrderLocation) -> AppResult<()>;
    /// Orders created on a date in [start, end] that have coordinates.
    fn orders_with_location_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Order>>;
    fn items_for_order(&self, order_id: Uuid) -> AppResult<Vec<Item>>;
}

pub struct SqliteOrderRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteOrderRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Order - returns rusqlite::Error for query_map compatibility
    fn row_to_order(row: &Row) -> Result<Order, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let user_id_str: String = row.get("user_id")?;
        let user_id = Uuid::parse_str(&user_id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let latitude: Option<f64> = row.get("latitude")?;
        let longitude: Option<f64> = row.get("longitude")?;

        // Coordinates travel together; a row with only one is treated as
        // unlocated.
        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(OrderLocation {
                latitude,
                longitude,
                city: row.get("city")?,
                state: row.get("state")?,
                country: row.get("country")?,
            }),
            _ => None,
        };

        Ok(Order {
            id,
            user_id,
            total: row.get("total")?,
            created_at,
            location,
        })
    }

    fn row_to_item(row: &Row) -> Result<Item, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let order_id_str: String = row.get("order_id")?;
        let order_id = Uuid::parse_str(&order_id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let movie_id_str: String = row.get("movie_id")?;
        let movie_id = Uuid::parse_str(&movie_id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let quantity: i64 = row.get("quantity")?;

        Ok(Item {
            id,
            price: row.get("price")?,
            quantity: quantity as u32,
            order_id,
            movie_id,
        })
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn save(&self, order: &Order) -> AppResult<()> {
        let conn = self.pool.get()?;

        let location = order.location.as_ref();
        conn.execute(
            "INSERT OR REPLACE INTO orders (
                id, user_id, total, created_at,
                latitude, longitude, city, state, country
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                order.id.to_string(),
                order.user_id.to_string(),
                order.total,
                order.created_at.to_rfc3339(),
                location.map(|l| l.latitude),
                location.map(|l| l.longitude),
                location.and_then(|l| l.city.as_deref()),
                location.and_then(|l| l.state.as_deref()),
                location.and_then(|l| l.country.as_deref()),
            ],
        )?;

        Ok(())
    }

    fn save_item(&self, item: &Item) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO items (id, price, quantity, order_id, movie_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.id.to_string(),
                item.price,
                item.quantity as i64,
                item.order_id.to_string(),
                item.movie_id.to_string(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, total, created_at, latitude, longitude, city, state, country
             FROM orders WHERE id = ?1",
        )?;

        match stmt.query_row(params![id.to_string()], Self::row_to_order) {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn set_location(&self, order_id: Uuid, location: &OrderLocation) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE orders
             SET latitude = ?2, longitude = ?3, city = ?4, state = ?5, country = ?6
             WHERE id = ?1",
            params![
                order_id.to_string(),
                location.latitude,
                location.longitude,
                location.city.as_deref(),
                location.state.as_deref(),
                location.country.as_deref(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn orders_with_location_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Order>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, total, created_at, latitude, longitude, city, state, country
             FROM orders
             WHERE date(created_at) >= date(?1)
               AND date(created_at) <= date(?2)
               AND latitude IS NOT NULL
               AND longitude IS NOT NULL
             ORDER BY created_at",
        )?;

        let orders: Vec<Order> = stmt
            .query_map(
                params![start.to_string(), end.to_string()],
                Self::row_to_order,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(orders)
    }

    fn items_for_order(&self, order_id: Uuid) -> AppResult<Vec<Item>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, price, quantity, order_id, movie_id
             FROM items
             WHERE order_id = ?1
             ORDER BY id",
        )?;

        let items: Vec<Item> = stmt
            .query_map(params![order_id.to_string()], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}
