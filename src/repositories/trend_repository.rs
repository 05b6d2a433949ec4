// src/repositories/trend_repository.rs
//
// Trend row persistence
//
// Lookup identity is the (movie, city, state, country) four-tuple; the
// store's UNIQUE constraint on it is what resolves a create/create race
// between concurrent runs (the loser surfaces a constraint error that the
// aggregation engine absorbs per key).

use chrono::NaiveDate;
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::trend::{MovieLocationTrend, TrendKey};
use crate::error::{AppError, AppResult};

/// A trend row joined to its movie, for display paths
/// (exporter markers and the top-10 report).
#[derive(Debug, Clone)]
pub struct TrendWithMovie {
    pub trend: MovieLocationTrend,
    pub movie_name: String,
    pub movie_price: i64,
}

#[cfg_attr(test, mockall::automock)]
pub trait TrendRepository: Send + Sync {
    fn find_by_key(&self, key: &TrendKey) -> AppResult<Option<MovieLocationTrend>>;
    /// Insert a new row. A duplicate four-tuple is a constraint error, not
    /// an upsert - callers decide what existing rows mean.
    fn create(&self, trend: &MovieLocationTrend) -> AppResult<()>;
    /// Merge path: overwrite the running total and last-seen coordinates.
    /// `date` is deliberately not touched.
    fn update_counters(
        &self,
        id: Uuid,
        purchase_count: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<()>;
    fn list_all(&self) -> AppResult<Vec<MovieLocationTrend>>;
    fn list_all_with_movie(&self) -> AppResult<Vec<TrendWithMovie>>;
    fn top_by_date(&self, date: NaiveDate, limit: u32) -> AppResult<Vec<TrendWithMovie>>;
}

pub struct SqliteTrendRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteTrendRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to MovieLocationTrend - returns rusqlite::Error for
    /// query_map compatibility
    fn row_to_trend(row: &Row) -> Result<MovieLocationTrend, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let movie_id_str: String = row.get("movie_id")?;
        let movie_id = Uuid::parse_str(&movie_id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let date_str: String = row.get("date")?;
        let date = date_str
            .parse::<NaiveDate>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let purchase_count: i64 = row.get("purchase_count")?;

        Ok(MovieLocationTrend {
            id,
            movie_id,
            city: row.get("city")?,
            state: row.get("state")?,
            country: row.get("country")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            purchase_count: purchase_count as u32,
            date,
        })
    }

    fn row_to_trend_with_movie(row: &Row) -> Result<TrendWithMovie, rusqlite::Error> {
        Ok(TrendWithMovie {
            trend: Self::row_to_trend(row)?,
            movie_name: row.get("movie_name")?,
            movie_price: row.get("movie_price")?,
        })
    }
}

impl TrendRepository for SqliteTrendRepository {
    fn find_by_key(&self, key: &TrendKey) -> AppResult<Option<MovieLocationTrend>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, movie_id, city, state, country, latitude, longitude,
                    purchase_count, date
             FROM movie_location_trends
             WHERE movie_id = ?1 AND city = ?2 AND state = ?3 AND country = ?4",
        )?;

        match stmt.query_row(
            params![key.movie_id.to_string(), key.city, key.state, key.country],
            Self::row_to_trend,
        ) {
            Ok(trend) => Ok(Some(trend)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn create(&self, trend: &MovieLocationTrend) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO movie_location_trends (
                id, movie_id, city, state, country,
                latitude, longitude, purchase_count, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                trend.id.to_string(),
                trend.movie_id.to_string(),
                trend.city,
                trend.state,
                trend.country,
                trend.latitude,
                trend.longitude,
                trend.purchase_count as i64,
                trend.date.to_string(),
            ],
        )?;

        Ok(())
    }

    fn update_counters(
        &self,
        id: Uuid,
        purchase_count: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE movie_location_trends
             SET purchase_count = ?2, latitude = ?3, longitude = ?4
             WHERE id = ?1",
            params![id.to_string(), purchase_count as i64, latitude, longitude],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<MovieLocationTrend>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, movie_id, city, state, country, latitude, longitude,
                    purchase_count, date
             FROM movie_location_trends",
        )?;

        let trends: Vec<MovieLocationTrend> = stmt
            .query_map([], Self::row_to_trend)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trends)
    }

    fn list_all_with_movie(&self) -> AppResult<Vec<TrendWithMovie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT t.id, t.movie_id, t.city, t.state, t.country, t.latitude,
                    t.longitude, t.purchase_count, t.date,
                    m.name AS movie_name, m.price AS movie_price
             FROM movie_location_trends t
             JOIN movies m ON m.id = t.movie_id",
        )?;

        let trends: Vec<TrendWithMovie> = stmt
            .query_map([], Self::row_to_trend_with_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trends)
    }

    fn top_by_date(&self, date: NaiveDate, limit: u32) -> AppResult<Vec<TrendWithMovie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT t.id, t.movie_id, t.city, t.state, t.country, t.latitude,
                    t.longitude, t.purchase_count, t.date,
                    m.name AS movie_name, m.price AS movie_price
             FROM movie_location_trends t
             JOIN movies m ON m.id = t.movie_id
             WHERE t.date = ?1
             ORDER BY t.purchase_count DESC
             LIMIT ?2",
        )?;

        let trends: Vec<TrendWithMovie> = stmt
            .query_map(
                params![date.to_string(), limit as i64],
                Self::row_to_trend_with_movie,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trends)
    }
}
