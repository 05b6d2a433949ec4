// src/services/aggregation_service.rs
//
// The aggregation engine: one batch pass over a window of located orders,
// grouped by (movie, location) key, reconciled against the trend store.
//
// Accumulation is pre-aggregated per run: the store sees at most one
// create-or-merge per distinct key, so a single run can never race itself
// into duplicate creates for the same key.

use chrono::{Duration, NaiveDate, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::order::Order;
use crate::domain::trend::{validate_trend, MovieLocationTrend, TrendKey};
use crate::error::AppResult;
use crate::repositories::{OrderRepository, TrendRepository, TrendWithMovie};

/// How many rows the end-of-run listing carries
const TOP_TRENDS_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct AggregateRequest {
    /// Window size in days; the window is [end_date - window_days, end_date]
    /// inclusive, so 0 means "today only".
    pub window_days: u32,

    /// Merge accumulated counts into existing rows instead of skipping them
    pub force: bool,
}

impl Default for AggregateRequest {
    fn default() -> Self {
        Self {
            window_days: 30,
            force: false,
        }
    }
}

/// What reconciling one accumulated key did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Merged,
    Skipped,
}

/// Running totals for one key within a single pass.
/// Coordinates are last-write-wins across the items observed in this run.
struct TrendAccumulator {
    quantity: u32,
    latitude: f64,
    longitude: f64,
}

/// Outcome summary of one aggregation run
#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Orders that qualified (inside the window, with coordinates)
    pub orders_seen: usize,

    pub created: usize,
    pub updated: usize,
    pub skipped: usize,

    /// Keys whose reconciliation failed; the run continues past them
    pub failed: usize,

    /// Rows created by this run, ranked by purchase count, at most
    /// TOP_TRENDS_LIMIT of them
    pub top_trends: Vec<TrendWithMovie>,
}

impl AggregationReport {
    fn empty(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            orders_seen: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            top_trends: Vec::new(),
        }
    }
}

pub struct AggregationService {
    order_repo: Arc<dyn OrderRepository>,
    trend_repo: Arc<dyn TrendRepository>,
}

impl AggregationService {
    pub fn new(order_repo: Arc<dyn OrderRepository>, trend_repo: Arc<dyn TrendRepository>) -> Self {
        Self {
            order_repo,
            trend_repo,
        }
    }

    /// Run one aggregation pass ending today (UTC date, matching the UTC
    /// order timestamps in the store).
    pub fn aggregate(&self, request: &AggregateRequest) -> AppResult<AggregationReport> {
        self.aggregate_as_of(request, Utc::now().date_naive())
    }

    /// Run one aggregation pass with a pinned end date.
    pub fn aggregate_as_of(
        &self,
        request: &AggregateRequest,
        end_date: NaiveDate,
    ) -> AppResult<AggregationReport> {
        let start_date = end_date - Duration::days(request.window_days as i64);

        info!("Aggregating orders from {} to {}", start_date, end_date);

        let orders = self
            .order_repo
            .orders_with_location_between(start_date, end_date)?;

        if orders.is_empty() {
            info!("No orders with location data found");
            return Ok(AggregationReport::empty(start_date, end_date));
        }

        info!("Found {} orders with location data", orders.len());

        let accumulated = self.accumulate(&orders)?;

        let mut report = AggregationReport::empty(start_date, end_date);
        report.orders_seen = orders.len();

        for (key, totals) in &accumulated {
            match self.reconcile(key, totals, request.force, end_date) {
                Ok(UpsertOutcome::Created) => report.created += 1,
                Ok(UpsertOutcome::Merged) => report.updated += 1,
                Ok(UpsertOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    // One bad key never aborts the run
                    warn!("Failed to reconcile trend for {}: {}", key, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Aggregation complete - Created: {}, Updated: {}, Skipped: {}, Failed: {}",
            report.created, report.updated, report.skipped, report.failed
        );

        report.top_trends = self.trend_repo.top_by_date(end_date, TOP_TRENDS_LIMIT)?;

        Ok(report)
    }

    /// Fan orders out to their items and fold quantities into per-key totals.
    fn accumulate(&self, orders: &[Order]) -> AppResult<HashMap<TrendKey, TrendAccumulator>> {
        let mut totals: HashMap<TrendKey, TrendAccumulator> = HashMap::new();

        for order in orders {
            // The windowed query only returns located orders
            let Some(location) = &order.location else {
                continue;
            };

            for item in self.order_repo.items_for_order(order.id)? {
                let key = TrendKey::resolve(item.movie_id, location);

                totals
                    .entry(key)
                    .and_modify(|acc| {
                        acc.quantity += item.quantity;
                        acc.latitude = location.latitude;
                        acc.longitude = location.longitude;
                    })
                    .or_insert(TrendAccumulator {
                        quantity: item.quantity,
                        latitude: location.latitude,
                        longitude: location.longitude,
                    });
            }
        }

        Ok(totals)
    }

    /// Create-if-absent, merge-if-present-and-forced, skip otherwise.
    fn reconcile(
        &self,
        key: &TrendKey,
        totals: &TrendAccumulator,
        force: bool,
        end_date: NaiveDate,
    ) -> AppResult<UpsertOutcome> {
        match self.trend_repo.find_by_key(key)? {
            None => {
                let trend = MovieLocationTrend::new(
                    key.clone(),
                    totals.latitude,
                    totals.longitude,
                    totals.quantity,
                    end_date,
                );
                validate_trend(&trend)?;
                self.trend_repo.create(&trend)?;
                info!("Created trend: {} ({} purchases)", key, totals.quantity);
                Ok(UpsertOutcome::Created)
            }
            Some(existing) if force => {
                // Merge, not overwrite; `date` keeps the creation run date
                let new_count = existing.purchase_count + totals.quantity;
                self.trend_repo.update_counters(
                    existing.id,
                    new_count,
                    totals.latitude,
                    totals.longitude,
                )?;
                info!("Updated trend: {} (total: {} purchases)", key, new_count);
                Ok(UpsertOutcome::Merged)
            }
            Some(_) => {
                info!("Skipped existing trend: {}", key);
                Ok(UpsertOutcome::Skipped)
            }
        }
    }
}
