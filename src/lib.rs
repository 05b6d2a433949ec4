// src/lib.rs
// MovieTrends - per-movie, per-location purchase trend aggregation
//
// Architecture:
// - Domain-centric: entities and invariants live in domain/
// - Repositories are dumb data mappers over the SQLite record store
// - Services orchestrate: aggregation, export, reporting
// - Application layer: CLI boundary and downstream payload shapes

pub mod application;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_item,
    validate_order,
    validate_trend,
    // Order
    Item,
    // Movie
    Movie,
    // Trend
    MovieLocationTrend,
    Order,
    OrderLocation,
    TrendKey,
    UNKNOWN_LOCATION,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    MovieRepository,
    OrderRepository,
    SqliteMovieRepository,
    SqliteOrderRepository,
    SqliteTrendRepository,
    TrendRepository,
    TrendWithMovie,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    render_top_trends,
    // Aggregation engine
    AggregateRequest,
    AggregationReport,
    AggregationService,
    // Exporter
    ExportService,
    MapMarker,
    UpsertOutcome,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{Cli, TrendFeed, TrendFeedEntry, TrendFeedLocation};
