// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod movie;
pub mod order;
pub mod trend;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::Movie;

// Order Domain
pub use order::{validate_item, validate_order, Item, Order, OrderLocation};

// Trend Domain (Derived Data)
pub use trend::{validate_trend, MovieLocationTrend, TrendKey, UNKNOWN_LOCATION};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("{axis} {value} is outside the valid coordinate range")]
    CoordinateOutOfRange { axis: &'static str, value: f64 },

    #[error("Item quantity must be positive")]
    ZeroQuantity,

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
