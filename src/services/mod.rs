// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod aggregation_service;
pub mod export_service;
pub mod report;

#[cfg(test)]
mod aggregation_service_tests;

// Re-export all services and their types
pub use aggregation_service::{
    AggregateRequest, AggregationReport, AggregationService, UpsertOutcome,
};

pub use export_service::{ExportService, MapMarker};

pub use report::render_top_trends;
