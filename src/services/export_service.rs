// src/services/export_service.rs
//
// Map-marker export: flattens the full trend table (no window filter) into
// a JSON array for the map front end.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::AppResult;
use crate::repositories::{TrendRepository, TrendWithMovie};

/// One marker on the popularity map.
///
/// `info` is an HTML fragment rendered inside the marker popup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub info: String,
    pub purchases: u32,
    pub movie_name: String,
    pub city: String,
    pub state: String,
}

impl MapMarker {
    fn from_row(row: &TrendWithMovie) -> Self {
        let trend = &row.trend;
        Self {
            lat: trend.latitude,
            lng: trend.longitude,
            title: format!("{} - {}, {}", row.movie_name, trend.city, trend.state),
            info: format!(
                "<b>{}</b><br>Location: {}, {}<br>Purchases: {}<br>Price: ${}",
                row.movie_name, trend.city, trend.state, trend.purchase_count, row.movie_price
            ),
            purchases: trend.purchase_count,
            movie_name: row.movie_name.clone(),
            city: trend.city.clone(),
            state: trend.state.clone(),
        }
    }
}

pub struct ExportService {
    trend_repo: Arc<dyn TrendRepository>,
}

impl ExportService {
    pub fn new(trend_repo: Arc<dyn TrendRepository>) -> Self {
        Self { trend_repo }
    }

    /// Write every persisted trend row as a map marker. Returns the number
    /// of records written. The whole file is replaced on each invocation.
    pub fn export_markers(&self, destination: &Path) -> AppResult<usize> {
        info!("Exporting trend markers to {}", destination.display());

        let rows = self.trend_repo.list_all_with_movie()?;
        let markers: Vec<MapMarker> = rows.iter().map(MapMarker::from_row).collect();

        let json = serde_json::to_string_pretty(&markers)?;
        write_atomic(destination, json.as_bytes())?;

        info!(
            "Exported {} markers to {}",
            markers.len(),
            destination.display()
        );

        Ok(markers.len())
    }
}

/// The destination must never be observed half-written: write a sibling
/// temporary file, then rename it over the target.
fn write_atomic(destination: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = destination.as_os_str().to_os_string();
    tmp.push(".tmp");

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, destination)?;

    Ok(())
}
