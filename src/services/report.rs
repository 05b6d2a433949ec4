// src/services/report.rs
//
// Operator-facing rendering of the per-run top-trends listing.
// Pure formatting; no store access, no mutation.

use crate::repositories::TrendWithMovie;

/// Render the ranked listing, one line per row. Rows arrive already sorted
/// by descending purchase count.
pub fn render_top_trends(rows: &[TrendWithMovie]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            format!(
                "{} - {}, {} ({} purchases)",
                row.movie_name, row.trend.city, row.trend.state, row.trend.purchase_count
            )
        })
        .collect()
}
