// src/main.rs

use std::sync::Arc;

use clap::Parser;

use movietrends::application::Cli;
use movietrends::db::{create_connection_pool, initialize_database};
use movietrends::repositories::*;
use movietrends::services::*;

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    // 1. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(cli.db.as_deref())?);

    // Initialize schema (idempotent)
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    // 2. REPOSITORIES
    let order_repo: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(pool.clone()));
    let trend_repo: Arc<dyn TrendRepository> = Arc::new(SqliteTrendRepository::new(pool.clone()));

    // 3. SERVICES
    let aggregation_service = AggregationService::new(order_repo, trend_repo.clone());
    let export_service = ExportService::new(trend_repo);

    // 4. AGGREGATION RUN
    let request = AggregateRequest {
        window_days: cli.days,
        force: cli.force,
    };
    let report = aggregation_service.aggregate(&request)?;

    println!(
        "Aggregated orders from {} to {}",
        report.start_date, report.end_date
    );
    println!("Orders with location data: {}", report.orders_seen);
    println!(
        "Created: {}, Updated: {}, Skipped: {}, Failed: {}",
        report.created, report.updated, report.skipped, report.failed
    );

    if !report.top_trends.is_empty() {
        println!("Top trending movies:");
        for line in render_top_trends(&report.top_trends) {
            println!("  {}", line);
        }
    }

    // 5. EXPORT
    if cli.export_json {
        let written = export_service.export_markers(&cli.export_file)?;
        println!(
            "Exported {} markers to {}",
            written,
            cli.export_file.display()
        );
    }

    Ok(())
}
