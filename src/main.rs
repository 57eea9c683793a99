/// Betting history exporter - Main entry point
/// Serves CSV exports and odds browsing over HTTP

use anyhow::Result;
use dotenvy::dotenv;

use bethistory::fetch::HistoryFetcher;
use bethistory::server::start_server;
use bethistory::settings::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    let port = config.api_port;

    let fetcher = HistoryFetcher::new(config);
    let handle = match start_server(port, fetcher).await {
        Ok(handle) => handle,
        Err(e) => anyhow::bail!("Failed to start API server: {}", e),
    };

    println!("HTTP API server started on http://127.0.0.1:{}", port);
    println!("  - GET /health - Health check");
    println!("  - GET /event-card/:id - Win and line markets with decimal odds");
    println!("  - GET /sports/:slug - Upcoming events grouped by competition");
    println!("  - POST /export/statement - Betting Tracker CSV for a date range");
    println!("  - POST /export/transactions - NFL props CSV from the raw ledger");

    tokio::signal::ctrl_c().await?;
    println!("\nReceived shutdown signal, shutting down...");
    handle.abort();

    Ok(())
}
