// export_history.rs - Export betting history to a Betting Tracker CSV file
//
// Usage:
//   cargo run --bin export_history -- --token <BEARER> --from 2024-01-01 --to 2024-01-31
//   cargo run --bin export_history -- --source transactions --token <BEARER>
//   BET_TOKEN=<BEARER> cargo run --bin export_history -- --service betcha --from ... --to ...

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use bethistory::fetch::{FetchOutcome, HistoryFetcher};
use bethistory::models::{StatementResponse, TransactionResponse};
use bethistory::settings::{self, Config};
use bethistory::{csv_out, join, rows};

#[derive(Parser, Debug)]
#[command(name = "export_history")]
#[command(about = "Export betting history to a Betting Tracker CSV file")]
struct Args {
    /// Which ledger to export
    #[arg(long, default_value = "statement", value_parser = ["statement", "transactions"])]
    source: String,

    /// Bookmaker service: tab or betcha
    #[arg(long, default_value = "tab")]
    service: String,

    /// Bearer token (falls back to the BET_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    /// Statement range start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Statement range end date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Output path (default: the download name the web client uses)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Transaction ledger page
    #[arg(long, default_value_t = settings::TRANSACTIONS_DEFAULT_PAGE)]
    page: u32,

    /// Transaction ledger page size
    #[arg(long, default_value_t = settings::TRANSACTIONS_DEFAULT_COUNT)]
    count: u32,
}

/// Fetch the account statement and project it into Betting Tracker rows
async fn export_statement(
    fetcher: &HistoryFetcher,
    token: &str,
    args: &Args,
) -> Result<(String, String, usize)> {
    let from = args.from.as_deref().unwrap_or_default();
    let to = args.to.as_deref().unwrap_or_default();

    let data = match fetcher
        .statement_history(token, &args.service, from, to)
        .await
    {
        FetchOutcome::Success { data, .. } => data,
        FetchOutcome::Failure { status, error } => {
            bail!("Statement fetch failed ({}): {}", status, error)
        }
    };

    let parsed: StatementResponse =
        serde_json::from_value(data).context("Failed to decode statement response")?;
    let rows = rows::statement_rows(&parsed, args.service.trim());
    let csv = csv_out::assemble(&csv_out::STATEMENT_HEADER, &rows);
    let filename = csv_out::statement_filename(from.trim(), to.trim(), args.service.trim());

    Ok((filename, csv, rows.len()))
}

/// Fetch one transaction ledger page and project the NFL prop legs
async fn export_transactions(
    fetcher: &HistoryFetcher,
    token: &str,
    args: &Args,
) -> Result<(String, String, usize)> {
    let data = match fetcher
        .transaction_history(token, &args.service, args.page, args.count)
        .await
    {
        FetchOutcome::Success { data, .. } => data,
        FetchOutcome::Failure { status, error } => {
            bail!("Transaction fetch failed ({}): {}", status, error)
        }
    };

    let parsed: TransactionResponse =
        serde_json::from_value(data).context("Failed to decode transaction response")?;
    let joined = join::join_bet_legs(&parsed.data);
    let rows = rows::transaction_rows(&joined);
    let csv = csv_out::assemble(&csv_out::TRANSACTION_HEADER, &rows);

    Ok((csv_out::TRANSACTION_FILENAME.to_string(), csv, rows.len()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env()?;
    let fetcher = HistoryFetcher::new(config);

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("BET_TOKEN").ok())
        .unwrap_or_default();

    println!("Betting History Export");
    println!("Source:  {}", args.source);
    println!("Service: {}", args.service);

    let (filename, csv, row_count) = match args.source.as_str() {
        "transactions" => export_transactions(&fetcher, &token, &args).await?,
        _ => export_statement(&fetcher, &token, &args).await?,
    };

    let path = args.out.clone().unwrap_or_else(|| PathBuf::from(&filename));
    std::fs::write(&path, &csv)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("\nExport Summary:");
    println!("Rows written:  {:>6}", row_count);
    println!("Output file:   {}", path.display());

    Ok(())
}
