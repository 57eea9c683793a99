/// HTTP API for the betting history exporter
/// Provides REST endpoints for CSV exports and for browsing live odds

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::fetch::{FetchOutcome, HistoryFetcher};
use crate::models::{CategoryScreen, EventCard, StatementResponse, TransactionResponse};
use crate::settings;
use crate::{csv_out, event_card, join, rows};

/// Shared state for API handlers
#[derive(Clone)]
struct AppState {
    fetcher: HistoryFetcher,
    start_time: Instant,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
}

/// Export response carrying the assembled CSV document
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ExportResponse {
    filename: String,
    rows: usize,
    csv: String,
}

/// Request body for the statement export
#[derive(Debug, Deserialize)]
struct StatementExportRequest {
    #[serde(default)]
    token: String,
    #[serde(default = "default_service")]
    service: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
}

/// Request body for the transaction export
#[derive(Debug, Deserialize)]
struct TransactionExportRequest {
    #[serde(default)]
    token: String,
    #[serde(default = "default_service")]
    service: String,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_count")]
    count: u32,
}

fn default_service() -> String {
    "tab".to_string()
}

fn default_page() -> u32 {
    settings::TRANSACTIONS_DEFAULT_PAGE
}

fn default_count() -> u32 {
    settings::TRANSACTIONS_DEFAULT_COUNT
}

/// Health check endpoint
/// Returns server status and uptime
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    let response = HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: uptime,
    };

    Json(response)
}

/// Event card endpoint
/// Returns win and line markets with decimal odds for one event
async fn event_card_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.fetcher.event_card(&id).await {
        FetchOutcome::Success { data, .. } => match serde_json::from_value::<EventCard>(data) {
            Ok(card) => Json(event_card::normalize_card(&card)).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": format!("Failed to decode event card: {}", e)})),
            )
                .into_response(),
        },
        FetchOutcome::Failure { status, error } => failure_response(status, error),
    }
}

/// Sports category endpoint
/// Returns upcoming events for a category slug, grouped by competition
async fn sports_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    match state.fetcher.sporting_category(&slug).await {
        FetchOutcome::Success { data, .. } => {
            match serde_json::from_value::<CategoryScreen>(data) {
                Ok(screen) => Json(event_card::group_by_competition(&screen)).into_response(),
                Err(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": format!("Failed to decode category screen: {}", e)})),
                )
                    .into_response(),
            }
        }
        FetchOutcome::Failure { status, error } => failure_response(status, error),
    }
}

/// Statement export endpoint
/// Fetches account activity for a date range and returns Betting Tracker CSV
async fn export_statement_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatementExportRequest>,
) -> axum::response::Response {
    let outcome = state
        .fetcher
        .statement_history(&req.token, &req.service, &req.start_date, &req.end_date)
        .await;

    match outcome {
        FetchOutcome::Success { data, .. } => {
            match serde_json::from_value::<StatementResponse>(data) {
                Ok(parsed) => {
                    let rows = rows::statement_rows(&parsed, req.service.trim());
                    let response = ExportResponse {
                        filename: csv_out::statement_filename(
                            req.start_date.trim(),
                            req.end_date.trim(),
                            req.service.trim(),
                        ),
                        rows: rows.len(),
                        csv: csv_out::assemble(&csv_out::STATEMENT_HEADER, &rows),
                    };
                    Json(response).into_response()
                }
                Err(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": format!("Failed to decode statement response: {}", e)})),
                )
                    .into_response(),
            }
        }
        FetchOutcome::Failure { status, error } => failure_response(status, error),
    }
}

/// Transaction export endpoint
/// Fetches one ledger page, joins bet legs and returns the NFL props CSV
async fn export_transactions_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransactionExportRequest>,
) -> axum::response::Response {
    let outcome = state
        .fetcher
        .transaction_history(&req.token, &req.service, req.page, req.count)
        .await;

    match outcome {
        FetchOutcome::Success { data, .. } => {
            match serde_json::from_value::<TransactionResponse>(data) {
                Ok(parsed) => {
                    let joined = join::join_bet_legs(&parsed.data);
                    let rows = rows::transaction_rows(&joined);
                    let response = ExportResponse {
                        filename: csv_out::TRANSACTION_FILENAME.to_string(),
                        rows: rows.len(),
                        csv: csv_out::assemble(&csv_out::TRANSACTION_HEADER, &rows),
                    };
                    Json(response).into_response()
                }
                Err(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": format!("Failed to decode transaction response: {}", e)})),
                )
                    .into_response(),
            }
        }
        FetchOutcome::Failure { status, error } => failure_response(status, error),
    }
}

/// Maps an upstream failure onto an HTTP error response
/// Transport failures carry status 0, which becomes 502
fn failure_response(status: u16, error: String) -> axum::response::Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    (code, Json(serde_json::json!({"error": error}))).into_response()
}

/// Creates the API router with all endpoints
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/event-card/:id", get(event_card_handler))
        .route("/sports/:slug", get(sports_handler))
        .route("/export/statement", post(export_statement_handler))
        .route("/export/transactions", post(export_transactions_handler))
        .with_state(state)
}

/// Starts the HTTP API server
/// Returns a JoinHandle that can be awaited for graceful shutdown
pub async fn start_server(
    port: u16,
    fetcher: HistoryFetcher,
) -> Result<tokio::task::JoinHandle<()>, Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState {
        fetcher,
        start_time: Instant::now(),
    });

    let app = create_router(state);
    let addr = format!("127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("API server error: {}", e);
        }
    });

    Ok(handle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Config;

    fn test_config() -> Config {
        Config {
            tab_client_id: Some("test-client-id".to_string()),
            betcha_client_id: None,
            device_id: None,
            api_port: 8080,
        }
    }

    async fn start_test_server(port: u16) -> tokio::task::JoinHandle<()> {
        let fetcher = HistoryFetcher::new(test_config());
        let handle = start_server(port, fetcher).await.unwrap();

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        handle
    }

    #[test]
    fn test_health_response_structure() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_seconds: 123,
        };

        assert_eq!(response.status, "ok");
        assert_eq!(response.uptime_seconds, 123);
    }

    #[test]
    fn test_export_response_serialization() {
        let response = ExportResponse {
            filename: "nfl-statement.csv".to_string(),
            rows: 2,
            csv: "a,b\n1,2".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"filename\":\"nfl-statement.csv\""));
        assert!(json.contains("\"rows\":2"));
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_valid_json() {
        let handle = start_test_server(18090).await;

        let client = reqwest::Client::new();
        let response = client
            .get("http://127.0.0.1:18090/health")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        let health: HealthResponse = response.json().await.unwrap();
        assert_eq!(health.status, "ok");

        handle.abort();
    }

    #[tokio::test]
    async fn test_statement_export_requires_date_range() {
        let handle = start_test_server(18091).await;

        let client = reqwest::Client::new();
        let response = client
            .post("http://127.0.0.1:18091/export/statement")
            .json(&serde_json::json!({"token": "abc"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing date range");

        handle.abort();
    }

    #[tokio::test]
    async fn test_transaction_export_requires_token() {
        let handle = start_test_server(18092).await;

        let client = reqwest::Client::new();
        let response = client
            .post("http://127.0.0.1:18092/export/transactions")
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing token");

        handle.abort();
    }

    #[tokio::test]
    async fn test_unknown_service_is_rejected() {
        let handle = start_test_server(18093).await;

        let client = reqwest::Client::new();
        let response = client
            .post("http://127.0.0.1:18093/export/statement")
            .json(&serde_json::json!({
                "token": "abc",
                "service": "pointsbet",
                "start_date": "2024-01-01",
                "end_date": "2024-01-31",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid service");

        handle.abort();
    }
}
