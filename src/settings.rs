/// Settings and configuration management
/// Handles environment variable loading and validation

use anyhow::Result;
use std::env;

// ============================================================================
// Upstream Endpoints
// ============================================================================

pub const TAB_GRAPHQL_URL: &str = "https://api.tab.co.nz/graphql";
pub const TAB_REFERRER: &str = "https://www.tab.co.nz/";

pub const BETCHA_GRAPHQL_URL: &str = "https://api.betcha.co.nz/graphql";
pub const BETCHA_REFERRER: &str = "https://www.betcha.co.nz/";

/// Transaction history is served off the TAB socket host for both
/// bookmakers; the client-id header decides whose ledger comes back.
pub const TRANSACTIONS_URL: &str = "https://socket.tab.co.nz/rest/v1/transactions/";

pub const EVENT_CARD_URL: &str = "https://api.tab.co.nz/v2/sport/event-card";
pub const GQL_ROUTER_URL: &str = "https://api.tab.co.nz/gql/router";

// ============================================================================
// Fetch Constants
// ============================================================================

/// A statement request asks for one oversized page instead of paginating.
pub const STATEMENT_PAGE_COUNT: u32 = 2000;

pub const TRANSACTIONS_DEFAULT_PAGE: u32 = 1;
pub const TRANSACTIONS_DEFAULT_COUNT: u32 = 500;

// ============================================================================
// Runtime Configuration (loaded from environment)
// ============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    // Bookmaker credentials (at least one required)
    pub tab_client_id: Option<String>,
    pub betcha_client_id: Option<String>,

    /// Sent as the device-id header on event-card requests when set.
    pub device_id: Option<String>,

    // HTTP API settings
    pub api_port: u16,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns errors with helpful messages if no bookmaker credential is
    /// configured, or a credential still holds its .env.example placeholder.
    pub fn from_env() -> Result<Self> {
        let tab_client_id = client_credential("TAB_CLIENT_ID")?;
        let betcha_client_id = client_credential("BETCHA_CLIENT_ID")?;

        if tab_client_id.is_none() && betcha_client_id.is_none() {
            anyhow::bail!(
                "Bookmaker credential required!\n\
                \n\
                Set TAB_CLIENT_ID or BETCHA_CLIENT_ID in your .env file.\n\
                \n\
                Finding your client id:\n\
                1. Log in to the bookmaker's website\n\
                2. Open DevTools and switch to the Network tab\n\
                3. Inspect any api.tab.co.nz / api.betcha.co.nz request\n\
                4. Copy the 'client-id' request header value into .env"
            );
        }

        Ok(Self {
            tab_client_id,
            betcha_client_id,
            device_id: optional_env("DEVICE_ID"),
            api_port: env_parse("API_PORT", 8080),
        })
    }
}

/// Read a client id. Blank values read as unset; an untouched
/// .env.example placeholder is an error.
fn client_credential(key: &str) -> Result<Option<String>> {
    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.starts_with("your_") && value.ends_with("_here") {
        anyhow::bail!(
            "{} is set but has placeholder value.\n\
            Replace it with the client id your browser sends in the\n\
            'client-id' header (DevTools, Network tab, any api request).",
            key
        );
    }
    Ok(Some(value.to_string()))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse env var with default fallback
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
