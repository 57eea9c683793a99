//! Bookmaker registry mapping a service id to its endpoints and credential.

use crate::settings::{self, Config};

#[derive(Debug, Clone)]
pub struct Bookie {
    pub id: &'static str,
    pub client_id: String,
    pub graphql_url: &'static str,
    pub referrer: &'static str,
}

pub const SUPPORTED_SERVICES: [&str; 2] = ["tab", "betcha"];

/// Resolve a service id. Unknown ids and unconfigured credentials both
/// come back as a message suitable for a 400 response body.
pub fn lookup(service: &str, config: &Config) -> Result<Bookie, String> {
    match service {
        "tab" => credentialed(
            "tab",
            config.tab_client_id.as_deref(),
            "TAB_CLIENT_ID",
            settings::TAB_GRAPHQL_URL,
            settings::TAB_REFERRER,
        ),
        "betcha" => credentialed(
            "betcha",
            config.betcha_client_id.as_deref(),
            "BETCHA_CLIENT_ID",
            settings::BETCHA_GRAPHQL_URL,
            settings::BETCHA_REFERRER,
        ),
        _ => Err("Invalid service".to_string()),
    }
}

fn credentialed(
    id: &'static str,
    client_id: Option<&str>,
    env_key: &str,
    graphql_url: &'static str,
    referrer: &'static str,
) -> Result<Bookie, String> {
    match client_id {
        Some(client_id) => Ok(Bookie {
            id,
            client_id: client_id.to_string(),
            graphql_url,
            referrer,
        }),
        None => Err(format!("{} is not configured", env_key)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            tab_client_id: Some("tab-client-abc".to_string()),
            betcha_client_id: None,
            device_id: None,
            api_port: 8080,
        }
    }

    #[test]
    fn resolves_configured_service() {
        let bookie = lookup("tab", &config()).unwrap();
        assert_eq!(bookie.id, "tab");
        assert_eq!(bookie.client_id, "tab-client-abc");
        assert_eq!(bookie.graphql_url, "https://api.tab.co.nz/graphql");
        assert_eq!(bookie.referrer, "https://www.tab.co.nz/");
    }

    #[test]
    fn unknown_service_is_invalid() {
        assert_eq!(lookup("pokerstars", &config()).unwrap_err(), "Invalid service");
        assert_eq!(lookup("", &config()).unwrap_err(), "Invalid service");
    }

    #[test]
    fn unconfigured_credential_names_the_env_var() {
        let err = lookup("betcha", &config()).unwrap_err();
        assert_eq!(err, "BETCHA_CLIENT_ID is not configured");
    }
}
