//! HTTP plumbing for the bookmaker APIs.
//!
//! Every call resolves to a [`FetchOutcome`] rather than an `Err`: the
//! upstreams answer with useful bodies on failure and callers forward
//! those verbatim, so a failed fetch is still a value worth returning.

use serde_json::{json, Value};

use crate::bookies;
use crate::settings::{self, Config};

// ============================================================================
// Wire Constants
// ============================================================================

/// Ledger filters the bookmaker's own site sends: settled-bet statuses and
/// bet-debit/credit transaction types, as pre-encoded JSON arrays.
const TRANSACTION_BET_STATUS_IDS: &str =
    r#"["29d8c93c-3115-41ac-a2a0-ba2167f4b7a5","4ee5b54-1b36-4333-bcb7-f5bacd7ac655"]"#;
const TRANSACTION_TYPE_IDS: &str =
    r#"["63903548-09a6-405c-9277-aee297cebed2","3a71227e-727c-4180-984d-87bf92f0f456"]"#;

/// Persisted-query hash registered upstream for SportingCategoryScreen.
const SPORTING_CATEGORY_QUERY_HASH: &str =
    "412c242ca66db0ef4f7d486cbf1296e309ac85f150abdd3aed53701314a41b61";

const LIST_ACTIVITY_TRANSACTIONS_QUERY: &str = "query ListActivityTransactions($after: String, $first: Int, $compactComboBets: Boolean, $count: Int, $page: Int!, $groupId: ID, $transactionStartDate: DateTime!, $transactionEndDate: DateTime!, $excludedTransactionIds: [String!], $betStatusIds: [String!], $transactionTypeIds: [String!], $transferTypeIds: [String!], $shouldFetchCashoutEligibility: Boolean = false) {
  accountTransactions(
    after: $after
    first: $first
    compactComboBets: $compactComboBets
    count: $count
    groupId: $groupId
    page: $page
    transactionStartDate: $transactionStartDate
    transactionEndDate: $transactionEndDate
    excludedTransactionIds: $excludedTransactionIds
    betStatusIds: $betStatusIds
    transactionTypeIds: $transactionTypeIds
    transferTypeIds: $transferTypeIds
    shouldFetchCashoutEligibility: $shouldFetchCashoutEligibility
  ) {
    nodes {
      ...Transactions
      betTransactions {
        betOdds
        betStatus
        betType
        entrantName
        entrantNumber
        eventName
        eventNumber
        marketName
        productName
        productType
        __typename
      }
      __typename
    }
    pageInfo {
      hasNextPage
      endCursor
      __typename
    }
    __typename
  }
}

fragment Transactions on AccountTransactions {
  groupBet {
    acceptedStake
    id
    group {
      channel {
        coverUrl
        id
        isActive
        name
        __typename
      }
      id
      name
      __typename
    }
    user {
      avatarColour
      nickname
      __typename
    }
    __typename
  }
  id
  returns {
    amount
    betReturnIds
    latestTransaction {
      acceptAmount
      accountBalance
      balanceEffect
      created {
        nanos
        seconds
        __typename
      }
      currencyCode
      deviceId
      id
      requestAmount
      transactionTypeId
      __typename
    }
    transactionIds
    type
    __typename
  }
  stake
  transaction {
    acceptAmount
    accountBalance
    balanceEffect
    created {
      nanos
      seconds
      __typename
    }
    currencyCode
    deviceId
    id
    requestAmount
    transactionTypeId
    __typename
  }
  transfers {
    method
    status
    type
    __typename
  }
  transferGroup {
    channel {
      coverUrl
      id
      isActive
      name
      __typename
    }
    id
    name
    __typename
  }
  transferPayment {
    payment
    __typename
  }
  type
  __typename
}";

// ============================================================================
// Fetch Outcome
// ============================================================================

/// What an upstream call produced: the decoded payload, or the status and
/// error text to forward. Transport errors carry status 0.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success { status: u16, data: Value },
    Failure { status: u16, error: String },
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    fn invalid(error: impl Into<String>) -> Self {
        FetchOutcome::Failure {
            status: 400,
            error: error.into(),
        }
    }
}

/// Decode an upstream reply the way a browser would: JSON when the content
/// type says so, raw text otherwise.
async fn outcome_from(result: Result<reqwest::Response, reqwest::Error>) -> FetchOutcome {
    let response = match result {
        Ok(response) => response,
        Err(error) => {
            return FetchOutcome::Failure {
                status: 0,
                error: error.to_string(),
            };
        }
    };

    let status = response.status().as_u16();
    let is_json = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.contains("application/json") || ct.contains("graphql-response+json"))
        .unwrap_or(false);
    let text = match response.text().await {
        Ok(text) => text,
        Err(error) => {
            return FetchOutcome::Failure {
                status,
                error: error.to_string(),
            };
        }
    };

    if !(200..300).contains(&status) {
        return FetchOutcome::Failure {
            status,
            error: text,
        };
    }

    let data = if is_json {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    } else {
        Value::String(text)
    };
    FetchOutcome::Success { status, data }
}

// ============================================================================
// History Fetcher
// ============================================================================

/// Authenticated client for the bookmaker endpoints. Cheap to clone; the
/// inner reqwest client pools connections across clones.
#[derive(Debug, Clone)]
pub struct HistoryFetcher {
    client: reqwest::Client,
    config: Config,
    base_override: Option<String>,
}

impl HistoryFetcher {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_override: None,
        }
    }

    /// Point every upstream host at `base` instead. Test hook.
    pub fn with_base_url(config: Config, base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_override: Some(base.into()),
        }
    }

    fn endpoint(&self, url: &'static str) -> String {
        match &self.base_override {
            Some(base) => {
                let path = url
                    .strip_prefix("https://")
                    .and_then(|rest| rest.find('/').map(|at| &rest[at..]))
                    .unwrap_or("/");
                format!("{}{}", base.trim_end_matches('/'), path)
            }
            None => url.to_string(),
        }
    }

    /// POST the ListActivityTransactions query. Dates are `YYYY-MM-DD`;
    /// the requested range runs from midday on the start date to the last
    /// second of the end date, matching the bookmaker's own site.
    pub async fn statement_history(
        &self,
        token: &str,
        service: &str,
        start_date: &str,
        end_date: &str,
    ) -> FetchOutcome {
        let bookie = match bookies::lookup(service.trim(), &self.config) {
            Ok(bookie) => bookie,
            Err(error) => return FetchOutcome::invalid(error),
        };
        let start_date = start_date.trim();
        let end_date = end_date.trim();
        if start_date.is_empty() || end_date.is_empty() {
            return FetchOutcome::invalid("Missing date range");
        }
        let token = token.trim();
        if token.is_empty() {
            return FetchOutcome::invalid("Missing token");
        }

        let body = json!({
            "operationName": "ListActivityTransactions",
            "variables": {
                "shouldFetchCashoutEligibility": false,
                "count": settings::STATEMENT_PAGE_COUNT,
                "page": 1,
                "transactionStartDate": format!("{}T12:00:00.000Z", start_date),
                "transactionEndDate": format!("{}T23:59:59.000Z", end_date),
                "groupId": "",
            },
            "query": LIST_ACTIVITY_TRANSACTIONS_QUERY,
        });

        let request = self
            .client
            .post(self.endpoint(bookie.graphql_url))
            .header("accept", "*/*")
            .header("authorization", format!("Bearer {}", token))
            .header("client-id", &bookie.client_id)
            .header("Referer", bookie.referrer)
            .json(&body);
        outcome_from(request.send().await).await
    }

    /// GET one page of the raw transaction ledger. This endpoint lives on
    /// the socket host for both bookmakers.
    pub async fn transaction_history(
        &self,
        token: &str,
        service: &str,
        page: u32,
        count: u32,
    ) -> FetchOutcome {
        let bookie = match bookies::lookup(service.trim(), &self.config) {
            Ok(bookie) => bookie,
            Err(error) => return FetchOutcome::invalid(error),
        };
        let token = token.trim();
        if token.is_empty() {
            return FetchOutcome::invalid("Missing token");
        }

        let query = [
            ("method", "transactionsbyclientidwithfilters".to_string()),
            ("client_id", bookie.client_id.clone()),
            ("page", page.to_string()),
            ("count", count.to_string()),
            ("excluded_transaction_ids", "[]".to_string()),
            ("compact_combo_bets", "true".to_string()),
            ("bet_status_ids", TRANSACTION_BET_STATUS_IDS.to_string()),
            ("transaction_type_ids", TRANSACTION_TYPE_IDS.to_string()),
            ("transfer_type_ids", "[]".to_string()),
        ];
        let request = self
            .client
            .get(self.endpoint(settings::TRANSACTIONS_URL))
            .query(&query)
            .header("accept", "*/*")
            .header("authorization", format!("Bearer {}", token))
            .header("client-id", &bookie.client_id)
            .header("Referer", bookie.referrer);
        outcome_from(request.send().await).await
    }

    /// Fetch the raw odds card for an event. Accepts both the prefixed
    /// "sport:uuid" id the category feed hands out and a bare uuid.
    pub async fn event_card(&self, id: &str) -> FetchOutcome {
        let card_id = event_card_id(id);
        if card_id.is_empty() {
            return FetchOutcome::invalid("Missing event id");
        }

        let mut request = self
            .client
            .get(self.endpoint(settings::EVENT_CARD_URL))
            .query(&[("id", card_id)])
            .header("content-type", "application/json")
            .header("Referer", settings::TAB_REFERRER);
        if let Some(device_id) = &self.config.device_id {
            request = request.header("device-id", device_id);
        }
        outcome_from(request.send().await).await
    }

    /// Fetch the upcoming-events screen for a category slug such as
    /// "rugby-union". The query itself ships as a persisted-query hash.
    pub async fn sporting_category(&self, slug: &str) -> FetchOutcome {
        let category = category_from_slug(slug);
        if category.is_empty() {
            return FetchOutcome::invalid("Missing category");
        }

        let variables = json!({
            "category": category,
            "statuses": ["OPEN", "LIVE"],
            "excludeCategoryIds": [],
            "includeUpcomingEvents": true,
            "upcomingEventsCount": 18,
            "upcomingEventsGroupBy": "UNSPECIFIED",
            "upcomingEventsStatuses": ["OPEN"],
            "futuresGroupBy": "LEAGUE",
        });
        let extensions = json!({
            "persistedQuery": {"version": 1, "sha256Hash": SPORTING_CATEGORY_QUERY_HASH},
        });

        let request = self
            .client
            .get(self.endpoint(settings::GQL_ROUTER_URL))
            .query(&[
                ("variables", variables.to_string()),
                ("operationName", "SportingCategoryScreen".to_string()),
                ("extensions", extensions.to_string()),
            ])
            .header(
                "accept",
                "application/graphql-response+json, application/json",
            )
            .header("content-type", "application/json")
            .header("graphql-client-name", "sportsbook")
            .header("Referer", settings::TAB_REFERRER);
        outcome_from(request.send().await).await
    }
}

/// "sport:uuid" ids carry the card id on the right of the colon.
fn event_card_id(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.split_once(':') {
        Some((_, right)) => right,
        None => trimmed,
    }
}

/// Route slugs are kebab-case; the upstream category enum is SHOUT_CASE.
fn category_from_slug(slug: &str) -> String {
    slug.trim().to_uppercase().replace('-', "_")
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
    fn base_override_rewrites_every_host() {
        let fetcher = HistoryFetcher::with_base_url(config(), "http://127.0.0.1:18099/");
        assert_eq!(
            fetcher.endpoint(settings::TAB_GRAPHQL_URL),
            "http://127.0.0.1:18099/graphql"
        );
        assert_eq!(
            fetcher.endpoint(settings::TRANSACTIONS_URL),
            "http://127.0.0.1:18099/rest/v1/transactions/"
        );
        assert_eq!(
            fetcher.endpoint(settings::EVENT_CARD_URL),
            "http://127.0.0.1:18099/v2/sport/event-card"
        );
        assert_eq!(
            fetcher.endpoint(settings::GQL_ROUTER_URL),
            "http://127.0.0.1:18099/gql/router"
        );
    }

    #[test]
    fn live_endpoints_pass_through_untouched() {
        let fetcher = HistoryFetcher::new(config());
        assert_eq!(
            fetcher.endpoint(settings::TAB_GRAPHQL_URL),
            "https://api.tab.co.nz/graphql"
        );
    }

    #[test]
    fn event_ids_lose_their_sport_prefix() {
        assert_eq!(event_card_id("sport:abc-123"), "abc-123");
        assert_eq!(event_card_id("abc-123"), "abc-123");
        assert_eq!(event_card_id("  sport:abc-123  "), "abc-123");
        assert_eq!(event_card_id(""), "");
    }

    #[test]
    fn slugs_convert_to_category_enum_form() {
        assert_eq!(category_from_slug("rugby-union"), "RUGBY_UNION");
        assert_eq!(category_from_slug("BASKETBALL"), "BASKETBALL");
        assert_eq!(category_from_slug("  "), "");
    }

    #[tokio::test]
    async fn statement_validates_service_then_dates_then_token() {
        let fetcher = HistoryFetcher::new(config());

        let FetchOutcome::Failure { status, error } = fetcher
            .statement_history("tok", "bogus", "", "")
            .await
        else {
            panic!("expected failure");
        };
        assert_eq!(status, 400);
        assert_eq!(error, "Invalid service");

        let FetchOutcome::Failure { error, .. } = fetcher
            .statement_history("tok", "tab", "2024-01-01", "")
            .await
        else {
            panic!("expected failure");
        };
        assert_eq!(error, "Missing date range");

        let FetchOutcome::Failure { error, .. } = fetcher
            .statement_history("   ", "tab", "2024-01-01", "2024-01-31")
            .await
        else {
            panic!("expected failure");
        };
        assert_eq!(error, "Missing token");
    }

    #[tokio::test]
    async fn unconfigured_bookmaker_fails_before_any_request() {
        let fetcher = HistoryFetcher::new(config());
        let FetchOutcome::Failure { status, error } = fetcher
            .transaction_history("tok", "betcha", 1, 500)
            .await
        else {
            panic!("expected failure");
        };
        assert_eq!(status, 400);
        assert_eq!(error, "BETCHA_CLIENT_ID is not configured");
    }

    #[tokio::test]
    async fn empty_event_id_is_rejected() {
        let fetcher = HistoryFetcher::new(config());
        let FetchOutcome::Failure { status, error } = fetcher.event_card("sport:").await else {
            panic!("expected failure");
        };
        assert_eq!(status, 400);
        assert_eq!(error, "Missing event id");
        assert!(!fetcher.event_card("sport:").await.is_ok());
    }
}
