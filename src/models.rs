//! Typed views of the three upstream JSON schemas.
//!
//! Upstream data is not guaranteed complete: any field whose absence the
//! export must tolerate is an `Option`, and map-structured payloads default
//! to empty so a sparse response degrades to blank cells instead of a
//! deserialization error.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

/// A split epoch timestamp. The statement schema sends `{seconds, nanos}`,
/// the transaction schema plain `{seconds}`; both parse into this.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TimestampParts {
    #[serde(default)]
    pub seconds: Option<i64>,
    #[serde(default)]
    pub nanos: Option<i64>,
}

// ============================================================================
// Statement schema (GraphQL ListActivityTransactions)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementResponse {
    #[serde(default)]
    pub data: StatementData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementData {
    #[serde(default)]
    pub account_transactions: TransactionPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub nodes: Vec<StatementTransaction>,
}

/// One account-activity node. Only `type == "BET"` nodes carry the embedded
/// bet record; deposits, withdrawals and transfers share this shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementTransaction {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub transaction: Option<TransactionDetail>,
    #[serde(default)]
    pub bet_transactions: Option<BetTransaction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<TimestampParts>,
    /// Stake as a plain number; the money-formatted strings live alongside.
    #[serde(default)]
    pub request_amount: Option<f64>,
    #[serde(default)]
    pub accept_amount: Option<String>,
    #[serde(default)]
    pub account_balance: Option<String>,
    #[serde(default)]
    pub balance_effect: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetTransaction {
    /// Display odds, e.g. " @ 1.88"; non-numeric characters are stripped
    /// during projection.
    #[serde(default)]
    pub bet_odds: Option<String>,
    #[serde(default)]
    pub bet_status: Option<String>,
    #[serde(default)]
    pub bet_type: Option<String>,
    #[serde(default)]
    pub entrant_name: Option<String>,
    #[serde(default)]
    pub entrant_number: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_number: Option<String>,
    #[serde(default)]
    pub market_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
}

// ============================================================================
// Transaction-history schema (REST transactionsbyclientidwithfilters)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub data: TransactionHistory,
}

/// The seven id-keyed mappings that arrive in one transaction-history page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionHistory {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub bets: FxHashMap<String, Bet>,
    #[serde(default)]
    pub bet_legs: FxHashMap<String, BetLeg>,
    #[serde(default)]
    pub bet_leg_selections: FxHashMap<String, BetLegSelection>,
    #[serde(default)]
    pub sports_events: FxHashMap<String, SportsEvent>,
    #[serde(default)]
    pub sports_markets: FxHashMap<String, SportsMarket>,
    #[serde(default)]
    pub sports_entrants: FxHashMap<String, SportsEntrant>,
    #[serde(default)]
    pub sports_results: FxHashMap<String, SportsResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub bet_status_id: String,
    #[serde(default)]
    pub bet_collection_id: String,
    #[serde(default)]
    pub stake: f64,
    #[serde(default)]
    pub won_amount: Option<WonAmount>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WonAmount {
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FractionalOdds {
    #[serde(default)]
    pub numerator: f64,
    #[serde(default)]
    pub denominator: f64,
}

/// Odds at placement time; some feeds precompute the decimal form.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PlacedOdds {
    #[serde(default)]
    pub numerator: f64,
    #[serde(default)]
    pub denominator: f64,
    #[serde(default)]
    pub decimal: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetLeg {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub bet_id: String,
    #[serde(default)]
    pub product_type_id: String,
    #[serde(default)]
    pub root_category_id: String,
    #[serde(default)]
    pub placed: PlacedOdds,
    #[serde(default)]
    pub paid: Option<FractionalOdds>,
    #[serde(default)]
    pub market_advertised_date: Option<TimestampParts>,
    /// The line at placement time, for spread/total legs.
    #[serde(default)]
    pub handicap: Option<f64>,
    #[serde(default)]
    pub finalised: Option<TimestampParts>,
    #[serde(default)]
    pub bet_leg_status_id: String,
    /// Primary market referenced by the leg.
    #[serde(default)]
    pub market_id: String,
}

/// One leg may carry several selections (same-game multis).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetLegSelection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub bet_leg_id: String,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub market_id: String,
    #[serde(default)]
    pub entrant_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub advertised_start: Option<TimestampParts>,
    #[serde(default)]
    pub actual_start: Option<TimestampParts>,
    #[serde(default)]
    pub match_status: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub competition_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsMarket {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_suspended: Option<bool>,
    #[serde(default)]
    pub advertised_start: Option<TimestampParts>,
    #[serde(default)]
    pub actual_start: Option<TimestampParts>,
    /// Market-wide line (totals markets).
    #[serde(default)]
    pub handicap: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsEntrant {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub home_away: Option<String>,
    #[serde(default)]
    pub market_id: String,
    #[serde(default)]
    pub is_suspended: Option<bool>,
    #[serde(default)]
    pub feed_metadata: Option<Value>,
}

impl SportsEntrant {
    /// `feed_metadata.handicap_value` arrives as a number or a numeric
    /// string depending on the feed; anything else reads as absent.
    pub fn handicap_value(&self) -> Option<f64> {
        match self.feed_metadata.as_ref()?.get("handicap_value")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub market_id: String,
    #[serde(default)]
    pub entrant_id: Option<String>,
    #[serde(default)]
    pub result_status_id: String,
}

// ============================================================================
// Event-card schema (REST /v2/sport/event-card)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventCard {
    #[serde(default)]
    pub markets: FxHashMap<String, CardMarket>,
    #[serde(default)]
    pub entrants: FxHashMap<String, CardEntrant>,
    /// Keyed by entrant id plus a feed suffix; matched by prefix.
    #[serde(default)]
    pub prices: FxHashMap<String, CardPrice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardMarket {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handicap: Option<f64>,
    #[serde(default)]
    pub entrant_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardEntrant {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CardPrice {
    #[serde(default)]
    pub odds: FractionalOdds,
}

// ============================================================================
// Sporting-category schema (persisted GraphQL SportingCategoryScreen)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryScreen {
    #[serde(default)]
    pub data: Option<CategoryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    #[serde(default)]
    pub upcoming_events: Option<UpcomingEvents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingEvents {
    #[serde(default)]
    pub events: CategoryEventPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryEventPage {
    #[serde(default)]
    pub nodes: Vec<CategoryEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEvent {
    /// Prefixed ids of the form "sport:uuid".
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub advertised_start: Option<String>,
    #[serde(default)]
    pub competition: Option<Competition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub name: String,
}

// ============================================================================
// Tests
// ============================================================================
