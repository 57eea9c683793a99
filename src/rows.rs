//! Projects upstream records into Betting Tracker spreadsheet rows.
//!
//! Both exports share the same first fourteen columns. The statement
//! projection reads activity nodes straight off the GraphQL response; the
//! transaction projection reads joined bet legs and appends the wager-line
//! columns. Missing upstream fields become empty cells, never errors.

use rustc_hash::FxHashMap;

use crate::classify;
use crate::csv_out::opt_field;
use crate::join::JoinedLeg;
use crate::models::{BetTransaction, StatementResponse, StatementTransaction};
use crate::{nzdate, odds, winflag};

/// Strip a display-odds string like " @ 1.88" down to "1.88".
fn numeric_odds(display: &str) -> String {
    display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn created_seconds(node: &StatementTransaction) -> i64 {
    node.transaction
        .as_ref()
        .and_then(|detail| detail.created)
        .and_then(|created| created.seconds)
        .unwrap_or(0)
}

/// Fourteen-column rows for the statement export, oldest bet first.
///
/// Deposits and withdrawals drop out with the type check; cash-outs and
/// multis are excluded because the tracker wants settled singles only.
pub fn statement_rows(response: &StatementResponse, bookmaker: &str) -> Vec<Vec<String>> {
    let mut kept: Vec<(&StatementTransaction, &BetTransaction)> = response
        .data
        .account_transactions
        .nodes
        .iter()
        .filter(|node| node.transaction_type.as_deref() == Some("BET"))
        .filter_map(|node| node.bet_transactions.as_ref().map(|bet| (node, bet)))
        .filter(|(_, bet)| bet.bet_status.as_deref() != Some("Cash Out"))
        .filter(|(_, bet)| !bet.entrant_name.as_deref().unwrap_or("").contains("Multi"))
        .collect();
    kept.sort_by_key(|(node, _)| created_seconds(node));

    kept.into_iter()
        .map(|(node, bet)| {
            let created = node.transaction.as_ref().and_then(|detail| detail.created);
            let label = classify::bet_type(bet.product_name.as_deref().unwrap_or(""));
            let sport = classify::sport(&label);
            let tipper = classify::tipper(&label);
            vec![
                nzdate::from_parts(
                    created.and_then(|c| c.seconds),
                    created.and_then(|c| c.nanos),
                ),
                bookmaker.to_string(),
                sport.to_string(),
                format!(
                    "{}, {}",
                    bet.entrant_name.as_deref().unwrap_or(""),
                    bet.product_name.as_deref().unwrap_or("")
                ),
                label,
                tipper.to_string(),
                String::new(),
                bet.event_name.clone().unwrap_or_default(),
                String::new(),
                String::new(),
                // A zero stake still prints; only an absent amount is blank.
                opt_field(node.transaction.as_ref().and_then(|d| d.request_amount)),
                numeric_odds(bet.bet_odds.as_deref().unwrap_or("")),
                String::new(),
                winflag::from_status(bet.bet_status.as_deref().unwrap_or("")).to_string(),
            ]
        })
        .collect()
}

fn market_start_seconds(leg: &JoinedLeg<'_>) -> i64 {
    leg.selections
        .first()
        .and_then(|s| s.market)
        .and_then(|m| m.actual_start)
        .and_then(|ts| ts.seconds)
        .unwrap_or(0)
}

/// Twenty-one-column rows for the transaction export: NFL prop legs only,
/// ordered by market start time. The wager line flips sign for Over
/// entrants so the tracker reads every line from the favorite's side; the
/// closing line column is left blank for hand entry.
pub fn transaction_rows(joined: &FxHashMap<String, JoinedLeg<'_>>) -> Vec<Vec<String>> {
    let mut legs: Vec<&JoinedLeg> = joined
        .values()
        .filter(|leg| {
            let name = leg
                .selections
                .first()
                .and_then(|s| s.market)
                .map(|m| m.name.as_str())
                .unwrap_or("");
            classify::NFL_PROP_MARKETS
                .iter()
                .any(|market| name.contains(market))
        })
        .collect();
    legs.sort_by(|a, b| {
        market_start_seconds(a)
            .cmp(&market_start_seconds(b))
            .then_with(|| a.leg.id.cmp(&b.leg.id))
    });

    legs.into_iter()
        .map(|leg| {
            let first = leg.selections.first();
            let market = first.and_then(|s| s.market);
            let market_name = market.map(|m| m.name.as_str()).unwrap_or("");
            let entrant_name = first
                .and_then(|s| s.entrant)
                .map(|e| e.name.as_str())
                .unwrap_or("");
            let (bet_type, sport, tipper) =
                classify::prop_market_labels(market_name).unwrap_or(("", "", ""));

            let odds_text = match leg.leg.placed.decimal {
                Some(decimal) => decimal.to_string(),
                None => {
                    odds::decimal_display(leg.leg.placed.numerator, leg.leg.placed.denominator)
                        .unwrap_or_default()
                }
            };
            let won = leg.bet.and_then(|b| b.won_amount).and_then(|w| w.value);
            let wager_line = opt_field(
                leg.leg
                    .handicap
                    .filter(|line| *line != 0.0)
                    .map(|line| if entrant_name == "Over" { -line } else { line }),
            );

            vec![
                nzdate::from_seconds(
                    market.and_then(|m| m.actual_start).and_then(|ts| ts.seconds),
                ),
                "tab".to_string(),
                sport.to_string(),
                format!("{} ({})", market_name, entrant_name),
                bet_type.to_string(),
                tipper.to_string(),
                String::new(),
                first
                    .and_then(|s| s.event)
                    .map(|e| e.name.clone())
                    .unwrap_or_default(),
                String::new(),
                String::new(),
                // Unlike the statement export, a zero stake is blank here.
                opt_field(leg.bet.map(|b| b.stake).filter(|stake| *stake != 0.0)),
                odds_text,
                String::new(),
                winflag::from_won_amount(won).to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                wager_line,
                String::new(),
            ]
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
