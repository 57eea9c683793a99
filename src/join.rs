//! Joins the flat transaction-history maps into per-leg records.
//!
//! A bet leg references a bet, one or more selections, and through each
//! selection an event, market, entrant and settled result. Upstream sends
//! all of these as separate id-keyed maps; this module stitches them back
//! together without copying the underlying records.

use rustc_hash::FxHashMap;

use crate::models::{
    Bet, BetLeg, BetLegSelection, SportsEntrant, SportsEvent, SportsMarket, SportsResult,
    TransactionHistory,
};

/// One selection with every record it references resolved. Any reference
/// the page did not include stays `None`.
#[derive(Debug, Clone)]
pub struct JoinedSelection<'a> {
    pub selection: &'a BetLegSelection,
    pub event: Option<&'a SportsEvent>,
    pub market: Option<&'a SportsMarket>,
    pub entrant: Option<&'a SportsEntrant>,
    pub result: Option<&'a SportsResult>,
    /// Line at settlement: the entrant's feed line when present, else the
    /// market-wide line.
    pub close_handicap: Option<f64>,
    /// Close minus placed, when both lines are known.
    pub handicap_delta: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct JoinedLeg<'a> {
    pub leg: &'a BetLeg,
    pub bet: Option<&'a Bet>,
    /// Ordered by position, then selection id.
    pub selections: Vec<JoinedSelection<'a>>,
}

/// Resolves every leg in the page. Every leg gets an entry, selections or
/// not, so callers can report legs the page delivered incomplete.
pub fn join_bet_legs(history: &TransactionHistory) -> FxHashMap<String, JoinedLeg<'_>> {
    // Results are looked up by (market, entrant). Duplicate keys resolve
    // to the highest result id.
    let mut results: Vec<&SportsResult> = history.sports_results.values().collect();
    results.sort_by(|a, b| a.id.cmp(&b.id));
    let mut result_index: FxHashMap<(&str, &str), &SportsResult> = FxHashMap::default();
    for result in results {
        if let Some(entrant_id) = result.entrant_id.as_deref() {
            result_index.insert((result.market_id.as_str(), entrant_id), result);
        }
    }

    let mut selections_by_leg: FxHashMap<&str, Vec<&BetLegSelection>> = FxHashMap::default();
    for selection in history.bet_leg_selections.values() {
        selections_by_leg
            .entry(selection.bet_leg_id.as_str())
            .or_default()
            .push(selection);
    }
    for group in selections_by_leg.values_mut() {
        group.sort_by(|a, b| {
            a.position
                .unwrap_or(0)
                .cmp(&b.position.unwrap_or(0))
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    let mut joined = FxHashMap::default();
    for leg in history.bet_legs.values() {
        let selections = selections_by_leg
            .remove(leg.id.as_str())
            .unwrap_or_default()
            .into_iter()
            .map(|selection| {
                let market = history.sports_markets.get(&selection.market_id);
                let entrant = history.sports_entrants.get(&selection.entrant_id);
                let close_handicap = entrant
                    .and_then(SportsEntrant::handicap_value)
                    .or_else(|| market.and_then(|m| m.handicap));
                JoinedSelection {
                    selection,
                    event: history.sports_events.get(&selection.event_id),
                    market,
                    entrant,
                    result: result_index
                        .get(&(selection.market_id.as_str(), selection.entrant_id.as_str()))
                        .copied(),
                    close_handicap,
                    handicap_delta: match (close_handicap, leg.handicap) {
                        (Some(close), Some(placed)) => Some(close - placed),
                        _ => None,
                    },
                }
            })
            .collect();
        joined.insert(
            leg.id.clone(),
            JoinedLeg {
                leg,
                bet: history.bets.get(&leg.bet_id),
                selections,
            },
        );
    }
    joined
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlacedOdds, WonAmount};

    fn bet(id: &str, stake: f64, won: Option<f64>) -> Bet {
        Bet {
            id: id.into(),
            stake,
            won_amount: won.map(|value| WonAmount { value: Some(value) }),
            ..Default::default()
        }
    }

    fn leg(id: &str, bet_id: &str, handicap: Option<f64>) -> BetLeg {
        BetLeg {
            id: id.into(),
            bet_id: bet_id.into(),
            handicap,
            placed: PlacedOdds {
                numerator: 22.0,
                denominator: 25.0,
                decimal: Some(1.88),
            },
            ..Default::default()
        }
    }

    fn selection(id: &str, leg_id: &str, position: Option<i64>) -> BetLegSelection {
        BetLegSelection {
            id: id.into(),
            bet_leg_id: leg_id.into(),
            position,
            event_id: "ev1".into(),
            market_id: "m1".into(),
            entrant_id: "en1".into(),
            ..Default::default()
        }
    }

    fn history_fixture() -> TransactionHistory {
        let mut history = TransactionHistory::default();
        history.bets.insert("b1".into(), bet("b1", 25.0, Some(47.0)));
        history.bet_legs.insert("l1".into(), leg("l1", "b1", Some(60.5)));
        history
            .bet_leg_selections
            .insert("s2".into(), selection("s2", "l1", Some(2)));
        history
            .bet_leg_selections
            .insert("s1".into(), selection("s1", "l1", Some(1)));
        history.sports_events.insert(
            "ev1".into(),
            SportsEvent {
                id: "ev1".into(),
                name: "Bills @ Chiefs".into(),
                ..Default::default()
            },
        );
        history.sports_markets.insert(
            "m1".into(),
            SportsMarket {
                id: "m1".into(),
                event_id: "ev1".into(),
                name: "Receiving Yards O/U - T Kelce".into(),
                handicap: Some(59.5),
                ..Default::default()
            },
        );
        history.sports_entrants.insert(
            "en1".into(),
            SportsEntrant {
                id: "en1".into(),
                name: "Over".into(),
                market_id: "m1".into(),
                ..Default::default()
            },
        );
        history.sports_results.insert(
            "r1".into(),
            SportsResult {
                id: "r1".into(),
                market_id: "m1".into(),
                entrant_id: Some("en1".into()),
                result_status_id: "settled".into(),
            },
        );
        history
    }

    #[test]
    fn joins_selections_in_position_order() {
        let history = history_fixture();
        let joined = join_bet_legs(&history);
        assert_eq!(joined.len(), 1);

        let leg = &joined["l1"];
        assert_eq!(leg.bet.map(|b| b.stake), Some(25.0));
        assert_eq!(leg.selections.len(), 2);
        assert_eq!(leg.selections[0].selection.id, "s1");
        assert_eq!(leg.selections[1].selection.id, "s2");

        let first = &leg.selections[0];
        assert_eq!(first.event.map(|e| e.name.as_str()), Some("Bills @ Chiefs"));
        assert_eq!(first.result.map(|r| r.id.as_str()), Some("r1"));
    }

    #[test]
    fn market_handicap_backfills_missing_entrant_line() {
        let history = history_fixture();
        let joined = join_bet_legs(&history);
        let first = &joined["l1"].selections[0];
        // Entrant has no feed line, so the market line closes the gap.
        assert_eq!(first.close_handicap, Some(59.5));
        assert_eq!(first.handicap_delta, Some(59.5 - 60.5));
    }

    #[test]
    fn entrant_feed_line_wins_over_market_line() {
        let mut history = history_fixture();
        if let Some(entrant) = history.sports_entrants.get_mut("en1") {
            entrant.feed_metadata = Some(serde_json::json!({"handicap_value": "61.5"}));
        }
        let joined = join_bet_legs(&history);
        let first = &joined["l1"].selections[0];
        assert_eq!(first.close_handicap, Some(61.5));
        assert_eq!(first.handicap_delta, Some(1.0));
    }

    #[test]
    fn missing_references_stay_none() {
        let mut history = history_fixture();
        history.sports_markets.clear();
        history.sports_results.clear();
        let joined = join_bet_legs(&history);
        let first = &joined["l1"].selections[0];
        assert!(first.market.is_none());
        assert!(first.result.is_none());
        assert_eq!(first.close_handicap, None);
        assert_eq!(first.handicap_delta, None);
    }

    #[test]
    fn leg_without_selections_still_appears() {
        let mut history = history_fixture();
        history.bet_leg_selections.clear();
        history.bet_legs.insert("l2".into(), leg("l2", "missing", None));
        let joined = join_bet_legs(&history);
        assert_eq!(joined.len(), 2);
        assert!(joined["l1"].selections.is_empty());
        assert!(joined["l2"].bet.is_none());
    }

    #[test]
    fn results_without_entrant_are_not_indexed() {
        let mut history = history_fixture();
        history.sports_results.insert(
            "r0".into(),
            SportsResult {
                id: "r0".into(),
                market_id: "m1".into(),
                entrant_id: None,
                result_status_id: "abandoned".into(),
            },
        );
        let joined = join_bet_legs(&history);
        // r0 lacks an entrant so r1 still resolves the (market, entrant) pair.
        let first = &joined["l1"].selections[0];
        assert_eq!(first.result.map(|r| r.id.as_str()), Some("r1"));
    }
}
