//! Read-only odds views: a flattened event card and the upcoming-events
//! listing grouped by competition.

use serde::Serialize;

use crate::models::{CardMarket, CategoryScreen, EventCard};
use crate::odds;

/// Markets shown even without a line, provided they are two-sided.
const WIN_MARKET_NAMES: [&str; 4] = [
    "Match Betting",
    "Match Result",
    "Fight Betting",
    "Match Winner",
];

#[derive(Debug, Clone, Serialize)]
pub struct EntrantView {
    pub name: String,
    /// Decimal odds, or "N/A" when no price is published.
    pub odds: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap: Option<f64>,
    pub entrants: Vec<EntrantView>,
}

/// Flattens an event card to the markets a bettor actually reads:
/// two-sided win markets plus anything carrying a line. Markets sort by
/// name, then line descending so stacked totals read top-down.
pub fn normalize_card(card: &EventCard) -> Vec<MarketView> {
    // Prefix matching against the price map has to be order-stable.
    let mut price_keys: Vec<&str> = card.prices.keys().map(String::as_str).collect();
    price_keys.sort_unstable();

    let mut markets: Vec<&CardMarket> = card
        .markets
        .values()
        .filter(|market| {
            (market.entrant_ids.len() <= 2 && WIN_MARKET_NAMES.contains(&market.name.as_str()))
                || market.handicap.is_some()
        })
        .collect();
    markets.sort_by(|a, b| {
        a.name.cmp(&b.name).then_with(|| {
            b.handicap
                .unwrap_or(0.0)
                .total_cmp(&a.handicap.unwrap_or(0.0))
        })
    });

    markets
        .into_iter()
        .map(|market| MarketView {
            name: market.name.clone(),
            handicap: market.handicap,
            entrants: market
                .entrant_ids
                .iter()
                .filter_map(|entrant_id| {
                    let entrant = card.entrants.get(entrant_id)?;
                    let odds = price_keys
                        .iter()
                        .find(|key| key.starts_with(entrant_id.as_str()))
                        .and_then(|key| card.prices.get(*key))
                        .and_then(|price| {
                            odds::decimal_display(price.odds.numerator, price.odds.denominator)
                        })
                        .unwrap_or_else(|| "N/A".to_string());
                    Some(EntrantView {
                        name: entrant.name.clone(),
                        odds,
                    })
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertised_start: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionGroup {
    pub competition: String,
    pub events: Vec<EventSummary>,
}

/// Groups upcoming events under their competition, competitions in
/// first-seen order. Events without a competition group under "".
pub fn group_by_competition(screen: &CategoryScreen) -> Vec<CompetitionGroup> {
    let nodes = screen
        .data
        .as_ref()
        .and_then(|data| data.upcoming_events.as_ref())
        .map(|upcoming| upcoming.events.nodes.as_slice())
        .unwrap_or(&[]);

    let mut groups: Vec<CompetitionGroup> = Vec::new();
    for event in nodes {
        let competition = event
            .competition
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let summary = EventSummary {
            id: event.id.clone(),
            name: event.name.clone(),
            advertised_start: event.advertised_start.clone(),
        };
        match groups.iter_mut().find(|g| g.competition == competition) {
            Some(group) => group.events.push(summary),
            None => groups.push(CompetitionGroup {
                competition: competition.to_string(),
                events: vec![summary],
            }),
        }
    }
    groups
}

// ============================================================================
// Tests
// ============================================================================
