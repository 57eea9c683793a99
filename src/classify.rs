//! Heuristic classification of free-text product/market names.
//!
//! The statement endpoint describes bets with strings like
//! "QB Passing Yards O/U - Geno Smith" or "LeBron James (LAL) To Have 30+
//! Points". Keyword presence decides the tracker's Bet Type, Sport, and
//! Tipper columns; no keyword match is the valid "uncategorized" case and
//! yields empty strings across the board.

/// Category keywords in priority order, with the alternate-line label and
/// the standard label for each. The "recieving" misspelling appears in
/// live upstream data.
const CATEGORY_TABLE: [(&[&str], &str, &str); 6] = [
    (&["rushing yards"], "Alt Rushing", "Rushing Yards"),
    (
        &["receiving yards", "recieving yards"],
        "Alt Receiving",
        "Receiving Yards",
    ),
    (&["passing yards"], "Alt Passing", "Passing Yards"),
    (&["points"], "Alt Points", "Points"),
    (&["rebounds"], "Alt Rebounds", "Rebounds"),
    (&["assists"], "Alt Assists", "Assists"),
];

const NFL_KEYWORDS: [&str; 3] = ["rushing", "receiving", "passing"];
const NBA_KEYWORDS: [&str; 3] = ["points", "rebounds", "assists"];

/// Classify a product name into a bet-type label ("Rushing Yards",
/// "Alt Points", ...). "to have"/"to score" phrasing marks an alternate
/// line. Returns an empty string when nothing matches.
pub fn bet_type(raw: &str) -> String {
    let text = raw.to_lowercase();
    let is_alt = text.contains("to have") || text.contains("to score");

    for (keywords, alt_label, label) in CATEGORY_TABLE {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return if is_alt { alt_label } else { label }.to_string();
        }
    }
    String::new()
}

/// Infer the sport from a bet-type label: yardage categories are NFL,
/// counting-stat categories are NBA.
pub fn sport(bet_type: &str) -> &'static str {
    if bet_type.is_empty() {
        return "";
    }
    let lower = bet_type.to_lowercase();
    if NFL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return "NFL";
    }
    if NBA_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return "NBA";
    }
    ""
}

/// Tipper grouping for a bet-type label: alternate lines are tracked
/// separately from standard props.
pub fn tipper(bet_type: &str) -> &'static str {
    if bet_type.is_empty() {
        return "";
    }
    if bet_type.to_lowercase().contains("alt") {
        "Alt Props"
    } else {
        "Props"
    }
}

/// Market names the transaction export keeps. Matching is by substring,
/// so suffixed forms like "Rushing Yards O/U - J Jacobs" qualify.
pub const NFL_PROP_MARKETS: [&str; 4] = [
    "Receiving Yards O/U",
    "Passing Yards O/U",
    "Rushing Yards O/U",
    "Anytime Touchdown Scorer",
];

/// Label a transaction-history market name as (bet type, sport, tipper).
/// Yardage markets only qualify in their player-suffixed "Yards O/U -"
/// form; a bare "Rushing Yards O/U" stays unlabeled even though the
/// export filter admits it.
pub fn prop_market_labels(market_name: &str) -> Option<(&'static str, &'static str, &'static str)> {
    if market_name.contains("Yards O/U -") {
        for kind in ["Receiving Yards", "Passing Yards", "Rushing Yards"] {
            if market_name.contains(kind) {
                return Some((kind, "NFL", "Props"));
            }
        }
    }
    if market_name.contains("Anytime Touchdown Scorer") {
        return Some(("ATS", "NFL", "ATS"));
    }
    None
}

/// Extract a leading `Name (Team)` pair from a product name, e.g.
/// "Josh Jacobs (LV) Rushing Yards" -> ("Josh Jacobs", "LV").
pub fn player_team(raw: &str) -> Option<(String, String)> {
    let mut search_from = 0;
    while let Some(rel) = raw[search_from..].find('(') {
        let open = search_from + rel;
        let close_rel = raw[open + 1..].find(')')?;
        let inner = &raw[open + 1..open + 1 + close_rel];
        if !inner.is_empty() {
            let name = raw[..open].trim();
            if !name.is_empty() {
                return Some((name.to_string(), inner.trim().to_string()));
            }
        }
        search_from = open + 1;
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
