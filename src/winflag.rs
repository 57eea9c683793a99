//! Settled-bet outcome flags for the tracker's Win column.
//!
//! The two history endpoints signal outcomes differently: the statement
//! schema carries a free-text status, the transaction schema only a won
//! amount. Both mappings are kept as-is per schema; the amount-based one
//! has no way to express a pending bet.

/// Status-string variant: Y / N / P (pending, open, void, unknown).
pub fn from_status(status: &str) -> &'static str {
    let s = status.to_lowercase();
    match s.as_str() {
        "win" | "won" => "Y",
        "no return" | "lost" => "N",
        _ => "P",
    }
}

/// Won-amount variant: a positive settlement is a win, everything else
/// (zero, absent, unsettled) reads as a loss.
pub fn from_won_amount(value: Option<f64>) -> &'static str {
    match value {
        Some(v) if v > 0.0 => "Y",
        _ => "N",
    }
}

// ============================================================================
// Tests
// ============================================================================
