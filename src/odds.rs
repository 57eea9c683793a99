//! Fractional odds arithmetic.
//!
//! Upstream prices arrive as numerator/denominator pairs; the tracker
//! spreadsheet wants decimal odds with two decimal places.

/// Convert fractional odds to decimal odds (`n/d + 1`).
///
/// Returns `None` when the denominator is zero; callers render a blank
/// field or `"N/A"` instead of dividing.
pub fn fractional_to_decimal(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator + 1.0)
}

/// Decimal odds rendered with exactly two decimal places, e.g. 22/25 -> "1.88".
pub fn decimal_display(numerator: f64, denominator: f64) -> Option<String> {
    fractional_to_decimal(numerator, denominator).map(|d| format!("{:.2}", d))
}

// ============================================================================
// Tests
// ============================================================================
