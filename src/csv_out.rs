//! CSV field escaping and document assembly.
//!
//! Output rows target the aussportsbetting.com Betting Tracker import
//! format, so the header layouts and quoting rules are fixed here rather
//! than configurable.

/// Header for the statement export (14 columns).
pub const STATEMENT_HEADER: [&str; 14] = [
    "Date",
    "Bookmaker",
    "Sport / League",
    "Selection",
    "Bet Type",
    "Tipper",
    "My Variable",
    "Fixture / Event",
    "Live Bet",
    "Score / Result",
    "Stake",
    "Odds",
    "BB",
    "Win",
];

/// Header for the transaction export (21 columns). The five unnamed columns
/// are reserved in the tracker sheet for manual entry (cash-out amount,
/// % of bet, commission, lay-bet flag, closing odds) and stay blank.
pub const TRANSACTION_HEADER: [&str; 21] = [
    "Date",
    "Bookmaker",
    "Sport / League",
    "Selection",
    "Bet Type",
    "Tipper",
    "My Variable",
    "Fixture / Event",
    "Live Bet",
    "Score / Result",
    "Stake",
    "Odds",
    "BB",
    "Win",
    "",
    "",
    "",
    "",
    "",
    "Wager Line",
    "Closing Line",
];

/// Escape a single field for embedding in a comma-separated line.
///
/// Fields containing a comma, double quote, or newline are wrapped in
/// double quotes with embedded quotes doubled; everything else passes
/// through unchanged.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render an optional value, blank when absent.
pub fn opt_field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Assemble the final CSV text: header plus one line per row, every field
/// escaped, lines joined with `\n` and no trailing newline. An empty row
/// list yields a header-only document.
pub fn assemble(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        header
            .iter()
            .map(|h| escape_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.iter()
                .map(|f| escape_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Download name for a statement export, e.g. `2024-01-01-2024-01-31_tab-statement.csv`.
pub fn statement_filename(start_date: &str, end_date: &str, service: &str) -> String {
    format!("{start_date}-{end_date}_{service}-statement.csv")
}

/// Download name for the transaction export.
pub const TRANSACTION_FILENAME: &str = "nfl-statement.csv";

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape_field("hello"), "hello");
        assert_eq!(escape_field(""), "");
        assert_eq!(escape_field("1.88"), "1.88");
    }

    #[test]
    fn comma_quote_and_newline_trigger_quoting() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(
            escape_field("He said \"hi\", ok"),
            "\"He said \"\"hi\"\", ok\""
        );
    }

    #[test]
    fn opt_field_blanks_missing_values() {
        assert_eq!(opt_field::<f64>(None), "");
        assert_eq!(opt_field(Some(100.0)), "100");
        assert_eq!(opt_field(Some(10.5)), "10.5");
        assert_eq!(opt_field(Some("x")), "x");
    }

    #[test]
    fn empty_rows_produce_header_only() {
        let csv = assemble(&STATEMENT_HEADER, &[]);
        assert_eq!(
            csv,
            "Date,Bookmaker,Sport / League,Selection,Bet Type,Tipper,My Variable,\
             Fixture / Event,Live Bet,Score / Result,Stake,Odds,BB,Win"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn rows_join_with_single_newline() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c,d".to_string(), "e".to_string()],
        ];
        let csv = assemble(&["H1", "H2"], &rows);
        assert_eq!(csv, "H1,H2\na,b\n\"c,d\",e");
    }

    // The escaping must survive a standards-conforming CSV parser.
    #[test]
    fn escaped_fields_round_trip_through_csv_parser() {
        let tricky = vec![
            "He said \"hi\", ok".to_string(),
            "plain".to_string(),
            "multi\nline".to_string(),
            "trailing,comma,".to_string(),
        ];
        let doc = assemble(&["A", "B", "C", "D"], &[tricky.clone()]);

        let mut reader = csv::ReaderBuilder::new().from_reader(doc.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        let parsed: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        assert_eq!(parsed, tricky);
    }

    #[test]
    fn statement_filename_embeds_range_and_service() {
        assert_eq!(
            statement_filename("2024-01-01", "2024-01-31", "tab"),
            "2024-01-01-2024-01-31_tab-statement.csv"
        );
        assert_eq!(TRANSACTION_FILENAME, "nfl-statement.csv");
    }
}
