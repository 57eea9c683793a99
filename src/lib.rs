//! Betting history exporter for the New Zealand TAB and Betcha sportsbooks.
//!
//! Fetches account statements and the raw transaction ledger from the
//! private bookmaker endpoints, projects them into Betting Tracker
//! spreadsheet rows, and serves the CSV exports plus odds browsing over a
//! small HTTP API.

pub mod bookies;
pub mod classify;
pub mod csv_out;
pub mod event_card;
pub mod fetch;
pub mod join;
pub mod models;
pub mod nzdate;
pub mod odds;
pub mod rows;
pub mod server;
pub mod settings;
pub mod winflag;
