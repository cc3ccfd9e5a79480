//! P&L report CLI tools.
//!
//! This crate provides the command-line front end for rustpnl:
//!
//! - `rpnl-report`: Load a journal entry CSV export and print one Profit & Loss
//!   report per month, quarter or year
//!
//! # Example Usage
//!
//! ```bash
//! rpnl-report journal.csv
//! rpnl-report journal.csv --granularity quarterly --format csv
//! rpnl-report journal.csv -g yearly -f json --rules rules.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod render;
