//! Core types for rustpnl
//!
//! This crate turns journal entries exported from a digital-asset accounting
//! platform into Profit & Loss reports:
//!
//! - [`JournalEntry`] - One debit/credit row against a named account
//! - [`AccountClassifier`] - Keyword rules mapping account names to [`AccountType`]
//! - [`ReportBuilder`] - Aggregates a period's entries into a [`PnlReport`]
//! - [`Granularity`] / [`Period`] - Monthly, quarterly or yearly bucketing
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! # Example
//!
//! ```
//! use rustpnl_core::{build_report, AccountType, JournalEntry};
//! use rust_decimal_macros::dec;
//!
//! let entries = vec![
//!     JournalEntry::new("Sales Revenue", dec!(0), dec!(200)).with_currency("USD"),
//!     JournalEntry::new("Legal Fees", dec!(30), dec!(0)).with_currency("USD"),
//!     JournalEntry::new("BTC Wallet", dec!(100), dec!(0)),
//! ];
//!
//! let report = build_report(&entries);
//! let types: Vec<_> = report.operating_rows().map(|a| a.account_type).collect();
//! assert_eq!(types, vec![AccountType::Revenue, AccountType::Expense]);
//!
//! // The currency-less account is held apart for reconciliation
//! assert_eq!(report.digital_asset_account.as_deref(), Some("BTC Wallet"));
//! assert_eq!(report.digital_debit_total, dec!(100));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod entry;
pub mod period;
pub mod report;

pub use classify::{classify, AccountClassifier, AccountType, ClassificationRule, RulesError};
pub use entry::JournalEntry;
pub use period::{
    bucket_entries, period_reports, Buckets, Granularity, ParseGranularityError, Period,
    PeriodReport, PeriodReports,
};
pub use report::{
    build_report, AccountAggregate, PnlReport, ReportBuilder, ReportRow,
    RECONCILIATION_SEPARATOR_ROWS,
};

// Re-export commonly used external types
pub use chrono::{NaiveDate, NaiveDateTime};
pub use rust_decimal::Decimal;
