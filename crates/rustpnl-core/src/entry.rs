//! Journal entry rows as exported by the accounting platform.
//!
//! A [`JournalEntry`] is one line of a double-entry journal: an amount debited
//! and/or credited against a named account. Rows without a currency identifier
//! are the marker used to spot the digital-asset holding account.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single journal entry row.
///
/// # Examples
///
/// ```
/// use rustpnl_core::JournalEntry;
/// use rust_decimal_macros::dec;
///
/// let entry = JournalEntry::new("Sales Revenue", dec!(0), dec!(200)).with_currency("USD");
/// assert_eq!(entry.credit, dec!(200));
/// assert!(!entry.is_currency_less());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Name of the ledger account.
    pub account_name: String,
    /// Amount debited (zero when not applicable).
    pub debit: Decimal,
    /// Amount credited (zero when not applicable).
    pub credit: Decimal,
    /// Fiat currency identifier, `None` when the row carries no currency.
    pub currency_id: Option<String>,
    /// Local timestamp of the entry, `None` when missing or unparseable.
    pub local_date_time: Option<NaiveDateTime>,
}

impl JournalEntry {
    /// Create an entry without currency or timestamp.
    pub fn new(account_name: impl Into<String>, debit: Decimal, credit: Decimal) -> Self {
        Self {
            account_name: account_name.into(),
            debit,
            credit,
            currency_id: None,
            local_date_time: None,
        }
    }

    /// Set the currency identifier.
    pub fn with_currency(mut self, currency_id: impl Into<String>) -> Self {
        self.currency_id = Some(currency_id.into());
        self
    }

    /// Set the local timestamp.
    pub const fn with_date_time(mut self, local_date_time: NaiveDateTime) -> Self {
        self.local_date_time = Some(local_date_time);
        self
    }

    /// Whether this row has no currency identifier.
    ///
    /// Such rows are candidates for the digital-asset account.
    #[must_use]
    pub const fn is_currency_less(&self) -> bool {
        self.currency_id.is_none()
    }
}
