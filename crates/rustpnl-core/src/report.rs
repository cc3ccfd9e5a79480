//! Profit & Loss report building.
//!
//! A [`PnlReport`] covers one period. It lists the operating accounts with their
//! debit and credit totals, then two blank separator rows, then the
//! reconciliation block holding the digital-asset account (if one was found).
//!
//! The digital-asset account is the first account name, in input order, that
//! appears on a row without a currency identifier. When several such accounts
//! exist, only the first one is moved to the reconciliation block; the others
//! stay in the operating block.

use crate::classify::{AccountClassifier, AccountType};
use crate::entry::JournalEntry;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Number of blank rows between the operating and reconciliation blocks.
pub const RECONCILIATION_SEPARATOR_ROWS: usize = 2;

/// Debit and credit totals for one account within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountAggregate {
    /// The account name (group key).
    #[serde(rename = "accountName")]
    pub account_name: String,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Classification of the account name.
    pub account_type: AccountType,
}

/// One row of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportRow {
    /// An account with its totals.
    Account(AccountAggregate),
    /// A structural separator row with no values.
    Blank,
}

impl ReportRow {
    /// The aggregate on this row, if it is not a separator.
    pub const fn account(&self) -> Option<&AccountAggregate> {
        match self {
            Self::Account(aggregate) => Some(aggregate),
            Self::Blank => None,
        }
    }

    /// Whether this is a separator row.
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// The P&L report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PnlReport {
    /// Operating rows, separators, then the reconciliation row.
    pub rows: Vec<ReportRow>,
    /// The identified digital-asset account, if any.
    pub digital_asset_account: Option<String>,
    /// Total debits to the digital-asset account (zero if none).
    pub digital_debit_total: Decimal,
    /// Total credits to the digital-asset account (zero if none).
    pub digital_credit_total: Decimal,
}

impl PnlReport {
    /// Rows of the operating block.
    pub fn operating_rows(&self) -> impl Iterator<Item = &AccountAggregate> {
        self.rows.iter().map_while(ReportRow::account)
    }

    /// The reconciliation row for the digital-asset account.
    pub fn reconciliation_row(&self) -> Option<&AccountAggregate> {
        self.rows
            .iter()
            .skip_while(|row| !row.is_blank())
            .find_map(ReportRow::account)
    }

    /// Whether no account rows exist in either block.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(ReportRow::is_blank)
    }
}

/// Builds P&L reports with a given classifier.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    classifier: AccountClassifier,
}

impl ReportBuilder {
    /// Create a builder using the given classifier.
    pub const fn new(classifier: AccountClassifier) -> Self {
        Self { classifier }
    }

    /// Build the report for one period's entries.
    ///
    /// # Panics
    ///
    /// Panics if an account total overflows `Decimal`. The CSV importer caps
    /// each amount so imported journals stay far below that limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustpnl_core::{JournalEntry, ReportBuilder};
    /// use rust_decimal_macros::dec;
    ///
    /// let entries = vec![
    ///     JournalEntry::new("Sales Revenue", dec!(0), dec!(200)).with_currency("USD"),
    ///     JournalEntry::new("BTC Wallet", dec!(100), dec!(0)),
    /// ];
    /// let report = ReportBuilder::default().build(&entries);
    ///
    /// assert_eq!(report.digital_asset_account.as_deref(), Some("BTC Wallet"));
    /// assert_eq!(report.operating_rows().count(), 1);
    /// assert_eq!(report.digital_debit_total, dec!(100));
    /// ```
    pub fn build(&self, entries: &[JournalEntry]) -> PnlReport {
        let digital_asset_account = entries
            .iter()
            .find(|e| e.is_currency_less())
            .map(|e| e.account_name.clone());

        let is_asset = |entry: &&JournalEntry| {
            digital_asset_account.as_deref() == Some(entry.account_name.as_str())
        };

        let operating = self.aggregate(entries.iter().filter(|e| !is_asset(e)));
        let reconciliation = self.aggregate(entries.iter().filter(is_asset));

        let (digital_debit_total, digital_credit_total) = reconciliation
            .first()
            .map_or((Decimal::ZERO, Decimal::ZERO), |a| {
                (a.total_debit, a.total_credit)
            });

        let mut rows = Vec::with_capacity(
            operating.len() + RECONCILIATION_SEPARATOR_ROWS + reconciliation.len(),
        );
        rows.extend(operating.into_iter().map(ReportRow::Account));
        rows.extend(std::iter::repeat(ReportRow::Blank).take(RECONCILIATION_SEPARATOR_ROWS));
        rows.extend(reconciliation.into_iter().map(ReportRow::Account));

        PnlReport {
            rows,
            digital_asset_account,
            digital_debit_total,
            digital_credit_total,
        }
    }

    /// Group entries by account name in first-appearance order and sum them.
    fn aggregate<'a>(
        &self,
        entries: impl Iterator<Item = &'a JournalEntry>,
    ) -> Vec<AccountAggregate> {
        let mut aggregates: Vec<AccountAggregate> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for entry in entries {
            let slot = *index.entry(&entry.account_name).or_insert_with(|| {
                aggregates.push(AccountAggregate {
                    account_name: entry.account_name.clone(),
                    total_debit: Decimal::ZERO,
                    total_credit: Decimal::ZERO,
                    account_type: self.classifier.classify(&entry.account_name),
                });
                aggregates.len() - 1
            });
            let aggregate = &mut aggregates[slot];
            aggregate.total_debit += entry.debit;
            aggregate.total_credit += entry.credit;
        }

        aggregates
    }
}

/// Build a report with the default classification rules.
pub fn build_report(entries: &[JournalEntry]) -> PnlReport {
    ReportBuilder::default().build(entries)
}
