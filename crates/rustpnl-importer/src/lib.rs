//! Import framework for rustpnl
//!
//! This crate loads journal entries exported from a digital-asset accounting
//! platform into [`JournalEntry`] values ready for report building.
//!
//! # Overview
//!
//! Each importer implements the [`Importer`] trait. Rows that cannot be read
//! are skipped and reported as warnings in the [`ImportResult`]; a file that is
//! missing a required column is rejected outright.
//!
//! # Example
//!
//! ```rust
//! use rustpnl_importer::{extract_from_string, ImporterConfig};
//!
//! let config = ImporterConfig::csv()
//!     .account_column("accountName")
//!     .currency_column("currencyId")
//!     .build();
//!
//! let csv = "accountName,debit,credit,currencyId,localDateTime\n\
//!            BTC Wallet,100,0,,2024-01-15T10:00:00\n";
//! let result = extract_from_string(csv, &config).unwrap();
//! assert!(result.entries[0].is_currency_less());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;

use anyhow::Result;
use rustpnl_core::JournalEntry;
use std::path::Path;

pub use config::{ColumnSpec, CsvConfig, ImporterConfig};
pub use csv_importer::{CsvImporter, MAX_AMOUNT};

/// Result of an import operation.
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// The extracted entries, in file order.
    pub entries: Vec<JournalEntry>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Create a new import result.
    pub const fn new(entries: Vec<JournalEntry>) -> Self {
        Self {
            entries,
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the result.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Trait for file importers.
///
/// Implementors of this trait can extract journal entries from a particular
/// export format.
pub trait Importer: Send + Sync {
    /// Returns the name of this importer.
    fn name(&self) -> &str;

    /// Check if this importer can handle the given file.
    ///
    /// This method should be fast - it typically checks the file extension.
    fn identify(&self, path: &Path) -> bool;

    /// Extract entries from the given file.
    fn extract(&self, path: &Path) -> Result<ImportResult>;

    /// Returns a description of what this importer handles.
    fn description(&self) -> &str {
        self.name()
    }
}

/// Extract journal entries from a file using the given configuration.
pub fn extract_from_file(path: &Path, config: &ImporterConfig) -> Result<ImportResult> {
    config.extract(path)
}

/// Extract journal entries from file contents (useful for testing).
pub fn extract_from_string(content: &str, config: &ImporterConfig) -> Result<ImportResult> {
    config.extract_from_string(content)
}
