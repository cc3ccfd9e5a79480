//! Configuration for importers.

use crate::csv_importer::CsvImporter;
use crate::ImportResult;
use anyhow::Result;
use std::convert::Infallible;
use std::path::Path;
use std::str::FromStr;

/// Configuration for an importer.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Settings for the CSV journal entry export.
    pub csv: CsvConfig,
}

/// Configuration specific to CSV imports.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// The column holding the account name.
    pub account_column: ColumnSpec,
    /// The column holding the debit amount.
    pub debit_column: ColumnSpec,
    /// The column holding the credit amount.
    pub credit_column: ColumnSpec,
    /// The column holding the currency identifier.
    pub currency_column: ColumnSpec,
    /// The column holding the local timestamp.
    pub date_time_column: ColumnSpec,
    /// Explicit timestamp format (strftime-style); common formats are tried when unset.
    pub date_time_format: Option<String>,
    /// Whether the CSV has a header row.
    pub has_header: bool,
    /// The field delimiter; must be a single ASCII character.
    pub delimiter: char,
    /// Number of data rows to skip at the beginning.
    pub skip_rows: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            account_column: ColumnSpec::Name("accountName".to_string()),
            debit_column: ColumnSpec::Name("debit".to_string()),
            credit_column: ColumnSpec::Name("credit".to_string()),
            currency_column: ColumnSpec::Name("currencyId".to_string()),
            date_time_column: ColumnSpec::Name("localDateTime".to_string()),
            date_time_format: None,
            has_header: true,
            delimiter: ',',
            skip_rows: 0,
        }
    }
}

impl CsvConfig {
    /// All required columns with the field they feed.
    pub(crate) fn required_columns(&self) -> [(&'static str, &ColumnSpec); 5] {
        [
            ("account", &self.account_column),
            ("debit", &self.debit_column),
            ("credit", &self.credit_column),
            ("currency", &self.currency_column),
            ("date-time", &self.date_time_column),
        ]
    }
}

/// Specification for a column in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Column specified by name (from header).
    Name(String),
    /// Column specified by zero-based index.
    Index(usize),
}

impl std::fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl From<&str> for ColumnSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColumnSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ColumnSpec {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Digits are read as a zero-based index, anything else as a header name.
impl FromStr for ColumnSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<usize>()
            .map_or_else(|_| Self::Name(s.trim().to_string()), Self::Index))
    }
}

impl ImporterConfig {
    /// Start building a CSV importer configuration.
    pub fn csv() -> CsvConfigBuilder {
        CsvConfigBuilder::new()
    }

    /// Create the importer described by this configuration.
    pub fn importer(&self) -> CsvImporter {
        CsvImporter::new(self.csv.clone())
    }

    /// Extract journal entries from a file.
    pub fn extract(&self, path: &Path) -> Result<ImportResult> {
        self.importer().extract_file(path)
    }

    /// Extract journal entries from string content.
    pub fn extract_from_string(&self, content: &str) -> Result<ImportResult> {
        self.importer().extract_string(content)
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        CsvConfigBuilder::new().build()
    }
}

/// Builder for CSV importer configuration.
pub struct CsvConfigBuilder {
    config: CsvConfig,
}

impl CsvConfigBuilder {
    /// Create a new CSV config builder with the platform's default column names.
    pub fn new() -> Self {
        Self {
            config: CsvConfig::default(),
        }
    }

    /// Set the account name column, by header name or zero-based index.
    pub fn account_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.config.account_column = column.into();
        self
    }

    /// Set the debit column, by header name or zero-based index.
    pub fn debit_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.config.debit_column = column.into();
        self
    }

    /// Set the credit column, by header name or zero-based index.
    pub fn credit_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.config.credit_column = column.into();
        self
    }

    /// Set the currency identifier column, by header name or zero-based index.
    pub fn currency_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.config.currency_column = column.into();
        self
    }

    /// Set the timestamp column, by header name or zero-based index.
    pub fn date_time_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.config.date_time_column = column.into();
        self
    }

    /// Set an explicit timestamp format (strftime-style).
    pub fn date_time_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_time_format = Some(format.into());
        self
    }

    /// Set whether the CSV has a header row.
    pub const fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// Set the field delimiter.
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the number of data rows to skip.
    pub const fn skip_rows(mut self, count: usize) -> Self {
        self.config.skip_rows = count;
        self
    }

    /// Build the importer configuration.
    pub fn build(self) -> ImporterConfig {
        ImporterConfig { csv: self.config }
    }
}

impl Default for CsvConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let config = ImporterConfig::default().csv;
        assert_eq!(config.account_column, ColumnSpec::Name("accountName".into()));
        assert_eq!(config.currency_column, ColumnSpec::Name("currencyId".into()));
        assert_eq!(
            config.date_time_column,
            ColumnSpec::Name("localDateTime".into())
        );
        assert!(config.has_header);
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn test_builder_overrides() {
        let config = ImporterConfig::csv()
            .account_column("Account")
            .debit_column(3)
            .date_time_format("%d.%m.%Y")
            .delimiter(';')
            .skip_rows(2)
            .build()
            .csv;

        assert_eq!(config.account_column, ColumnSpec::Name("Account".into()));
        assert_eq!(config.debit_column, ColumnSpec::Index(3));
        assert_eq!(config.date_time_format.as_deref(), Some("%d.%m.%Y"));
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.skip_rows, 2);
    }

    #[test]
    fn test_column_spec_from_str() {
        assert_eq!("3".parse::<ColumnSpec>(), Ok(ColumnSpec::Index(3)));
        assert_eq!(
            " Account ".parse::<ColumnSpec>(),
            Ok(ColumnSpec::Name("Account".into()))
        );
        assert_eq!(
            "-1".parse::<ColumnSpec>(),
            Ok(ColumnSpec::Name("-1".into()))
        );
    }

    #[test]
    fn test_column_spec_display() {
        assert_eq!(ColumnSpec::Name("debit".into()).to_string(), "'debit'");
        assert_eq!(ColumnSpec::Index(4).to_string(), "#4");
    }
}
