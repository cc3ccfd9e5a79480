//! CSV journal entry importer.

use crate::config::{ColumnSpec, CsvConfig};
use crate::{ImportResult, Importer};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rustpnl_core::JournalEntry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Cell values read as missing, the same set spreadsheet exports use for nulls.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Largest accepted debit or credit magnitude.
///
/// Summing up to 10^10 rows at this bound stays below `Decimal::MAX`, so
/// report totals cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// CSV journal entry importer.
pub struct CsvImporter {
    config: CsvConfig,
}

impl CsvImporter {
    /// Create a new CSV importer with the given configuration.
    pub const fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Extract journal entries from a file.
    pub fn extract_file(&self, path: &Path) -> Result<ImportResult> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        self.extract_string(&content)
    }

    /// Extract journal entries from string content.
    pub fn extract_string(&self, content: &str) -> Result<ImportResult> {
        let config = &self.config;
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| {
                format!(
                    "delimiter '{}' is not a single ASCII character",
                    config.delimiter
                )
            })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_header)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        // Build column name to index map from headers; a repeated name keeps its first column
        let mut header_map: HashMap<String, usize> = HashMap::new();
        if config.has_header {
            let headers = reader.headers().context("Failed to read CSV header")?;
            for (i, h) in headers.iter().enumerate() {
                header_map.entry(h.trim().to_string()).or_insert(i);
            }
        }

        let columns = self.resolve_columns(&header_map)?;
        tracing::debug!(?columns, "resolved journal entry columns");

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        let mut row_num = config.skip_rows;

        for result in reader.records().skip(config.skip_rows) {
            row_num += 1;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warnings.push(format!("Row {row_num}: parse error: {e}"));
                    continue;
                }
            };

            match self.parse_row(&record, &columns, row_num, &mut warnings) {
                Ok(entry) => entries.push(entry),
                Err(e) => warnings.push(format!("Row {row_num}: {e}")),
            }
        }

        let mut result = ImportResult::new(entries);
        for warning in warnings {
            result = result.with_warning(warning);
        }
        Ok(result)
    }

    /// Map every required column to its index, failing on the first missing one.
    fn resolve_columns(&self, header_map: &HashMap<String, usize>) -> Result<Columns> {
        let mut indices = [0usize; 5];
        for (slot, (field, spec)) in indices.iter_mut().zip(self.config.required_columns()) {
            *slot = match spec {
                ColumnSpec::Index(i) => *i,
                ColumnSpec::Name(name) => {
                    if !self.config.has_header {
                        bail!("{field} column {spec} needs a header row; use a column index");
                    }
                    *header_map
                        .get(name.as_str())
                        .with_context(|| format!("missing required column '{name}'"))?
                }
            };
        }

        let [account, debit, credit, currency, date_time] = indices;
        Ok(Columns {
            account,
            debit,
            credit,
            currency,
            date_time,
        })
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        columns: &Columns,
        row_num: usize,
        warnings: &mut Vec<String>,
    ) -> Result<JournalEntry> {
        let cell = |index: usize| record.get(index).map_or("", str::trim);

        let account_name = cell(columns.account);
        if is_missing(account_name) {
            bail!("missing account name");
        }

        let debit = parse_amount_cell(cell(columns.debit))
            .with_context(|| format!("invalid debit value '{}'", cell(columns.debit)))?;
        let credit = parse_amount_cell(cell(columns.credit))
            .with_context(|| format!("invalid credit value '{}'", cell(columns.credit)))?;

        let currency = cell(columns.currency);
        let currency_id = (!is_missing(currency)).then(|| currency.to_string());

        let raw_date_time = cell(columns.date_time);
        let local_date_time = if is_missing(raw_date_time) {
            None
        } else {
            let parsed =
                parse_local_date_time(raw_date_time, self.config.date_time_format.as_deref());
            if parsed.is_none() {
                warnings.push(format!(
                    "Row {row_num}: unparseable timestamp '{raw_date_time}', entry left out of every period"
                ));
            }
            parsed
        };

        Ok(JournalEntry {
            account_name: account_name.to_string(),
            debit,
            credit,
            currency_id,
            local_date_time,
        })
    }
}

impl Importer for CsvImporter {
    fn name(&self) -> &str {
        "csv"
    }

    fn identify(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
    }

    fn extract(&self, path: &Path) -> Result<ImportResult> {
        self.extract_file(path)
    }

    fn description(&self) -> &str {
        "CSV journal entry export (accountName, debit, credit, currencyId, localDateTime)"
    }
}

/// Resolved column indices.
#[derive(Debug)]
struct Columns {
    account: usize,
    debit: usize,
    credit: usize,
    currency: usize,
    date_time: usize,
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Parse a debit or credit cell. Missing values are zero; amounts beyond
/// [`MAX_AMOUNT`] are rejected.
fn parse_amount_cell(s: &str) -> Option<Decimal> {
    if is_missing(s) {
        return Some(Decimal::ZERO);
    }
    parse_money_string(s).filter(|amount| amount.abs() <= MAX_AMOUNT)
}

/// Parse a money string, handling currency symbols, parentheses for negatives, etc.
fn parse_money_string(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Check for parentheses indicating negative
    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let value = match Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
        Ok(value) => value,
        Err(_) => {
            // Remove currency symbols and commas
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned).ok()?
        }
    };

    if is_negative {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Parse a local timestamp.
///
/// With an explicit format only that format is tried (as a date-time, then as
/// a date at midnight). Otherwise RFC 3339 and a list of common layouts are
/// tried; offsets are dropped and the wall-clock time is kept.
fn parse_local_date_time(s: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    let s = s.trim();
    let at_midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);

    if let Some(format) = format {
        return NaiveDateTime::parse_from_str(s, format)
            .ok()
            .or_else(|| NaiveDate::parse_from_str(s, format).ok().and_then(at_midnight));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(at_midnight)
        })
}
