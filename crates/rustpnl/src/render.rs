//! Report rendering as text tables, CSV or JSON.

use clap::ValueEnum;
use rust_decimal::Decimal;
use rustpnl_core::{PeriodReport, PnlReport, ReportRow};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// Column headings, in display order.
pub const COLUMNS: [&str; 4] = ["accountName", "total_debit", "total_credit", "account_type"];

/// Printed in place of the reconciliation summary when no asset account was found.
pub const NO_ASSET_ACCOUNT_WARNING: &str =
    "No digital asset account identified. No entries with blank 'currencyId' found.";

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    #[default]
    Text,
    /// One CSV table covering every period
    Csv,
    /// JSON array of periods
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Write period reports in the requested format.
pub fn write_reports<W: Write>(
    reports: &[PeriodReport],
    format: OutputFormat,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(reports, writer),
        OutputFormat::Csv => write_csv(reports, writer),
        OutputFormat::Json => write_json(reports, writer),
    }
}

/// Write each period as a titled section with a summary and a table.
pub fn write_text<W: Write>(reports: &[PeriodReport], writer: &mut W) -> io::Result<()> {
    if reports.is_empty() {
        writeln!(writer, "No dated journal entries found.")?;
        return Ok(());
    }

    for (i, period_report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        let title = period_report.period.title();
        writeln!(writer, "{title}")?;
        writeln!(writer, "{}", "=".repeat(title.chars().count()))?;
        writeln!(writer)?;
        write_summary(&period_report.report, writer)?;
        writeln!(writer)?;
        write_table(&period_report.report, writer)?;
    }

    Ok(())
}

/// Write the reconciliation summary lines, or the missing-account warning.
fn write_summary<W: Write>(report: &PnlReport, writer: &mut W) -> io::Result<()> {
    match &report.digital_asset_account {
        Some(account) => {
            writeln!(
                writer,
                "Identified Digital Asset Account (for reconciliation): {account}"
            )?;
            writeln!(
                writer,
                "Total Debits to Digital Asset Account: {}",
                report.digital_debit_total
            )?;
            writeln!(
                writer,
                "Total Credits to Digital Asset Account: {}",
                report.digital_credit_total
            )
        }
        None => writeln!(writer, "warning: {NO_ASSET_ACCOUNT_WARNING}"),
    }
}

/// Cells of one row; separators are all empty.
fn row_cells(row: &ReportRow) -> [String; 4] {
    match row {
        ReportRow::Account(a) => [
            a.account_name.clone(),
            a.total_debit.to_string(),
            a.total_credit.to_string(),
            a.account_type.to_string(),
        ],
        ReportRow::Blank => Default::default(),
    }
}

fn write_table<W: Write>(report: &PnlReport, writer: &mut W) -> io::Result<()> {
    let cells: Vec<[String; 4]> = report.rows.iter().map(row_cells).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let [name_w, debit_w, credit_w, type_w] = widths;

    writeln!(
        writer,
        "{:<name_w$}  {:>debit_w$}  {:>credit_w$}  {:<type_w$}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3]
    )?;
    writeln!(
        writer,
        "{}",
        "-".repeat(name_w + debit_w + credit_w + type_w + 6)
    )?;

    for (row, [name, debit, credit, ty]) in report.rows.iter().zip(&cells) {
        if row.is_blank() {
            writeln!(writer)?;
            continue;
        }
        let line = format!("{name:<name_w$}  {debit:>debit_w$}  {credit:>credit_w$}  {ty}");
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

/// Write all periods as one CSV table with a leading `period` column.
pub fn write_csv<W: Write>(reports: &[PeriodReport], writer: &mut W) -> io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["period"];
    header.extend(COLUMNS);
    csv_writer.write_record(&header)?;

    for period_report in reports {
        let period = period_report.period.to_string();
        for row in &period_report.report.rows {
            let [name, debit, credit, ty] = row_cells(row);
            csv_writer.write_record([
                period.as_str(),
                name.as_str(),
                debit.as_str(),
                credit.as_str(),
                ty.as_str(),
            ])?;
        }
    }

    csv_writer.flush()
}

/// One period in JSON output.
#[derive(Debug, Serialize)]
struct JsonPeriod<'a> {
    period: String,
    title: String,
    digital_asset_account: Option<&'a str>,
    digital_debit_total: Decimal,
    digital_credit_total: Decimal,
    rows: &'a [ReportRow],
}

/// Write all periods as a pretty-printed JSON array.
pub fn write_json<W: Write>(reports: &[PeriodReport], writer: &mut W) -> io::Result<()> {
    let periods: Vec<JsonPeriod<'_>> = reports
        .iter()
        .map(|p| JsonPeriod {
            period: p.period.to_string(),
            title: p.period.title(),
            digital_asset_account: p.report.digital_asset_account.as_deref(),
            digital_debit_total: p.report.digital_debit_total,
            digital_credit_total: p.report.digital_credit_total,
            rows: &p.report.rows,
        })
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &periods)?;
    writeln!(writer)
}
