//! rpnl-report - Generate P&L reports from journal entry exports.
//!
//! This is the primary rustpnl command. It loads a CSV export of journal
//! entries, splits it into periods and prints one report per period.
//!
//! # Usage
//!
//! ```bash
//! rpnl-report journal.csv
//! rpnl-report journal.csv --granularity quarterly
//! rpnl-report journal.csv -g yearly --format json
//! ```
//!
//! # Reports
//!
//! Each period lists the operating accounts with their debit and credit
//! totals and a classification, followed by a reconciliation block for the
//! digital-asset account (the first account seen without a `currencyId`).

use crate::cmd::completions::ShellType;
use crate::render::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rustpnl_core::{period_reports, AccountClassifier, Granularity, PeriodReports, ReportBuilder};
use rustpnl_importer::{ColumnSpec, Importer, ImporterConfig};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Period length to report on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    /// One report per calendar month
    #[default]
    Monthly,
    /// One report per calendar quarter
    Quarterly,
    /// One report per calendar year
    Yearly,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Monthly => Self::Monthly,
            GranularityArg::Quarterly => Self::Quarterly,
            GranularityArg::Yearly => Self::Yearly,
        }
    }
}

/// Generate Profit & Loss reports from a journal entry CSV export.
#[derive(Parser, Debug)]
#[command(name = "rpnl-report")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// The journal entry CSV file
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Period length for each report
    #[arg(short, long, value_enum, default_value = "monthly")]
    pub granularity: GranularityArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// JSON file with account classification rules (replaces the built-in rules)
    #[arg(long, value_name = "RULES_FILE")]
    pub rules: Option<PathBuf>,

    /// Account name column (header name, or zero-based index)
    #[arg(long, default_value = "accountName")]
    pub account_column: ColumnSpec,

    /// Debit amount column
    #[arg(long, default_value = "debit")]
    pub debit_column: ColumnSpec,

    /// Credit amount column
    #[arg(long, default_value = "credit")]
    pub credit_column: ColumnSpec,

    /// Currency identifier column
    #[arg(long, default_value = "currencyId")]
    pub currency_column: ColumnSpec,

    /// Local timestamp column
    #[arg(long, default_value = "localDateTime")]
    pub date_column: ColumnSpec,

    /// Timestamp format (strftime-style); common formats are tried when omitted
    #[arg(long)]
    pub datetime_format: Option<String>,

    /// CSV delimiter (a single ASCII character)
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// The file has no header row; columns must be given as indices
    #[arg(long)]
    pub no_header: bool,

    /// Number of data rows to skip
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub skip_rows: usize,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    main_with_name("rpnl-report")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose, args.quiet);

    let mut stdout = io::stdout().lock();
    match run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build the importer configuration from the command-line flags.
fn importer_config(args: &Args) -> ImporterConfig {
    let mut builder = ImporterConfig::csv()
        .account_column(args.account_column.clone())
        .debit_column(args.debit_column.clone())
        .credit_column(args.credit_column.clone())
        .currency_column(args.currency_column.clone())
        .date_time_column(args.date_column.clone())
        .delimiter(args.delimiter)
        .has_header(!args.no_header)
        .skip_rows(args.skip_rows);

    if let Some(format) = &args.datetime_format {
        builder = builder.date_time_format(format);
    }

    builder.build()
}

fn load_classifier(path: Option<&Path>) -> Result<AccountClassifier> {
    let Some(path) = path else {
        return Ok(AccountClassifier::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    let classifier = AccountClassifier::from_json(&json)
        .with_context(|| format!("failed to load rules from {}", path.display()))?;
    tracing::debug!(
        rules = classifier.rules().len(),
        "loaded classification rules from {}",
        path.display()
    );
    Ok(classifier)
}

/// Load the file, build the reports and write them to `writer`.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let file = args.file.as_deref().context("FILE is required")?;

    // Check if file exists
    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let importer = importer_config(args).importer();
    if !importer.identify(file) {
        tracing::warn!(
            "{} does not have a .csv extension, reading it as CSV anyway",
            file.display()
        );
    }

    tracing::debug!("Loading {}...", file.display());
    let result = importer
        .extract(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        entries = result.entries.len(),
        warnings = result.warnings.len(),
        "loaded journal entries from {}",
        file.display()
    );

    let builder = ReportBuilder::new(load_classifier(args.rules.as_deref())?);
    let granularity = Granularity::from(args.granularity);

    let PeriodReports { reports, undated } =
        period_reports(&result.entries, granularity, &builder);
    if undated > 0 {
        tracing::warn!("{undated} entries have no usable timestamp and are not in any period");
    }
    tracing::debug!(
        periods = reports.len(),
        %granularity,
        "built period reports"
    );

    render::write_reports(&reports, args.format, writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOURNAL: &str = "accountName,debit,credit,currencyId,localDateTime
Sales Revenue,0,200,USD,2024-01-15T10:00:00
Legal Fees,30,0,USD,2024-01-20T10:00:00
BTC Wallet,100,0,,2024-01-21T10:00:00
Payroll,50,0,USD,2024-04-02T09:00:00
";

    fn journal_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn run_with(args: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(std::iter::once("rpnl-report").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["rpnl-report", "journal.csv"]).unwrap();
        assert_eq!(args.granularity, GranularityArg::Monthly);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.account_column, ColumnSpec::Name("accountName".into()));
        assert_eq!(args.delimiter, ',');
        assert!(!args.no_header);
        assert_eq!(args.skip_rows, 0);
    }

    #[test]
    fn test_file_required() {
        assert!(Args::try_parse_from(["rpnl-report"]).is_err());
        assert!(Args::try_parse_from(["rpnl-report", "--generate-completions", "bash"]).is_ok());
    }

    #[test]
    fn test_monthly_text_report() {
        let file = journal_file(JOURNAL);
        let out = run_with(&[file.path().to_str().unwrap()]).unwrap();

        assert!(out.contains("January 2024"));
        assert!(out.contains("April 2024"));
        assert!(out.contains("Identified Digital Asset Account (for reconciliation): BTC Wallet"));
        assert!(out.contains(render::NO_ASSET_ACCOUNT_WARNING));
    }

    #[test]
    fn test_quarterly_csv_report() {
        let file = journal_file(JOURNAL);
        let out = run_with(&[file.path().to_str().unwrap(), "-g", "quarterly", "-f", "csv"]).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[1], "2024Q1,Sales Revenue,0,200,Revenue");
        assert_eq!(lines[3], "2024Q1,,,,");
        assert_eq!(lines[5], "2024Q1,BTC Wallet,100,0,Other");
        assert_eq!(lines[6], "2024Q2,Payroll,50,0,Expense");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_yearly_json_report() {
        let file = journal_file(JOURNAL);
        let out = run_with(&[file.path().to_str().unwrap(), "-g", "yearly", "-f", "json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["title"], "Year: 2024");
        assert_eq!(value[0]["digital_asset_account"], "BTC Wallet");
    }

    #[test]
    fn test_custom_rules_file() {
        let file = journal_file(JOURNAL);
        let mut rules = tempfile::NamedTempFile::new().unwrap();
        rules
            .write_all(br#"[{"keywords": ["wallet"], "account_type": "Revenue"}]"#)
            .unwrap();

        let out = run_with(&[
            file.path().to_str().unwrap(),
            "-f",
            "csv",
            "--rules",
            rules.path().to_str().unwrap(),
        ])
        .unwrap();

        assert!(out.contains("2024-01,BTC Wallet,100,0,Revenue"));
        assert!(out.contains("2024-01,Sales Revenue,0,200,Other"));
    }

    #[test]
    fn test_custom_column_names() {
        let file = journal_file(
            "Account;Dr;Cr;Currency;When\nBTC Wallet;5;0;;2023-06-01\n",
        );
        let out = run_with(&[
            file.path().to_str().unwrap(),
            "--delimiter",
            ";",
            "--account-column",
            "Account",
            "--debit-column",
            "Dr",
            "--credit-column",
            "Cr",
            "--currency-column",
            "Currency",
            "--date-column",
            "When",
            "-f",
            "csv",
        ])
        .unwrap();

        assert!(out.contains("2023-06,BTC Wallet,5,0,Other"));
    }

    #[test]
    fn test_headerless_file_with_column_indices() {
        let file = journal_file("exported 2024-06-30\nBTC Wallet,7,0,,2024-06-01\nPayroll,3,0,USD,2024-06-02\n");
        let out = run_with(&[
            file.path().to_str().unwrap(),
            "--no-header",
            "--skip-rows",
            "1",
            "--account-column",
            "0",
            "--debit-column",
            "1",
            "--credit-column",
            "2",
            "--currency-column",
            "3",
            "--date-column",
            "4",
            "-f",
            "csv",
        ])
        .unwrap();

        assert!(out.contains("2024-06,Payroll,3,0,Expense"));
        assert!(out.contains("2024-06,BTC Wallet,7,0,Other"));
        assert!(!out.contains("exported"));
    }

    #[test]
    fn test_oversized_amount_is_skipped() {
        let file = journal_file(
            "accountName,debit,credit,currencyId,localDateTime
BTC Wallet,79228162514264337593543950335,0,,2024-01-01
BTC Wallet,1,0,,2024-01-02
",
        );
        let out = run_with(&[file.path().to_str().unwrap(), "-f", "csv"]).unwrap();
        assert!(out.contains("2024-01,BTC Wallet,1,0,Other"));
    }

    #[test]
    fn test_non_ascii_delimiter_is_error() {
        let file = journal_file(JOURNAL);
        let err = run_with(&[file.path().to_str().unwrap(), "--delimiter", "é"]).unwrap_err();
        assert!(format!("{err:#}").contains("not a single ASCII character"));
    }

    #[test]
    fn test_missing_file() {
        let err = run_with(&["/nonexistent/journal.csv"]).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_missing_column_is_error() {
        let file = journal_file("accountName,debit,credit\nCash,1,0\n");
        let err = run_with(&[file.path().to_str().unwrap()]).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column 'currencyId'"));
    }

    #[test]
    fn test_no_dated_entries() {
        let file = journal_file("accountName,debit,credit,currencyId,localDateTime\nCash,1,0,USD,\n");
        let out = run_with(&[file.path().to_str().unwrap()]).unwrap();
        assert_eq!(out, "No dated journal entries found.\n");
    }
}
