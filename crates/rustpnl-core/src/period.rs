//! Time bucketing of journal entries.
//!
//! Entries are partitioned into calendar months, quarters or years by their
//! local timestamp, and one [`PnlReport`] is built per non-empty bucket.

use crate::entry::JournalEntry;
use crate::report::{PnlReport, ReportBuilder};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How finely to split the ledger into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Granularity {
    /// One report per calendar month.
    #[default]
    Monthly,
    /// One report per calendar quarter.
    Quarterly,
    /// One report per calendar year.
    Yearly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// Error returned for an unrecognized granularity name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown granularity '{0}' (expected monthly, quarterly or yearly)")]
pub struct ParseGranularityError(pub String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(ParseGranularityError(s.to_string())),
        }
    }
}

/// A calendar period. Orders chronologically within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    /// A calendar month (1-12).
    Month {
        /// Calendar year.
        year: i32,
        /// Month number.
        month: u32,
    },
    /// A calendar quarter (1-4).
    Quarter {
        /// Calendar year.
        year: i32,
        /// Quarter number.
        quarter: u32,
    },
    /// A calendar year.
    Year(i32),
}

impl Period {
    /// The period of the given granularity containing a timestamp.
    pub fn containing(at: NaiveDateTime, granularity: Granularity) -> Self {
        let year = at.year();
        match granularity {
            Granularity::Monthly => Self::Month {
                year,
                month: at.month(),
            },
            Granularity::Quarterly => Self::Quarter {
                year,
                quarter: (at.month() - 1) / 3 + 1,
            },
            Granularity::Yearly => Self::Year(year),
        }
    }

    /// The first day of the period.
    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Self::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Self::Quarter { year, quarter } => {
                let month = quarter.checked_mul(3)?.checked_sub(2)?;
                NaiveDate::from_ymd_opt(year, month, 1)
            }
            Self::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// Heading used when presenting the period, e.g. `January 2024`,
    /// `Quarter: 2024Q1` or `Year: 2024`.
    pub fn title(&self) -> String {
        match *self {
            Self::Month { year, month } => self.start().map_or_else(
                || format!("{year}-{month:02}"),
                |d| d.format("%B %Y").to_string(),
            ),
            Self::Quarter { .. } => format!("Quarter: {self}"),
            Self::Year(_) => format!("Year: {self}"),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{year}-{month:02}"),
            Self::Quarter { year, quarter } => write!(f, "{year}Q{quarter}"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Entries partitioned by period.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    /// Non-empty buckets in chronological order.
    pub periods: Vec<(Period, Vec<JournalEntry>)>,
    /// Entries skipped because they have no timestamp.
    pub undated: usize,
}

/// Partition entries into periods, keeping input order inside each bucket.
pub fn bucket_entries(entries: &[JournalEntry], granularity: Granularity) -> Buckets {
    let mut periods: BTreeMap<Period, Vec<JournalEntry>> = BTreeMap::new();
    let mut undated = 0;

    for entry in entries {
        match entry.local_date_time {
            Some(at) => periods
                .entry(Period::containing(at, granularity))
                .or_default()
                .push(entry.clone()),
            None => undated += 1,
        }
    }

    Buckets {
        periods: periods.into_iter().collect(),
        undated,
    }
}

/// The report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    /// The period covered.
    pub period: Period,
    /// The report built from that period's entries.
    pub report: PnlReport,
}

/// Reports for every non-empty period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodReports {
    /// One report per period, in chronological order.
    pub reports: Vec<PeriodReport>,
    /// Entries left out because they have no timestamp.
    pub undated: usize,
}

/// Bucket entries and build one report per period.
pub fn period_reports(
    entries: &[JournalEntry],
    granularity: Granularity,
    builder: &ReportBuilder,
) -> PeriodReports {
    let Buckets { periods, undated } = bucket_entries(entries, granularity);
    let reports = periods
        .into_iter()
        .map(|(period, entries)| PeriodReport {
            period,
            report: builder.build(&entries),
        })
        .collect();

    PeriodReports { reports, undated }
}
