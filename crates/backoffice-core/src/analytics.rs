//! # Analytics Module
//!
//! Pure aggregation math behind the revenue report.
//!
//! ## Period Bucketing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale_date (UTC)           bucket start        label                    │
//! │  ───────────────────────   ────────────        ─────────                │
//! │  2024-03-14T18:30:00Z  ─►  daily   2024-03-14  "2024-03-14"             │
//! │                        ─►  weekly  2024-03-11  "2024-W11"  (ISO week)   │
//! │                        ─►  monthly 2024-03-01  "2024-03"                │
//! │                        ─►  yearly  2024-01-01  "2024"                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Buckets are keyed by their start date, so ascending key order is
//! chronological order. Weekly labels use the ISO week-numbering year, which
//! differs from the calendar year around New Year (2024-12-30 is in
//! `2025-W01`).
//!
//! Nothing is cached: the record store hands over every `(sale_date, total)`
//! pair and the series is rebuilt on each call.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Period
// =============================================================================

/// Granularity of the revenue report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// Every accepted period, in increasing granularity.
    pub const ALL: [Period; 4] = [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly];

    /// Wire name of the period.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// First calendar day of the bucket containing `at`.
    pub fn bucket_start(&self, at: DateTime<Utc>) -> NaiveDate {
        let date = at.date_naive();
        match self {
            Period::Daily => date,
            Period::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Period::Monthly => date.with_day(1).unwrap_or(date),
            Period::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Start of the bucket immediately before the one starting at `start`.
    ///
    /// `None` only at the edge of chrono's date range.
    pub fn previous_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Daily => start.pred_opt(),
            Period::Weekly => start.checked_sub_signed(Duration::weeks(1)),
            Period::Monthly => {
                if start.month() == 1 {
                    NaiveDate::from_ymd_opt(start.year() - 1, 12, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() - 1, 1)
                }
            }
            Period::Yearly => NaiveDate::from_ymd_opt(start.year() - 1, 1, 1),
        }
    }

    /// Sortable label of the bucket starting at `start`.
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Period::Daily => start.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = start.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => start.format("%Y-%m").to_string(),
            Period::Yearly => start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a period name. Matching is exact: `"Daily"` and `"hourly"` are
/// both rejected.
///
/// ## Example
/// ```rust
/// use backoffice_core::Period;
///
/// assert_eq!("weekly".parse::<Period>().unwrap(), Period::Weekly);
/// assert!("hourly".parse::<Period>().is_err());
/// ```
impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "period".to_string(),
                allowed: Period::ALL.iter().map(|p| p.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Revenue Series
// =============================================================================

/// Revenue of one period bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenueBucket {
    /// Sortable label, see [`Period::label`].
    pub period: String,
    #[ts(as = "String")]
    pub start: NaiveDate,
    pub total_revenue: Money,
    /// Percent change against the preceding calendar bucket, two decimals.
    /// `None` when that bucket had no revenue.
    pub comparison_percentage: Option<f64>,
}

/// Buckets sale totals by period.
///
/// ## Algorithm
/// ```text
/// for (sale_date, total) in sales:
///     buckets[period.bucket_start(sale_date)] += total
///
/// for (start, revenue) in buckets (ascending):
///     previous = buckets.get(period.previous_start(start))
///     emit { label(start), revenue, percent_change(revenue, previous) }
/// ```
///
/// Only buckets containing at least one sale are emitted. The sum of all
/// emitted revenues equals the sum of the input totals.
///
/// ## Errors
/// [`CoreError::AmountOverflow`] when a bucket total leaves the i64 range.
///
/// ## Example
/// ```rust
/// use backoffice_core::analytics::revenue_by_period;
/// use backoffice_core::{Money, Period};
/// use chrono::{TimeZone, Utc};
///
/// let sales = vec![
///     (Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(), Money::from_cents(1000)),
///     (Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap(), Money::from_cents(500)),
///     (Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap(), Money::from_cents(3000)),
/// ];
///
/// let series = revenue_by_period(&sales, Period::Monthly).unwrap();
/// assert_eq!(series[0].period, "2024-01");
/// assert_eq!(series[0].total_revenue.cents(), 1500);
/// assert_eq!(series[1].comparison_percentage, Some(100.0));
/// ```
pub fn revenue_by_period(
    sales: &[(DateTime<Utc>, Money)],
    period: Period,
) -> CoreResult<Vec<RevenueBucket>> {
    let mut buckets: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for (sale_date, total) in sales {
        let bucket = buckets.entry(period.bucket_start(*sale_date)).or_default();
        *bucket = bucket.checked_add(*total).ok_or_else(|| CoreError::AmountOverflow {
            field: "total_revenue".to_string(),
        })?;
    }

    let series = buckets
        .iter()
        .map(|(start, revenue)| {
            let previous = period
                .previous_start(*start)
                .and_then(|prev| buckets.get(&prev))
                .copied();

            RevenueBucket {
                period: period.label(*start),
                start: *start,
                total_revenue: *revenue,
                comparison_percentage: previous.and_then(|prev| percent_change(*revenue, prev)),
            }
        })
        .collect();

    Ok(series)
}

/// Percent change from `previous` to `current`, rounded to two decimals.
///
/// `None` when `previous` is zero.
///
/// ## Example
/// ```rust
/// use backoffice_core::analytics::percent_change;
/// use backoffice_core::Money;
///
/// assert_eq!(percent_change(Money::from_cents(150), Money::from_cents(100)), Some(50.0));
/// assert_eq!(percent_change(Money::from_cents(100), Money::from_cents(300)), Some(-66.67));
/// assert_eq!(percent_change(Money::from_cents(100), Money::zero()), None);
/// ```
pub fn percent_change(current: Money, previous: Money) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }

    let previous = previous.cents() as f64;
    let pct = (current.cents() as f64 - previous) / previous * 100.0;
    Some((pct * 100.0).round() / 100.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
