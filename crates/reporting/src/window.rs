//! Report date windows.
//!
//! Every report bucket resolves to a whole-day window in the viewer's local
//! time. Weeks start on Monday; `7d`/`30d` include today as their last day.
//! Sale timestamps are stored in UTC and rendered into the local calendar
//! before comparison, so a late-evening order lands in the day the operator
//! actually saw it.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A named report period, resolved against "today" into a [`DateWindow`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    All,
    /// Explicit range, both endpoints included.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Period {
    /// Resolve the period relative to `today` (the viewer's local date).
    pub fn window(self, today: NaiveDate) -> DateWindow {
        match self {
            Period::Today => DateWindow::days(today, today),
            Period::Yesterday => {
                let yesterday = today - Duration::days(1);
                DateWindow::days(yesterday, yesterday)
            }
            Period::ThisWeek => DateWindow::days(monday_of(today), today),
            Period::LastWeek => {
                let monday = monday_of(today);
                DateWindow::days(monday - Duration::days(7), monday - Duration::days(1))
            }
            Period::ThisMonth => {
                DateWindow::days(first_of_month(today.year(), today.month()), today)
            }
            Period::LastMonth => {
                let last = first_of_month(today.year(), today.month()) - Duration::days(1);
                DateWindow::days(first_of_month(last.year(), last.month()), last)
            }
            Period::ThisYear => DateWindow::days(first_of_month(today.year(), 1), today),
            Period::LastYear => DateWindow::days(
                first_of_month(today.year() - 1, 1),
                first_of_month(today.year(), 1) - Duration::days(1),
            ),
            Period::Last7Days => DateWindow::days(today - Duration::days(6), today),
            Period::Last30Days => DateWindow::days(today - Duration::days(29), today),
            Period::All => DateWindow::ALL,
            Period::Custom { start, end } => DateWindow::days(start, end),
        }
    }
}

fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// A half-open local-time interval covering whole days.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDateTime,
    /// Exclusive upper bound, midnight of the day after the last included one.
    end: NaiveDateTime,
}

impl DateWindow {
    /// The unbounded window.
    pub const ALL: DateWindow = DateWindow {
        start: NaiveDateTime::MIN,
        end: NaiveDateTime::MAX,
    };

    /// Window spanning `first` through `last`, both days included.
    pub fn days(first: NaiveDate, last: NaiveDate) -> DateWindow {
        DateWindow {
            start: first.and_time(NaiveTime::MIN),
            end: (last + Duration::days(1)).and_time(NaiveTime::MIN),
        }
    }

    /// Whether the instant falls inside the window once rendered in `tz`.
    pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Utc>, tz: &Tz) -> bool {
        let local = at.with_timezone(tz).naive_local();
        self.start <= local && local < self.end
    }
}
