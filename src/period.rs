use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::utils::{first_day_of_month, last_day_of_month, monday_of, parse_iso_prefix, prev_month};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
}

/// The reference point a window is computed relative to. `All` is the
/// sentinel that disables windowing: every dated record passes the time
/// filter and there is no previous-period comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Anchor {
    Date(NaiveDate),
    All,
}

impl Anchor {
    /// Parses the UI's anchor parameter: "All", a full ISO date, or a
    /// `YYYY-MM` month key (resolved to the first of that month).
    pub fn parse(raw: &str) -> Result<Self> {
        if raw == "All" {
            return Ok(Anchor::All);
        }
        if let Some(date) = parse_iso_prefix(raw) {
            return Ok(Anchor::Date(date));
        }
        if raw.len() == 7 {
            if let Some(date) = parse_iso_prefix(&format!("{raw}-01")) {
                return Ok(Anchor::Date(date));
            }
        }
        Err(ReportError::InvalidAnchor(raw.to_string()))
    }
}

/// An inclusive date window. `Day` windows have `start == end`; `Week`
/// windows span Monday through Sunday; `Month` windows cover the full
/// calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriods {
    pub current: PeriodWindow,
    pub previous: PeriodWindow,
}

/// Resolves the current window and the symmetric previous window for a
/// period kind and anchor date. Returns `None` for the `All` anchor.
pub fn resolve_windows(kind: PeriodKind, anchor: &Anchor) -> Option<ResolvedPeriods> {
    let anchor = match anchor {
        Anchor::Date(d) => *d,
        Anchor::All => return None,
    };

    let resolved = match kind {
        PeriodKind::Day => {
            let yesterday = anchor
                .checked_sub_days(Days::new(1))
                .expect("anchor within calendar range");
            ResolvedPeriods {
                current: PeriodWindow {
                    start: anchor,
                    end: anchor,
                },
                previous: PeriodWindow {
                    start: yesterday,
                    end: yesterday,
                },
            }
        }
        PeriodKind::Week => {
            let start = monday_of(anchor);
            let end = start.checked_add_days(Days::new(6)).unwrap();
            let prev_start = start.checked_sub_days(Days::new(7)).unwrap();
            let prev_end = start.checked_sub_days(Days::new(1)).unwrap();
            ResolvedPeriods {
                current: PeriodWindow { start, end },
                previous: PeriodWindow {
                    start: prev_start,
                    end: prev_end,
                },
            }
        }
        PeriodKind::Month => {
            let start = first_day_of_month(anchor);
            let end = last_day_of_month(anchor.year(), anchor.month());
            let (py, pm) = prev_month(anchor);
            ResolvedPeriods {
                current: PeriodWindow { start, end },
                previous: PeriodWindow {
                    start: NaiveDate::from_ymd_opt(py, pm, 1).unwrap(),
                    end: last_day_of_month(py, pm),
                },
            }
        }
    };

    Some(resolved)
}
