use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::period::{PeriodWindow, ResolvedPeriods};
use crate::schema::{Transaction, TxStatus};
use crate::utils::{first_day_of_month, last_day_of_month, monday_of, prev_month};
use chrono::{Datelike, Days};

/// Headline totals over the filtered set, each paired with its percentage
/// change against the previous window where one exists.
///
/// Subsets: Confirmed = Successful + Pending, Waiting = Pending. Invoiced,
/// received and outstanding figures run over Confirmed; the headline profit
/// runs over Successful only, so pending profit never inflates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub invoiced_total: f64,
    pub profit_primary: f64,
    pub profit_secondary: f64,
    pub received_total: f64,
    pub outstanding_total: f64,
    pub cancelled_amount: f64,
    pub waiting_total: f64,
    pub waiting_profit: f64,

    /// Successful records with an invoice not yet collected in full.
    pub unpaid_count: usize,
    pub unpaid_shortfall: f64,

    /// received / invoiced * 100; `None` when nothing was invoiced.
    pub collection_rate: Option<f64>,

    pub confirmed_count: usize,
    pub waiting_count: usize,
    pub cancelled_count: usize,

    pub previous_invoiced_total: f64,
    pub previous_profit_primary: f64,

    /// Percentage changes vs the previous window's Successful records;
    /// `None` when there is no previous window or its metric is zero.
    pub invoiced_change: Option<f64>,
    pub profit_change: Option<f64>,
    pub received_change: Option<f64>,
}

/// change = (current - previous) / |previous| * 100, undefined at zero.
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous.abs() * 100.0)
    }
}

pub fn summarize(
    filtered: &[&Transaction],
    all_records: &[Transaction],
    periods: Option<&ResolvedPeriods>,
) -> Summary {
    let confirmed: Vec<&Transaction> = filtered
        .iter()
        .copied()
        .filter(|r| matches!(r.status, TxStatus::Successful | TxStatus::Pending))
        .collect();
    let successful: Vec<&Transaction> = filtered
        .iter()
        .copied()
        .filter(|r| r.status == TxStatus::Successful)
        .collect();
    let waiting: Vec<&Transaction> = filtered
        .iter()
        .copied()
        .filter(|r| r.status == TxStatus::Pending)
        .collect();
    let cancelled: Vec<&Transaction> = filtered
        .iter()
        .copied()
        .filter(|r| r.status == TxStatus::Cancelled)
        .collect();

    let invoiced_total: f64 = confirmed.iter().map(|r| r.total_price).sum();
    let received_total: f64 = confirmed.iter().map(|r| r.received).sum();
    let profit_primary: f64 = successful.iter().map(|r| r.profit_primary).sum();
    let profit_secondary: f64 = successful.iter().map(|r| r.profit_secondary).sum();

    let unpaid: Vec<&&Transaction> = successful
        .iter()
        .filter(|r| r.total_price > 0.0 && r.received < r.total_price)
        .collect();
    let unpaid_shortfall: f64 = unpaid.iter().map(|r| r.total_price - r.received).sum();

    // Previous-window baseline: Successful records from the full set, so a
    // narrow search does not distort the comparison.
    let (prev_invoiced, prev_profit, prev_received) = match periods {
        Some(p) => {
            let prev: Vec<&Transaction> = all_records
                .iter()
                .filter(|r| r.status == TxStatus::Successful)
                .filter(|r| r.date.map(|d| p.previous.contains(d)).unwrap_or(false))
                .collect();
            (
                prev.iter().map(|r| r.total_price).sum::<f64>(),
                prev.iter().map(|r| r.profit_primary).sum::<f64>(),
                prev.iter().map(|r| r.received).sum::<f64>(),
            )
        }
        None => (0.0, 0.0, 0.0),
    };

    Summary {
        invoiced_total,
        profit_primary,
        profit_secondary,
        received_total,
        outstanding_total: confirmed.iter().map(|r| r.difference).sum(),
        cancelled_amount: cancelled.iter().map(|r| r.amount).sum(),
        waiting_total: waiting.iter().map(|r| r.total_price).sum(),
        waiting_profit: waiting.iter().map(|r| r.profit_primary).sum(),
        unpaid_count: unpaid.len(),
        unpaid_shortfall,
        collection_rate: if invoiced_total > 0.0 {
            Some(received_total / invoiced_total * 100.0)
        } else {
            None
        },
        confirmed_count: confirmed.len(),
        waiting_count: waiting.len(),
        cancelled_count: cancelled.len(),
        previous_invoiced_total: prev_invoiced,
        previous_profit_primary: prev_profit,
        invoiced_change: periods.and_then(|_| pct_change(invoiced_total, prev_invoiced)),
        profit_change: periods.and_then(|_| pct_change(profit_primary, prev_profit)),
        received_change: periods.and_then(|_| pct_change(received_total, prev_received)),
    }
}

/// Non-zero outstanding differences per counterparty over the filtered
/// Confirmed set, largest first. Backs the "waiting amounts" card.
pub fn outstanding_by_counterparty(filtered: &[&Transaction]) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for r in filtered {
        if !matches!(r.status, TxStatus::Successful | TxStatus::Pending) || r.difference == 0.0 {
            continue;
        }
        let name = counterparty_name(r);
        if !totals.contains_key(&name) {
            order.push(name.clone());
        }
        *totals.entry(name).or_insert(0.0) += r.difference;
    }
    let mut out: Vec<(String, f64)> = order
        .into_iter()
        .map(|name| {
            let total = totals[&name];
            (name, total)
        })
        .filter(|(_, total)| *total != 0.0)
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

fn counterparty_name(r: &Transaction) -> String {
    if r.counterparty.is_empty() {
        "Unspecified".to_string()
    } else {
        r.counterparty.clone()
    }
}

/// One cell of the quick-stats panel: confirmed sums for a to-date window
/// with changes against the immediately preceding full window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSnapshot {
    pub profit_primary: f64,
    pub invoiced_total: f64,
    pub count: usize,
    pub profit_change: Option<f64>,
    pub invoiced_change: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub today: PeriodSnapshot,
    pub week: PeriodSnapshot,
    pub month: PeriodSnapshot,
}

/// Today / week-to-date / month-to-date snapshots over Confirmed records.
/// The day cell has no baseline; week and month compare against the full
/// preceding week and month.
pub fn quick_stats(records: &[Transaction], today: NaiveDate) -> QuickStats {
    let confirmed: Vec<&Transaction> = records
        .iter()
        .filter(|r| matches!(r.status, TxStatus::Successful | TxStatus::Pending))
        .collect();

    let week_start = monday_of(today);
    let prev_week = PeriodWindow {
        start: week_start.checked_sub_days(Days::new(7)).unwrap(),
        end: week_start.checked_sub_days(Days::new(1)).unwrap(),
    };
    let month_window = PeriodWindow {
        start: first_day_of_month(today),
        end: last_day_of_month(today.year(), today.month()),
    };
    let (py, pm) = prev_month(today);
    let prev_month_window = PeriodWindow {
        start: NaiveDate::from_ymd_opt(py, pm, 1).unwrap(),
        end: last_day_of_month(py, pm),
    };

    let snapshot = |window: &PeriodWindow, baseline: Option<&PeriodWindow>| {
        let in_win: Vec<&&Transaction> = confirmed
            .iter()
            .filter(|r| r.date.map(|d| window.contains(d)).unwrap_or(false))
            .collect();
        let profit: f64 = in_win.iter().map(|r| r.profit_primary).sum();
        let invoiced: f64 = in_win.iter().map(|r| r.total_price).sum();
        let (profit_change, invoiced_change) = match baseline {
            Some(prev) => {
                let in_prev: Vec<&&Transaction> = confirmed
                    .iter()
                    .filter(|r| r.date.map(|d| prev.contains(d)).unwrap_or(false))
                    .collect();
                let prev_profit: f64 = in_prev.iter().map(|r| r.profit_primary).sum();
                let prev_invoiced: f64 = in_prev.iter().map(|r| r.total_price).sum();
                (
                    pct_change(profit, prev_profit),
                    pct_change(invoiced, prev_invoiced),
                )
            }
            None => (None, None),
        };
        PeriodSnapshot {
            profit_primary: profit,
            invoiced_total: invoiced,
            count: in_win.len(),
            profit_change,
            invoiced_change,
        }
    };

    QuickStats {
        today: snapshot(
            &PeriodWindow {
                start: today,
                end: today,
            },
            None,
        ),
        week: snapshot(
            &PeriodWindow {
                start: week_start,
                end: today,
            },
            Some(&prev_week),
        ),
        month: snapshot(
            &PeriodWindow {
                start: month_window.start,
                end: today,
            },
            Some(&prev_month_window),
        ),
    }
}
