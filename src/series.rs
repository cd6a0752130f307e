use chrono::Days;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::period::{Anchor, PeriodKind};
use crate::schema::{Transaction, TxStatus};
use crate::utils::{day_key, monday_of};

/// How many monthly buckets the long-range trend keeps at most.
pub const MAX_MONTH_BUCKETS: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub profit_primary: f64,
    pub profit_secondary: f64,
    pub amount: f64,
    pub count: usize,
}

impl Bucket {
    fn add(&mut self, r: &Transaction) {
        self.profit_primary += r.profit_primary;
        self.profit_secondary += r.profit_secondary;
        self.amount += r.amount;
        self.count += 1;
    }
}

/// Chart-ready bucketed series. Keys are `YYYY-MM-DD` for daily buckets and
/// `YYYY-MM` for monthly ones; `divider_index` marks where previous-period
/// data ends and current-period data begins, when that boundary exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub points: Vec<(String, Bucket)>,
    pub divider_index: Option<usize>,
}

/// Builds the profit trend over all Successful records. Status and search
/// filters deliberately do not apply here; only the period shape does.
///
/// Day: yesterday + anchor day (2 buckets). Week: 14 contiguous daily
/// buckets covering the previous and current week, divider at 7. Month or
/// the `All` anchor: the last [`MAX_MONTH_BUCKETS`] months present in the
/// data, ascending. Daily buckets with no records are emitted zero-filled
/// so the chart axis stays contiguous.
pub fn build_series(records: &[Transaction], kind: PeriodKind, anchor: &Anchor) -> TimeSeries {
    let successful: Vec<&Transaction> = records
        .iter()
        .filter(|r| r.status == TxStatus::Successful)
        .collect();

    match (kind, anchor) {
        (PeriodKind::Day, Anchor::Date(day)) => {
            let yesterday = day.checked_sub_days(Days::new(1)).unwrap();
            let points = [yesterday, *day]
                .into_iter()
                .map(|d| {
                    let mut bucket = Bucket::default();
                    for r in successful.iter().filter(|r| r.date == Some(d)) {
                        bucket.add(r);
                    }
                    (day_key(d), bucket)
                })
                .collect();
            TimeSeries {
                points,
                divider_index: None,
            }
        }
        (PeriodKind::Week, Anchor::Date(day)) => {
            let start = monday_of(*day).checked_sub_days(Days::new(7)).unwrap();
            let points = (0..14)
                .map(|i| {
                    let d = start.checked_add_days(Days::new(i)).unwrap();
                    let mut bucket = Bucket::default();
                    for r in successful.iter().filter(|r| r.date == Some(d)) {
                        bucket.add(r);
                    }
                    (day_key(d), bucket)
                })
                .collect();
            TimeSeries {
                points,
                divider_index: Some(7),
            }
        }
        // Monthly trend; also the fallback when no anchor narrows the view.
        (PeriodKind::Month, _) | (_, Anchor::All) => {
            let mut by_month: BTreeMap<String, Bucket> = BTreeMap::new();
            for r in &successful {
                if let Some(key) = r.month_key() {
                    by_month.entry(key).or_default().add(r);
                }
            }
            let skip = by_month.len().saturating_sub(MAX_MONTH_BUCKETS);
            TimeSeries {
                points: by_month.into_iter().skip(skip).collect(),
                divider_index: None,
            }
        }
    }
}
