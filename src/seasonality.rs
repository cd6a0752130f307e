use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{Transaction, TxStatus};
use crate::utils::{day_key, month_key};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalityBucket {
    pub profit_primary: f64,
    pub count: usize,
}

/// Profit seasonality over all Successful records, independent of the
/// active filters: by weekday (Sunday = 0 .. Saturday = 6), by calendar
/// day and by calendar month, with best/worst extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seasonality {
    pub by_weekday: [SeasonalityBucket; 7],
    pub by_day: BTreeMap<String, SeasonalityBucket>,
    pub by_month: BTreeMap<String, SeasonalityBucket>,
    pub best_day: Option<(String, SeasonalityBucket)>,
    pub best_month: Option<(String, SeasonalityBucket)>,
    /// Weekday indices; only populated weekday buckets are compared.
    pub best_weekday: Option<usize>,
    pub worst_weekday: Option<usize>,
}

pub fn analyze_seasonality(records: &[Transaction]) -> Seasonality {
    let mut out = Seasonality::default();

    for r in records.iter().filter(|r| r.status == TxStatus::Successful) {
        let Some(date) = r.date else { continue };
        let weekday = date.weekday().num_days_from_sunday() as usize;
        out.by_weekday[weekday].profit_primary += r.profit_primary;
        out.by_weekday[weekday].count += 1;

        let day = out.by_day.entry(day_key(date)).or_default();
        day.profit_primary += r.profit_primary;
        day.count += 1;

        let month = out.by_month.entry(month_key(date)).or_default();
        month.profit_primary += r.profit_primary;
        month.count += 1;
    }

    out.best_day = best_of(&out.by_day);
    out.best_month = best_of(&out.by_month);
    out.best_weekday = extreme_weekday(&out.by_weekday, |a, b| a > b);
    out.worst_weekday = extreme_weekday(&out.by_weekday, |a, b| a < b);
    out
}

fn best_of(map: &BTreeMap<String, SeasonalityBucket>) -> Option<(String, SeasonalityBucket)> {
    map.iter()
        .max_by(|a, b| a.1.profit_primary.total_cmp(&b.1.profit_primary))
        .map(|(k, v)| (k.clone(), *v))
}

fn extreme_weekday(
    buckets: &[SeasonalityBucket; 7],
    better: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (idx, bucket) in buckets.iter().enumerate() {
        if bucket.count == 0 {
            continue;
        }
        match winner {
            Some(w) if !better(bucket.profit_primary, buckets[w].profit_primary) => {}
            _ => winner = Some(idx),
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{normalize_records, RawRecord};

    fn rec(date: &str, status: &str, profit: f64) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            status: Some(status.to_string()),
            profit_amount_primary: profit,
            ..Default::default()
        }
    }

    #[test]
    fn test_weekday_bucketing_sunday_zero() {
        // 2024-03-03 is a Sunday, 2024-03-04 a Monday
        let records = normalize_records(&[
            rec("2024-03-03", "Амжилттай", 5.0),
            rec("2024-03-04", "Амжилттай", 8.0),
            rec("2024-03-11", "Амжилттай", 2.0),
        ]);
        let s = analyze_seasonality(&records);
        assert_eq!(s.by_weekday[0].profit_primary, 5.0);
        assert_eq!(s.by_weekday[1].profit_primary, 10.0);
        assert_eq!(s.by_weekday[1].count, 2);
    }

    #[test]
    fn test_best_and_worst_weekday_need_records() {
        let records = normalize_records(&[
            rec("2024-03-03", "Амжилттай", -5.0),
            rec("2024-03-04", "Амжилттай", 8.0),
        ]);
        let s = analyze_seasonality(&records);
        assert_eq!(s.best_weekday, Some(1));
        // empty weekdays never win "worst" even though 0 > -5
        assert_eq!(s.worst_weekday, Some(0));
    }

    #[test]
    fn test_best_day_and_month() {
        let records = normalize_records(&[
            rec("2024-02-10", "Амжилттай", 3.0),
            rec("2024-03-05", "Амжилттай", 4.0),
            rec("2024-03-06", "Амжилттай", 4.5),
        ]);
        let s = analyze_seasonality(&records);
        assert_eq!(s.best_day.as_ref().unwrap().0, "2024-03-06");
        let (month, bucket) = s.best_month.unwrap();
        assert_eq!(month, "2024-03");
        assert_eq!(bucket.profit_primary, 8.5);
    }

    #[test]
    fn test_only_successful_counted() {
        let records = normalize_records(&[
            rec("2024-03-04", "Хүлээгдэж буй", 100.0),
            rec("2024-03-04", "Цуцласан", 100.0),
        ]);
        let s = analyze_seasonality(&records);
        assert_eq!(s.by_weekday[1].count, 0);
        assert_eq!(s.best_day, None);
        assert_eq!(s.best_weekday, None);
        assert_eq!(s.worst_weekday, None);
    }
}
