use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::period::PeriodWindow;
use crate::schema::{Transaction, TxStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatusFilter {
    All,
    Only(TxStatus),
}

impl StatusFilter {
    fn matches(&self, status: TxStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

/// Applies the time window, status filter and free-text search, ANDed.
/// `window = None` means the "All" anchor: every record passes the time
/// predicate, dated or not. With a window, records lacking a parseable date
/// are excluded; a record whose date never parsed falls outside every
/// windowed view.
pub fn apply_filters<'a>(
    records: &'a [Transaction],
    window: Option<&PeriodWindow>,
    status: StatusFilter,
    search: &str,
) -> Vec<&'a Transaction> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|r| in_window(r, window))
        .filter(|r| status.matches(r.status))
        .filter(|r| matches_search(r, &needle))
        .collect()
}

fn in_window(record: &Transaction, window: Option<&PeriodWindow>) -> bool {
    match window {
        None => true,
        Some(w) => record.date.map(|d| w.contains(d)).unwrap_or(false),
    }
}

fn matches_search(record: &Transaction, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &record.counterparty,
        &record.description,
        &record.invoice,
        &record.admin,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{normalize_records, RawRecord};
    use chrono::NaiveDate;

    fn records() -> Vec<Transaction> {
        normalize_records(&[
            RawRecord {
                date: Some("2024-03-01".into()),
                counterparty: Some("Acme Trading".into()),
                invoice: Some("INV-001".into()),
                status: Some("Амжилттай".into()),
                ..Default::default()
            },
            RawRecord {
                date: Some("2024-03-05".into()),
                counterparty: Some("Beta LLC".into()),
                status: Some("Хүлээгдэж буй".into()),
                ..Default::default()
            },
            RawRecord {
                date: Some("2024-02-20".into()),
                counterparty: Some("Acme Trading".into()),
                status: Some("Цуцласан".into()),
                ..Default::default()
            },
            RawRecord {
                date: None,
                counterparty: Some("Undated Co".into()),
                status: Some("Амжилттай".into()),
                ..Default::default()
            },
        ])
    }

    fn march() -> PeriodWindow {
        PeriodWindow {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        }
    }

    #[test]
    fn test_window_filter_excludes_undated() {
        let records = records();
        let out = apply_filters(&records, Some(&march()), StatusFilter::All, "");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.date.is_some()));
    }

    #[test]
    fn test_all_window_includes_undated() {
        let records = records();
        let out = apply_filters(&records, None, StatusFilter::All, "");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_status_filter() {
        let records = records();
        let out = apply_filters(
            &records,
            None,
            StatusFilter::Only(TxStatus::Successful),
            "",
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_any_field() {
        let records = records();
        let out = apply_filters(&records, None, StatusFilter::All, "acme");
        assert_eq!(out.len(), 2);
        let out = apply_filters(&records, None, StatusFilter::All, "inv-001");
        assert_eq!(out.len(), 1);
        let out = apply_filters(&records, None, StatusFilter::All, "zzz");
        assert!(out.is_empty());
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = records();
        let out = apply_filters(
            &records,
            Some(&march()),
            StatusFilter::Only(TxStatus::Successful),
            "acme",
        );
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }
}
