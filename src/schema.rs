use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::{month_key, parse_iso_prefix};

/// Canonical transaction status. The upstream spreadsheet uses free-text
/// labels with more than one spelling per state; everything downstream
/// branches on this enum, never on the raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum TxStatus {
    Successful,
    Pending,
    Cancelled,
    Unknown,
}

impl TxStatus {
    /// Case-sensitive exact match against the known synonym table.
    /// Anything else (including case variants) maps to `Unknown`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim() {
            "Амжилттай" | "Successful" => TxStatus::Successful,
            "Хүлээгдэж буй" | "Хүлээгдэж байгаа" | "Pending" => TxStatus::Pending,
            "Цуцласан" | "Цуцлагдсан" | "Cancelled" => TxStatus::Cancelled,
            _ => TxStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Successful => "Successful",
            TxStatus::Pending => "Pending",
            TxStatus::Cancelled => "Cancelled",
            TxStatus::Unknown => "Unknown",
        }
    }

    /// `Unknown` records stay visible in tabular views but never enter an
    /// aggregate subset.
    pub fn is_aggregatable(&self) -> bool {
        !matches!(self, TxStatus::Unknown)
    }
}

/// One row of the externally fetched transaction sheet, exactly as the data
/// provider hands it over. Every field is optional or defaulted: the source
/// is a loosely-typed spreadsheet and malformed cells must never fail the
/// aggregation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    #[schemars(description = "ISO calendar date, YYYY-MM-DD; a time suffix may follow and is ignored")]
    pub date: Option<String>,

    pub counterparty: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub invoice: Option<String>,
    pub admin: Option<String>,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    #[schemars(description = "Signed amount in the base operating currency")]
    pub amount: f64,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub profit_amount_primary: f64,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub profit_amount_secondary: f64,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub total_price: f64,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub received: f64,

    #[serde(deserialize_with = "lenient::f64_or_zero")]
    #[schemars(description = "Supplied as totalPrice - received; trusted, never re-derived")]
    pub difference: f64,

    pub status: Option<String>,
}

impl RawRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RawRecord)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// A normalized record: status resolved to [`TxStatus`], date truncated to
/// its ISO prefix and parsed once. No record is dropped at this stage; a
/// malformed date becomes `None` and simply falls outside every window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub counterparty: String,
    pub description: String,
    pub category: String,
    pub invoice: String,
    pub admin: String,
    pub amount: f64,
    pub profit_primary: f64,
    pub profit_secondary: f64,
    pub total_price: f64,
    pub received: f64,
    pub difference: f64,
    pub status: TxStatus,
    /// Original status label, kept for tabular display.
    pub raw_status: String,
}

impl Transaction {
    pub fn from_raw(raw: &RawRecord) -> Self {
        let raw_status = raw.status.clone().unwrap_or_default();
        Transaction {
            date: raw.date.as_deref().and_then(parse_iso_prefix),
            counterparty: raw.counterparty.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            category: raw.category.clone().unwrap_or_default(),
            invoice: raw.invoice.clone().unwrap_or_default(),
            admin: raw.admin.clone().unwrap_or_default(),
            amount: raw.amount,
            profit_primary: raw.profit_amount_primary,
            profit_secondary: raw.profit_amount_secondary,
            total_price: raw.total_price,
            received: raw.received,
            difference: raw.difference,
            status: TxStatus::normalize(&raw_status),
            raw_status,
        }
    }

    pub fn month_key(&self) -> Option<String> {
        self.date.map(month_key)
    }
}

pub fn normalize_records(raw: &[RawRecord]) -> Vec<Transaction> {
    raw.iter().map(Transaction::from_raw).collect()
}

/// Distinct `YYYY-MM` keys present in the data, newest first. Drives the
/// surrounding UI's month picker.
pub fn available_months(records: &[Transaction]) -> Vec<String> {
    let mut months: Vec<String> = records.iter().filter_map(Transaction::month_key).collect();
    months.sort();
    months.dedup();
    months.reverse();
    months
}

mod lenient {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct F64OrZero;

    impl<'de> Visitor<'de> for F64OrZero {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim().replace(',', "").parse().unwrap_or(0.0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<f64, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(F64OrZero)
        }
    }

    /// Monetary cells default to 0 when missing or non-numeric; they are
    /// never treated as errors.
    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(F64OrZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_synonyms() {
        assert_eq!(TxStatus::normalize("Амжилттай"), TxStatus::Successful);
        assert_eq!(TxStatus::normalize("Хүлээгдэж буй"), TxStatus::Pending);
        assert_eq!(TxStatus::normalize("Хүлээгдэж байгаа"), TxStatus::Pending);
        assert_eq!(TxStatus::normalize("Цуцласан"), TxStatus::Cancelled);
        assert_eq!(TxStatus::normalize("Цуцлагдсан"), TxStatus::Cancelled);
        assert_eq!(TxStatus::normalize("Successful"), TxStatus::Successful);
    }

    #[test]
    fn test_status_unknown_is_exact_match_only() {
        assert_eq!(TxStatus::normalize(""), TxStatus::Unknown);
        assert_eq!(TxStatus::normalize("successful"), TxStatus::Unknown);
        assert_eq!(TxStatus::normalize("АМЖИЛТТАЙ"), TxStatus::Unknown);
        assert_eq!(TxStatus::normalize("Done"), TxStatus::Unknown);
    }

    #[test]
    fn test_lenient_monetary_fields() {
        let json = r#"{
            "date": "2024-03-01",
            "counterparty": "Acme",
            "amount": "1,250.50",
            "profitAmountPrimary": 10,
            "profitAmountSecondary": null,
            "totalPrice": "not a number",
            "status": "Амжилттай"
        }"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.amount, 1250.50);
        assert_eq!(raw.profit_amount_primary, 10.0);
        assert_eq!(raw.profit_amount_secondary, 0.0);
        assert_eq!(raw.total_price, 0.0);
        assert_eq!(raw.received, 0.0);
    }

    #[test]
    fn test_transaction_from_raw() {
        let raw = RawRecord {
            date: Some("2024-03-01T09:00:00".to_string()),
            counterparty: Some("Acme".to_string()),
            status: Some("Цуцлагдсан".to_string()),
            amount: 100.0,
            ..Default::default()
        };
        let tx = Transaction::from_raw(&raw);
        assert_eq!(
            tx.date,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(tx.status, TxStatus::Cancelled);
        assert_eq!(tx.raw_status, "Цуцлагдсан");
        assert_eq!(tx.description, "");
    }

    #[test]
    fn test_malformed_date_is_kept_without_window() {
        let raw = RawRecord {
            date: Some("03/01/2024".to_string()),
            status: Some("Амжилттай".to_string()),
            ..Default::default()
        };
        let tx = Transaction::from_raw(&raw);
        assert_eq!(tx.date, None);
        assert_eq!(tx.status, TxStatus::Successful);
    }

    #[test]
    fn test_available_months() {
        let records = normalize_records(&[
            RawRecord {
                date: Some("2024-03-01".into()),
                ..Default::default()
            },
            RawRecord {
                date: Some("2024-01-15".into()),
                ..Default::default()
            },
            RawRecord {
                date: Some("2024-03-20".into()),
                ..Default::default()
            },
            RawRecord {
                date: None,
                ..Default::default()
            },
        ]);
        assert_eq!(available_months(&records), vec!["2024-03", "2024-01"]);
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = RawRecord::schema_as_json().unwrap();
        assert!(schema_json.contains("counterparty"));
        assert!(schema_json.contains("profitAmountPrimary"));
        assert!(schema_json.contains("totalPrice"));
    }
}
