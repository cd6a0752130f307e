use std::cmp::Ordering;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::schema::Transaction;

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Date,
    Counterparty,
    Description,
    Category,
    Invoice,
    Admin,
    Amount,
    ProfitPrimary,
    ProfitSecondary,
    TotalPrice,
    Received,
    Difference,
    Status,
}

impl FromStr for SortKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let key = match s {
            "date" => SortKey::Date,
            "counterparty" => SortKey::Counterparty,
            "description" => SortKey::Description,
            "category" => SortKey::Category,
            "invoice" => SortKey::Invoice,
            "admin" => SortKey::Admin,
            "amount" => SortKey::Amount,
            "profitPrimary" => SortKey::ProfitPrimary,
            "profitSecondary" => SortKey::ProfitSecondary,
            "totalPrice" => SortKey::TotalPrice,
            "received" => SortKey::Received,
            "difference" => SortKey::Difference,
            "status" => SortKey::Status,
            other => return Err(ReportError::UnknownSortColumn(other.to_string())),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// The table's sort selection. Reselecting the active column toggles the
/// direction; selecting a new column resets to descending, matching how
/// the dashboard's column headers behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: SortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.key = key;
            self.direction = SortDirection::Descending;
        }
    }
}

/// Stable sort of the filtered set. String columns compare case-folded;
/// numeric columns compare by value with 0 standing in for missing data.
pub fn sort_records<'a>(records: &[&'a Transaction], state: &SortState) -> Vec<&'a Transaction> {
    let mut sorted: Vec<&Transaction> = records.to_vec();
    sorted.sort_by(|a, b| state.direction.apply(compare(a, b, state.key)));
    sorted
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Counterparty => fold_cmp(&a.counterparty, &b.counterparty),
        SortKey::Description => fold_cmp(&a.description, &b.description),
        SortKey::Category => fold_cmp(&a.category, &b.category),
        SortKey::Invoice => fold_cmp(&a.invoice, &b.invoice),
        SortKey::Admin => fold_cmp(&a.admin, &b.admin),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
        SortKey::ProfitPrimary => a.profit_primary.total_cmp(&b.profit_primary),
        SortKey::ProfitSecondary => a.profit_secondary.total_cmp(&b.profit_secondary),
        SortKey::TotalPrice => a.total_price.total_cmp(&b.total_price),
        SortKey::Received => a.received.total_cmp(&b.received),
        SortKey::Difference => a.difference.total_cmp(&b.difference),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

fn fold_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// One page of the sorted table. Rows are cloned out so the page can cross
/// the serialization boundary to the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub rows: Vec<Transaction>,
    pub page_index: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Slices the sorted set into fixed-size pages. The requested index is
/// clamped to the valid range rather than rejected.
pub fn paginate(sorted: &[&Transaction], page_index: usize, page_size: usize) -> Result<Page> {
    if page_size == 0 {
        return Err(ReportError::InvalidPageSize(page_size));
    }
    let total_count = sorted.len();
    let total_pages = total_count.div_ceil(page_size);
    let page_index = page_index.min(total_pages.saturating_sub(1));
    let start = page_index * page_size;
    let rows = sorted
        .iter()
        .skip(start)
        .take(page_size)
        .map(|r| (*r).clone())
        .collect();
    Ok(Page {
        rows,
        page_index,
        total_count,
        total_pages,
    })
}
