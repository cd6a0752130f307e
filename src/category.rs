use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::schema::{Transaction, TxStatus};

/// How many categories the display surface shows.
pub const TOP_CATEGORY_COUNT: usize = 6;

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub amount: f64,
    pub profit_primary: f64,
    pub count: usize,
}

/// Category totals over the filtered Confirmed set, ranked descending by
/// profit. The full ranking is retained; [`CategoryBreakdown::top`] trims
/// it for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub ranked: Vec<(String, CategoryTotals)>,
}

impl CategoryBreakdown {
    pub fn top(&self) -> &[(String, CategoryTotals)] {
        &self.ranked[..self.ranked.len().min(TOP_CATEGORY_COUNT)]
    }
}

pub fn categorize(filtered: &[&Transaction]) -> CategoryBreakdown {
    let mut totals: HashMap<String, CategoryTotals> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for r in filtered
        .iter()
        .filter(|r| matches!(r.status, TxStatus::Successful | TxStatus::Pending))
    {
        let name = if r.category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            r.category.clone()
        };
        if !totals.contains_key(&name) {
            order.push(name.clone());
        }
        let entry = totals.entry(name).or_default();
        entry.amount += r.amount;
        entry.profit_primary += r.profit_primary;
        entry.count += 1;
    }

    let mut ranked: Vec<(String, CategoryTotals)> = order
        .into_iter()
        .map(|name| {
            let totals = totals[&name];
            (name, totals)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.profit_primary.total_cmp(&a.1.profit_primary));
    CategoryBreakdown { ranked }
}
