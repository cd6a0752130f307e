use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::schema::{Transaction, TxStatus};
use crate::utils::days_between;

/// Recency sentinel when a counterparty has no dated transaction.
pub const NEVER_SEEN_DAYS: i64 = 999;

const COLD_AFTER_DAYS: i64 = 60;
const ACTIVE_WITHIN_DAYS: i64 = 14;
const UNSPECIFIED: &str = "Unspecified";

/// Relationship lifecycle stage. Recomputed against the evaluation instant
/// on every pass; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    New,
    Active,
    Medium,
    Cold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Month-over-month profit movement. `change_pct` is `None` when the prior
/// month's profit was zero (no baseline to compare against).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub direction: TrendDirection,
    pub change_pct: Option<f64>,
}

/// Profile of one counterparty: windowed sums over the filtered Successful
/// subset plus lifetime recency over the whole dataset. Ephemeral; rebuilt
/// on every aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyProfile {
    pub name: String,
    pub amount: f64,
    pub profit_primary: f64,
    pub profit_secondary: f64,
    pub count: usize,
    pub lifetime_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub days_since_last: i64,
    pub badge: Badge,
    /// `None` when fewer than two populated months exist.
    pub trend: Option<Trend>,
    pub monthly_profit: BTreeMap<String, f64>,
}

/// Pure lifecycle classification. Precedence matters: a long-gone repeat
/// counterparty is Cold even if its lifetime count would otherwise read New.
pub fn classify(days_since_last: i64, lifetime_count: usize) -> Badge {
    if days_since_last > COLD_AFTER_DAYS && lifetime_count >= 2 {
        Badge::Cold
    } else if lifetime_count == 1 {
        Badge::New
    } else if days_since_last <= ACTIVE_WITHIN_DAYS {
        Badge::Active
    } else {
        Badge::Medium
    }
}

fn trend_from_months(monthly: &BTreeMap<String, f64>) -> Option<Trend> {
    if monthly.len() < 2 {
        return None;
    }
    let mut iter = monthly.values().rev();
    let last = *iter.next().unwrap();
    let prev = *iter.next().unwrap();
    let direction = if last > prev {
        TrendDirection::Up
    } else if last < prev {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    };
    let change_pct = if prev != 0.0 {
        Some((last - prev).abs() / prev.abs() * 100.0)
    } else {
        None
    };
    Some(Trend {
        direction,
        change_pct,
    })
}

#[derive(Default)]
struct LifetimeEntry {
    count: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
}

/// Builds ranked counterparty profiles: windowed sums from the filtered
/// Successful subset, lifetime recency from all Successful records, ranked
/// descending by windowed profit with first-seen order breaking ties.
/// `today` is the evaluation instant, passed explicitly so a whole pass
/// classifies against one consistent clock.
pub fn analyze_counterparties(
    filtered: &[&Transaction],
    all_records: &[Transaction],
    today: NaiveDate,
) -> Vec<CounterpartyProfile> {
    // Lifetime recency ignores every filter.
    let mut lifetime: HashMap<String, LifetimeEntry> = HashMap::new();
    for r in all_records.iter().filter(|r| r.status == TxStatus::Successful) {
        let entry = lifetime.entry(name_of(r)).or_default();
        entry.count += 1;
        if let Some(d) = r.date {
            if entry.last_date.map(|last| d > last).unwrap_or(true) {
                entry.last_date = Some(d);
            }
            if entry.first_date.map(|first| d < first).unwrap_or(true) {
                entry.first_date = Some(d);
            }
        }
    }

    let mut profiles: Vec<CounterpartyProfile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for r in filtered.iter().filter(|r| r.status == TxStatus::Successful) {
        let name = name_of(r);
        let idx = *index.entry(name.clone()).or_insert_with(|| {
            profiles.push(CounterpartyProfile {
                name,
                amount: 0.0,
                profit_primary: 0.0,
                profit_secondary: 0.0,
                count: 0,
                lifetime_count: 0,
                first_date: None,
                last_date: None,
                days_since_last: NEVER_SEEN_DAYS,
                badge: Badge::New,
                trend: None,
                monthly_profit: BTreeMap::new(),
            });
            profiles.len() - 1
        });
        let profile = &mut profiles[idx];
        profile.amount += r.amount;
        profile.profit_primary += r.profit_primary;
        profile.profit_secondary += r.profit_secondary;
        profile.count += 1;
        if let Some(key) = r.month_key() {
            *profile.monthly_profit.entry(key).or_insert(0.0) += r.profit_primary;
        }
    }

    for profile in &mut profiles {
        let life = lifetime.get(&profile.name);
        profile.lifetime_count = life.map(|l| l.count).unwrap_or(profile.count);
        profile.first_date = life.and_then(|l| l.first_date);
        profile.last_date = life.and_then(|l| l.last_date);
        profile.days_since_last = profile
            .last_date
            .map(|d| days_between(d, today))
            .unwrap_or(NEVER_SEEN_DAYS);
        profile.badge = classify(profile.days_since_last, profile.lifetime_count);
        profile.trend = trend_from_months(&profile.monthly_profit);
    }

    // Stable sort keeps first-seen order for equal profits.
    profiles.sort_by(|a, b| b.profit_primary.total_cmp(&a.profit_primary));
    profiles
}

fn name_of(r: &Transaction) -> String {
    if r.counterparty.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        r.counterparty.clone()
    }
}

/// Roll-up of all Cold counterparties in the ranked list with the profit
/// that went quiet with them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormantSummary {
    pub count: usize,
    /// (name, days since last transaction), in ranked order.
    pub counterparties: Vec<(String, i64)>,
    pub lost_profit: f64,
}

pub fn dormant_summary(profiles: &[CounterpartyProfile]) -> DormantSummary {
    let cold: Vec<&CounterpartyProfile> = profiles
        .iter()
        .filter(|p| p.badge == Badge::Cold)
        .collect();
    DormantSummary {
        count: cold.len(),
        counterparties: cold
            .iter()
            .map(|p| (p.name.clone(), p.days_since_last))
            .collect(),
        lost_profit: cold.iter().map(|p| p.profit_primary).sum(),
    }
}
