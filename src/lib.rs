//! # Finance Insights
//!
//! A library for turning loosely-typed transaction exports into the
//! aggregates behind a small-business finance dashboard: period summaries,
//! profit time series, counterparty health, category and seasonality
//! breakdowns, and a sorted, paged table view.
//!
//! ## Core Concepts
//!
//! - **Normalization**: externally supplied records are lenient on types
//!   and spelling; they are normalized once into [`Transaction`] with a
//!   closed [`TxStatus`] and a parsed date, and every aggregate works from
//!   that form
//! - **Periods**: a view is anchored to a day, its ISO week, or its
//!   calendar month, always paired with the immediately preceding period
//!   for comparison; the `All` anchor disables windowing entirely
//! - **Confirmed vs Successful**: money totals (invoiced, received,
//!   outstanding) count Successful and Pending records together; profit
//!   and trend figures count only Successful ones
//! - **Explicit clock**: recency classification takes `today` as a
//!   parameter so one pass evaluates against one consistent instant
//!
//! ## Example
//!
//! ```rust,ignore
//! use finance_insights::*;
//! use chrono::NaiveDate;
//!
//! let raw: Vec<RawRecord> = serde_json::from_str(export_json)?;
//! let params = ViewParams {
//!     kind: PeriodKind::Month,
//!     anchor: Anchor::parse("2024-03")?,
//!     ..ViewParams::default()
//! };
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//!
//! let report = build_report(&raw, &params, today)?;
//! println!("profit: {}", report.summary.profit_primary);
//! ```

pub mod cache;
pub mod category;
pub mod counterparty;
pub mod error;
pub mod filter;
pub mod period;
pub mod rates;
pub mod schema;
pub mod seasonality;
pub mod series;
pub mod summary;
pub mod table;
pub mod utils;

pub use cache::{SnapshotCache, TtlCache};
pub use category::{categorize, CategoryBreakdown, CategoryTotals, TOP_CATEGORY_COUNT};
pub use counterparty::{
    analyze_counterparties, dormant_summary, Badge, CounterpartyProfile, DormantSummary, Trend,
    TrendDirection,
};
pub use error::{ReportError, Result};
pub use filter::{apply_filters, StatusFilter};
pub use period::{resolve_windows, Anchor, PeriodKind, PeriodWindow, ResolvedPeriods};
pub use rates::{convert, pairs_for, Conversion, Currency, FlowDirection, RatePair, RATE_PAIRS};
pub use schema::*;
pub use seasonality::{analyze_seasonality, Seasonality, SeasonalityBucket};
pub use series::{build_series, Bucket, TimeSeries, MAX_MONTH_BUCKETS};
pub use summary::{outstanding_by_counterparty, quick_stats, summarize, QuickStats, Summary};
pub use table::{paginate, sort_records, Page, SortDirection, SortKey, SortState, DEFAULT_PAGE_SIZE};

use chrono::NaiveDate;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything the caller has selected in the view: the period shape and
/// anchor, the row filters, and the table state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewParams {
    pub kind: PeriodKind,
    pub anchor: Anchor,
    pub status: StatusFilter,
    pub search: String,
    pub sort: SortState,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        ViewParams {
            kind: PeriodKind::Month,
            anchor: Anchor::All,
            status: StatusFilter::All,
            search: String::new(),
            sort: SortState::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The full computed view. One call to [`ReportEngine::build`] produces
/// every panel of the dashboard from the same filtered snapshot, so the
/// numbers on screen always reconcile with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: Summary,
    pub quick_stats: QuickStats,
    pub series: TimeSeries,
    pub counterparties: Vec<CounterpartyProfile>,
    pub dormant: DormantSummary,
    pub categories: CategoryBreakdown,
    pub seasonality: Seasonality,
    pub outstanding: Vec<(String, f64)>,
    pub available_months: Vec<String>,
    pub page: Page,
}

pub struct ReportEngine;

impl ReportEngine {
    pub fn build(raw: &[RawRecord], params: &ViewParams, today: NaiveDate) -> Result<Report> {
        let records = normalize_records(raw);

        info!(
            "Building report over {} records ({:?} period, anchor {:?})",
            records.len(),
            params.kind,
            params.anchor
        );

        let periods = resolve_windows(params.kind, &params.anchor);
        let window = periods.as_ref().map(|p| &p.current);

        let filtered = apply_filters(&records, window, params.status, &params.search);
        debug!(
            "{} of {} records pass the window/status/search filters",
            filtered.len(),
            records.len()
        );

        let summary = summarize(&filtered, &records, periods.as_ref());
        let quick_stats = quick_stats(&records, today);
        let series = build_series(&records, params.kind, &params.anchor);

        let counterparties = analyze_counterparties(&filtered, &records, today);
        let dormant = dormant_summary(&counterparties);
        if dormant.count > 0 {
            debug!(
                "{} dormant counterparties, {} lifetime profit at risk",
                dormant.count, dormant.lost_profit
            );
        }

        let categories = categorize(&filtered);
        let seasonality = analyze_seasonality(&records);
        let outstanding = outstanding_by_counterparty(&filtered);
        let available_months = available_months(&records);

        let sorted = sort_records(&filtered, &params.sort);
        let page = paginate(&sorted, params.page_index, params.page_size)?;

        Ok(Report {
            summary,
            quick_stats,
            series,
            counterparties,
            dormant,
            categories,
            seasonality,
            outstanding,
            available_months,
            page,
        })
    }
}

pub fn build_report(raw: &[RawRecord], params: &ViewParams, today: NaiveDate) -> Result<Report> {
    ReportEngine::build(raw, params, today)
}
