//! Catalog summaries: headline counts, per-category breakdown, growth over
//! time, and category filtering. All functions are pure over a loaded slice.

use crate::core::record::ToolRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Window for [`CatalogStats::added_this_week`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_tools: usize,
    pub categories: usize,
    pub added_this_week: usize,
    pub contributors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub added: usize,
    pub cumulative: usize,
}

/// Headline numbers. Records with an unknown timestamp never count as recent.
pub fn summarize(records: &[ToolRecord], now: NaiveDateTime) -> CatalogStats {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let categories: HashSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
    let contributors: HashSet<&str> = records.iter().map(|r| r.uploaded_by.as_str()).collect();

    CatalogStats {
        total_tools: records.len(),
        categories: categories.len(),
        added_this_week: records
            .iter()
            .filter(|r| r.date_time.is_some_and(|ts| ts >= cutoff))
            .count(),
        contributors: contributors.len(),
    }
}

/// Records per category, most common first, ties by name.
pub fn category_counts(records: &[ToolRecord]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.category.as_str()).or_default() += 1;
    }
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    out
}

/// Additions per calendar day with a running total, oldest day first.
pub fn growth_timeline(records: &[ToolRecord]) -> Vec<GrowthPoint> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in records.iter().filter_map(|r| r.date_time) {
        *per_day.entry(ts.date()).or_default() += 1;
    }
    let mut cumulative = 0;
    per_day
        .into_iter()
        .map(|(date, added)| {
            cumulative += added;
            GrowthPoint {
                date,
                added,
                cumulative,
            }
        })
        .collect()
}

/// The first `n` records in load order (most recent first).
pub fn recent(records: &[ToolRecord], n: usize) -> &[ToolRecord] {
    &records[..n.min(records.len())]
}

/// Records in any of the `selected` categories; everything when the
/// selection is empty.
pub fn filter_by_categories<'a>(
    records: &'a [ToolRecord],
    selected: &[String],
) -> Vec<&'a ToolRecord> {
    records
        .iter()
        .filter(|r| selected.is_empty() || selected.contains(&r.category))
        .collect()
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "stats",
        "version": "0.1.0",
        "description": "Catalog summaries and category filtering",
        "commands": [
            { "name": "stats", "parameters": ["format"] },
            { "name": "list", "parameters": ["category", "limit", "format"] }
        ]
    })
}
