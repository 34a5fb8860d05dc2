// src/press/mod.rs
//! Press feed: Notion table rows in, `ContentItem`s out.

pub mod columns;
pub mod mapper;
pub mod rules;

use std::fmt;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::notion::{types::rows_from_body, TableSource, MAX_PAGE_SIZE};

pub use columns::{ColumnIndexMap, Field};
pub use mapper::{map_rows, DEFAULT_IMAGE};
pub use rules::ClassifierRules;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("press_items_mapped_total", "Press items produced by the mapper.");
        describe_counter!(
            "press_rows_skipped_total",
            "Table children skipped because they were not table rows."
        );
        describe_counter!("notion_upstream_requests_total", "Requests sent to Notion.");
        describe_counter!(
            "notion_upstream_errors_total",
            "Notion transport failures, error statuses and bad bodies."
        );
    });
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Award,
    #[serde(rename = "Media Coverage")]
    MediaCoverage,
    #[default]
    #[serde(rename = "News Release")]
    NewsRelease,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Award, Category::MediaCoverage, Category::NewsRelease];

    pub fn label(self) -> &'static str {
        match self {
            Category::Award => "Award",
            Category::MediaCoverage => "Media Coverage",
            Category::NewsRelease => "News Release",
        }
    }

    /// Case-insensitive label lookup.
    pub fn parse_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|c| c.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized press entry handed to the website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub date: DateTime<Utc>,
    /// False when `date` came from a Date column.
    pub date_is_synthetic: bool,
    pub summary: String,
    pub image: String,
    pub attachments: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Presentation-side narrowing of the feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PressFilter {
    /// Category label; `all` or empty means no filter.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive substring over title and summary.
    #[serde(default)]
    pub search: Option<String>,
}

pub fn filter_items(items: Vec<ContentItem>, filter: &PressFilter) -> Vec<ContentItem> {
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    items
        .into_iter()
        .filter(|it| match category {
            Some(c) => it.category.label().eq_ignore_ascii_case(c),
            None => true,
        })
        .filter(|it| match &needle {
            Some(n) => it.title.to_lowercase().contains(n) || it.summary.to_lowercase().contains(n),
            None => true,
        })
        .collect()
}

/// Fetch one page of the press table and map it. Shape problems yield an empty list.
pub async fn load_press_items(
    source: &dyn TableSource,
    block_id: &str,
    now: DateTime<Utc>,
    rules: &ClassifierRules,
) -> Result<Vec<ContentItem>, FetchError> {
    ensure_metrics_described();
    let body = source.fetch_block_children(block_id, MAX_PAGE_SIZE).await?;
    let rows = rows_from_body(&body);
    let items = map_rows(&rows, now, rules);
    counter!("press_items_mapped_total").increment(items.len() as u64);
    tracing::info!(
        source = source.name(),
        block_id,
        rows = rows.len(),
        items = items.len(),
        "press items loaded"
    );
    Ok(items)
}
