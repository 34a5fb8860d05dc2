//! Row-to-item mapper for the press table.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use metrics::counter;
use sha2::{Digest, Sha256};

use super::columns::{ColumnIndexMap, Field};
use super::rules::ClassifierRules;
use super::ContentItem;
use crate::notion::types::{flatten_cells, Block};

pub const DEFAULT_IMAGE: &str = "/placeholder.svg";
/// Spacing between synthesized publication dates.
pub const SYNTHETIC_DATE_STEP_DAYS: i64 = 7;
/// Items at positions below this are featured.
pub const FEATURED_COUNT: usize = 2;

/// Map table rows (header first) into content items, preserving row order.
///
/// Non-row children after the header are skipped and do not consume a position.
pub fn map_rows(rows: &[Block], now: DateTime<Utc>, rules: &ClassifierRules) -> Vec<ContentItem> {
    let Some(first) = rows.first() else {
        tracing::warn!("press table is empty");
        return Vec::new();
    };
    let Some(header_cells) = first.row_cells() else {
        tracing::warn!(kind = %first.kind, "first child is not a table row; no header");
        return Vec::new();
    };

    let headers = flatten_cells(header_cells);
    let columns = ColumnIndexMap::from_headers(&headers);
    let missing = columns.missing();
    if !missing.is_empty() {
        tracing::debug!(?headers, ?missing, "press table header lacks some columns");
    }

    let mut items = Vec::with_capacity(rows.len().saturating_sub(1));
    for (raw_index, block) in rows.iter().enumerate().skip(1) {
        let Some(cells) = block.row_cells() else {
            tracing::debug!(raw_index, kind = %block.kind, "skipping non-row child");
            counter!("press_rows_skipped_total").increment(1);
            continue;
        };
        let position = items.len();
        items.push(map_row(&flatten_cells(cells), position, &columns, now, rules));
    }
    items
}

fn map_row(
    cells: &[String],
    position: usize,
    columns: &ColumnIndexMap,
    now: DateTime<Utc>,
    rules: &ClassifierRules,
) -> ContentItem {
    let title = match columns.get(Field::Title, cells) {
        "" => format!("Press Item {}", position + 1),
        t => t.to_string(),
    };
    let image = match columns.get(Field::Image, cells) {
        "" => DEFAULT_IMAGE.to_string(),
        src => src.to_string(),
    };
    let (date, date_is_synthetic) = match parse_date(columns.get(Field::Date, cells)) {
        Some(d) => (d, false),
        None => (synthetic_date(now, position), true),
    };

    ContentItem {
        id: item_id(position, &title),
        category: rules.category_for(&title),
        tags: rules.tags_for(&title),
        title,
        date,
        date_is_synthetic,
        summary: columns.get(Field::Description, cells).to_string(),
        image,
        attachments: columns.get(Field::Attachments, cells).to_string(),
        featured: position < FEATURED_COUNT,
    }
}

/// `now - position * 7 days`.
pub fn synthetic_date(now: DateTime<Utc>, position: usize) -> DateTime<Utc> {
    now - Duration::days(SYNTHETIC_DATE_STEP_DAYS * position as i64)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn item_id(position: usize, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(position.to_le_bytes());
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(18);
    out.push_str("press-");
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
