//! Read-only recent-tags report.

use chrono::DateTime;

use crate::error::Result;
use crate::git::{Repository, TagInfo};

/// The most recent `limit` tags, ordered by the timestamp of the commit
/// each points to (ascending).
///
/// Tags with unknown commit metadata sort oldest, so they fall out of the
/// window first.
pub fn recent_tags<R: Repository>(repo: &R, limit: usize) -> Result<Vec<TagInfo>> {
    let mut tags = repo.list_tags()?;
    tags.sort_by_key(|t| t.commit_time.unwrap_or(i64::MIN));

    let start = tags.len().saturating_sub(limit);
    Ok(tags.split_off(start))
}

/// Render one report line as `<name>  (<timestamp>)`
pub fn format_tag_line(tag: &TagInfo) -> String {
    let time = tag
        .commit_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| format!("{} UTC", dt.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}  ({})", tag.name, time)
}
