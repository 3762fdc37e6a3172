//! The content item entity and date/reading-time helpers.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::kind::ContentKind;

/// Words per minute used for derived reading times
pub const WORDS_PER_MINUTE: usize = 200;

/// A single loaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Identifier within the kind (filename without extension)
    pub slug: String,

    /// Kind, fixed by the source directory
    #[serde(rename = "type")]
    pub kind: ContentKind,

    pub title: String,

    /// Calendar date, e.g. `2024-01-15`
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub published: bool,

    /// Raw body text, handed to the renderer untouched
    pub content: String,

    pub reading_time: String,

    // Projects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,

    // Talks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Metadata keys this crate does not interpret
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,

    /// File this item was loaded from (file-backed sources only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl ContentItem {
    /// Create an item with the required fields and an empty body
    pub fn new(
        kind: ContentKind,
        slug: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            kind,
            title: title.into(),
            date: date.into(),
            description: None,
            category: None,
            tags: Vec::new(),
            published: false,
            content: String::new(),
            reading_time: reading_time(""),
            tech_stack: Vec::new(),
            live_url: None,
            github_url: None,
            event: None,
            location: None,
            slides_url: None,
            video_url: None,
            extra: BTreeMap::new(),
            source_path: None,
        }
    }

    /// Set the body; the reading time is re-derived from it
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.reading_time = reading_time(&self.content);
        self
    }

    /// Override the derived reading time
    pub fn with_reading_time(mut self, reading_time: impl Into<String>) -> Self {
        self.reading_time = reading_time.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_tech_stack(mut self, stack: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tech_stack.extend(stack.into_iter().map(Into::into));
        self
    }

    pub fn with_links(mut self, live_url: Option<&str>, github_url: Option<&str>) -> Self {
        self.live_url = live_url.map(str::to_string);
        self.github_url = github_url.map(str::to_string);
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Parsed date, if the `date` string is in a recognized format
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    /// Whether the item belongs in the search index
    pub fn is_search_eligible(&self) -> bool {
        self.published && self.kind.is_searchable()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Derive a reading time string from body text.
///
/// An empty body still reads as one minute.
pub fn reading_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

/// Parse a content date into a sortable timestamp.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();

    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").ok()
}

/// Newest-first ordering. Undated items sort after dated ones and compare
/// equal among themselves, so a stable sort keeps their relative order.
pub fn newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable newest-first sort
pub fn sort_newest_first<T: AsRef<ContentItem>>(items: &mut [T]) {
    items.sort_by(|a, b| newest_first(a.as_ref(), b.as_ref()));
}

impl AsRef<ContentItem> for ContentItem {
    fn as_ref(&self) -> &ContentItem {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_rounds_up() {
        let four_hundred = vec!["word"; 400].join(" ");
        assert_eq!(reading_time(&four_hundred), "2 min read");

        let four_oh_one = vec!["word"; 401].join(" ");
        assert_eq!(reading_time(&four_oh_one), "3 min read");

        assert_eq!(reading_time("hello"), "1 min read");
    }

    #[test]
    fn test_reading_time_empty_body() {
        assert_eq!(reading_time(""), "1 min read");
        assert_eq!(reading_time("  \n\t "), "1 min read");
    }

    #[test]
    fn test_reading_time_collapses_whitespace_runs() {
        assert_eq!(reading_time("a \n\n  b\t\tc").as_str(), "1 min read");
        let spaced = vec!["w"; 200].join("   \n ");
        assert_eq!(reading_time(&spaced), "1 min read");
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert!(parse_date("January 15").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_sort_is_stable_and_puts_undated_last() {
        let mut items = vec![
            ContentItem::new(ContentKind::Blog, "undated-a", "A", "someday"),
            ContentItem::new(ContentKind::Blog, "old", "Old", "2023-01-01"),
            ContentItem::new(ContentKind::Blog, "tie-1", "T1", "2024-05-01"),
            ContentItem::new(ContentKind::Blog, "undated-b", "B", "later"),
            ContentItem::new(ContentKind::Blog, "tie-2", "T2", "2024-05-01"),
        ];

        sort_newest_first(&mut items);

        let slugs: Vec<_> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["tie-1", "tie-2", "old", "undated-a", "undated-b"]);
    }

    #[test]
    fn test_search_eligibility() {
        let post = ContentItem::new(ContentKind::Blog, "p", "P", "2024-01-01").published(true);
        let draft = ContentItem::new(ContentKind::Blog, "d", "D", "2024-01-01");
        let now = ContentItem::new(ContentKind::Now, "n", "N", "2024-01-01").published(true);

        assert!(post.is_search_eligible());
        assert!(!draft.is_search_eligible());
        assert!(!now.is_search_eligible());
    }
}
