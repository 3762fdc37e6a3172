//! In-memory content repository.
//!
//! Built once from a [`ContentSource`]; every query is read-only.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::loader::ContentError;
use super::source::ContentSource;
use crate::domain::{sort_newest_first, ContentItem, ContentKind};

/// Per-kind item lists, indexed by exhaustive match
#[derive(Debug, Clone, Default)]
struct KindTable {
    thoughts: Vec<Arc<ContentItem>>,
    blog: Vec<Arc<ContentItem>>,
    projects: Vec<Arc<ContentItem>>,
    talks: Vec<Arc<ContentItem>>,
    now: Vec<Arc<ContentItem>>,
}

impl KindTable {
    fn get(&self, kind: ContentKind) -> &[Arc<ContentItem>] {
        match kind {
            ContentKind::Thoughts => &self.thoughts,
            ContentKind::Blog => &self.blog,
            ContentKind::Projects => &self.projects,
            ContentKind::Talks => &self.talks,
            ContentKind::Now => &self.now,
        }
    }

    fn get_mut(&mut self, kind: ContentKind) -> &mut Vec<Arc<ContentItem>> {
        match kind {
            ContentKind::Thoughts => &mut self.thoughts,
            ContentKind::Blog => &mut self.blog,
            ContentKind::Projects => &mut self.projects,
            ContentKind::Talks => &mut self.talks,
            ContentKind::Now => &mut self.now,
        }
    }
}

/// Read-only collection of every loaded item
#[derive(Debug, Clone, Default)]
pub struct ContentRepository {
    by_kind: KindTable,
    /// All kinds, newest first
    all: Vec<Arc<ContentItem>>,
}

impl ContentRepository {
    /// Load every kind from `source`.
    ///
    /// Returns the repository together with the diagnostics collected while
    /// loading; files that failed are not part of the repository.
    pub fn build(source: &dyn ContentSource) -> (Self, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut by_kind = KindTable::default();

        for kind in ContentKind::ALL {
            let report = source.load_kind(kind);
            errors.extend(report.errors);
            *by_kind.get_mut(kind) = report.items.into_iter().map(Arc::new).collect();
        }

        (Self::from_table(by_kind), errors)
    }

    /// Build directly from items, grouping them by kind.
    ///
    /// Items are taken as already validated; per-kind order is preserved.
    pub fn from_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut by_kind = KindTable::default();
        for item in items {
            by_kind.get_mut(item.kind).push(Arc::new(item));
        }
        Self::from_table(by_kind)
    }

    fn from_table(by_kind: KindTable) -> Self {
        let mut all: Vec<Arc<ContentItem>> = ContentKind::ALL
            .iter()
            .flat_map(|kind| by_kind.get(*kind).iter().cloned())
            .collect();
        sort_newest_first(&mut all);

        Self { by_kind, all }
    }

    /// Every item across all kinds, newest first
    pub fn get_all(&self) -> &[Arc<ContentItem>] {
        &self.all
    }

    /// Items of one kind, in loader order
    pub fn get_by_kind(&self, kind: ContentKind) -> &[Arc<ContentItem>] {
        self.by_kind.get(kind)
    }

    /// Look up an item by kind and slug
    pub fn get_by_slug(&self, kind: ContentKind, slug: &str) -> Option<&Arc<ContentItem>> {
        self.get_by_kind(kind).iter().find(|item| item.slug == slug)
    }

    /// Published items of one kind, in loader order
    pub fn get_published(&self, kind: ContentKind) -> Vec<&Arc<ContentItem>> {
        self.get_by_kind(kind)
            .iter()
            .filter(|item| item.published)
            .collect()
    }

    /// The `n` newest published items across all kinds
    pub fn get_recent(&self, n: usize) -> Vec<&Arc<ContentItem>> {
        self.all.iter().filter(|item| item.published).take(n).collect()
    }

    /// Published items carrying exactly `tag`
    pub fn get_by_tag(&self, tag: &str) -> Vec<&Arc<ContentItem>> {
        self.all
            .iter()
            .filter(|item| item.published && item.has_tag(tag))
            .collect()
    }

    /// Every tag in use, regardless of publication state, sorted and unique
    pub fn get_all_tags(&self) -> Vec<String> {
        self.all
            .iter()
            .flat_map(|item| item.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Published items newest first, optionally truncated
    pub fn get_featured(&self, limit: Option<usize>) -> Vec<&Arc<ContentItem>> {
        let published = self.all.iter().filter(|item| item.published);
        match limit {
            Some(limit) => published.take(limit).collect(),
            None => published.collect(),
        }
    }

    /// The newest "now" entry
    pub fn current_status(&self) -> Option<&Arc<ContentItem>> {
        self.get_by_kind(ContentKind::Now).first()
    }

    /// Number of published items per kind, in kind order
    pub fn published_counts(&self) -> Vec<(ContentKind, usize)> {
        ContentKind::ALL
            .iter()
            .map(|kind| (*kind, self.get_published(*kind).len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
