//! Content sources.
//!
//! A [`ContentSource`] yields the items of one kind. The file-backed source
//! reads the content tree on disk; the static source serves a fixed
//! in-memory dataset for isolated builds and demos.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::loader::{finish_kind, load_directory, LoadReport, LoaderOptions};
use crate::domain::{ContentItem, ContentKind};

/// Something that can produce the items of a content kind
pub trait ContentSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Load all items of `kind`, newest first
    fn load_kind(&self, kind: ContentKind) -> LoadReport;
}

/// Which source implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Markdown files under the content root
    #[default]
    Files,

    /// Built-in sample dataset
    Static,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Files => write!(f, "files"),
            SourceKind::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "files" | "file" | "fs" => Ok(SourceKind::Files),
            "static" | "mock" | "demo" => Ok(SourceKind::Static),
            _ => anyhow::bail!("Unknown content source: {}", s),
        }
    }
}

/// Reads `<root>/<kind>/*.md`
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    directories: HashMap<ContentKind, String>,
    options: LoaderOptions,
}

impl FileSource {
    /// Create a file source with default directory names and loader options
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            directories: HashMap::new(),
            options: LoaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the subdirectory used for a kind
    pub fn with_directory(mut self, kind: ContentKind, dir: impl Into<String>) -> Self {
        self.directories.insert(kind, dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Directory holding the files of `kind`
    pub fn kind_dir(&self, kind: ContentKind) -> PathBuf {
        match self.directories.get(&kind) {
            Some(subdir) => self.root.join(subdir),
            None => self.root.join(kind.as_str()),
        }
    }
}

impl ContentSource for FileSource {
    fn name(&self) -> &str {
        "files"
    }

    fn load_kind(&self, kind: ContentKind) -> LoadReport {
        load_directory(&self.kind_dir(kind), kind, &self.options)
    }
}

/// Fixed in-memory dataset
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    items: Vec<ContentItem>,
}

impl StaticSource {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// The sample dataset shipped for builds without a content tree
    pub fn demo() -> Self {
        Self::new(vec![
            ContentItem::new(
                ContentKind::Thoughts,
                "first-thought",
                "On the Nature of Code",
                "2024-01-10",
            )
            .with_description("Reflecting on what makes code beautiful and maintainable.")
            .with_tags(["philosophy", "coding"])
            .with_content(
                "Code is poetry. It should flow naturally, tell a story, and be \
                 understandable by humans, not just machines. When we write code, we are \
                 crafting instructions that will be read and modified by future developers, \
                 including our future selves.",
            )
            .with_reading_time("2 min read")
            .published(true),
            ContentItem::new(
                ContentKind::Blog,
                "building-scalable-web-applications",
                "Building Scalable Web Applications with Next.js",
                "2024-01-15",
            )
            .with_description(
                "A comprehensive guide to building scalable web applications using Next.js \
                 and modern development practices.",
            )
            .with_tags(["Next.js", "React", "Performance"])
            .with_category("Web Development")
            .with_content(
                "Next.js has revolutionized how we build React applications. In this post, \
                 we explore the key features that make Next.js perfect for scalable \
                 applications.",
            )
            .with_reading_time("5 min read")
            .published(true),
            ContentItem::new(
                ContentKind::Projects,
                "portfolio-website",
                "Personal Portfolio Website",
                "2024-01-01",
            )
            .with_description("A modern portfolio website built with Next.js and Tailwind CSS.")
            .with_tags(["Next.js", "Tailwind CSS", "TypeScript"])
            .with_tech_stack(["Next.js", "Tailwind CSS", "TypeScript"])
            .with_links(
                Some("https://example.com"),
                Some("https://github.com/twilighty-abhi/portfolio"),
            )
            .with_content(
                "This portfolio website showcases my work and thoughts on software development.",
            )
            .with_reading_time("3 min read")
            .published(true),
        ])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load_kind(&self, kind: ContentKind) -> LoadReport {
        let mut report = LoadReport::empty(kind);
        let items: Vec<ContentItem> = self
            .items
            .iter()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect();
        report.items = finish_kind(kind, items, &mut report.errors);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dir_mapping() {
        let source = FileSource::new("/site/content").with_directory(ContentKind::Blog, "posts");

        assert_eq!(source.kind_dir(ContentKind::Blog), PathBuf::from("/site/content/posts"));
        // Unmapped kinds fall back to the kind name
        assert_eq!(
            source.kind_dir(ContentKind::Talks),
            PathBuf::from("/site/content/talks")
        );
    }

    #[test]
    fn test_static_source_filters_by_kind() {
        let source = StaticSource::demo();

        let blog = source.load_kind(ContentKind::Blog);
        assert_eq!(blog.items.len(), 1);
        assert!(blog.errors.is_empty());
        assert!(blog.items.iter().all(|i| i.kind == ContentKind::Blog));

        let talks = source.load_kind(ContentKind::Talks);
        assert!(talks.items.is_empty());
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("files".parse::<SourceKind>().unwrap(), SourceKind::Files);
        assert_eq!("mock".parse::<SourceKind>().unwrap(), SourceKind::Static);
        assert!("sqlite".parse::<SourceKind>().is_err());
    }
}
