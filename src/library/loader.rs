//! Document loader.
//!
//! Turns one content-kind directory into a sequence of [`ContentItem`]s.
//! Each file starts with a `---` delimited YAML metadata block followed by
//! the body text.
//!
//! Failure policy is skip-and-continue: a file that cannot be read or parsed
//! is left out and reported in the [`LoadReport`], while every other file of
//! the kind still loads. A missing directory yields no items and a notice.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::{item::reading_time, sort_newest_first, ContentItem, ContentKind};

/// Metadata block delimiter
const DELIMITER: &str = "---";

/// Errors and notices produced while loading content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content directory does not exist: {0}")]
    MissingContentDirectory(PathBuf),

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Duplicate slug '{slug}' in {kind}: {path} conflicts with {existing}")]
    DuplicateSlug {
        kind: ContentKind,
        slug: String,
        path: PathBuf,
        existing: PathBuf,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How serious a load diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational; nothing was skipped
    Notice,

    /// A file was skipped
    Error,
}

impl ContentError {
    pub fn severity(&self) -> Severity {
        match self {
            ContentError::MissingContentDirectory(_) => Severity::Notice,
            ContentError::Parse { .. }
            | ContentError::DuplicateSlug { .. }
            | ContentError::Io { .. } => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Items of one kind plus whatever went wrong loading them
#[derive(Debug)]
pub struct LoadReport {
    pub kind: ContentKind,
    pub items: Vec<ContentItem>,
    pub errors: Vec<ContentError>,
}

impl LoadReport {
    pub fn empty(kind: ContentKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Loader settings
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Extensions recognized as content (without the dot)
    pub extensions: Vec<String>,

    /// Glob patterns for file names that are never content
    pub ignore: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "mdx".to_string()],
            ignore: vec!["_*".to_string(), ".*".to_string()],
        }
    }
}

impl LoaderOptions {
    /// Check whether a file name is a content candidate
    pub fn is_content_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        let ignored = self
            .ignore
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches(name));
        if ignored {
            return false;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Load every content file in `dir` as items of `kind`.
pub fn load_directory(dir: &Path, kind: ContentKind, options: &LoaderOptions) -> LoadReport {
    let mut report = LoadReport::empty(kind);

    if !dir.is_dir() {
        tracing::debug!(%kind, "No content directory at {}", dir.display());
        report
            .errors
            .push(ContentError::MissingContentDirectory(dir.to_path_buf()));
        return report;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            report.errors.push(ContentError::Io {
                path: dir.to_path_buf(),
                source,
            });
            return report;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && options.is_content_file(p))
        .collect();

    // File-name order decides which file keeps a contested slug
    paths.sort();

    let mut parsed = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) => {
                tracing::warn!("Skipping unreadable file {}: {}", path.display(), source);
                report.errors.push(ContentError::Io { path, source });
                continue;
            }
        };

        match parse_document(&path, kind, &raw) {
            Ok(item) => parsed.push(item),
            Err(e) => {
                tracing::warn!("Skipping {}", e);
                report.errors.push(e);
            }
        }
    }

    report.items = finish_kind(kind, parsed, &mut report.errors);
    tracing::debug!(%kind, items = report.items.len(), "Loaded {}", dir.display());
    report
}

/// Reject duplicate slugs (first claim wins) and sort newest-first.
pub(crate) fn finish_kind(
    kind: ContentKind,
    items: Vec<ContentItem>,
    errors: &mut Vec<ContentError>,
) -> Vec<ContentItem> {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        let path = item
            .source_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&item.slug));

        if let Some(existing) = seen.get(&item.slug) {
            tracing::warn!(%kind, slug = %item.slug, "Rejecting duplicate slug from {}", path.display());
            errors.push(ContentError::DuplicateSlug {
                kind,
                slug: item.slug.clone(),
                path,
                existing: existing.clone(),
            });
            continue;
        }

        seen.insert(item.slug.clone(), path);
        kept.push(item);
    }

    sort_newest_first(&mut kept);
    kept
}

/// Raw metadata block schema
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter {
    title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    date: Option<String>,
    description: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    published: bool,
    reading_time: Option<String>,
    #[serde(default)]
    tech_stack: Vec<String>,
    live_url: Option<String>,
    github_url: Option<String>,
    event: Option<String>,
    location: Option<String>,
    slides_url: Option<String>,
    video_url: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Accept a date written as a string or a bare YAML number
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a date string, found {:?}",
            other
        ))),
    }
}

/// Split a document into its metadata block and body.
///
/// Returns `Ok((None, body))` when the document has no leading block.
pub fn split_front_matter(raw: &str) -> Result<(Option<&str>, &str), String> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, raw));
    };
    if first.trim_end() != DELIMITER {
        return Ok((None, raw));
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let block = &raw[start..offset];
            let body = &raw[offset + line.len()..];
            return Ok((Some(block), body));
        }
        offset += line.len();
    }

    Err("metadata block is not closed".to_string())
}

/// Parse one document into a content item
pub fn parse_document(path: &Path, kind: ContentKind, raw: &str) -> Result<ContentItem, ContentError> {
    let parse_err = |reason: String| ContentError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let (block, body) = split_front_matter(raw).map_err(&parse_err)?;

    let meta: FrontMatter = match block {
        Some(block) if !block.trim().is_empty() => {
            serde_yaml::from_str(block).map_err(|e| parse_err(e.to_string()))?
        }
        _ => FrontMatter::default(),
    };

    let title = meta
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| parse_err("missing required key `title`".to_string()))?;
    let date = meta
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| parse_err("missing required key `date`".to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| parse_err("file name is not valid UTF-8".to_string()))?
        .to_string();

    let content = body.to_string();
    let reading_time = meta.reading_time.unwrap_or_else(|| reading_time(&content));

    Ok(ContentItem {
        slug,
        kind,
        title,
        date,
        description: meta.description,
        category: meta.category,
        tags: meta.tags,
        published: meta.published,
        content,
        reading_time,
        tech_stack: meta.tech_stack,
        live_url: meta.live_url,
        github_url: meta.github_url,
        event: meta.event,
        location: meta.location,
        slides_url: meta.slides_url,
        video_url: meta.video_url,
        extra: meta.extra,
        source_path: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<ContentItem, ContentError> {
        parse_document(Path::new("/content/blog/hello-world.md"), ContentKind::Blog, raw)
    }

    #[test]
    fn test_parse_full_document() {
        let raw = "---\n\
title: Hello World\n\
date: 2024-01-15\n\
description: First post\n\
tags: [rust, intro]\n\
published: true\n\
category: Notes\n\
series: basics\n\
---\n\
Body text here.\n";

        let item = parse(raw).unwrap();
        assert_eq!(item.slug, "hello-world");
        assert_eq!(item.kind, ContentKind::Blog);
        assert_eq!(item.title, "Hello World");
        assert_eq!(item.date, "2024-01-15");
        assert_eq!(item.description.as_deref(), Some("First post"));
        assert_eq!(item.tags, vec!["rust", "intro"]);
        assert!(item.published);
        assert_eq!(item.content, "Body text here.\n");
        assert_eq!(item.reading_time, "1 min read");
        assert!(item.extra.contains_key("series"));
    }

    #[test]
    fn test_camel_case_keys() {
        let raw = "---\n\
title: Site\n\
date: 2024-02-01\n\
techStack: [Rust, Axum]\n\
githubUrl: https://github.com/example/site\n\
readingTime: 9 min read\n\
---\n";

        let item = parse(raw).unwrap();
        assert_eq!(item.tech_stack, vec!["Rust", "Axum"]);
        assert_eq!(item.github_url.as_deref(), Some("https://github.com/example/site"));
        assert_eq!(item.reading_time, "9 min read");
        assert!(!item.published);
    }

    #[test]
    fn test_missing_required_keys() {
        let err = parse("---\ndate: 2024-01-01\n---\nbody").unwrap_err();
        assert!(err.to_string().contains("title"));

        let err = parse("---\ntitle: No date\n---\nbody").unwrap_err();
        assert!(err.to_string().contains("date"));

        // No metadata block at all
        assert!(parse("just a body").is_err());
    }

    #[test]
    fn test_unclosed_block_is_parse_error() {
        let err = parse("---\ntitle: Oops\ndate: 2024-01-01\nbody").unwrap_err();
        match err {
            ContentError::Parse { path, reason } => {
                assert!(path.ends_with("hello-world.md"));
                assert!(reason.contains("not closed"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse("---\ntitle: [unclosed\ndate: 2024-01-01\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
        assert!(err.is_error());
    }

    #[test]
    fn test_body_is_untouched() {
        let body = "# Heading\n\n<Callout>keep *this*</Callout>\n---\nnot metadata\n";
        let raw = format!("---\ntitle: T\ndate: 2024-01-01\n---\n{}", body);
        let item = parse(&raw).unwrap();
        assert_eq!(item.content, body);
    }

    #[test]
    fn test_crlf_and_bom() {
        let raw = "\u{feff}---\r\ntitle: Windows\r\ndate: 2024-03-01\r\n---\r\nbody\r\n";
        let item = parse(raw).unwrap();
        assert_eq!(item.title, "Windows");
        assert_eq!(item.content, "body\r\n");
    }

    #[test]
    fn test_is_content_file() {
        let options = LoaderOptions::default();
        assert!(options.is_content_file(Path::new("post.md")));
        assert!(options.is_content_file(Path::new("post.MDX")));
        assert!(!options.is_content_file(Path::new("post.txt")));
        assert!(!options.is_content_file(Path::new("_draft.md")));
        assert!(!options.is_content_file(Path::new(".hidden.md")));
    }

    #[test]
    fn test_finish_kind_rejects_duplicates() {
        let mut errors = Vec::new();
        let items = vec![
            ContentItem::new(ContentKind::Blog, "same", "First", "2024-01-01"),
            ContentItem::new(ContentKind::Blog, "other", "Other", "2024-02-01"),
            ContentItem::new(ContentKind::Blog, "same", "Second", "2024-03-01"),
        ];

        let kept = finish_kind(ContentKind::Blog, items, &mut errors);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].slug, "other");
        assert_eq!(kept[1].title, "First");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ContentError::DuplicateSlug { ref slug, .. } if slug == "same"));
    }
}
