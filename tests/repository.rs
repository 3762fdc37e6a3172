//! Repository Integration Tests
//!
//! Tests for ordering, lookups and tag queries over a loaded content tree.

use std::path::Path;

use folio::domain::{parse_date, ContentKind};
use folio::library::{ContentRepository, FileSource};
use tempfile::TempDir;

fn write_doc(root: &Path, rel: &str, title: &str, date: &str, published: bool, tags: &[&str]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let body = format!(
        "---\ntitle: \"{}\"\ndate: \"{}\"\npublished: {}\ntags: [{}]\n---\nBody of {}.\n",
        title,
        date,
        published,
        tags.join(", "),
        title
    );
    std::fs::write(path, body).unwrap();
}

/// Five published and two unpublished items across kinds
fn sample_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write_doc(root, "blog/first.md", "First", "2024-01-10", true, &["rust"]);
    write_doc(root, "blog/second.md", "Second", "2024-03-05", true, &["rust", "async"]);
    write_doc(root, "blog/draft.md", "Draft", "2024-06-01", false, &["rust", "wip"]);
    write_doc(root, "thoughts/idea.md", "Idea", "2024-02-14", true, &["ideas"]);
    write_doc(root, "projects/tool.md", "Tool", "2024-04-20", true, &["rust", "cli"]);
    write_doc(root, "talks/meetup.md", "Meetup", "2023-11-30", true, &[]);
    write_doc(root, "now/now.md", "Now", "2024-07-01", false, &[]);

    temp
}

fn load(temp: &TempDir) -> ContentRepository {
    let (repo, diagnostics) = ContentRepository::build(&FileSource::new(temp.path()));
    assert!(diagnostics.iter().all(|d| !d.is_error()), "{:?}", diagnostics);
    repo
}

#[test]
fn test_get_all_newest_first() {
    let temp = sample_tree();
    let repo = load(&temp);

    let all = repo.get_all();
    assert_eq!(all.len(), 7);

    for pair in all.windows(2) {
        let a = parse_date(&pair[0].date).unwrap();
        let b = parse_date(&pair[1].date).unwrap();
        assert!(a >= b, "{} before {}", pair[0].date, pair[1].date);
    }
    assert_eq!(all[0].slug, "now");
    assert_eq!(all[6].slug, "meetup");
}

#[test]
fn test_get_recent_only_published() {
    let temp = sample_tree();
    let repo = load(&temp);

    let recent: Vec<&str> = repo.get_recent(3).iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(recent, vec!["tool", "second", "idea"]);

    assert_eq!(repo.get_recent(100).len(), 5);
    assert!(repo.get_recent(0).is_empty());
}

#[test]
fn test_get_by_slug() {
    let temp = sample_tree();
    let repo = load(&temp);

    let item = repo.get_by_slug(ContentKind::Blog, "second").unwrap();
    assert_eq!(item.title, "Second");
    assert_eq!(item.kind, ContentKind::Blog);

    // Unpublished items are still addressable
    assert!(repo.get_by_slug(ContentKind::Blog, "draft").is_some());

    // Slug exists, but under another kind
    assert!(repo.get_by_slug(ContentKind::Thoughts, "second").is_none());
    assert!(repo.get_by_slug(ContentKind::Blog, "missing").is_none());
}

#[test]
fn test_get_published_per_kind() {
    let temp = sample_tree();
    let repo = load(&temp);

    let blog: Vec<&str> = repo
        .get_published(ContentKind::Blog)
        .iter()
        .map(|i| i.slug.as_str())
        .collect();
    assert_eq!(blog, vec!["second", "first"]);
    assert!(repo.get_published(ContentKind::Now).is_empty());
}

#[test]
fn test_tags() {
    let temp = sample_tree();
    let repo = load(&temp);

    // Tag listing includes tags of unpublished items
    assert_eq!(repo.get_all_tags(), vec!["async", "cli", "ideas", "rust", "wip"]);

    let rust: Vec<&str> = repo.get_by_tag("rust").iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(rust, vec!["tool", "second", "first"]);

    // Exact match only
    assert!(repo.get_by_tag("Rust").is_empty());
    assert!(repo.get_by_tag("wip").is_empty());
}

#[test]
fn test_current_status_and_counts() {
    let temp = sample_tree();
    let repo = load(&temp);

    assert_eq!(repo.current_status().unwrap().slug, "now");

    let counts = repo.published_counts();
    assert_eq!(
        counts,
        vec![
            (ContentKind::Thoughts, 1),
            (ContentKind::Blog, 2),
            (ContentKind::Projects, 1),
            (ContentKind::Talks, 1),
            (ContentKind::Now, 0),
        ]
    );
}

#[test]
fn test_empty_tree() {
    let temp = TempDir::new().unwrap();
    let (repo, diagnostics) = ContentRepository::build(&FileSource::new(temp.path()));

    assert!(repo.is_empty());
    assert!(repo.get_recent(3).is_empty());
    assert!(repo.current_status().is_none());
    assert_eq!(diagnostics.len(), ContentKind::ALL.len());
}
