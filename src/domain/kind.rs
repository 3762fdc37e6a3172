//! Content kinds.
//!
//! Every document belongs to exactly one kind, fixed by the directory it was
//! loaded from.

use serde::{Deserialize, Serialize};

/// The closed set of content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Short-form notes
    Thoughts,

    /// Long-form posts
    Blog,

    /// Project write-ups
    Projects,

    /// Conference and meetup talks
    Talks,

    /// The single "what I'm doing now" status entry
    Now,
}

impl ContentKind {
    /// All kinds, in load and display order
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Thoughts,
        ContentKind::Blog,
        ContentKind::Projects,
        ContentKind::Talks,
        ContentKind::Now,
    ];

    /// Canonical name, also the default directory name under the content root
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Thoughts => "thoughts",
            ContentKind::Blog => "blog",
            ContentKind::Projects => "projects",
            ContentKind::Talks => "talks",
            ContentKind::Now => "now",
        }
    }

    /// Whether items of this kind may enter the search index.
    ///
    /// `now` is a single current-status entry, not a corpus member.
    pub fn is_searchable(&self) -> bool {
        !matches!(self, ContentKind::Now)
    }

    /// Human label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Thoughts => "Thoughts",
            ContentKind::Blog => "Blog posts",
            ContentKind::Projects => "Projects",
            ContentKind::Talks => "Talks",
            ContentKind::Now => "Now",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "thoughts" | "thought" => Ok(ContentKind::Thoughts),
            "blog" | "post" | "posts" => Ok(ContentKind::Blog),
            "projects" | "project" => Ok(ContentKind::Projects),
            "talks" | "talk" => Ok(ContentKind::Talks),
            "now" => Ok(ContentKind::Now),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("blog".parse::<ContentKind>().unwrap(), ContentKind::Blog);
        assert_eq!("Projects".parse::<ContentKind>().unwrap(), ContentKind::Projects);
        assert_eq!("talk".parse::<ContentKind>().unwrap(), ContentKind::Talks);
        assert!("videos".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_only_now_is_unsearchable() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.is_searchable(), kind != ContentKind::Now);
        }
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.to_string().parse::<ContentKind>().unwrap(), kind);
        }
    }
}
