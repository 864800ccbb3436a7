use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ArticleId;

/// An editorial blog article.
///
/// Articles have no per-user ownership; any admin may edit any article.
/// `published` moves the article between Draft and Published independently
/// of content edits. Every write is a single optimistic overwrite with no
/// version check (last writer wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "id": "9b2f6f4e-14f2-4f68-93b8-6a2f5c7d8e90",
    "title": "Quarterly data deep dive",
    "content": "<p>Our numbers this quarter...</p>",
    "tags": ["analytics", "quarterly"],
    "author": "Dana",
    "published": false,
    "created_at": "2026-01-01T00:00:00Z",
    "updated_at": "2026-01-01T00:00:00Z",
    "summary": "A look at the quarter's numbers."
})))]
pub struct BlogArticle {
    /// Unique article identifier.
    pub id: ArticleId,

    /// Article title.
    pub title: String,

    /// Rich/HTML body. Sanitized before persistence.
    pub content: String,

    /// Normalized tag list: trimmed, empty entries dropped, duplicates
    /// removed, insertion order preserved.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Display name of the authoring admin.
    pub author: String,

    /// Whether the article is publicly visible.
    #[serde(default)]
    pub published: bool,

    /// Timestamp when the article was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last write, including publish toggles.
    pub updated_at: DateTime<Utc>,

    /// Optional short summary for listings.
    #[serde(default)]
    pub summary: Option<String>,
}

impl BlogArticle {
    /// Create a new draft article. Generates a UUID-v4 id and sets both
    /// timestamps to now.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ArticleId::new(Uuid::new_v4().to_string()),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            author: author.into(),
            published: false,
            created_at: now,
            updated_at: now,
            summary: None,
        }
    }

    /// Set the tag list, normalizing it first.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Set the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the initial published flag.
    #[must_use]
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }
}

/// Normalize a tag list: trim whitespace, drop empty entries, and remove
/// duplicates while preserving first-seen order.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.iter().any(|s: &String| s == trimmed) {
            seen.push(trimmed.to_owned());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_article_is_draft() {
        let article = BlogArticle::new("Title", "<p>Body</p>", "Dana");
        assert!(!article.published);
        assert!(article.tags.is_empty());
        assert!(article.summary.is_none());
        assert_eq!(article.created_at, article.updated_at);
    }

    #[test]
    fn builder_chain() {
        let article = BlogArticle::new("T", "c", "a")
            .with_tags(["data", "  charts  ", "data", ""])
            .with_summary("short")
            .with_published(true);
        assert_eq!(article.tags, vec!["data", "charts"]);
        assert_eq!(article.summary.as_deref(), Some("short"));
        assert!(article.published);
    }

    #[test]
    fn normalize_trims_and_dedupes() {
        let tags = normalize_tags(["a", " a", "b", " ", "c", "b"]);
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn normalize_empty_input() {
        let tags: Vec<String> = normalize_tags(Vec::<String>::new());
        assert!(tags.is_empty());
    }

    #[test]
    fn article_serde_roundtrip() {
        let article = BlogArticle::new("Launch notes", "<h1>v2</h1>", "Sam")
            .with_tags(["release"])
            .with_published(true);
        let json = serde_json::to_string(&article).unwrap();
        let back: BlogArticle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, article.id);
        assert_eq!(back.tags, vec!["release"]);
        assert!(back.published);
    }

    #[test]
    fn article_deserializes_with_defaults() {
        let json = r#"{
            "id": "a-1",
            "title": "T",
            "content": "c",
            "author": "x",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let article: BlogArticle = serde_json::from_str(json).unwrap();
        assert!(!article.published);
        assert!(article.tags.is_empty());
        assert!(article.summary.is_none());
    }
}
