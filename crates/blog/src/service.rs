use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use glimpse_core::{ArticleId, BlogArticle, OwnerId, normalize_tags};
use glimpse_state::{Collection, DocKey, DocumentStore, StateError};

use crate::error::BlogError;
use crate::sanitize::sanitize_html;

/// All articles live in one shared editorial space; there is no per-admin
/// ownership.
const EDITORIAL_OWNER: &str = "editorial";

/// Which articles a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleFilter {
    /// Every article, drafts included. For the admin view.
    All,
    /// Only published articles. For the public site.
    PublishedOnly,
}

/// Fields of an article that an update may change. `None` leaves the
/// current value in place.
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ArticleUpdate {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// CRUD and publish control for editorial articles.
///
/// Writes are whole-document overwrites with no version check: when two
/// admins edit concurrently, the last write wins. Content is sanitized on
/// every write, never on read.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
    owner: OwnerId,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            owner: OwnerId::new(EDITORIAL_OWNER),
        }
    }

    fn key(&self, id: &ArticleId) -> DocKey {
        DocKey::new(Collection::Articles, self.owner.clone(), id.as_str())
    }

    async fn put(&self, article: &BlogArticle) -> Result<(), BlogError> {
        let json = serde_json::to_string(article)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        self.store.put(&self.key(&article.id), &json, None).await?;
        Ok(())
    }

    /// Create a new draft article.
    pub async fn create(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<BlogArticle, BlogError> {
        let article = BlogArticle::new(title, sanitize_html(&content.into()), author)
            .with_tags(tags);
        self.put(&article).await?;
        info!(article = %article.id, title = %article.title, "article created");
        Ok(article)
    }

    /// Fetch one article by id, drafts included.
    pub async fn get(&self, id: &ArticleId) -> Result<Option<BlogArticle>, BlogError> {
        match self.store.get(&self.key(id)).await? {
            Some(json) => {
                let article = serde_json::from_str(&json)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;
                Ok(Some(article))
            }
            None => Ok(None),
        }
    }

    /// Fetch one published article by id. Drafts read as absent.
    pub async fn get_published(&self, id: &ArticleId) -> Result<Option<BlogArticle>, BlogError> {
        Ok(self.get(id).await?.filter(|article| article.published))
    }

    /// List articles, newest first. Documents that fail to decode are
    /// skipped rather than failing the whole listing.
    pub async fn list(
        &self,
        filter: ArticleFilter,
        limit: Option<usize>,
    ) -> Result<Vec<BlogArticle>, BlogError> {
        let rows = self
            .store
            .scan(&Collection::Articles, Some(&self.owner))
            .await?;
        let mut articles: Vec<BlogArticle> = rows
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_str(&value) {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!(%id, error = %e, "skipping undecodable article document");
                    None
                }
            })
            .filter(|article: &BlogArticle| match filter {
                ArticleFilter::All => true,
                ArticleFilter::PublishedOnly => article.published,
            })
            .collect();

        articles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }

    /// Apply a partial update and overwrite the stored article.
    pub async fn update(
        &self,
        id: &ArticleId,
        update: ArticleUpdate,
    ) -> Result<BlogArticle, BlogError> {
        let mut article = self
            .get(id)
            .await?
            .ok_or_else(|| BlogError::NotFound(id.as_str().to_owned()))?;

        if let Some(title) = update.title {
            article.title = title;
        }
        if let Some(content) = update.content {
            article.content = sanitize_html(&content);
        }
        if let Some(summary) = update.summary {
            article.summary = Some(summary);
        }
        if let Some(tags) = update.tags {
            article.tags = normalize_tags(tags);
        }
        article.updated_at = Utc::now();

        self.put(&article).await?;
        debug!(article = %article.id, "article updated");
        Ok(article)
    }

    /// Set the published flag. Setting the current value is a no-op apart
    /// from the `updated_at` refresh.
    pub async fn set_published(
        &self,
        id: &ArticleId,
        published: bool,
    ) -> Result<BlogArticle, BlogError> {
        let mut article = self
            .get(id)
            .await?
            .ok_or_else(|| BlogError::NotFound(id.as_str().to_owned()))?;
        article.published = published;
        article.updated_at = Utc::now();
        self.put(&article).await?;
        info!(article = %article.id, published, "article visibility changed");
        Ok(article)
    }

    /// Flip the published flag: drafts go live, published articles return
    /// to draft.
    pub async fn toggle_published(&self, id: &ArticleId) -> Result<BlogArticle, BlogError> {
        let article = self
            .get(id)
            .await?
            .ok_or_else(|| BlogError::NotFound(id.as_str().to_owned()))?;
        self.set_published(id, !article.published).await
    }

    /// Delete an article. Published articles may be deleted directly;
    /// they disappear from listings and by-id reads alike.
    pub async fn delete(&self, id: &ArticleId) -> Result<(), BlogError> {
        let existed = self.store.delete(&self.key(id)).await?;
        if !existed {
            return Err(BlogError::NotFound(id.as_str().to_owned()));
        }
        info!(article = %id, "article deleted");
        Ok(())
    }
}
