use serde::{Deserialize, Serialize};

use glimpse_core::OwnerId;

/// The logical collection a document belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Persisted dashboard artifacts.
    Dashboards,
    /// Editorial blog articles.
    Articles,
    /// Per-user daily upload counters.
    UploadCounters,
    Custom(String),
}

impl Collection {
    /// Return a string representation of the collection.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dashboards => "dashboards",
            Self::Articles => "articles",
            Self::UploadCounters => "upload_counters",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to address documents in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocKey {
    pub collection: Collection,
    pub owner: OwnerId,
    pub id: String,
}

impl DocKey {
    /// Create a new document key.
    #[must_use]
    pub fn new(collection: Collection, owner: impl Into<OwnerId>, id: impl Into<String>) -> Self {
        Self {
            collection,
            owner: owner.into(),
            id: id.into(),
        }
    }

    /// Return a canonical string representation: `collection:owner:id`
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}:{}:{}", self.collection, self.owner, self.id)
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
