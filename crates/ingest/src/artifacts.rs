use std::sync::Arc;

use tracing::warn;

use glimpse_core::{ArtifactId, DashboardArtifact, OwnerId};
use glimpse_state::{Collection, DocKey, DocumentStore, StateError};

/// Persistence for dashboard artifacts.
///
/// Artifacts are immutable once created: there is no update and no delete.
/// Reads are always scoped to a single owner.
#[derive(Clone)]
pub struct ArtifactRepository {
    store: Arc<dyn DocumentStore>,
}

impl ArtifactRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn key(owner: &OwnerId, id: &ArtifactId) -> DocKey {
        DocKey::new(Collection::Dashboards, owner.clone(), id.as_str())
    }

    /// Persist a new artifact.
    pub async fn create(&self, artifact: &DashboardArtifact) -> Result<(), StateError> {
        let json = serde_json::to_string(artifact)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        self.store
            .put(&Self::key(&artifact.owner, &artifact.id), &json, None)
            .await
    }

    /// List an owner's artifacts, newest first. Documents that fail to
    /// decode are skipped rather than failing the whole listing.
    pub async fn list(
        &self,
        owner: &OwnerId,
        limit: Option<usize>,
    ) -> Result<Vec<DashboardArtifact>, StateError> {
        let rows = self.store.scan(&Collection::Dashboards, Some(owner)).await?;
        let mut artifacts: Vec<DashboardArtifact> = rows
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_str(&value) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    warn!(%id, error = %e, "skipping undecodable dashboard document");
                    None
                }
            })
            .collect();

        // Newest first; ties broken by id so the order is stable across calls.
        artifacts.sort_by(|a: &DashboardArtifact, b: &DashboardArtifact| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        if let Some(limit) = limit {
            artifacts.truncate(limit);
        }
        Ok(artifacts)
    }

    /// Fetch one artifact by id. Returns `None` if it does not exist for
    /// this owner.
    pub async fn fetch(
        &self,
        owner: &OwnerId,
        id: &ArtifactId,
    ) -> Result<Option<DashboardArtifact>, StateError> {
        match self.store.get(&Self::key(owner, id)).await? {
            Some(json) => {
                let artifact = serde_json::from_str(&json)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;
                Ok(Some(artifact))
            }
            None => Ok(None),
        }
    }
}
