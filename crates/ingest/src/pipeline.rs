use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::{debug, info, warn};

use glimpse_core::{DashboardArtifact, OwnerId, parse_dashboard};
use glimpse_llm::{InsightGenerator, UploadPrompt};
use glimpse_state::DocumentStore;

use crate::artifacts::ArtifactRepository;
use crate::encode::encode_file;
use crate::intake::{self, IncomingFile};
use crate::metrics::IngestMetrics;
use crate::outcome::IngestOutcome;
use crate::quota::{QuotaDecision, QuotaGate};

/// How many files of one batch are processed at once by default.
pub const DEFAULT_MAX_CONCURRENT: usize = 1;

/// The upload-to-dashboard pipeline.
///
/// Each file goes through intake validation, the daily quota gate,
/// encoding, generation, and persistence, producing one [`IngestOutcome`].
/// The quota slot is reserved before the generator is called and returned
/// if any later step fails, so only persisted artifacts count against the
/// allowance.
#[derive(Clone)]
pub struct IngestPipeline {
    generator: Arc<dyn InsightGenerator>,
    quota: QuotaGate,
    artifacts: ArtifactRepository,
    metrics: Arc<IngestMetrics>,
    max_concurrent: usize,
}

impl IngestPipeline {
    /// Create a pipeline with the default allowance and sequential batch
    /// processing.
    pub fn new(store: Arc<dyn DocumentStore>, generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            generator,
            quota: QuotaGate::new(store.clone()),
            artifacts: ArtifactRepository::new(store),
            metrics: Arc::new(IngestMetrics::default()),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Override the daily upload allowance.
    #[must_use]
    pub fn with_max_daily(mut self, max_daily: u64) -> Self {
        self.quota = self.quota.with_max_daily(max_daily);
        self
    }

    /// Allow up to `max_concurrent` files of one batch in flight at once.
    /// Values below 1 are treated as 1.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Share a metrics instance with the rest of the application.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<IngestMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The pipeline's outcome counters.
    #[must_use]
    pub fn metrics(&self) -> &IngestMetrics {
        &self.metrics
    }

    /// The quota gate, for usage reads outside the pipeline.
    #[must_use]
    pub fn quota(&self) -> &QuotaGate {
        &self.quota
    }

    /// The artifact repository, for reads outside the pipeline.
    #[must_use]
    pub fn artifacts(&self) -> &ArtifactRepository {
        &self.artifacts
    }

    /// Ingest a single uploaded file.
    pub async fn ingest_file(&self, owner: &OwnerId, file: IncomingFile) -> IngestOutcome {
        self.metrics.increment_received();

        // Validate before touching the quota: a rejected file costs nothing.
        if let Err(reason) = intake::validate(&file) {
            debug!(owner = %owner, file = %file.name, %reason, "upload rejected");
            self.metrics.increment_rejected();
            return IngestOutcome::Rejected {
                file_name: file.name,
                reason,
            };
        }

        // Reserve a quota slot. The bounded increment is atomic, so two
        // concurrent uploads cannot both take the last slot.
        let now = Utc::now();
        let quota = match self.quota.reserve(owner, &now).await {
            Ok(QuotaDecision::Reserved { quota }) => quota,
            Ok(QuotaDecision::Exhausted { quota }) => {
                info!(owner = %owner, used = quota.used, "daily upload allowance exhausted");
                self.metrics.increment_quota_blocked();
                return IngestOutcome::QuotaExceeded {
                    file_name: file.name,
                    quota,
                };
            }
            Err(e) => {
                self.metrics.increment_failed();
                return IngestOutcome::Failed {
                    file_name: file.name,
                    error: e.into(),
                };
            }
        };

        // Encode and hand to the generator.
        let encoded = encode_file(&file.data);
        let prompt = UploadPrompt::new(
            encoded.content.clone(),
            file.name.clone(),
            file.content_type.clone(),
        );
        let raw = match self.generator.generate_dashboard(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(owner = %owner, file = %file.name, error = %e, "dashboard generation failed");
                self.release_slot(owner, &now).await;
                self.metrics.increment_failed();
                return IngestOutcome::Failed {
                    file_name: file.name,
                    error: e.into(),
                };
            }
        };

        // Parse tolerantly: a reply that is not the asked-for JSON still
        // produces an artifact. The raw text is kept either way and the
        // structured sections stay empty on a failed parse.
        let mut artifact = DashboardArtifact::new(
            owner.clone(),
            &file.name,
            &file.content_type,
            encoded.size_bytes,
            encoded.checksum_sha256,
            encoded.content,
        )
        .with_summary(&raw);
        match parse_dashboard(&raw) {
            Ok(insight) => {
                artifact =
                    artifact.with_generated(insight.insights, insight.charts, insight.metrics);
            }
            Err(e) => {
                debug!(owner = %owner, file = %file.name, error = %e, "generator reply is not dashboard JSON; keeping raw text only");
            }
        }

        if let Err(e) = self.artifacts.create(&artifact).await {
            self.release_slot(owner, &now).await;
            self.metrics.increment_failed();
            return IngestOutcome::Failed {
                file_name: file.name,
                error: e.into(),
            };
        }

        info!(owner = %owner, artifact = %artifact.id, used = quota.used, "dashboard artifact created");
        self.metrics.increment_created();
        IngestOutcome::Created {
            artifact: Box::new(artifact),
        }
    }

    /// Ingest a batch of files, yielding one outcome per file in input
    /// order. At most [`max_concurrent`](Self::with_max_concurrent) files
    /// are in flight at once; the default of 1 processes them one at a
    /// time.
    pub async fn ingest_batch(
        &self,
        owner: &OwnerId,
        files: Vec<IncomingFile>,
    ) -> Vec<IngestOutcome> {
        futures::stream::iter(files.into_iter().map(|file| self.ingest_file(owner, file)))
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Best-effort release. A failed release leaves the slot consumed until
    /// the counter expires at midnight.
    async fn release_slot(&self, owner: &OwnerId, now: &DateTime<Utc>) {
        if let Err(e) = self.quota.release(owner, now).await {
            warn!(owner = %owner, error = %e, "failed to return reserved upload slot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use glimpse_llm::{FailingInsightGenerator, MockInsightGenerator};
    use glimpse_state_memory::MemoryDocumentStore;

    fn csv_file(name: &str) -> IncomingFile {
        IncomingFile::new(name, "text/csv", Bytes::from_static(b"month,revenue\nJan,120\n"))
    }

    fn pipeline(generator: MockInsightGenerator) -> IngestPipeline {
        IngestPipeline::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(generator),
        )
    }

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    #[tokio::test]
    async fn tenth_upload_fits_the_default_allowance() {
        let p = pipeline(MockInsightGenerator::new());
        let owner = owner();

        for i in 0..9 {
            let outcome = p.ingest_file(&owner, csv_file(&format!("file-{i}.csv"))).await;
            assert!(outcome.is_created(), "upload {i} should succeed");
        }

        let tenth = p.ingest_file(&owner, csv_file("file-9.csv")).await;
        assert!(tenth.is_created(), "the tenth upload uses the last slot");

        let usage = p.quota().usage(&owner, &Utc::now()).await.unwrap();
        assert_eq!(usage.used, 10);
        assert_eq!(usage.remaining, 0);
    }

    #[tokio::test]
    async fn exhausted_allowance_blocks_before_the_generator() {
        let generator = MockInsightGenerator::new();
        let p = pipeline(generator.clone()).with_max_daily(2);
        let owner = owner();

        assert!(p.ingest_file(&owner, csv_file("a.csv")).await.is_created());
        assert!(p.ingest_file(&owner, csv_file("b.csv")).await.is_created());
        assert_eq!(generator.dashboard_calls(), 2);

        let blocked = p.ingest_file(&owner, csv_file("c.csv")).await;
        match blocked {
            IngestOutcome::QuotaExceeded { file_name, quota } => {
                assert_eq!(file_name, "c.csv");
                assert_eq!(quota.used, 2);
                assert_eq!(quota.remaining, 0);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        assert_eq!(generator.dashboard_calls(), 2, "blocked upload must not reach the model");
    }

    #[tokio::test]
    async fn prose_reply_still_creates_an_artifact() {
        let generator =
            MockInsightGenerator::new().with_dashboard_response("Sorry, I cannot analyze this.");
        let p = pipeline(generator);

        let outcome = p.ingest_file(&owner(), csv_file("odd.csv")).await;
        match outcome {
            IngestOutcome::Created { artifact } => {
                assert_eq!(artifact.ai_summary, "Sorry, I cannot analyze this.");
                assert!(artifact.insights.is_empty());
                assert!(artifact.charts.is_empty());
                assert!(artifact.metrics.is_empty());
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn structured_reply_populates_charts_and_metrics() {
        let p = pipeline(MockInsightGenerator::new());

        let outcome = p.ingest_file(&owner(), csv_file("sales.csv")).await;
        match outcome {
            IngestOutcome::Created { artifact } => {
                assert_eq!(artifact.title, "sales");
                assert!(artifact.ai_summary.contains("\"charts\""));
                assert_eq!(artifact.insights.len(), 1);
                assert_eq!(artifact.charts.len(), 1);
                assert_eq!(artifact.charts[0].title, "Revenue by month");
                assert_eq!(artifact.metrics.len(), 1);
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_file_consumes_no_quota() {
        let generator = MockInsightGenerator::new();
        let p = pipeline(generator.clone());
        let owner = owner();

        let outcome = p
            .ingest_file(
                &owner,
                IncomingFile::new("movie.mp4", "video/mp4", Bytes::from_static(b"data")),
            )
            .await;
        assert!(matches!(outcome, IngestOutcome::Rejected { .. }));
        assert_eq!(generator.dashboard_calls(), 0);

        let usage = p.quota().usage(&owner, &Utc::now()).await.unwrap();
        assert_eq!(usage.used, 0);
    }

    #[tokio::test]
    async fn generation_failure_returns_the_reserved_slot() {
        let p = IngestPipeline::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(FailingInsightGenerator::new("model offline")),
        )
        .with_max_daily(1);
        let owner = owner();

        let outcome = p.ingest_file(&owner, csv_file("a.csv")).await;
        assert!(matches!(outcome, IngestOutcome::Failed { .. }));

        let usage = p.quota().usage(&owner, &Utc::now()).await.unwrap();
        assert_eq!(usage.used, 0, "failed upload should not consume the allowance");
    }

    #[tokio::test]
    async fn persisted_artifact_is_listable() {
        let p = pipeline(MockInsightGenerator::new());
        let owner = owner();

        let outcome = p.ingest_file(&owner, csv_file("sales.csv")).await;
        let IngestOutcome::Created { artifact } = outcome else {
            panic!("expected Created");
        };

        let listed = p.artifacts().list(&owner, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, artifact.id);
        let fetched = p.artifacts().fetch(&owner, &artifact.id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn batch_outcomes_keep_input_order() {
        let p = pipeline(MockInsightGenerator::new()).with_max_concurrent(3);
        let owner = owner();

        let files = vec![
            csv_file("first.csv"),
            IncomingFile::new("second.mp4", "video/mp4", Bytes::from_static(b"data")),
            csv_file("third.csv"),
        ];
        let outcomes = p.ingest_batch(&owner, files).await;

        let names: Vec<&str> = outcomes.iter().map(IngestOutcome::file_name).collect();
        assert_eq!(names, ["first.csv", "second.mp4", "third.csv"]);
        assert!(outcomes[0].is_created());
        assert!(matches!(outcomes[1], IngestOutcome::Rejected { .. }));
        assert!(outcomes[2].is_created());
    }

    #[tokio::test]
    async fn metrics_count_every_outcome() {
        let generator = MockInsightGenerator::new();
        let p = pipeline(generator).with_max_daily(1);
        let owner = owner();

        p.ingest_file(&owner, csv_file("a.csv")).await;
        p.ingest_file(&owner, csv_file("b.csv")).await;
        p.ingest_file(
            &owner,
            IncomingFile::new("c.mp4", "video/mp4", Bytes::from_static(b"x")),
        )
        .await;

        let snap = p.metrics().snapshot();
        assert_eq!(snap.received, 3);
        assert_eq!(snap.created, 1);
        assert_eq!(snap.quota_blocked, 1);
        assert_eq!(snap.rejected, 1);
        assert_eq!(snap.failed, 0);
    }
}
