use serde::Deserialize;

/// Upload pipeline configuration.
#[derive(Debug, Deserialize)]
pub struct IngestConfig {
    /// Dashboards each user may create per UTC day.
    #[serde(default = "default_max_daily")]
    pub max_daily: u64,
    /// How many files of one upload batch are processed at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_daily: default_max_daily(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_max_daily() -> u64 {
    glimpse_core::DEFAULT_MAX_DAILY
}

fn default_concurrency() -> usize {
    glimpse_ingest::DEFAULT_MAX_CONCURRENT
}
