use serde::Deserialize;

/// Logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
#[derive(Debug, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter, e.g. `"info"` or `"glimpse_ingest=debug,info"`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_owned()
}
