mod auth;
mod generator;
mod ingest;
mod server;
mod state;
mod telemetry;

#[cfg(test)]
mod tests;

pub use auth::*;
pub use generator::*;
pub use ingest::*;
pub use server::*;
pub use state::*;
pub use telemetry::*;

use serde::Deserialize;

/// Top-level configuration for the Glimpse server, loaded from a TOML file.
#[derive(Debug, Deserialize)]
pub struct GlimpseConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// State backend configuration.
    #[serde(default)]
    pub state: StateConfig,
    /// Insight generator configuration.
    #[serde(default)]
    pub generator: GeneratorServerConfig,
    /// Upload pipeline configuration.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Bearer token configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
