use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use glimpse_blog::{BlogService, SuggestionService};
use glimpse_ingest::IngestPipeline;
use glimpse_llm::{GeneratorConfig, HttpInsightGenerator, InsightGenerator, MockInsightGenerator};
use glimpse_render::DashboardExporter;
use glimpse_server::api::AppState;
use glimpse_server::auth::StaticTokenProvider;
use glimpse_server::config::{GeneratorServerConfig, GlimpseConfig, StateConfig};
use glimpse_server::error::ServerError;
use glimpse_state::DocumentStore;
use glimpse_state_memory::MemoryDocumentStore;

/// Glimpse dashboard HTTP server.
#[derive(Parser, Debug)]
#[command(name = "glimpse-server", about = "Standalone HTTP server for Glimpse")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "glimpse.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config: GlimpseConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    glimpse_server::telemetry::init(&config.telemetry);

    if !Path::new(&cli.config).exists() {
        info!(
            path = %cli.config,
            "config file not found, using defaults"
        );
    }

    // Create the state backend.
    let store = build_document_store(&config.state)?;
    info!(backend = %config.state.backend, "document store initialized");

    // Create the insight generator shared by uploads and article suggestions.
    let generator = build_generator(&config.generator)?;

    let pipeline = IngestPipeline::new(Arc::clone(&store), Arc::clone(&generator))
        .with_max_daily(config.ingest.max_daily)
        .with_max_concurrent(config.ingest.concurrency);
    info!(
        max_daily = config.ingest.max_daily,
        concurrency = config.ingest.concurrency,
        "upload pipeline initialized"
    );

    let blog = BlogService::new(Arc::clone(&store));
    let suggestions = SuggestionService::new(Arc::clone(&generator));
    let exporter = Arc::new(DashboardExporter::new()?);

    // Build the bearer-token table.
    let identity = StaticTokenProvider::from_config(&config.auth.tokens).map_err(|e| {
        Box::<dyn std::error::Error>::from(format!("invalid [[auth.tokens]] entry: {e}"))
    })?;
    if identity.is_empty() {
        warn!("no auth tokens configured; every protected route will return 401");
    } else {
        info!(tokens = identity.len(), "token table loaded");
    }

    let state = AppState {
        pipeline,
        blog,
        suggestions,
        exporter,
        identity: Arc::new(identity),
    };
    let app = glimpse_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "glimpse-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("glimpse-server shut down");
    Ok(())
}

/// Create the document store for the configured backend.
fn build_document_store(config: &StateConfig) -> Result<Arc<dyn DocumentStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryDocumentStore::new())),
        other => Err(ServerError::Config(format!(
            "unknown state backend '{other}' (expected \"memory\")"
        ))),
    }
}

/// Create the insight generator: the HTTP client when enabled, otherwise
/// canned responses so the rest of the pipeline stays exercisable.
fn build_generator(
    config: &GeneratorServerConfig,
) -> Result<Arc<dyn InsightGenerator>, ServerError> {
    if !config.enabled {
        info!("generator disabled, serving canned insight responses");
        return Ok(Arc::new(MockInsightGenerator::new()));
    }

    let mut generator_config =
        GeneratorConfig::new(&config.endpoint, &config.model, &config.api_key);
    if let Some(seconds) = config.timeout_seconds {
        generator_config = generator_config.with_timeout(seconds);
    }
    if let Some(temperature) = config.temperature {
        generator_config = generator_config.with_temperature(temperature);
    }
    if let Some(max_tokens) = config.max_tokens {
        generator_config = generator_config.with_max_tokens(max_tokens);
    }

    let generator = HttpInsightGenerator::new(generator_config)
        .map_err(|e| ServerError::Config(format!("generator setup failed: {e}")))?;
    info!(endpoint = %config.endpoint, model = %config.model, "HTTP generator initialized");
    Ok(Arc::new(generator))
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
