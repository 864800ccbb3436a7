use super::*;

#[test]
fn server_defaults() {
    let config: ServerConfig = toml::from_str("").unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
}

#[test]
fn server_custom_config() {
    let toml = r#"
        host = "0.0.0.0"
        port = 9090
    "#;

    let config: ServerConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9090);
}

#[test]
fn state_defaults_to_memory() {
    let config: StateConfig = toml::from_str("").unwrap();
    assert_eq!(config.backend, "memory");
}

#[test]
fn generator_defaults() {
    let config: GeneratorServerConfig = toml::from_str("").unwrap();
    assert!(!config.enabled);
    assert_eq!(config.endpoint, "https://api.openai.com/v1/chat/completions");
    assert_eq!(config.model, "gpt-4o-mini");
    assert!(config.api_key.is_empty());
    assert!(config.timeout_seconds.is_none());
    assert!(config.temperature.is_none());
    assert!(config.max_tokens.is_none());
}

#[test]
fn generator_custom_config() {
    let toml = r#"
        enabled = true
        endpoint = "http://localhost:11434/v1/chat/completions"
        model = "llama3"
        api_key = "sk-test"
        timeout_seconds = 20
        temperature = 0.2
        max_tokens = 512
    "#;

    let config: GeneratorServerConfig = toml::from_str(toml).unwrap();
    assert!(config.enabled);
    assert_eq!(config.endpoint, "http://localhost:11434/v1/chat/completions");
    assert_eq!(config.model, "llama3");
    assert_eq!(config.api_key, "sk-test");
    assert_eq!(config.timeout_seconds, Some(20));
    assert!((config.temperature.unwrap() - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.max_tokens, Some(512));
}

#[test]
fn ingest_defaults() {
    let config: IngestConfig = toml::from_str("").unwrap();
    assert_eq!(config.max_daily, 10);
    assert_eq!(config.concurrency, 1);
}

#[test]
fn ingest_custom_limits() {
    let toml = r#"
        max_daily = 3
        concurrency = 4
    "#;

    let config: IngestConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.max_daily, 3);
    assert_eq!(config.concurrency, 4);
}

#[test]
fn auth_defaults_to_no_tokens() {
    let config: AuthConfig = toml::from_str("").unwrap();
    assert!(config.tokens.is_empty());
}

#[test]
fn auth_token_entries() {
    let toml = r#"
        [[tokens]]
        token_hash = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        id = "user-1"
        email = "user-1@example.com"
        role = "admin"

        [[tokens]]
        token_hash = "5994471abb01112afcc18159f6cc74b4f511b99806da59b3caf5a9c173cacfc5"
        id = "user-2"
        role = "member"
    "#;

    let config: AuthConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.tokens.len(), 2);
    assert_eq!(config.tokens[0].id, "user-1");
    assert_eq!(config.tokens[0].role, "admin");
    assert_eq!(config.tokens[1].email, "");
    assert_eq!(config.tokens[1].role, "member");
}

#[test]
fn telemetry_defaults() {
    let config: TelemetryConfig = toml::from_str("").unwrap();
    assert_eq!(config.level, "info");
}

#[test]
fn empty_document_yields_full_defaults() {
    let config: GlimpseConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.state.backend, "memory");
    assert!(!config.generator.enabled);
    assert_eq!(config.ingest.max_daily, 10);
    assert!(config.auth.tokens.is_empty());
    assert_eq!(config.telemetry.level, "info");
}

#[test]
fn full_document_parses() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 8443

        [state]
        backend = "memory"

        [generator]
        enabled = true
        model = "gpt-4o"
        api_key = "sk-live"

        [ingest]
        max_daily = 5
        concurrency = 2

        [telemetry]
        level = "debug"

        [[auth.tokens]]
        token_hash = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        id = "ops"
        role = "admin"
    "#;

    let config: GlimpseConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.server.port, 8443);
    assert!(config.generator.enabled);
    assert_eq!(config.generator.model, "gpt-4o");
    assert_eq!(config.ingest.max_daily, 5);
    assert_eq!(config.ingest.concurrency, 2);
    assert_eq!(config.telemetry.level, "debug");
    assert_eq!(config.auth.tokens.len(), 1);
    assert_eq!(config.auth.tokens[0].id, "ops");
}

#[test]
fn missing_required_token_fields_error() {
    let toml = r#"
        [[tokens]]
        id = "user-1"
        role = "member"
    "#;

    let result: Result<AuthConfig, _> = toml::from_str(toml);
    assert!(result.is_err());
}
