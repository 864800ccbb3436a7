//! Defensive parsing of generative-AI responses.
//!
//! The generation client returns model output verbatim; nothing guarantees
//! the text is valid JSON or matches the documented shape. This module is
//! the single place that turns raw text into structured data, and every
//! entry point returns a tagged `Result` instead of assuming success.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{ChartSpec, MetricSpec};

/// The documented shape of a dashboard-generation response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardInsight {
    /// Brief overview of the uploaded data.
    #[serde(default)]
    pub summary: String,
    /// Key insight sentences.
    #[serde(default)]
    pub insights: Vec<String>,
    /// Suggested chart definitions.
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    /// Headline metrics and KPIs.
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

/// The documented shape of a blog-suggestion response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ArticleSuggestion {
    /// Suggested article title.
    #[serde(default)]
    pub title: String,
    /// Suggested 2-3 sentence summary.
    #[serde(default)]
    pub summary: String,
    /// Suggested tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// SEO-friendly meta description. Serialized as `metaDescription` to
    /// match the documented model response shape.
    #[serde(default, rename = "metaDescription")]
    pub meta_description: String,
}

/// Why a model response could not be parsed into its documented shape.
#[derive(Debug, Error)]
pub enum InsightParseError {
    /// The text was not valid JSON, or was JSON of the wrong shape.
    #[error("model response is not valid JSON of the expected shape: {0}")]
    Malformed(String),
}

/// Strip Markdown code fences (```json ... ``` or ``` ... ```) that chat
/// models frequently wrap JSON answers in.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_opening = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else {
        trimmed.strip_prefix("```").unwrap_or(trimmed)
    };
    without_opening
        .strip_suffix("```")
        .unwrap_or(without_opening)
        .trim()
}

/// Parse a raw dashboard-generation response.
///
/// Never panics; malformed text yields `Err`, and callers decide whether
/// that is fatal (blog suggestions) or tolerated (the upload pipeline keeps
/// the raw text and leaves charts/metrics empty).
pub fn parse_dashboard(raw: &str) -> Result<DashboardInsight, InsightParseError> {
    let json_str = strip_code_fences(raw);
    serde_json::from_str(json_str).map_err(|e| InsightParseError::Malformed(e.to_string()))
}

/// Parse a raw blog-suggestion response.
pub fn parse_suggestion(raw: &str) -> Result<ArticleSuggestion, InsightParseError> {
    let json_str = strip_code_fences(raw);
    serde_json::from_str(json_str).map_err(|e| InsightParseError::Malformed(e.to_string()))
}
