use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ArtifactId, OwnerId};

/// The kind of chart a [`ChartSpec`] describes.
///
/// The generative model is instructed to emit one of the four known kinds,
/// but nothing enforces that; unrecognized values are preserved verbatim so
/// renderers can fall back to a textual representation instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartKind {
    /// Vertical bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Filled area chart.
    Area,
    /// Any kind this service does not know how to draw.
    Other(String),
}

impl ChartKind {
    /// Return the wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Area => "area",
            Self::Other(s) => s,
        }
    }

    /// Whether this service has a native renderer for the kind.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ChartKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bar" => Self::Bar,
            "line" => Self::Line,
            "pie" => Self::Pie,
            "area" => Self::Area,
            _ => Self::Other(s),
        }
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// `ChartKind` crosses the wire as a plain string (see the `from`/`into` serde
// attributes above), so its OpenAPI schema is `String` rather than a Rust
// enum shape. utoipa's derive cannot express `value_type` on an enum
// container, hence the manual impl.
#[cfg(feature = "openapi")]
impl utoipa::PartialSchema for ChartKind {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .examples(["bar"])
            .into()
    }
}

#[cfg(feature = "openapi")]
impl utoipa::ToSchema for ChartKind {}

/// A single labeled value in a chart's data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DataPoint {
    /// Category or axis label.
    pub name: String,
    /// Numeric value for the point.
    pub value: f64,
}

/// A chart definition extracted from the generative-AI response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChartSpec {
    /// Chart kind. Serialized as `type` to match the documented model
    /// response shape.
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Chart title.
    pub title: String,
    /// Ordered data series.
    #[serde(default)]
    pub data: Vec<DataPoint>,
    /// Opaque presentation hints passed through untouched.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub config: serde_json::Value,
}

/// A headline metric extracted from the generative-AI response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MetricSpec {
    /// Metric name (e.g. `Total Revenue`).
    pub name: String,
    /// Display value (e.g. `$1.2M`).
    pub value: String,
    /// Optional signed-percentage change string (e.g. `+12%`).
    #[serde(default)]
    pub change: Option<String>,
}

/// A persisted dashboard generated from one uploaded file.
///
/// Created once per successful upload and never mutated afterwards; there is
/// no edit or delete operation for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "id": "550e8400-e29b-41d4-a716-446655440000",
    "owner": "user-1",
    "title": "sales_q3",
    "file_name": "sales_q3.csv",
    "file_type": "text/csv",
    "file_size_bytes": 2048,
    "checksum_sha256": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
    "encoded_content": "bmFtZSx2YWx1ZQ==",
    "ai_summary": "{\"summary\": \"Revenue grew 12%\"}",
    "insights": ["Revenue grew 12% quarter over quarter"],
    "charts": [],
    "metrics": [],
    "created_at": "2026-01-01T00:00:00Z",
    "views": 0,
    "rating": 0.0
})))]
pub struct DashboardArtifact {
    /// Unique artifact identifier.
    pub id: ArtifactId,

    /// User that uploaded the source file. All reads are scoped to this id.
    pub owner: OwnerId,

    /// Display title, derived from the file name with its extension removed.
    pub title: String,

    /// Original file name as uploaded.
    pub file_name: String,

    /// Declared MIME type of the uploaded file.
    pub file_type: String,

    /// Size of the raw file in bytes, measured before encoding.
    pub file_size_bytes: u64,

    /// SHA-256 of the raw file content, lowercase hex.
    pub checksum_sha256: String,

    /// The full file content, base64-encoded (standard alphabet, padded).
    pub encoded_content: String,

    /// The generative model's response, stored verbatim. Usually JSON of the
    /// documented dashboard shape, but possibly malformed; consumers must
    /// parse defensively.
    pub ai_summary: String,

    /// Insight sentences extracted from the model response, empty when the
    /// response did not parse.
    #[serde(default)]
    pub insights: Vec<String>,

    /// Chart definitions extracted from the model response, empty when the
    /// response did not parse. Never backfilled.
    #[serde(default)]
    pub charts: Vec<ChartSpec>,

    /// Headline metrics extracted from the model response, empty when the
    /// response did not parse.
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,

    /// Timestamp when the artifact was created.
    pub created_at: DateTime<Utc>,

    /// View counter, initialized to zero.
    #[serde(default)]
    pub views: u64,

    /// Aggregate rating, initialized to zero.
    #[serde(default)]
    pub rating: f64,
}

impl DashboardArtifact {
    /// Create a new artifact for an encoded upload. Generates a UUID-v4 id,
    /// derives the title from the file name, and sets `created_at` to now.
    /// The AI fields start empty and are filled via [`with_summary`] and
    /// [`with_generated`].
    ///
    /// [`with_summary`]: Self::with_summary
    /// [`with_generated`]: Self::with_generated
    #[must_use]
    pub fn new(
        owner: impl Into<OwnerId>,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        file_size_bytes: u64,
        checksum_sha256: impl Into<String>,
        encoded_content: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            id: ArtifactId::new(Uuid::new_v4().to_string()),
            owner: owner.into(),
            title: title_from_file_name(&file_name),
            file_name,
            file_type: file_type.into(),
            file_size_bytes,
            checksum_sha256: checksum_sha256.into(),
            encoded_content: encoded_content.into(),
            ai_summary: String::new(),
            insights: Vec::new(),
            charts: Vec::new(),
            metrics: Vec::new(),
            created_at: Utc::now(),
            views: 0,
            rating: 0.0,
        }
    }

    /// Store the raw model response text.
    #[must_use]
    pub fn with_summary(mut self, raw: impl Into<String>) -> Self {
        self.ai_summary = raw.into();
        self
    }

    /// Attach the structured pieces extracted from a successfully parsed
    /// model response.
    #[must_use]
    pub fn with_generated(
        mut self,
        insights: Vec<String>,
        charts: Vec<ChartSpec>,
        metrics: Vec<MetricSpec>,
    ) -> Self {
        self.insights = insights;
        self.charts = charts;
        self.metrics = metrics;
        self
    }
}

/// Derive an artifact title from a file name by stripping the last
/// extension. Names without an extension pass through unchanged.
#[must_use]
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem.to_owned(),
        _ => file_name.to_owned(),
    }
}
