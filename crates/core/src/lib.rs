pub mod article;
pub mod artifact;
pub mod insight;
pub mod quota;
pub mod types;

pub use article::{BlogArticle, normalize_tags};
pub use artifact::{
    ChartKind, ChartSpec, DashboardArtifact, DataPoint, MetricSpec, title_from_file_name,
};
pub use insight::{
    ArticleSuggestion, DashboardInsight, InsightParseError, parse_dashboard, parse_suggestion,
    strip_code_fences,
};
pub use quota::{DEFAULT_MAX_DAILY, UploadQuota, day_stamp, next_day_start, seconds_until_day_end};
pub use types::{ArticleId, ArtifactId, OwnerId};
