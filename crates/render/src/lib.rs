pub mod document;
pub mod error;
pub mod export;
pub mod svg;

pub use document::{ChartBlock, DashboardDocument, MetricBlock, PageLayout};
pub use error::RenderError;
pub use export::{DashboardExporter, ExportFormat};
pub use svg::{chart_svg, dashboard_svg};
