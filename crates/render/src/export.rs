use minijinja::Environment;

use glimpse_core::DashboardArtifact;

use crate::document::{DashboardDocument, PageLayout};
use crate::error::RenderError;
use crate::svg::dashboard_svg;

/// Fuel limit for template evaluation.
const FUEL_LIMIT: u64 = 100_000;

/// The paginated HTML document template. Page one carries the summary,
/// metrics, and insights; the layout decides how many charts share each
/// page that follows.
const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  body { font-family: ui-sans-serif, system-ui, sans-serif; margin: 0; color: #1a1a2b; }
  .page { padding: 48px; page-break-after: always; }
  .page:last-child { page-break-after: auto; }
  h1 { margin: 0 0 4px; font-size: 28px; }
  h2 { font-size: 20px; }
  .meta { color: #667; font-size: 13px; margin-bottom: 24px; }
  .metrics { display: flex; gap: 16px; margin: 24px 0; flex-wrap: wrap; }
  .metric { border: 1px solid #dde; border-radius: 8px; padding: 12px 16px; min-width: 140px; }
  .metric .name { font-size: 12px; color: #667; }
  .metric .value { font-size: 22px; font-weight: 600; }
  .metric .change { font-size: 12px; color: #2b8a3e; }
  .summary { white-space: pre-wrap; line-height: 1.5; }
  ul.insights { line-height: 1.6; }
  figure { margin: 0; }
  .fallback { border: 1px dashed #bbc; border-radius: 8px; padding: 16px; font-family: ui-monospace, monospace; font-size: 13px; }
</style>
</head>
<body>
<section class="page">
  <h1>{{ title }}</h1>
  <div class="meta">{{ file_name }} &middot; {{ created_at }}</div>
  {%- if metrics %}
  <div class="metrics">
  {%- for metric in metrics %}
    <div class="metric"><div class="name">{{ metric.name }}</div><div class="value">{{ metric.value }}</div>{% if metric.change %}<div class="change">{{ metric.change }}</div>{% endif %}</div>
  {%- endfor %}
  </div>
  {%- endif %}
  <p class="summary">{{ summary }}</p>
  {%- if insights %}
  <ul class="insights">
  {%- for insight in insights %}
    <li>{{ insight }}</li>
  {%- endfor %}
  </ul>
  {%- endif %}
</section>
{%- for page in chart_pages %}
<section class="page">
{%- for chart in page %}
  {%- if chart.svg %}
  <figure>{{ chart.svg|safe }}</figure>
  {%- else %}
  <h2>{{ chart.title }}</h2>
  <div class="fallback">
    <p>No renderer for &quot;{{ chart.kind }}&quot; charts; values listed instead.</p>
  {%- for row in chart.fallback %}
    <div>{{ row }}</div>
  {%- endfor %}
  </div>
  {%- endif %}
{%- endfor %}
</section>
{%- endfor %}
</body>
</html>
"#;

/// Output formats for dashboard export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One static SVG image of the whole dashboard.
    Svg,
    /// A paginated, print-ready HTML document.
    Html,
}

impl ExportFormat {
    /// The wire name of the format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
        }
    }

    /// Content type for HTTP responses carrying this format.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Html => "text/html; charset=utf-8",
        }
    }

    /// Parse a wire name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, RenderError> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" => Ok(Self::Html),
            _ => Err(RenderError::UnknownFormat(s.to_owned())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders dashboard artifacts into portable documents.
///
/// Exports are pure functions of the artifact: the same artifact and
/// format always produce the same bytes, which is what makes the export
/// surface testable.
pub struct DashboardExporter {
    env: Environment<'static>,
}

impl DashboardExporter {
    /// Build an exporter with the document template compiled.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_fuel(Some(FUEL_LIMIT));
        // The .html template name switches on auto-escaping for every
        // interpolated value; chart SVG opts out explicitly with |safe.
        env.add_template("dashboard.html", DASHBOARD_TEMPLATE)
            .map_err(|e| RenderError::Template(format!("syntax error in dashboard template: {e}")))?;
        Ok(Self { env })
    }

    /// Export one artifact in the requested format with the default layout.
    pub fn export(
        &self,
        artifact: &DashboardArtifact,
        format: ExportFormat,
    ) -> Result<String, RenderError> {
        self.export_with_layout(artifact, format, &PageLayout::default())
    }

    /// Export one artifact with an explicit page layout.
    ///
    /// The layout shapes the paginated document; the SVG image is a single
    /// composition and ignores it.
    pub fn export_with_layout(
        &self,
        artifact: &DashboardArtifact,
        format: ExportFormat,
        layout: &PageLayout,
    ) -> Result<String, RenderError> {
        match format {
            ExportFormat::Svg => Ok(dashboard_svg(artifact)),
            ExportFormat::Html => {
                let document = DashboardDocument::from_artifact(artifact, layout);
                let ctx = minijinja::Value::from_serialize(&document);
                let template = self
                    .env
                    .get_template("dashboard.html")
                    .map_err(|e| RenderError::Template(e.to_string()))?;
                template
                    .render(&ctx)
                    .map_err(|e| RenderError::Template(format!("error rendering dashboard document: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::{ChartKind, ChartSpec, DataPoint, MetricSpec};

    fn artifact() -> DashboardArtifact {
        let mut a = DashboardArtifact::new("u", "sales.csv", "text/csv", 4, "00", "ZGF0YQ==")
            .with_summary(r#"{"summary": "Steady growth."}"#);
        a.insights = vec!["Revenue grew 12%".into()];
        a.metrics = vec![MetricSpec {
            name: "Total".into(),
            value: "255".into(),
            change: Some("+12%".into()),
        }];
        a.charts = vec![
            ChartSpec {
                kind: ChartKind::Bar,
                title: "By month".into(),
                data: vec![DataPoint {
                    name: "Jan".into(),
                    value: 120.0,
                }],
                config: serde_json::Value::Null,
            },
            ChartSpec {
                kind: ChartKind::Other("scatter".into()),
                title: "Spread".into(),
                data: vec![DataPoint {
                    name: "p1".into(),
                    value: 3.5,
                }],
                config: serde_json::Value::Null,
            },
        ];
        a
    }

    #[test]
    fn svg_export_is_a_single_image() {
        let exporter = DashboardExporter::new().unwrap();
        let body = exporter.export(&artifact(), ExportFormat::Svg).unwrap();
        assert!(body.starts_with("<svg"));
        assert!(body.ends_with("</svg>"));
        assert_eq!(ExportFormat::Svg.content_type(), "image/svg+xml");
    }

    #[test]
    fn html_export_paginates() {
        let exporter = DashboardExporter::new().unwrap();
        let body = exporter.export(&artifact(), ExportFormat::Html).unwrap();
        assert!(body.starts_with("<!DOCTYPE html>"));
        // Cover page plus one page per chart.
        assert_eq!(body.matches("<section class=\"page\">").count(), 3);
        assert!(body.contains("Steady growth."));
        assert!(body.contains("<svg"));
        assert!(body.contains("No renderer for &quot;scatter&quot;"));
        assert!(body.contains("p1: 3.5"));
    }

    #[test]
    fn changing_the_layout_changes_the_document() {
        let exporter = DashboardExporter::new().unwrap();
        let a = artifact();
        let grouped = PageLayout::default().with_charts_per_page(2);

        let default_body = exporter.export(&a, ExportFormat::Html).unwrap();
        let grouped_body = exporter
            .export_with_layout(&a, ExportFormat::Html, &grouped)
            .unwrap();

        // Both charts share one page; the cover stays.
        assert_eq!(grouped_body.matches("<section class=\"page\">").count(), 2);
        assert_ne!(default_body, grouped_body);

        // Same layout, same bytes.
        let again = exporter
            .export_with_layout(&a, ExportFormat::Html, &grouped)
            .unwrap();
        assert_eq!(grouped_body, again);
    }

    #[test]
    fn html_escapes_untrusted_text() {
        let exporter = DashboardExporter::new().unwrap();
        let a = artifact().with_summary("<script>alert('x')</script>");
        let body = exporter.export(&a, ExportFormat::Html).unwrap();
        assert!(!body.contains("<script>alert"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn exports_are_deterministic() {
        let exporter = DashboardExporter::new().unwrap();
        let a = artifact();
        assert_eq!(
            exporter.export(&a, ExportFormat::Svg).unwrap(),
            exporter.export(&a, ExportFormat::Svg).unwrap()
        );
        assert_eq!(
            exporter.export(&a, ExportFormat::Html).unwrap(),
            exporter.export(&a, ExportFormat::Html).unwrap()
        );
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!(ExportFormat::parse("svg").unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::parse("HTML").unwrap(), ExportFormat::Html);
        assert!(matches!(
            ExportFormat::parse("pdf"),
            Err(RenderError::UnknownFormat(_))
        ));
    }
}
