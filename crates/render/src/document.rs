use serde::Serialize;

use glimpse_core::{DashboardArtifact, parse_dashboard};

use crate::svg::chart_svg;

/// Layout options for the paginated document export.
///
/// The cover page is fixed; the layout controls how the charts that follow
/// it are grouped into page sections. Two exports of the same artifact with
/// the same layout are byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// How many charts share one page section. Values below 1 read as 1.
    pub charts_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self { charts_per_page: 1 }
    }
}

impl PageLayout {
    /// Group `charts_per_page` charts onto each page section.
    #[must_use]
    pub fn with_charts_per_page(mut self, charts_per_page: usize) -> Self {
        self.charts_per_page = charts_per_page;
        self
    }
}

/// Display model handed to the export templates, derived from one
/// artifact.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardDocument {
    pub title: String,
    pub file_name: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Human-readable summary. The parsed summary when the stored model
    /// reply turns out to be the documented JSON shape, otherwise the
    /// stored text as-is.
    pub summary: String,
    pub insights: Vec<String>,
    pub metrics: Vec<MetricBlock>,
    /// Charts grouped into page sections per the layout.
    pub chart_pages: Vec<Vec<ChartBlock>>,
}

/// One headline metric card.
#[derive(Debug, Clone, Serialize)]
pub struct MetricBlock {
    pub name: String,
    pub value: String,
    pub change: Option<String>,
}

/// One chart, rendered or listed.
#[derive(Debug, Clone, Serialize)]
pub struct ChartBlock {
    pub title: String,
    pub kind: String,
    /// Inline SVG for kinds with a native renderer.
    pub svg: Option<String>,
    /// Textual `name: value` rows for kinds without one.
    pub fallback: Option<Vec<String>>,
}

impl DashboardDocument {
    /// Build the display model for one artifact.
    #[must_use]
    pub fn from_artifact(artifact: &DashboardArtifact, layout: &PageLayout) -> Self {
        // The stored reply is verbatim model output; parse defensively and
        // fall back to showing it unchanged.
        let summary = parse_dashboard(&artifact.ai_summary)
            .ok()
            .map(|insight| insight.summary)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| artifact.ai_summary.clone());

        let charts: Vec<ChartBlock> = artifact
            .charts
            .iter()
            .map(|chart| {
                let svg = chart_svg(chart);
                let fallback = if svg.is_some() {
                    None
                } else {
                    Some(
                        chart
                            .data
                            .iter()
                            .map(|p| format!("{}: {}", p.name, p.value))
                            .collect(),
                    )
                };
                ChartBlock {
                    title: chart.title.clone(),
                    kind: chart.kind.as_str().to_owned(),
                    svg,
                    fallback,
                }
            })
            .collect();

        let per_page = layout.charts_per_page.max(1);
        let chart_pages = charts.chunks(per_page).map(<[ChartBlock]>::to_vec).collect();

        Self {
            title: artifact.title.clone(),
            file_name: artifact.file_name.clone(),
            created_at: artifact.created_at.to_rfc3339(),
            summary,
            insights: artifact.insights.clone(),
            metrics: artifact
                .metrics
                .iter()
                .map(|m| MetricBlock {
                    name: m.name.clone(),
                    value: m.value.clone(),
                    change: m.change.clone(),
                })
                .collect(),
            chart_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::{ChartKind, ChartSpec, DataPoint};

    fn artifact() -> DashboardArtifact {
        DashboardArtifact::new("u", "sales.csv", "text/csv", 4, "00", "ZGF0YQ==")
    }

    fn chart(kind: ChartKind, title: &str) -> ChartSpec {
        ChartSpec {
            kind,
            title: title.into(),
            data: vec![DataPoint {
                name: "Jan".into(),
                value: 120.0,
            }],
            config: serde_json::Value::Null,
        }
    }

    #[test]
    fn prefers_the_parsed_summary() {
        let a = artifact().with_summary(r#"{"summary": "Steady growth.", "charts": []}"#);
        let doc = DashboardDocument::from_artifact(&a, &PageLayout::default());
        assert_eq!(doc.summary, "Steady growth.");
    }

    #[test]
    fn falls_back_to_raw_text() {
        let a = artifact().with_summary("The model had nothing structured to say.");
        let doc = DashboardDocument::from_artifact(&a, &PageLayout::default());
        assert_eq!(doc.summary, "The model had nothing structured to say.");
    }

    #[test]
    fn known_kinds_render_and_unknown_kinds_list() {
        let mut a = artifact();
        a.charts = vec![
            chart(ChartKind::Bar, "By month"),
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

        let doc = DashboardDocument::from_artifact(&a, &PageLayout::default());
        let first = &doc.chart_pages[0][0];
        let second = &doc.chart_pages[1][0];
        assert!(first.svg.is_some());
        assert!(first.fallback.is_none());
        assert!(second.svg.is_none());
        assert_eq!(
            second.fallback.as_deref(),
            Some(&["p1: 3.5".to_owned()][..])
        );
        assert_eq!(second.kind, "scatter");
    }

    #[test]
    fn default_layout_gives_each_chart_its_own_page() {
        let mut a = artifact();
        a.charts = vec![
            chart(ChartKind::Bar, "One"),
            chart(ChartKind::Line, "Two"),
            chart(ChartKind::Pie, "Three"),
        ];

        let doc = DashboardDocument::from_artifact(&a, &PageLayout::default());
        assert_eq!(doc.chart_pages.len(), 3);
        assert!(doc.chart_pages.iter().all(|page| page.len() == 1));
    }

    #[test]
    fn charts_per_page_groups_and_the_last_page_takes_the_rest() {
        let mut a = artifact();
        a.charts = vec![
            chart(ChartKind::Bar, "One"),
            chart(ChartKind::Line, "Two"),
            chart(ChartKind::Pie, "Three"),
        ];

        let layout = PageLayout::default().with_charts_per_page(2);
        let doc = DashboardDocument::from_artifact(&a, &layout);
        assert_eq!(doc.chart_pages.len(), 2);
        assert_eq!(doc.chart_pages[0].len(), 2);
        assert_eq!(doc.chart_pages[1].len(), 1);
    }

    #[test]
    fn zero_charts_per_page_reads_as_one() {
        let mut a = artifact();
        a.charts = vec![chart(ChartKind::Bar, "One"), chart(ChartKind::Line, "Two")];

        let layout = PageLayout::default().with_charts_per_page(0);
        let doc = DashboardDocument::from_artifact(&a, &layout);
        assert_eq!(doc.chart_pages.len(), 2);
    }
}
