//! Deterministic SVG chart rendering.
//!
//! Charts are drawn onto a fixed 640x360 canvas with a fixed palette, and
//! every coordinate is formatted to one decimal place, so the same spec
//! always produces byte-identical output. Kinds without a native renderer
//! are represented as a textual value listing instead of failing.

use std::fmt::Write as _;

use glimpse_core::{ChartKind, ChartSpec, DashboardArtifact};

/// Canvas size for a single chart, in user units.
const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 360.0;
/// Space around the plot area, leaving room for the title and labels.
const MARGIN: f64 = 48.0;

/// Fill palette, cycled per series element.
const PALETTE: &[&str] = &[
    "#4c6ef5", "#f59f00", "#12b886", "#fa5252", "#7950f2", "#15aabf",
];

/// Render one chart as a standalone SVG document.
///
/// Returns `None` when the kind has no native renderer; callers fall back
/// to a textual representation.
#[must_use]
pub fn chart_svg(chart: &ChartSpec) -> Option<String> {
    let body = chart_body(chart)?;
    Some(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 640 360\" \
         width=\"640\" height=\"360\" role=\"img\">{body}</svg>"
    ))
}

/// Render a whole artifact as one static SVG image: header, metric cards,
/// insight bullets, then every chart stacked vertically. Unknown chart
/// kinds become textual blocks.
#[must_use]
pub fn dashboard_svg(artifact: &DashboardArtifact) -> String {
    let mut sections: Vec<(f64, String)> = Vec::new();

    let mut header = String::new();
    let _ = write!(
        header,
        "<text x=\"24\" y=\"38\" font-size=\"24\" font-weight=\"600\" fill=\"#1a1a2b\">{}</text>\
         <text x=\"24\" y=\"60\" font-size=\"12\" fill=\"#667\">{} &#183; {}</text>",
        xml_escape(&artifact.title),
        xml_escape(&artifact.file_name),
        artifact.created_at.to_rfc3339(),
    );
    sections.push((76.0, header));

    if !artifact.metrics.is_empty() {
        sections.push(metric_cards(artifact));
    }
    if !artifact.insights.is_empty() {
        sections.push(insight_bullets(artifact));
    }

    for chart in &artifact.charts {
        match chart_body(chart) {
            Some(body) => sections.push((CHART_HEIGHT, body)),
            None => sections.push(fallback_block(chart)),
        }
    }

    let total: f64 = sections.iter().map(|(h, _)| h).sum::<f64>() + 24.0;
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 640 {total}\" \
         width=\"640\" height=\"{total}\" role=\"img\">\
         <rect width=\"640\" height=\"{total}\" fill=\"#ffffff\"/>",
        total = px(total),
    );
    let mut y = 0.0;
    for (height, body) in sections {
        let _ = write!(out, "<g transform=\"translate(0,{})\">{body}</g>", px(y));
        y += height;
    }
    out.push_str("</svg>");
    out
}

fn chart_body(chart: &ChartSpec) -> Option<String> {
    match chart.kind {
        ChartKind::Bar => Some(bar_body(chart)),
        ChartKind::Line => Some(line_body(chart, false)),
        ChartKind::Area => Some(line_body(chart, true)),
        ChartKind::Pie => Some(pie_body(chart)),
        ChartKind::Other(_) => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn bar_body(chart: &ChartSpec) -> String {
    let mut out = String::new();
    push_title(&mut out, &chart.title);
    if chart.data.is_empty() {
        push_empty_note(&mut out);
        return out;
    }
    push_axes(&mut out);

    let max = chart.data.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let plot_w = CHART_WIDTH - 2.0 * MARGIN;
    let plot_h = CHART_HEIGHT - 2.0 * MARGIN;
    let slot = plot_w / chart.data.len() as f64;
    let bar_w = slot * 0.7;

    for (i, point) in chart.data.iter().enumerate() {
        let scale = if max > 0.0 { point.value.max(0.0) / max } else { 0.0 };
        let h = plot_h * scale;
        let x = MARGIN + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = CHART_HEIGHT - MARGIN - h;
        let center = x + bar_w / 2.0;
        let color = PALETTE[i % PALETTE.len()];
        let _ = write!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\"/>\
             <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#445\">{}</text>\
             <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#556\">{}</text>",
            px(x),
            px(y),
            px(bar_w),
            px(h),
            px(center),
            px(CHART_HEIGHT - MARGIN + 18.0),
            xml_escape(&point.name),
            px(center),
            px(y - 6.0),
            point.value,
        );
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn line_body(chart: &ChartSpec, filled: bool) -> String {
    let mut out = String::new();
    push_title(&mut out, &chart.title);
    let n = chart.data.len();
    if n == 0 {
        push_empty_note(&mut out);
        return out;
    }
    push_axes(&mut out);

    let max = chart.data.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let plot_w = CHART_WIDTH - 2.0 * MARGIN;
    let plot_h = CHART_HEIGHT - 2.0 * MARGIN;
    let baseline = CHART_HEIGHT - MARGIN;
    let step = if n > 1 { plot_w / (n - 1) as f64 } else { 0.0 };

    let points: Vec<(f64, f64)> = chart
        .data
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = if n > 1 {
                MARGIN + step * i as f64
            } else {
                CHART_WIDTH / 2.0
            };
            let scale = if max > 0.0 { p.value.max(0.0) / max } else { 0.0 };
            (x, baseline - plot_h * scale)
        })
        .collect();

    let series = points
        .iter()
        .map(|(x, y)| format!("{},{}", px(*x), px(*y)))
        .collect::<Vec<_>>()
        .join(" ");

    if filled {
        let first = points[0].0;
        let last = points[n - 1].0;
        let _ = write!(
            out,
            "<polygon points=\"{},{} {series} {},{}\" fill=\"{}\" fill-opacity=\"0.25\" stroke=\"none\"/>",
            px(first),
            px(baseline),
            px(last),
            px(baseline),
            PALETTE[0],
        );
    }
    let _ = write!(
        out,
        "<polyline points=\"{series}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
        PALETTE[0],
    );
    if !filled {
        for (x, y) in &points {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"3\" fill=\"{}\"/>",
                px(*x),
                px(*y),
                PALETTE[0],
            );
        }
    }
    for ((x, _), point) in points.iter().zip(&chart.data) {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#445\">{}</text>",
            px(*x),
            px(baseline + 18.0),
            xml_escape(&point.name),
        );
    }
    out
}

fn pie_body(chart: &ChartSpec) -> String {
    let mut out = String::new();
    push_title(&mut out, &chart.title);

    let positive: Vec<_> = chart.data.iter().filter(|p| p.value > 0.0).collect();
    if positive.is_empty() {
        push_empty_note(&mut out);
        return out;
    }
    let total: f64 = positive.iter().map(|p| p.value).sum();
    let (cx, cy, r) = (400.0, 196.0, 130.0);

    if positive.len() == 1 {
        // A single slice is the whole circle; an arc of 360 degrees would
        // collapse to nothing.
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            px(cx),
            px(cy),
            px(r),
            PALETTE[0],
        );
    } else {
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (i, point) in positive.iter().enumerate() {
            let sweep = point.value / total * std::f64::consts::TAU;
            let end = angle + sweep;
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large = i32::from(sweep > std::f64::consts::PI);
            let _ = write!(
                out,
                "<path d=\"M {},{} L {},{} A {},{} 0 {large} 1 {},{} Z\" fill=\"{}\"/>",
                px(cx),
                px(cy),
                px(x1),
                px(y1),
                px(r),
                px(r),
                px(x2),
                px(y2),
                PALETTE[i % PALETTE.len()],
            );
            angle = end;
        }
    }

    for (i, point) in positive.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 72.0 + 20.0 * i as f64;
        let _ = write!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"10\" height=\"10\" fill=\"{}\"/>\
             <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#445\">{} ({})</text>",
            px(MARGIN),
            px(y),
            PALETTE[i % PALETTE.len()],
            px(MARGIN + 16.0),
            px(y + 9.0),
            xml_escape(&point.name),
            point.value,
        );
    }
    out
}

fn fallback_block(chart: &ChartSpec) -> (f64, String) {
    let mut out = String::new();
    push_title(&mut out, &chart.title);
    let _ = write!(
        out,
        "<text x=\"320\" y=\"58\" text-anchor=\"middle\" font-size=\"13\" fill=\"#667\">\
         no renderer for &quot;{}&quot; charts; values listed below</text>",
        xml_escape(chart.kind.as_str()),
    );
    for (i, point) in chart.data.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 84.0 + 18.0 * i as f64;
        let _ = write!(
            out,
            "<text x=\"32\" y=\"{}\" font-family=\"monospace\" font-size=\"12\" fill=\"#334\">{}: {}</text>",
            px(y),
            xml_escape(&point.name),
            point.value,
        );
    }
    #[allow(clippy::cast_precision_loss)]
    let height = 96.0 + 18.0 * chart.data.len() as f64;
    (height, out)
}

fn metric_cards(artifact: &DashboardArtifact) -> (f64, String) {
    let mut out = String::new();
    for (i, metric) in artifact.metrics.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = 24.0 + 150.0 * i as f64;
        let _ = write!(
            out,
            "<rect x=\"{}\" y=\"4\" width=\"140\" height=\"64\" rx=\"8\" fill=\"#f4f5fb\" stroke=\"#dde\"/>\
             <text x=\"{}\" y=\"24\" font-size=\"11\" fill=\"#667\">{}</text>\
             <text x=\"{}\" y=\"48\" font-size=\"18\" font-weight=\"600\" fill=\"#1a1a2b\">{}{}</text>",
            px(x),
            px(x + 12.0),
            xml_escape(&metric.name),
            px(x + 12.0),
            xml_escape(&metric.value),
            metric
                .change
                .as_deref()
                .map(|c| format!(" <tspan font-size=\"11\" fill=\"#2b8a3e\">{}</tspan>", xml_escape(c)))
                .unwrap_or_default(),
        );
    }
    (84.0, out)
}

fn insight_bullets(artifact: &DashboardArtifact) -> (f64, String) {
    let mut out = String::new();
    for (i, insight) in artifact.insights.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 18.0 + 20.0 * i as f64;
        let _ = write!(
            out,
            "<text x=\"24\" y=\"{}\" font-size=\"13\" fill=\"#334\">&#8226; {}</text>",
            px(y),
            xml_escape(insight),
        );
    }
    #[allow(clippy::cast_precision_loss)]
    let height = 28.0 + 20.0 * artifact.insights.len() as f64;
    (height, out)
}

fn push_title(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<text x=\"320\" y=\"30\" text-anchor=\"middle\" font-size=\"17\" font-weight=\"600\" fill=\"#1a1a2b\">{}</text>",
        xml_escape(title),
    );
}

fn push_axes(out: &mut String) {
    let _ = write!(
        out,
        "<line x1=\"{m}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#99a\"/>\
         <line x1=\"{m}\" y1=\"{t}\" x2=\"{m}\" y2=\"{b}\" stroke=\"#99a\"/>",
        m = px(MARGIN),
        b = px(CHART_HEIGHT - MARGIN),
        r = px(CHART_WIDTH - MARGIN),
        t = px(MARGIN),
    );
}

fn push_empty_note(out: &mut String) {
    out.push_str(
        "<text x=\"320\" y=\"190\" text-anchor=\"middle\" font-size=\"14\" fill=\"#667\">no data</text>",
    );
}

fn px(v: f64) -> String {
    format!("{v:.1}")
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::DataPoint;

    fn points(values: &[(&str, f64)]) -> Vec<DataPoint> {
        values
            .iter()
            .map(|(name, value)| DataPoint {
                name: (*name).to_owned(),
                value: *value,
            })
            .collect()
    }

    fn chart(kind: ChartKind, data: Vec<DataPoint>) -> ChartSpec {
        ChartSpec {
            kind,
            title: "Revenue".into(),
            data,
            config: serde_json::Value::Null,
        }
    }

    #[test]
    fn bar_chart_has_one_rect_per_point() {
        let svg = chart_svg(&chart(
            ChartKind::Bar,
            points(&[("Jan", 120.0), ("Feb", 135.0), ("Mar", 90.0)]),
        ))
        .unwrap();
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Jan"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn line_chart_draws_polyline_with_markers() {
        let svg = chart_svg(&chart(
            ChartKind::Line,
            points(&[("a", 1.0), ("b", 2.0)]),
        ))
        .unwrap();
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn area_chart_fills_under_the_line() {
        let svg = chart_svg(&chart(
            ChartKind::Area,
            points(&[("a", 1.0), ("b", 2.0), ("c", 1.5)]),
        ))
        .unwrap();
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn pie_chart_has_one_wedge_per_positive_value() {
        let svg = chart_svg(&chart(
            ChartKind::Pie,
            points(&[("a", 3.0), ("b", 1.0), ("negative", -2.0)]),
        ))
        .unwrap();
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn pie_with_single_slice_is_a_full_circle() {
        let svg = chart_svg(&chart(ChartKind::Pie, points(&[("all", 5.0)]))).unwrap();
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn unknown_kind_has_no_native_svg() {
        let spec = chart(ChartKind::Other("scatter".into()), points(&[("a", 1.0)]));
        assert!(chart_svg(&spec).is_none());
    }

    #[test]
    fn empty_data_renders_a_note() {
        let svg = chart_svg(&chart(ChartKind::Bar, Vec::new())).unwrap();
        assert!(svg.contains("no data"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = chart_svg(&chart(ChartKind::Bar, points(&[("<Q1&Co>", 1.0)]))).unwrap();
        assert!(svg.contains("&lt;Q1&amp;Co&gt;"));
        assert!(!svg.contains("<Q1"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let spec = chart(
            ChartKind::Pie,
            points(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]),
        );
        assert_eq!(chart_svg(&spec), chart_svg(&spec));
    }

    #[test]
    fn dashboard_image_stacks_sections() {
        let mut artifact =
            DashboardArtifact::new("u", "sales.csv", "text/csv", 4, "00", "ZGF0YQ==");
        artifact.metrics = vec![glimpse_core::MetricSpec {
            name: "Total".into(),
            value: "255".into(),
            change: Some("+12%".into()),
        }];
        artifact.insights = vec!["Revenue grew".into()];
        artifact.charts = vec![
            chart(ChartKind::Bar, points(&[("Jan", 1.0)])),
            chart(ChartKind::Other("scatter".into()), points(&[("x", 9.0)])),
        ];

        let svg = dashboard_svg(&artifact);
        assert!(svg.contains("sales.csv"));
        assert!(svg.contains("Total"));
        assert!(svg.contains("Revenue grew"));
        assert!(svg.contains("no renderer for &quot;scatter&quot;"));
        assert!(svg.contains("x: 9"));
        assert_eq!(svg, dashboard_svg(&artifact));
    }
}
