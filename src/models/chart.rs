//! Wire-format chart descriptions and their validated payloads.
//!
//! The service replies with an ordered sequence of `ChartDescription`
//! records. Fields arrive loosely typed; everything renderable is
//! validated here, at the response boundary, so the renderer only ever
//! sees a well-formed `ChartPayload`.

use base64::Engine;
use serde::Deserialize;

use crate::error::RenderError;

/// Chart type dispatched by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Pie,
    /// Anything else renders a placeholder, not an error.
    Unsupported(String),
}

impl ChartKind {
    /// Parse the `type` field of the first series. Missing or empty
    /// defaults to `bar`, matching the service's own default.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("bar") => ChartKind::Bar,
            Some("line") => ChartKind::Line,
            Some("scatter") => ChartKind::Scatter,
            Some("pie") => ChartKind::Pie,
            Some(other) => ChartKind::Unsupported(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Pie => "pie",
            ChartKind::Unsupported(s) => s,
        }
    }
}

/// Category labels may arrive as strings or bare numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireLabel {
    Text(String),
    Number(f64),
}

impl WireLabel {
    fn into_string(self) -> String {
        match self {
            WireLabel::Text(s) => s,
            WireLabel::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// One raw series object inside the `d3_data` JSON string.
#[derive(Debug, Clone, Deserialize, Default)]
struct WireSeries {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    x: Vec<WireLabel>,
    #[serde(default)]
    y: Vec<f64>,
    #[serde(default)]
    values: Vec<f64>,
    #[serde(default)]
    labels: Vec<WireLabel>,
    #[serde(default)]
    color: Option<String>,
}

/// Top-level shape of the `d3_data` string: `{"data": [...]}`.
#[derive(Debug, Deserialize, Default)]
struct WireSeriesEnvelope {
    #[serde(default)]
    data: Vec<WireSeries>,
}

/// One named data track within a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub name: Option<String>,
    /// Ordered category/x labels (cartesian kinds).
    pub x: Vec<String>,
    /// Parallel y values (cartesian kinds).
    pub y: Vec<f64>,
    /// Proportional values (pie).
    pub values: Vec<f64>,
    /// Wedge labels (pie).
    pub labels: Vec<String>,
    /// Explicit series color overriding the palette.
    pub color: Option<String>,
}

impl ChartSeries {
    /// Number of drawable cartesian points; never reads past the shorter
    /// of the two parallel vectors.
    pub fn point_count(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    /// A series with no x or no y renders nothing, silently.
    pub fn is_empty_cartesian(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// Display name, falling back to "series N" (1-based).
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(n) if !n.is_empty() => n.clone(),
            _ => format!("series {}", index + 1),
        }
    }
}

impl From<WireSeries> for ChartSeries {
    fn from(w: WireSeries) -> Self {
        ChartSeries {
            name: w.name,
            x: w.x.into_iter().map(WireLabel::into_string).collect(),
            y: w.y,
            values: w.values,
            labels: w.labels.into_iter().map(WireLabel::into_string).collect(),
            color: w.color,
        }
    }
}

/// AI analysis summary attached to a description.
///
/// Field aliases cover the service's original names.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Suggestion {
    #[serde(default, alias = "data_characteristics", alias = "request_summary")]
    pub summary: Option<String>,
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// One record from the service: a renderable chart plus its source
/// metadata, or an error in place of the payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChartDescription {
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub original_file_name: String,
    /// Server-rendered PNG, base64-encoded.
    #[serde(default)]
    pub chart_base64: Option<String>,
    /// Externally-defined plot spec (consumed opaque, used for server export).
    #[serde(default)]
    pub chart_json: Option<String>,
    /// Generic series description, rendered by hand (JSON string).
    #[serde(default)]
    pub d3_data: Option<String>,
    /// Server-side vector file, fetchable through the download endpoint.
    #[serde(default)]
    pub chart_svg_path: Option<String>,
    #[serde(default, alias = "gemini_suggestion")]
    pub suggestion: Option<Suggestion>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub numeric_columns: Option<Vec<String>>,
    #[serde(default)]
    pub rows_count: Option<i64>,
    /// Set instead of a payload when this sheet/prompt failed server-side.
    #[serde(default)]
    pub error: Option<String>,
}

impl ChartDescription {
    /// "file - sheet" header, tolerating either half missing.
    pub fn display_title(&self) -> String {
        match (
            self.original_file_name.is_empty(),
            self.sheet_name.is_empty(),
        ) {
            (false, false) => format!("{} - {}", self.original_file_name, self.sheet_name),
            (false, true) => self.original_file_name.clone(),
            (true, false) => self.sheet_name.clone(),
            (true, true) => "chart".to_string(),
        }
    }

    /// Whether any of the three payload variants is present.
    pub fn has_renderable_payload(&self) -> bool {
        self.d3_data.as_deref().is_some_and(|s| !s.is_empty())
            || self.chart_json.as_deref().is_some_and(|s| !s.is_empty())
            || self.chart_base64.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Validate into a typed payload. Malformed data is a per-chart render
    /// error; it never panics and never fails sibling charts.
    pub fn payload(&self) -> Result<ChartPayload, RenderError> {
        if let Some(raw) = self.d3_data.as_deref().filter(|s| !s.is_empty()) {
            let envelope: WireSeriesEnvelope = serde_json::from_str(raw)
                .map_err(|e| RenderError::MalformedData(e.to_string()))?;
            let kind = ChartKind::parse(
                envelope.data.first().and_then(|s| s.kind.as_deref()),
            );
            let series = envelope.data.into_iter().map(ChartSeries::from).collect();
            return Ok(ChartPayload::Series { kind, series });
        }
        if let Some(spec) = self.chart_json.as_deref().filter(|s| !s.is_empty()) {
            return Ok(ChartPayload::Plotly {
                spec: spec.to_string(),
            });
        }
        if let Some(b64) = self.chart_base64.as_deref().filter(|s| !s.is_empty()) {
            let png = base64::engine::general_purpose::STANDARD
                .decode(b64.trim())
                .map_err(|e| RenderError::MalformedData(format!("bad base64 image: {e}")))?;
            return Ok(ChartPayload::Image { png });
        }
        Err(RenderError::NoPayload)
    }
}

/// Validated payload variants. All three satisfy the same render contract;
/// `Series` is the hand-built renderer's input.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    /// Server-rendered static image.
    Image { png: Vec<u8> },
    /// Externally-rendered interactive plot spec, kept opaque.
    Plotly { spec: String },
    /// Generic series description drawn by the scene builder.
    Series {
        kind: ChartKind,
        series: Vec<ChartSeries>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc_with_d3(d3: &str) -> ChartDescription {
        ChartDescription {
            sheet_name: "Sheet1".into(),
            original_file_name: "sales.xlsx".into(),
            d3_data: Some(d3.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn kind_parse_defaults_to_bar() {
        assert_eq!(ChartKind::parse(None), ChartKind::Bar);
        assert_eq!(ChartKind::parse(Some("")), ChartKind::Bar);
        assert_eq!(ChartKind::parse(Some("Bar")), ChartKind::Bar);
        assert_eq!(ChartKind::parse(Some("line")), ChartKind::Line);
        assert_eq!(
            ChartKind::parse(Some("heatmap")),
            ChartKind::Unsupported("heatmap".into())
        );
    }

    #[test]
    fn d3_data_parses_into_series_payload() {
        let desc = desc_with_d3(
            r#"{"data":[{"type":"bar","name":"revenue",
                "x":["2020","2021","2022","2023"],"y":[100,120,90,150]}]}"#,
        );
        let payload = desc.payload().unwrap();
        match payload {
            ChartPayload::Series { kind, series } => {
                assert_eq!(kind, ChartKind::Bar);
                assert_eq!(series.len(), 1);
                assert_eq!(series[0].x, vec!["2020", "2021", "2022", "2023"]);
                assert_eq!(series[0].y, vec![100.0, 120.0, 90.0, 150.0]);
                assert_eq!(series[0].display_name(0), "revenue");
            }
            other => panic!("expected series payload, got {other:?}"),
        }
    }

    #[test]
    fn numeric_x_labels_are_stringified() {
        let desc = desc_with_d3(r#"{"data":[{"x":[2020,2021.5],"y":[1,2]}]}"#);
        match desc.payload().unwrap() {
            ChartPayload::Series { series, .. } => {
                assert_eq!(series[0].x, vec!["2020", "2021.5"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_d3_data_is_render_error() {
        let desc = desc_with_d3("{not json");
        assert!(matches!(
            desc.payload(),
            Err(RenderError::MalformedData(_))
        ));
    }

    #[test]
    fn description_without_payload_is_no_payload() {
        let desc = ChartDescription {
            error: Some("unsupported sheet format".into()),
            ..Default::default()
        };
        assert!(!desc.has_renderable_payload());
        assert_eq!(desc.payload(), Err(RenderError::NoPayload));
    }

    #[test]
    fn base64_image_round_trips() {
        let png = vec![0x89u8, 0x50, 0x4e, 0x47];
        let desc = ChartDescription {
            chart_base64: Some(base64::engine::general_purpose::STANDARD.encode(&png)),
            ..Default::default()
        };
        assert_eq!(desc.payload().unwrap(), ChartPayload::Image { png });
    }

    #[test]
    fn point_count_uses_shorter_side() {
        let series = ChartSeries {
            x: vec!["a".into(), "b".into(), "c".into()],
            y: vec![1.0, 2.0],
            ..Default::default()
        };
        assert_eq!(series.point_count(), 2);
        assert!(!series.is_empty_cartesian());
    }

    #[test]
    fn display_title_handles_missing_halves() {
        let full = desc_with_d3("{}");
        assert_eq!(full.display_title(), "sales.xlsx - Sheet1");
        let empty = ChartDescription::default();
        assert_eq!(empty.display_title(), "chart");
    }

    #[test]
    fn svg_path_rides_alongside_the_payload() {
        let json = r#"{"sheet_name":"s","chart_base64":"aGk=",
            "chart_svg_path":"charts/abc.svg"}"#;
        let desc: ChartDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.chart_svg_path.as_deref(), Some("charts/abc.svg"));
        assert!(desc.has_renderable_payload());
    }

    #[test]
    fn suggestion_aliases_accepted() {
        let json = r#"{"sheet_name":"s","gemini_suggestion":
            {"data_characteristics":"time series","chart_type":"bar"}}"#;
        let desc: ChartDescription = serde_json::from_str(json).unwrap();
        let sugg = desc.suggestion.unwrap();
        assert_eq!(sugg.summary.as_deref(), Some("time series"));
        assert_eq!(sugg.chart_type.as_deref(), Some("bar"));
    }
}
