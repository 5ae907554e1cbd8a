//! SVG backend for the scene model.
//!
//! Produces a standalone SVG document from a `Scene`; the PNG exporter
//! rasterizes this same string, so the exported pixels always agree
//! with the scene geometry.

use std::f64::consts::TAU;

use crate::models::StyleConfig;

use super::scene::{Anchor, Scene, SceneNode};

/// Serialize a scene to a complete SVG document.
///
/// `background` paints an opaque backdrop first; `None` leaves the
/// canvas transparent.
pub fn scene_to_svg(scene: &Scene, style: &StyleConfig, background: Option<&str>) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">",
        scene.width, scene.height, scene.width, scene.height
    ));
    if let Some(color) = background {
        svg.push_str(&format!(
            "<rect width=\"{:.0}\" height=\"{:.0}\" fill=\"{}\"/>",
            scene.width,
            scene.height,
            escape_xml(color)
        ));
    }

    for node in &scene.nodes {
        match node {
            SceneNode::Rect {
                x,
                y,
                w,
                h,
                fill,
                opacity,
                corner_radius,
                ..
            } => {
                svg.push_str(&format!(
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"{corner_radius:.1}\" fill=\"{}\" opacity=\"{opacity:.2}\"/>",
                    fill.to_hex()
                ));
            }
            SceneNode::Circle {
                cx,
                cy,
                r,
                fill,
                opacity,
                stroke,
                ..
            } => {
                let stroke_attrs = match stroke {
                    Some(s) => format!(" stroke=\"{}\" stroke-width=\"1\"", s.to_hex()),
                    None => String::new(),
                };
                svg.push_str(&format!(
                    "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" fill=\"{}\" opacity=\"{opacity:.2}\"{stroke_attrs}/>",
                    fill.to_hex()
                ));
            }
            SceneNode::PolyLine {
                points,
                stroke,
                width,
                smooth,
            } => {
                if points.len() >= 2 {
                    svg.push_str(&format!(
                        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width:.1}\" stroke-linejoin=\"round\" stroke-linecap=\"round\"/>",
                        points_to_path(points, *smooth),
                        stroke.to_hex()
                    ));
                }
            }
            SceneNode::Wedge {
                cx,
                cy,
                radius,
                start_angle,
                end_angle,
                fill,
                ..
            } => {
                svg.push_str(&format!(
                    "<path d=\"{}\" fill=\"{}\" stroke=\"#ffffff\" stroke-width=\"1\"/>",
                    wedge_path(*cx, *cy, *radius, *start_angle, *end_angle),
                    fill.to_hex()
                ));
            }
            SceneNode::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                dashed,
            } => {
                let dash = if *dashed {
                    " stroke-dasharray=\"3,3\""
                } else {
                    ""
                };
                svg.push_str(&format!(
                    "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"1\"{dash}/>",
                    stroke.to_hex()
                ));
            }
            SceneNode::Text {
                x,
                y,
                content,
                size,
                fill,
                anchor,
                bold,
                rotate,
            } => {
                let anchor = match anchor {
                    Anchor::Start => "start",
                    Anchor::Middle => "middle",
                    Anchor::End => "end",
                };
                let weight = if *bold { " font-weight=\"bold\"" } else { "" };
                let transform = match rotate {
                    Some(deg) => format!(" transform=\"rotate({deg:.0} {x:.2} {y:.2})\""),
                    None => String::new(),
                };
                svg.push_str(&format!(
                    "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{size}\" fill=\"{}\"{weight}{transform}>{}</text>",
                    escape_xml(&style.font_family),
                    fill.to_hex(),
                    escape_xml(content)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Line path, optionally smoothed with quadratic segments through the
/// midpoints so curves pass through every data point.
fn points_to_path(points: &[(f64, f64)], smooth: bool) -> String {
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    if !smooth || points.len() < 3 {
        for point in &points[1..] {
            d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
        }
        return d;
    }
    for window in points.windows(2).skip(1) {
        let (cx, cy) = window[0];
        let mx = (window[0].0 + window[1].0) / 2.0;
        let my = (window[0].1 + window[1].1) / 2.0;
        d.push_str(&format!(" Q {cx:.2} {cy:.2} {mx:.2} {my:.2}"));
    }
    let last = points[points.len() - 1];
    d.push_str(&format!(" L {:.2} {:.2}", last.0, last.1));
    d
}

/// Pie wedge path. Angles are radians clockwise from twelve o'clock.
fn wedge_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
    let point = |a: f64| (cx + r * a.sin(), cy - r * a.cos());
    let (x1, y1) = point(start);
    let (x2, y2) = point(end);
    let sweep = end - start;
    if sweep >= TAU - 1e-9 {
        // A full circle collapses to a degenerate arc; draw two halves.
        let (xm, ym) = point(start + TAU / 2.0);
        return format!(
            "M {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 1 1 {xm:.2} {ym:.2} A {r:.2} {r:.2} 0 1 1 {x1:.2} {y1:.2} Z"
        );
    }
    let large = if sweep > TAU / 2.0 { 1 } else { 0 };
    format!(
        "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large} 1 {x2:.2} {y2:.2} Z"
    )
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_scene;
    use crate::constants::{SCENE_HEIGHT, SCENE_WIDTH};
    use crate::models::{ChartKind, ChartSeries};

    fn sample_scene() -> Scene {
        let series = vec![ChartSeries {
            name: Some("a&b".into()),
            x: vec!["q1".into(), "q2".into()],
            y: vec![10.0, 20.0],
            ..Default::default()
        }];
        build_scene(
            &ChartKind::Bar,
            &series,
            &StyleConfig::default(),
            "Revenue <2024>",
            (SCENE_WIDTH, SCENE_HEIGHT),
        )
        .unwrap()
    }

    #[test]
    fn svg_is_well_formed_and_sized() {
        let svg = scene_to_svg(&sample_scene(), &StyleConfig::default(), None);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"500\""));
    }

    #[test]
    fn text_content_is_escaped() {
        let svg = scene_to_svg(&sample_scene(), &StyleConfig::default(), None);
        assert!(svg.contains("Revenue &lt;2024&gt;"));
        assert!(svg.contains("a&amp;b"));
        assert!(!svg.contains("<2024>"));
    }

    #[test]
    fn background_rect_comes_first_when_requested() {
        let svg = scene_to_svg(&sample_scene(), &StyleConfig::default(), Some("#1e1e2f"));
        let rect_pos = svg.find("fill=\"#1e1e2f\"").unwrap();
        assert!(rect_pos < svg.find("<text").unwrap());
        let transparent = scene_to_svg(&sample_scene(), &StyleConfig::default(), None);
        assert!(!transparent.contains("#1e1e2f"));
    }

    #[test]
    fn smooth_path_uses_quadratic_segments() {
        let pts = vec![(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)];
        let smooth = points_to_path(&pts, true);
        assert!(smooth.contains(" Q "));
        let straight = points_to_path(&pts, false);
        assert!(straight.contains(" L "));
        assert!(!straight.contains(" Q "));
    }

    #[test]
    fn wedge_path_closes_at_center() {
        let d = wedge_path(100.0, 100.0, 50.0, 0.0, TAU / 4.0);
        assert!(d.starts_with("M 100.00 100.00"));
        assert!(d.ends_with('Z'));
        // Quarter sweep is a small arc.
        assert!(d.contains(" 0 0 1 "));
    }

    #[test]
    fn full_circle_wedge_renders_two_arcs() {
        let d = wedge_path(100.0, 100.0, 50.0, 0.0, TAU);
        assert_eq!(d.matches(" A ").count(), 2);
    }
}
