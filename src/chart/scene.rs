//! Declarative scene builder.
//!
//! `build_scene` turns a series payload plus style into a flat list of
//! drawing primitives in logical coordinates. It is a pure function:
//! same inputs, same scene. Both the terminal widget and the SVG export
//! backend consume the same scene, so what gets exported is exactly
//! what was on screen.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use crate::constants::*;
use crate::error::RenderError;
use crate::models::{resolve_series_color, ChartKind, ChartSeries, Rgb, StyleConfig};

use super::scale::{BandScale, LinearScale, PointScale};

/// Data attached to a primitive for tooltip lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    pub category: String,
    pub value: f64,
    pub series: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// One drawing primitive in scene coordinates (origin top-left).
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Rgb,
        opacity: f64,
        corner_radius: f64,
        hover: Option<Hover>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Rgb,
        opacity: f64,
        stroke: Option<Rgb>,
        hover: Option<Hover>,
    },
    /// Connected line segments; `smooth` asks the backend to interpolate.
    PolyLine {
        points: Vec<(f64, f64)>,
        stroke: Rgb,
        width: f64,
        smooth: bool,
    },
    /// Pie wedge. Angles are radians clockwise from twelve o'clock.
    Wedge {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill: Rgb,
        hover: Option<Hover>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgb,
        dashed: bool,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: u16,
        fill: Rgb,
        anchor: Anchor,
        bold: bool,
        /// Rotation in degrees around (x, y), for slanted axis labels.
        rotate: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Topmost hover datum under a scene-space point, if any.
    pub fn hit_test(&self, px: f64, py: f64) -> Option<&Hover> {
        for node in self.nodes.iter().rev() {
            match node {
                SceneNode::Rect {
                    x,
                    y,
                    w,
                    h,
                    hover: Some(hover),
                    ..
                } if px >= *x && px <= x + w && py >= *y && py <= y + h => {
                    return Some(hover);
                }
                SceneNode::Circle {
                    cx,
                    cy,
                    r,
                    hover: Some(hover),
                    ..
                } if (px - cx).hypot(py - cy) <= *r => {
                    return Some(hover);
                }
                SceneNode::Wedge {
                    cx,
                    cy,
                    radius,
                    start_angle,
                    end_angle,
                    hover: Some(hover),
                    ..
                } => {
                    let (dx, dy) = (px - cx, py - cy);
                    if dx.hypot(dy) <= *radius {
                        // Clockwise angle from twelve o'clock.
                        let angle = dx.atan2(-dy).rem_euclid(TAU);
                        if angle >= *start_angle && angle < *end_angle {
                            return Some(hover);
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }
}

const GRID_COLOR: Rgb = Rgb(60, 60, 72);
const PIE_STROKE: Rgb = Rgb::WHITE;

/// Build the scene for one chart.
///
/// Cartesian kinds with an empty first series draw nothing but the
/// title; a pie without values or labels is a render error.
pub fn build_scene(
    kind: &ChartKind,
    series: &[ChartSeries],
    style: &StyleConfig,
    title: &str,
    size: (f64, f64),
) -> Result<Scene, RenderError> {
    let (width, height) = size;
    let (m_top, m_right, m_bottom, m_left) = SCENE_MARGIN;
    let plot_w = (width - m_left - m_right).max(1.0);
    let plot_h = (height - m_top - m_bottom).max(1.0);

    let mut nodes = Vec::new();

    match kind {
        ChartKind::Bar => {
            if has_cartesian_data(series) {
                build_bar(&mut nodes, series, style, plot_w, plot_h, m_left, m_top);
            }
        }
        ChartKind::Line => {
            if has_cartesian_data(series) {
                build_line(&mut nodes, series, style, plot_w, plot_h, m_left, m_top);
            }
        }
        ChartKind::Scatter => {
            if has_cartesian_data(series) {
                build_scatter(&mut nodes, series, style, plot_w, plot_h, m_left, m_top);
            }
        }
        ChartKind::Pie => {
            build_pie(&mut nodes, series, style, plot_w, plot_h, m_left, m_top)?;
        }
        ChartKind::Unsupported(name) => {
            nodes.push(SceneNode::Text {
                x: m_left + plot_w / 2.0,
                y: m_top + plot_h / 2.0,
                content: format!("unsupported chart type: {name}"),
                size: style.font_size,
                fill: style.axis_color,
                anchor: Anchor::Middle,
                bold: false,
                rotate: None,
            });
        }
    }

    nodes.push(SceneNode::Text {
        x: m_left + plot_w / 2.0,
        y: m_top - 10.0,
        content: title.to_string(),
        size: style.title_size,
        fill: style.axis_color,
        anchor: Anchor::Middle,
        bold: false,
        rotate: None,
    });

    Ok(Scene {
        width,
        height,
        nodes,
    })
}

fn has_cartesian_data(series: &[ChartSeries]) -> bool {
    series.first().is_some_and(|s| !s.is_empty_cartesian())
}

/// Largest y value across every series, for the shared value axis.
fn max_y(series: &[ChartSeries]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.y.iter())
        .fold(0.0f64, |acc, &v| acc.max(v))
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Axis lines, tick labels, and optional horizontal gridlines shared by
/// the cartesian kinds. `x_pos` gives the center x of category `i`.
#[allow(clippy::too_many_arguments)]
fn build_axes(
    nodes: &mut Vec<SceneNode>,
    categories: &[String],
    x_pos: &dyn Fn(usize) -> f64,
    y: &LinearScale,
    style: &StyleConfig,
    plot_w: f64,
    plot_h: f64,
    left: f64,
    top: f64,
) {
    let bottom = top + plot_h;

    nodes.push(SceneNode::Line {
        x1: left,
        y1: bottom,
        x2: left + plot_w,
        y2: bottom,
        stroke: style.axis_color,
        dashed: false,
    });
    nodes.push(SceneNode::Line {
        x1: left,
        y1: top,
        x2: left,
        y2: bottom,
        stroke: style.axis_color,
        dashed: false,
    });

    for (i, label) in categories.iter().enumerate() {
        nodes.push(SceneNode::Text {
            x: left + x_pos(i) - 10.0,
            y: bottom + 12.0,
            content: label.clone(),
            size: style.font_size,
            fill: style.axis_color,
            anchor: Anchor::End,
            bold: false,
            rotate: Some(-45.0),
        });
    }

    for tick in y.ticks(5) {
        let ty = top + y.scale(tick);
        nodes.push(SceneNode::Text {
            x: left - 8.0,
            y: ty + 4.0,
            content: format_tick(tick),
            size: style.font_size,
            fill: style.axis_color,
            anchor: Anchor::End,
            bold: false,
            rotate: None,
        });
        if style.grid_lines && tick != 0.0 {
            nodes.push(SceneNode::Line {
                x1: left,
                y1: ty,
                x2: left + plot_w,
                y2: ty,
                stroke: GRID_COLOR,
                dashed: true,
            });
        }
    }
}

/// Legend strip below the plot. Cartesian kinds pass one entry per
/// series, pie one per label; colors are resolved by the caller with
/// the same rule as the data elements.
fn build_legend(
    nodes: &mut Vec<SceneNode>,
    entries: &[(String, Rgb)],
    style: &StyleConfig,
    left: f64,
    plot_bottom: f64,
) {
    let y0 = plot_bottom + 30.0;
    for (i, (label, color)) in entries.iter().enumerate() {
        let x0 = left + i as f64 * LEGEND_ENTRY_WIDTH;
        nodes.push(SceneNode::Rect {
            x: x0,
            y: y0,
            w: LEGEND_SWATCH,
            h: LEGEND_SWATCH,
            fill: *color,
            opacity: 1.0,
            corner_radius: 0.0,
            hover: None,
        });
        nodes.push(SceneNode::Text {
            x: x0 + 20.0,
            y: y0 + 12.0,
            content: label.clone(),
            size: style.font_size,
            fill: style.axis_color,
            anchor: Anchor::Start,
            bold: false,
            rotate: None,
        });
    }
}

/// One legend entry per series, in series order.
fn series_legend_entries(series: &[ChartSeries], style: &StyleConfig) -> Vec<(String, Rgb)> {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            (
                s.display_name(i),
                resolve_series_color(s.color.as_deref(), i, style),
            )
        })
        .collect()
}

/// Index of a label within the shared category domain. Unknown labels
/// fall back to slot 0, mirroring how an out-of-domain band lookup
/// lands at the origin.
fn domain_index(domain: &[String], label: &str) -> usize {
    domain.iter().position(|d| d == label).unwrap_or(0)
}

#[allow(clippy::too_many_arguments)]
fn build_bar(
    nodes: &mut Vec<SceneNode>,
    series: &[ChartSeries],
    style: &StyleConfig,
    plot_w: f64,
    plot_h: f64,
    left: f64,
    top: f64,
) {
    let domain = &series[0].x;
    let x = BandScale::new(domain.len(), plot_w, BAND_PADDING);
    let y = LinearScale::value_axis(max_y(series), plot_h);

    build_axes(
        nodes,
        domain,
        &|i| x.position(i) + x.bandwidth() / 2.0,
        &y,
        style,
        plot_w,
        plot_h,
        left,
        top,
    );

    // Multiple series share each band as adjacent sub-bars.
    let bar_w = x.bandwidth() / series.len() as f64;
    for (i, serie) in series.iter().enumerate() {
        let color = resolve_series_color(serie.color.as_deref(), i, style);
        for j in 0..serie.point_count() {
            let value = serie.y[j];
            let slot = domain_index(domain, &serie.x[j]);
            let bar_top = top + y.scale(value);
            nodes.push(SceneNode::Rect {
                x: left + x.position(slot) + i as f64 * bar_w,
                y: bar_top,
                w: bar_w,
                h: (top + plot_h - bar_top).max(0.0),
                fill: color,
                opacity: style.bar_opacity,
                corner_radius: 3.0,
                hover: Some(Hover {
                    category: serie.x[j].clone(),
                    value,
                    series: serie.display_name(i),
                    color,
                }),
            });
        }
    }

    build_legend(
        nodes,
        &series_legend_entries(series, style),
        style,
        left,
        top + plot_h,
    );
}

#[allow(clippy::too_many_arguments)]
fn build_line(
    nodes: &mut Vec<SceneNode>,
    series: &[ChartSeries],
    style: &StyleConfig,
    plot_w: f64,
    plot_h: f64,
    left: f64,
    top: f64,
) {
    let domain = &series[0].x;
    let x = PointScale::new(domain.len(), plot_w);
    let y = LinearScale::value_axis(max_y(series), plot_h);

    build_axes(
        nodes,
        domain,
        &|i| x.position(i),
        &y,
        style,
        plot_w,
        plot_h,
        left,
        top,
    );

    for (i, serie) in series.iter().enumerate() {
        let color = resolve_series_color(serie.color.as_deref(), i, style);
        let points: Vec<(f64, f64)> = (0..serie.point_count())
            .map(|j| {
                let slot = domain_index(domain, &serie.x[j]);
                (left + x.position(slot), top + y.scale(serie.y[j]))
            })
            .collect();

        nodes.push(SceneNode::PolyLine {
            points: points.clone(),
            stroke: color,
            width: 2.5,
            smooth: true,
        });
        for (j, &(cx, cy)) in points.iter().enumerate() {
            nodes.push(SceneNode::Circle {
                cx,
                cy,
                r: LINE_MARKER_RADIUS,
                fill: color,
                opacity: 1.0,
                stroke: None,
                hover: Some(Hover {
                    category: serie.x[j].clone(),
                    value: serie.y[j],
                    series: serie.display_name(i),
                    color,
                }),
            });
        }
    }

    build_legend(
        nodes,
        &series_legend_entries(series, style),
        style,
        left,
        top + plot_h,
    );
}

#[allow(clippy::too_many_arguments)]
fn build_scatter(
    nodes: &mut Vec<SceneNode>,
    series: &[ChartSeries],
    style: &StyleConfig,
    plot_w: f64,
    plot_h: f64,
    left: f64,
    top: f64,
) {
    let domain = &series[0].x;
    let x = PointScale::new(domain.len(), plot_w);
    let y = LinearScale::value_axis(max_y(series), plot_h);

    build_axes(
        nodes,
        domain,
        &|i| x.position(i),
        &y,
        style,
        plot_w,
        plot_h,
        left,
        top,
    );

    for (i, serie) in series.iter().enumerate() {
        let color = resolve_series_color(serie.color.as_deref(), i, style);
        for j in 0..serie.point_count() {
            let slot = domain_index(domain, &serie.x[j]);
            nodes.push(SceneNode::Circle {
                cx: left + x.position(slot),
                cy: top + y.scale(serie.y[j]),
                r: SCATTER_MARKER_RADIUS,
                fill: color,
                opacity: SCATTER_OPACITY,
                stroke: Some(Rgb::WHITE),
                hover: Some(Hover {
                    category: serie.x[j].clone(),
                    value: serie.y[j],
                    series: serie.display_name(i),
                    color,
                }),
            });
        }
    }

    build_legend(
        nodes,
        &series_legend_entries(series, style),
        style,
        left,
        top + plot_h,
    );
}

fn build_pie(
    nodes: &mut Vec<SceneNode>,
    series: &[ChartSeries],
    style: &StyleConfig,
    plot_w: f64,
    plot_h: f64,
    left: f64,
    top: f64,
) -> Result<(), RenderError> {
    let serie = series.first().ok_or(RenderError::MissingPieData)?;
    if serie.values.is_empty() || serie.labels.is_empty() {
        return Err(RenderError::MissingPieData);
    }
    let count = serie.values.len().min(serie.labels.len());
    let total: f64 = serie.values[..count].iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Err(RenderError::MissingPieData);
    }

    let cx = left + plot_w / 2.0;
    let cy = top + plot_h / 2.0;
    let radius = plot_w.min(plot_h) / 2.0 * PIE_OUTER_RADIUS_FRACTION;

    // Angles are assigned largest-first starting at twelve o'clock, but
    // wedges keep their input order for colors and labels.
    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by(|&a, &b| {
        serie.values[b]
            .partial_cmp(&serie.values[a])
            .unwrap_or(Ordering::Equal)
    });
    let mut angles = vec![(0.0, 0.0); count];
    let mut cursor = 0.0;
    for &idx in &order {
        let sweep = (serie.values[idx].max(0.0) / total) * TAU;
        angles[idx] = (cursor, cursor + sweep);
        cursor += sweep;
    }

    for i in 0..count {
        let (start, end) = angles[i];
        if end <= start {
            continue;
        }
        let fill = resolve_series_color(serie.color.as_deref(), i, style);
        nodes.push(SceneNode::Wedge {
            cx,
            cy,
            radius,
            start_angle: start,
            end_angle: end,
            fill,
            hover: Some(Hover {
                category: serie.labels[i].clone(),
                value: serie.values[i],
                series: serie.display_name(0),
                color: fill,
            }),
        });

        let mid = (start + end) / 2.0;
        let label_r = radius * PIE_LABEL_RADIUS_FRACTION;
        nodes.push(SceneNode::Text {
            x: cx + label_r * mid.sin(),
            y: cy - label_r * mid.cos(),
            content: serie.labels[i].clone(),
            size: style.font_size,
            fill: PIE_STROKE,
            anchor: Anchor::Middle,
            bold: false,
            rotate: None,
        });
        let value_r = radius * 0.5;
        nodes.push(SceneNode::Text {
            x: cx + value_r * mid.sin(),
            y: cy - value_r * mid.cos(),
            content: format_tick(serie.values[i]),
            size: style.font_size.saturating_sub(2).max(8),
            fill: PIE_STROKE,
            anchor: Anchor::Middle,
            bold: true,
            rotate: None,
        });
    }

    // One legend entry per label, colored like its wedge.
    let entries: Vec<(String, Rgb)> = (0..count)
        .map(|i| {
            (
                serie.labels[i].clone(),
                resolve_series_color(serie.color.as_deref(), i, style),
            )
        })
        .collect();
    build_legend(nodes, &entries, style, left, top + plot_h);

    Ok(())
}
