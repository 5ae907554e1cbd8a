//! Scene drawing on a ratatui canvas.
//!
//! The scene keeps its logical 800x500 coordinate space; the canvas
//! maps it onto however many braille dots the chart area offers. Mouse
//! positions go through the inverse mapping in `cell_to_scene`.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle as CanvasCircle, Context, Line as CanvasLine},
    widgets::Block,
    Frame,
};

use crate::chart::{Anchor, Scene, SceneNode};
use crate::ui::theme::Theme;

/// Render a scene inside `area` (which should be the inner area of an
/// already-drawn block).
pub fn render_scene_canvas(frame: &mut Frame, area: Rect, scene: &Scene, theme: &Theme) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    // Scene units covered by one terminal cell, for text positioning.
    let cell_w = scene.width / area.width as f64;
    let canvas = Canvas::default()
        .block(Block::default())
        .background_color(theme.bg_dark)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, scene.width])
        .y_bounds([0.0, scene.height])
        .paint(|ctx| draw_scene(ctx, scene, cell_w));
    frame.render_widget(canvas, area);
}

/// Map a terminal cell inside `area` back to scene coordinates.
/// Returns `None` when the cell lies outside the area.
pub fn cell_to_scene(area: Rect, col: u16, row: u16, scene: &Scene) -> Option<(f64, f64)> {
    if col < area.x
        || row < area.y
        || col >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    // Sample the cell center.
    let fx = (col - area.x) as f64 + 0.5;
    let fy = (row - area.y) as f64 + 0.5;
    Some((
        fx / area.width as f64 * scene.width,
        fy / area.height as f64 * scene.height,
    ))
}

fn draw_scene(ctx: &mut Context, scene: &Scene, cell_w: f64) {
    let flip = |y: f64| scene.height - y;

    for node in &scene.nodes {
        match node {
            SceneNode::Rect { x, y, w, h, fill, .. } => {
                // Fill with vertical strokes at half-cell pitch.
                let color = fill.to_ratatui();
                let step = (cell_w / 2.0).max(0.5);
                let mut sx = *x;
                while sx <= x + w {
                    ctx.draw(&CanvasLine {
                        x1: sx,
                        y1: flip(*y),
                        x2: sx,
                        y2: flip(y + h),
                        color,
                    });
                    sx += step;
                }
            }
            SceneNode::Circle { cx, cy, r, fill, .. } => {
                ctx.draw(&CanvasCircle {
                    x: *cx,
                    y: flip(*cy),
                    radius: *r,
                    color: fill.to_ratatui(),
                });
            }
            SceneNode::PolyLine { points, stroke, .. } => {
                let color = stroke.to_ratatui();
                for pair in points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: flip(pair[0].1),
                        x2: pair[1].0,
                        y2: flip(pair[1].1),
                        color,
                    });
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
                // Fill with a fan of radial strokes, dense enough that
                // adjacent strokes touch at the rim.
                let color = fill.to_ratatui();
                let step = (cell_w / radius.max(1.0)).max(0.004);
                let mut a = *start_angle;
                while a <= *end_angle {
                    ctx.draw(&CanvasLine {
                        x1: *cx,
                        y1: flip(*cy),
                        x2: cx + radius * a.sin(),
                        y2: flip(cy - radius * a.cos()),
                        color,
                    });
                    a += step;
                }
            }
            SceneNode::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                dashed,
            } => {
                let color = stroke.to_ratatui();
                if *dashed {
                    draw_dashed(ctx, (*x1, flip(*y1)), (*x2, flip(*y2)), color);
                } else {
                    ctx.draw(&CanvasLine {
                        x1: *x1,
                        y1: flip(*y1),
                        x2: *x2,
                        y2: flip(*y2),
                        color,
                    });
                }
            }
            SceneNode::Text {
                x,
                y,
                content,
                fill,
                anchor,
                ..
            } => {
                // The terminal draws text upright regardless of the
                // rotation hint; anchors are approximated in cells.
                let width = content.chars().count() as f64 * cell_w;
                let tx = match anchor {
                    Anchor::Start => *x,
                    Anchor::Middle => x - width / 2.0,
                    Anchor::End => x - width,
                };
                ctx.print(
                    tx.max(0.0),
                    flip(*y),
                    Line::from(Span::styled(
                        content.clone(),
                        Style::default().fg(fill.to_ratatui()),
                    )),
                );
            }
        }
    }
}

fn draw_dashed(
    ctx: &mut Context,
    from: (f64, f64),
    to: (f64, f64),
    color: ratatui::style::Color,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return;
    }
    let dash = 4.0;
    let mut t = 0.0;
    while t < len {
        let end = (t + dash).min(len);
        ctx.draw(&CanvasLine {
            x1: from.0 + dx * t / len,
            y1: from.1 + dy * t / len,
            x2: from.0 + dx * end / len,
            y2: from.1 + dy * end / len,
            color,
        });
        t += dash * 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SCENE_HEIGHT, SCENE_WIDTH};

    fn scene() -> Scene {
        Scene {
            width: SCENE_WIDTH,
            height: SCENE_HEIGHT,
            nodes: Vec::new(),
        }
    }

    #[test]
    fn cell_to_scene_maps_corners() {
        let area = Rect::new(2, 1, 80, 25);
        let s = scene();
        let (x, y) = cell_to_scene(area, 2, 1, &s).unwrap();
        assert!(x < SCENE_WIDTH / 80.0);
        assert!(y < SCENE_HEIGHT / 25.0);
        let (x, y) = cell_to_scene(area, 81, 25, &s).unwrap();
        assert!(x > SCENE_WIDTH - SCENE_WIDTH / 80.0);
        assert!(y > SCENE_HEIGHT - SCENE_HEIGHT / 25.0);
    }

    #[test]
    fn cell_outside_area_is_none() {
        let area = Rect::new(2, 1, 80, 25);
        let s = scene();
        assert!(cell_to_scene(area, 1, 1, &s).is_none());
        assert!(cell_to_scene(area, 82, 1, &s).is_none());
        assert!(cell_to_scene(area, 10, 26, &s).is_none());
    }

    #[test]
    fn cell_center_maps_proportionally() {
        let area = Rect::new(0, 0, 100, 50);
        let s = scene();
        let (x, y) = cell_to_scene(area, 50, 25, &s).unwrap();
        assert!((x - SCENE_WIDTH * 0.505).abs() < 1.0);
        assert!((y - SCENE_HEIGHT * 0.51).abs() < 1.0);
    }
}
