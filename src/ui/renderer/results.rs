//! Results screen: the chart canvas, the sidebar, and the tooltip.
//!
//! Each chart fails alone. A description-level error, a malformed
//! payload, or a scene build failure replaces only this chart's canvas
//! with an inline message; siblings stay browsable.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::chart::build_scene;
use crate::constants::{SCENE_HEIGHT, SCENE_WIDTH, TOOLTIP_MAX_LEN};
use crate::models::{ChartDescription, ChartPayload};
use crate::ui::state::{AppState, ChartViewState, InputMode};
use crate::utils::truncate_str;

use super::chart_widget::render_scene_canvas;

/// Sidebar kicks in once the terminal is wide enough to afford it.
const SIDEBAR_MIN_TOTAL_WIDTH: u16 = 100;
const SIDEBAR_WIDTH: u16 = 36;

pub fn render_results(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let Some(desc) = state.selected_chart().cloned() else {
        return;
    };
    let Some(view) = state.selected_view().cloned() else {
        return;
    };

    let (chart_zone, sidebar_zone) = if area.width >= SIDEBAR_MIN_TOTAL_WIDTH {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    render_chart_panel(frame, chart_zone, state, &desc, &view);
    if let Some(zone) = sidebar_zone {
        render_sidebar(frame, zone, state, &desc);
    }
    render_tooltip(frame, chart_zone, state, &view);
}

fn render_chart_panel(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    desc: &ChartDescription,
    view: &ChartViewState,
) {
    let t = state.theme.clone();
    let editing = state.mode == InputMode::TitleEdit;

    let title_span = if editing {
        Span::styled(
            format!(" Title: {}_ ", view.title_input.text),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {} ", view.title), t.header_style())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            t.border_highlight_style()
        } else {
            t.border_style()
        })
        .title(title_span);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(err) = desc.error.as_deref() {
        render_chart_error(frame, inner, state, err);
        return;
    }

    match desc.payload() {
        Ok(ChartPayload::Series { kind, series }) => {
            match build_scene(
                &kind,
                &series,
                &view.style,
                &view.title,
                (SCENE_WIDTH, SCENE_HEIGHT),
            ) {
                Ok(scene) => {
                    render_scene_canvas(frame, inner, &scene, &t);
                    // The mouse handler maps cells back through this area.
                    state.chart_area = Some(inner);
                }
                Err(e) => render_chart_error(frame, inner, state, &e.to_string()),
            }
        }
        Ok(ChartPayload::Image { png }) => {
            render_info_panel(
                frame,
                inner,
                state,
                vec![
                    format!("Server-rendered image ({} KB)", png.len() / 1024),
                    "The terminal cannot display it inline.".to_string(),
                    "Press e to export it as PNG.".to_string(),
                ],
            );
        }
        Ok(ChartPayload::Plotly { .. }) => {
            let summary = desc
                .suggestion
                .as_ref()
                .and_then(|s| s.summary.clone())
                .unwrap_or_else(|| "Interactive plot specification".to_string());
            render_info_panel(
                frame,
                inner,
                state,
                vec![
                    summary,
                    "Press e to export: the server renders the PNG.".to_string(),
                ],
            );
        }
        Err(e) => render_chart_error(frame, inner, state, &e.to_string()),
    }
}

/// Inline per-chart failure. Deliberately quiet next to the whole-view
/// error screen: siblings are still one keypress away.
fn render_chart_error(frame: &mut Frame, area: Rect, state: &AppState, message: &str) {
    let t = &state.theme;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "This chart could not be rendered",
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(t.text_dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, state: &AppState, messages: Vec<String>) {
    let t = &state.theme;
    let mut lines = vec![Line::from("")];
    for (i, msg) in messages.into_iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(t.info)
        } else {
            Style::default().fg(t.text_dim)
        };
        lines.push(Line::from(Span::styled(msg, style)));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState, desc: &ChartDescription) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((state.charts.len() as u16 + 2).min(10)),
            Constraint::Min(4),
        ])
        .split(area);

    // Chart list, one row per result. Failed charts are flagged.
    let items: Vec<ListItem> = state
        .views
        .iter()
        .zip(&state.charts)
        .enumerate()
        .map(|(i, (view, chart))| {
            let broken = chart.error.is_some() || chart.payload().is_err();
            let marker = if broken { "✗ " } else { "  " };
            let label = format!(
                "{marker}{}",
                truncate_str(&view.title, area.width.saturating_sub(6) as usize)
            );
            let style = if i == state.selected {
                t.list_row_selected()
            } else if broken {
                Style::default().fg(t.danger)
            } else {
                t.list_row_normal()
            };
            ListItem::new(label).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(Span::styled(" Charts ", Style::default().fg(t.text_dim))),
    );
    frame.render_widget(list, chunks[0]);

    // Source metadata and the AI suggestion for the selected chart.
    let mut lines = Vec::new();
    if let Some(rows) = desc.rows_count {
        lines.push(meta_line(t, "Rows", rows.to_string()));
    }
    if let Some(cols) = &desc.columns {
        lines.push(meta_line(t, "Columns", cols.len().to_string()));
    }
    if let Some(numeric) = &desc.numeric_columns {
        lines.push(meta_line(t, "Numeric", numeric.join(", ")));
    }
    if let Some(sugg) = &desc.suggestion {
        lines.push(Line::from(""));
        if let Some(chart_type) = &sugg.chart_type {
            lines.push(meta_line(t, "Suggested", chart_type.clone()));
        }
        let wrap_width = area.width.saturating_sub(4).max(8) as usize;
        if let Some(summary) = &sugg.summary {
            for piece in textwrap::wrap(summary, wrap_width) {
                lines.push(Line::from(Span::styled(
                    piece.to_string(),
                    Style::default().fg(t.text_primary),
                )));
            }
        }
        if let Some(reason) = &sugg.reason {
            for piece in textwrap::wrap(reason, wrap_width) {
                lines.push(Line::from(Span::styled(
                    piece.to_string(),
                    Style::default().fg(t.text_muted),
                )));
            }
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No source metadata",
            Style::default().fg(t.text_muted),
        )));
    }
    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(Span::styled(" Details ", Style::default().fg(t.text_dim))),
    );
    frame.render_widget(details, chunks[1]);
}

fn meta_line<'a>(t: &crate::ui::theme::Theme, key: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{key}: "), Style::default().fg(t.text_dim)),
        Span::styled(value, Style::default().fg(t.text_primary)),
    ])
}

/// Tooltip next to the pointer, clamped into the chart zone.
fn render_tooltip(frame: &mut Frame, chart_zone: Rect, state: &AppState, view: &ChartViewState) {
    let Some((col, row, hover)) = &view.tooltip else {
        return;
    };
    let t = &state.theme;

    let header = truncate_str(&hover.category, TOOLTIP_MAX_LEN);
    let body = truncate_str(
        &format!("{}: {}", hover.series, hover.value),
        TOOLTIP_MAX_LEN,
    );
    let width = (header.chars().count().max(body.chars().count()) as u16 + 4)
        .min(chart_zone.width);
    let height = 4u16;

    // Offset from the pointer, flipped when it would overflow.
    let mut x = col + 2;
    if x + width > chart_zone.right() {
        x = col.saturating_sub(width + 1);
    }
    let mut y = row.saturating_sub(height);
    if y < chart_zone.y {
        y = row + 1;
    }
    let popup = Rect::new(
        x.max(chart_zone.x),
        y.min(chart_zone.bottom().saturating_sub(height)),
        width,
        height,
    );

    let lines = vec![
        Line::from(Span::styled(
            header,
            Style::default()
                .fg(t.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            body,
            Style::default().fg(hover.color.to_ratatui()),
        )),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(t.bg_panel))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(t.border_highlight_style()),
            ),
        popup,
    );
}
