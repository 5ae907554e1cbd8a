//! Header bar: logo, phase indicator, and chart pager.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::state::{AppState, Phase};

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;

    let phase_span = match &state.phase {
        Phase::Idle => Span::styled("IDLE", Style::default().fg(t.text_dim)),
        Phase::Processing => Span::styled(
            "PROCESSING",
            Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
        ),
        Phase::Results => Span::styled(
            "RESULTS",
            Style::default().fg(t.success).add_modifier(Modifier::BOLD),
        ),
        Phase::Error(_) => Span::styled(
            "ERROR",
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        ),
    };

    let mut spans = vec![
        Span::styled(" vizterm ", t.header_style()),
        Span::styled("│ ", Style::default().fg(t.border)),
        phase_span,
    ];

    if state.phase == Phase::Results && !state.charts.is_empty() {
        spans.push(Span::styled(
            format!("  chart {}/{}", state.selected + 1, state.charts.len()),
            Style::default().fg(t.text_dim),
        ));
        if let Some(view) = state.selected_view() {
            spans.push(Span::styled(
                format!("  {}", view.title),
                Style::default().fg(t.accent_secondary),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(t.border_style()),
    );
    frame.render_widget(header, area);
}
