//! Processing screen: spinner plus staged progress text.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::state::AppState;
use crate::utils::{loading_dots, spinner_char};

use super::helpers::centered_rect;

pub fn render_processing(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let center = centered_rect(44, 3, area);

    let lines = vec![
        Line::from(Span::styled(
            format!(
                "{} {}{}",
                spinner_char(state.tick_count),
                state.loading_stage(),
                loading_dots(state.tick_count)
            ),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Large sheets can take a while",
            Style::default().fg(t.text_muted),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        center,
    );
}
