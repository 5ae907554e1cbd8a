//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::STATUS_MESSAGE_TIMEOUT_SECS;
use crate::ui::state::{AppState, InputMode, Phase};

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;

    let badge = |key: &str, color: ratatui::style::Color| -> Span {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(t.bg_dark)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim =
        |text: &str| -> Span { Span::styled(text.to_string(), Style::default().fg(t.text_dim)) };

    let mut spans = vec![Span::styled(" ", Style::default()), badge("q", t.accent)];
    spans.push(dim(" Quit "));

    match state.mode {
        InputMode::Prompt | InputMode::FilePath | InputMode::SheetName => {
            spans.push(badge("Enter", t.accent));
            spans.push(dim(" Submit "));
            spans.push(badge("Tab", t.accent));
            spans.push(dim(" Next field "));
            spans.push(badge("Esc", t.accent));
            spans.push(dim(" Back "));
        }
        InputMode::TitleEdit => {
            spans.push(badge("Enter/Esc", t.accent));
            spans.push(dim(" Apply title "));
        }
        InputMode::StylePanel => {
            spans.push(badge("↑↓", t.accent));
            spans.push(dim(" Field "));
            spans.push(badge("←→", t.accent));
            spans.push(dim(" Adjust "));
            spans.push(badge("Esc", t.accent));
            spans.push(dim(" Close "));
        }
        InputMode::Normal => match state.phase {
            Phase::Idle => {
                spans.push(badge("p", t.accent));
                spans.push(dim(" Prompt "));
                spans.push(badge("f", t.accent));
                spans.push(dim(" File "));
            }
            Phase::Results => {
                spans.push(badge("←→", t.accent));
                spans.push(dim(" Chart "));
                spans.push(badge("t", t.accent));
                spans.push(dim(" Title "));
                spans.push(badge("s", t.accent));
                spans.push(dim(" Style "));
                spans.push(badge("e", t.accent_secondary));
                spans.push(dim(" Export PNG "));
                spans.push(badge("n", t.accent));
                spans.push(dim(" New "));
            }
            Phase::Error(_) => {
                spans.push(badge("n", t.accent));
                spans.push(dim(" New analysis "));
            }
            Phase::Processing => {}
        },
    }

    spans.push(badge("T", t.accent));
    spans.push(dim(&format!(" Theme: {} ", t.name)));
    spans.push(badge("?", t.accent));
    spans.push(dim(" Help "));

    // Status message auto-expires.
    if let Some((msg, when)) = &state.status_message {
        if when.elapsed().as_secs() < STATUS_MESSAGE_TIMEOUT_SECS {
            spans.push(Span::styled(
                format!("  {} ", msg),
                Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
            ));
        }
    }

    let status = Paragraph::new(Line::from(spans));
    frame.render_widget(status, area);
}
