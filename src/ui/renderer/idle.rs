//! Idle screen: the prompt and file inputs, plus the error view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::constants::ALLOWED_EXTENSIONS;
use crate::ui::state::{AppState, InputMode, TextInput};

use super::helpers::centered_rect;

pub fn render_idle(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let form = centered_rect(area.width.min(72), 14, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // intro
            Constraint::Length(3), // prompt
            Constraint::Length(3), // file path
            Constraint::Length(3), // sheet name
            Constraint::Min(0),
        ])
        .split(form);

    let intro = Paragraph::new(Line::from(vec![
        Span::styled("Describe the data to analyze, ", Style::default().fg(t.text_dim)),
        Span::styled(
            "or point at a spreadsheet",
            Style::default().fg(t.text_dim),
        ),
    ]));
    frame.render_widget(intro, chunks[0]);

    render_input(
        frame,
        chunks[1],
        state,
        "Prompt (p)",
        &state.prompt_input,
        state.mode == InputMode::Prompt,
    );
    render_input(
        frame,
        chunks[2],
        state,
        &format!("File path (f) — .{}", ALLOWED_EXTENSIONS.join(" .")),
        &state.file_input,
        state.mode == InputMode::FilePath,
    );
    render_input(
        frame,
        chunks[3],
        state,
        "Sheet name (optional)",
        &state.sheet_input,
        state.mode == InputMode::SheetName,
    );
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    input: &TextInput,
    focused: bool,
) {
    let t = &state.theme;
    let border = if focused {
        t.border_highlight_style()
    } else {
        t.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {title} "),
            if focused {
                t.header_style()
            } else {
                Style::default().fg(t.text_dim)
            },
        ));

    let paragraph = Paragraph::new(input.text.as_str())
        .style(Style::default().fg(t.text_primary))
        .block(block);
    frame.render_widget(paragraph, area);

    if focused {
        // Cursor sits after the text, inside the border. Width-aware so
        // CJK input does not drift.
        let x = area.x + 1 + input.text[..input.cursor].width() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Whole-view failure screen. The error replaces the results entirely.
pub fn render_error(frame: &mut Frame, area: Rect, state: &AppState, message: &str) {
    let t = &state.theme;
    let popup = centered_rect(area.width.min(64), 8, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.danger))
        .title(Span::styled(
            " Analysis failed ",
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        ));

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(t.text_primary),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press n to start a new analysis",
            Style::default().fg(t.text_dim),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(body, popup);
}
