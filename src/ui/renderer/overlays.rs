//! Modal overlays: the help popup and the style panel.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::{
    HELP_POPUP_HEIGHT, HELP_POPUP_WIDTH, STYLE_POPUP_HEIGHT, STYLE_POPUP_WIDTH,
};
use crate::ui::state::{AppState, StyleField};

use super::helpers::centered_rect;

pub fn render_help(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup = centered_rect(
        HELP_POPUP_WIDTH.min(area.width),
        HELP_POPUP_HEIGHT.min(area.height),
        area,
    );
    frame.render_widget(Clear, popup);

    let key = |k: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<12}", k),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc.to_string(), Style::default().fg(t.text_primary)),
        ])
    };
    let section = |title: &str| -> Line {
        Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(t.accent_secondary)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let lines = vec![
        Line::from(""),
        section("Input"),
        key("p", "Edit the analysis prompt"),
        key("f", "Edit the spreadsheet file path"),
        key("Tab", "Move between input fields"),
        key("Enter", "Submit for analysis"),
        key("Esc", "Leave the focused field"),
        Line::from(""),
        section("Results"),
        key("← → / h l", "Previous / next chart"),
        key("t", "Edit the chart title"),
        key("s", "Open the style panel"),
        key("e", "Export the chart as PNG"),
        key("E", "Export the server vector file"),
        key("n", "Start a new analysis"),
        Line::from(""),
        section("Style panel"),
        key("↑ ↓", "Select a field"),
        key("← →", "Adjust the field"),
        key("Esc", "Close the panel"),
        Line::from(""),
        section("General"),
        key("T", "Cycle the color theme"),
        key("?", "Toggle this help"),
        key("q / Ctrl-c", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Hover a bar, point, or wedge to inspect its value",
            Style::default().fg(t.text_dim),
        )),
    ];

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_highlight_style())
            .title(Span::styled(" Help ", t.header_style())),
    );
    frame.render_widget(help, popup);
}

/// Style panel over the results view. Edits apply to the selected
/// chart only; other charts keep their own style copies.
pub fn render_style_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup = centered_rect(
        STYLE_POPUP_WIDTH.min(area.width),
        STYLE_POPUP_HEIGHT.min(area.height),
        area,
    );
    frame.render_widget(Clear, popup);

    let Some(view) = state.selected_view() else {
        return;
    };
    let style = &view.style;
    let selected = state.style_field();

    let mut lines = vec![Line::from("")];
    for &field in StyleField::all() {
        let value = match field {
            StyleField::FontSize => format!("{}", style.font_size),
            StyleField::TitleSize => format!("{}", style.title_size),
            StyleField::FontFamily => style.font_family.clone(),
            StyleField::AxisColor => style.axis_color.to_hex(),
            StyleField::BarOpacity => format!("{:.1}", style.bar_opacity),
            StyleField::GridLines => {
                if style.grid_lines {
                    "on".to_string()
                } else {
                    "off".to_string()
                }
            }
        };
        let row_style = if field == selected {
            t.list_row_selected()
        } else {
            t.list_row_normal()
        };
        let marker = if field == selected { "▸" } else { " " };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {:<14} ◂ {:>4} ▸", field.label(), value),
            row_style,
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Applies to this chart only",
        Style::default().fg(t.text_dim),
    )));

    let panel = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_highlight_style())
            .title(Span::styled(" Style ", t.header_style())),
    );
    frame.render_widget(panel, popup);
}
