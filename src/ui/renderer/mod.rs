//! Renderer module: split into focused submodules.
//!
//! - `header`: Logo and phase indicator
//! - `status_bar`: Bottom status bar with keybinds and messages
//! - `idle`: Input screen (prompt / file path / sheet name)
//! - `processing`: Spinner screen while a request is in flight
//! - `results`: Chart canvas, sidebar, and tooltip
//! - `chart_widget`: Scene drawing onto a ratatui canvas
//! - `overlays`: Help popup and style panel
//! - `helpers`: Shared rendering utilities

mod chart_widget;
mod header;

pub use chart_widget::cell_to_scene;
pub mod helpers;
mod idle;
mod overlays;
mod processing;
mod results;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::state::{AppState, InputMode, Phase};

/// Top-level render function. Delegates per phase.
///
/// Takes `&mut AppState` because the results view records the chart
/// canvas area for mouse hit-testing.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Min(10),   // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    state.chart_area = None;
    match &state.phase {
        Phase::Idle => idle::render_idle(frame, main_chunks[1], state),
        Phase::Processing => processing::render_processing(frame, main_chunks[1], state),
        Phase::Results => results::render_results(frame, main_chunks[1], state),
        Phase::Error(message) => {
            let message = message.clone();
            idle::render_error(frame, main_chunks[1], state, &message);
        }
    }

    if state.mode == InputMode::StylePanel {
        overlays::render_style_panel(frame, size, state);
    }

    if state.show_help {
        overlays::render_help(frame, size, state);
    }
}
