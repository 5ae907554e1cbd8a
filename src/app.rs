//! Application struct and event loop.
//!
//! Owns the terminal, the state, the service client, and the channels
//! that carry async results back into the loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::{ApiEvent, Pipeline, VisualizeClient};
use crate::chart::build_scene;
use crate::config::Config;
use crate::constants::*;
use crate::export;
use crate::models::ChartPayload;
use crate::ui::state::{AppState, InputMode, Phase, Submission};
use crate::ui::{self, theme::Theme};

/// Result of an async export task, resolved into a status message.
type ExportOutcome = Result<std::path::PathBuf, String>;

/// Main application struct.
///
/// Owns all runtime resources: terminal state, service client, channels.
pub struct App {
    state: AppState,
    config: Config,
    client: Arc<VisualizeClient>,

    api_tx: mpsc::UnboundedSender<ApiEvent>,
    api_rx: mpsc::UnboundedReceiver<ApiEvent>,
    export_tx: mpsc::UnboundedSender<ExportOutcome>,
    export_rx: mpsc::UnboundedReceiver<ExportOutcome>,

    /// Submission handed over on the command line, dispatched on startup.
    pending: Option<Submission>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(VisualizeClient::new(
            &config.api_base_url,
            config.request_timeout_secs,
        )?);
        let theme = Theme::by_name(&config.theme).unwrap_or_default();
        let state = AppState::new(theme, config.style.clone());

        let (api_tx, api_rx) = mpsc::unbounded_channel();
        let (export_tx, export_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state,
            config,
            client,
            api_tx,
            api_rx,
            export_tx,
            export_rx,
            pending: None,
        })
    }

    /// Queue a submission to run as soon as the loop starts.
    pub fn queue(&mut self, submission: Submission) {
        self.pending = Some(submission);
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        if let Some(submission) = self.pending.take() {
            self.dispatch(submission);
        }

        loop {
            terminal.draw(|frame| ui::render(frame, &mut self.state))?;

            self.drain_api_events();
            self.drain_export_events();

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                let terminal_event = event::read()?;

                if let Event::Mouse(mouse) = terminal_event {
                    self.handle_mouse(mouse);
                    continue;
                }

                if let Event::Key(key) = terminal_event {
                    if key.kind == event::KeyEventKind::Press && self.handle_key(key) {
                        break; // quit requested
                    }
                }
            }

            self.state.tick_count = self.state.tick_count.wrapping_add(1);
        }

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    // ── Channel draining ─────────────────────────────────────────

    fn drain_api_events(&mut self) {
        while let Ok(event) = self.api_rx.try_recv() {
            match event {
                ApiEvent::Completed(charts) => self.state.complete(charts),
                ApiEvent::Failed(message) => self.state.fail(message),
            }
        }
    }

    fn drain_export_events(&mut self) {
        while let Ok(outcome) = self.export_rx.try_recv() {
            match outcome {
                Ok(path) => self
                    .state
                    .set_status(format!("Exported {}", path.display())),
                Err(e) => self.state.set_status(format!("Export failed: {e}")),
            }
        }
    }

    // ── Request dispatch ─────────────────────────────────────────

    /// Hand a resolved submission to a background task. The phase gate
    /// in `can_submit` means at most one request is ever in flight.
    fn dispatch(&mut self, submission: Submission) {
        if !self.state.can_submit() {
            return;
        }
        self.state.begin_processing();
        self.state.mode = InputMode::Normal;

        let client = self.client.clone();
        let tx = self.api_tx.clone();
        let pipeline = self.config.pipeline;
        tokio::spawn(async move {
            let result = match submission {
                Submission::Prompt(prompt) => client.visualize_text_prompt(&prompt).await,
                Submission::File { path, sheet } => {
                    let sheet = sheet.as_deref();
                    match pipeline {
                        Pipeline::Terminal => client.visualize_d3_excel(&path, sheet).await,
                        Pipeline::Image => client.visualize_excel(&path, sheet).await,
                        Pipeline::Plotly => client.visualize_plotly_excel(&path, sheet).await,
                    }
                }
            };
            let event = match result {
                Ok(charts) => ApiEvent::Completed(charts),
                Err(e) => ApiEvent::Failed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    // ── Export ───────────────────────────────────────────────────

    /// Export the selected chart as PNG. Scene charts rasterize locally;
    /// interactive plot specs round-trip through the server renderer.
    fn export_selected(&mut self) {
        if self.state.phase != Phase::Results {
            return;
        }
        let Some(desc) = self.state.selected_chart().cloned() else {
            return;
        };
        let Some(view) = self.state.selected_view().cloned() else {
            return;
        };

        if let Some(err) = desc.error.as_deref() {
            self.state.set_status(format!("Nothing to export: {err}"));
            return;
        }

        let dir = self.config.export_dir.clone();
        let outcome = match desc.payload() {
            Ok(ChartPayload::Series { kind, series }) => build_scene(
                &kind,
                &series,
                &view.style,
                &view.title,
                (SCENE_WIDTH, SCENE_HEIGHT),
            )
            .map_err(|e| e.to_string())
            .and_then(|scene| {
                export::render_scene_png(&scene, &view.style).map_err(|e| e.to_string())
            })
            .and_then(|png| {
                export::write_png(&dir, &view.title, &png).map_err(|e| e.to_string())
            }),
            Ok(ChartPayload::Image { png }) => {
                export::write_png(&dir, &view.title, &png).map_err(|e| e.to_string())
            }
            Ok(ChartPayload::Plotly { spec }) => {
                let client = self.client.clone();
                let tx = self.export_tx.clone();
                let title = view.title.clone();
                self.state.set_status("Rendering on the server...".to_string());
                tokio::spawn(async move {
                    let outcome = match client.download_png(&spec).await {
                        Ok(png) => {
                            export::write_png(&dir, &title, &png).map_err(|e| e.to_string())
                        }
                        Err(e) => Err(e.to_string()),
                    };
                    let _ = tx.send(outcome);
                });
                return;
            }
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(path) => self
                .state
                .set_status(format!("Exported {}", path.display())),
            Err(e) => self.state.set_status(format!("Export failed: {e}")),
        }
    }

    /// Fetch the server-side vector file for the selected chart, when the
    /// service produced one, and write it next to the PNG exports.
    fn export_vector(&mut self) {
        if self.state.phase != Phase::Results {
            return;
        }
        let Some(desc) = self.state.selected_chart() else {
            return;
        };
        let Some(view) = self.state.selected_view() else {
            return;
        };
        let Some(svg_path) = desc.chart_svg_path.clone() else {
            self.state
                .set_status("No server-side vector file for this chart".to_string());
            return;
        };

        let client = self.client.clone();
        let tx = self.export_tx.clone();
        let dir = self.config.export_dir.clone();
        let title = view.title.clone();
        self.state.set_status("Fetching vector file...".to_string());
        tokio::spawn(async move {
            let outcome = match client.download(&svg_path).await {
                Ok(bytes) => {
                    export::write_svg(&dir, &title, &bytes).map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(outcome);
        });
    }

    // ── Mouse handling ───────────────────────────────────────────

    /// Pointer movement drives the tooltip: rebuild the scene (it is a
    /// pure function of the chart), map the cell back into scene space,
    /// and hit-test the nodes.
    fn handle_mouse(&mut self, mouse: crossterm::event::MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Down(_)
        ) {
            return;
        }
        let Some(area) = self.state.chart_area else {
            return;
        };
        let Some(desc) = self.state.selected_chart() else {
            return;
        };
        let Some(view) = self.state.selected_view() else {
            return;
        };
        let Ok(ChartPayload::Series { kind, series }) = desc.payload() else {
            return;
        };
        let Ok(scene) = build_scene(
            &kind,
            &series,
            &view.style,
            &view.title,
            (SCENE_WIDTH, SCENE_HEIGHT),
        ) else {
            return;
        };

        let hit = ui::renderer::cell_to_scene(area, mouse.column, mouse.row, &scene)
            .and_then(|(x, y)| scene.hit_test(x, y).cloned());
        match hit {
            Some(hover) => self.state.set_tooltip(mouse.column, mouse.row, hover),
            None => self.state.clear_tooltip(),
        }
    }

    // ── Keyboard handling ────────────────────────────────────────

    /// Handle a key event. Returns `true` if the app should quit.
    fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.state.show_help {
            return self.handle_key_help(key);
        }

        match self.state.mode {
            InputMode::Prompt | InputMode::FilePath | InputMode::SheetName => {
                self.handle_key_input(key)
            }
            InputMode::TitleEdit => self.handle_key_title_edit(key),
            InputMode::StylePanel => self.handle_key_style_panel(key),
            InputMode::Normal => self.handle_key_normal(key),
        }
    }

    fn handle_key_help(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.state.show_help = false;
            }
            _ => {}
        }
        false
    }

    /// The three idle-screen inputs share one handler; Tab moves the
    /// focus between them.
    fn handle_key_input(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = InputMode::Normal;
            }
            KeyCode::Tab => {
                self.state.mode = match self.state.mode {
                    InputMode::Prompt => InputMode::FilePath,
                    InputMode::FilePath => InputMode::SheetName,
                    _ => InputMode::Prompt,
                };
            }
            KeyCode::Enter => {
                let submission = match self.state.mode {
                    InputMode::Prompt => self.state.submit_prompt(),
                    _ => self.state.submit_file(),
                };
                if let Some(submission) = submission {
                    self.dispatch(submission);
                }
            }
            KeyCode::Backspace => self.focused_input(|i| i.backspace()),
            KeyCode::Left => self.focused_input(|i| i.cursor_left()),
            KeyCode::Right => self.focused_input(|i| i.cursor_right()),
            KeyCode::Char(c) => self.focused_input(|i| i.insert(c)),
            _ => {}
        }
        false
    }

    fn focused_input(&mut self, f: impl FnOnce(&mut crate::ui::state::TextInput)) {
        let input = match self.state.mode {
            InputMode::Prompt => &mut self.state.prompt_input,
            InputMode::FilePath => &mut self.state.file_input,
            InputMode::SheetName => &mut self.state.sheet_input,
            _ => return,
        };
        f(input);
    }

    /// Both Enter and Esc commit; the editor has no cancel path.
    fn handle_key_title_edit(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.commit_title_edit(),
            KeyCode::Backspace => {
                if let Some(view) = self.state.selected_view_mut() {
                    view.title_input.backspace();
                }
            }
            KeyCode::Left => {
                if let Some(view) = self.state.selected_view_mut() {
                    view.title_input.cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(view) = self.state.selected_view_mut() {
                    view.title_input.cursor_right();
                }
            }
            KeyCode::Char(c) => {
                if let Some(view) = self.state.selected_view_mut() {
                    view.title_input.insert(c);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_key_style_panel(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                self.state.mode = InputMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.style_field_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.style_field_next(),
            KeyCode::Left | KeyCode::Char('h') => self.state.style_adjust(-1),
            KeyCode::Right | KeyCode::Char('l') => self.state.style_adjust(1),
            _ => {}
        }
        false
    }

    /// Handle keys in normal mode. Returns `true` if the app should quit.
    fn handle_key_normal(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,

            KeyCode::Char('?') => {
                self.state.show_help = true;
            }
            KeyCode::Char('T') => {
                self.state.cycle_theme();
                let name = self.state.theme.name.clone();
                self.state.set_status(format!("Theme: {name}"));
            }

            // Idle: focus an input
            KeyCode::Char('p') if self.state.phase == Phase::Idle => {
                self.state.mode = InputMode::Prompt;
            }
            KeyCode::Char('f') if self.state.phase == Phase::Idle => {
                self.state.mode = InputMode::FilePath;
            }
            KeyCode::Tab if self.state.phase == Phase::Idle => {
                self.state.mode = InputMode::Prompt;
            }

            // Results: browse and edit
            KeyCode::Left | KeyCode::Char('h') if self.state.phase == Phase::Results => {
                self.state.prev_chart();
            }
            KeyCode::Right | KeyCode::Char('l') if self.state.phase == Phase::Results => {
                self.state.next_chart();
            }
            KeyCode::Char('t') if self.state.phase == Phase::Results => {
                self.state.begin_title_edit();
            }
            KeyCode::Char('s') if self.state.phase == Phase::Results => {
                self.state.mode = InputMode::StylePanel;
            }
            KeyCode::Char('e') if self.state.phase == Phase::Results => {
                self.export_selected();
            }
            KeyCode::Char('E') if self.state.phase == Phase::Results => {
                self.export_vector();
            }

            // New analysis from the results or error screen
            KeyCode::Char('n')
                if matches!(self.state.phase, Phase::Results | Phase::Error(_)) =>
            {
                self.state.reset();
            }

            _ => {}
        }
        false
    }
}
