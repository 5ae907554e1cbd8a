use std::time::Instant;

use crate::chart::Hover;
use crate::constants::*;
use crate::models::{ChartDescription, StyleConfig, AXIS_COLOR_PRESETS};

use super::theme::Theme;

/// Request lifecycle. Exactly one request may be in flight; submission
/// is only possible from `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Waiting for input; nothing submitted yet.
    Idle,
    /// A request is in flight. No retry, no cancel.
    Processing,
    /// The service returned at least one renderable chart.
    Results,
    /// The whole request failed; the message replaces the results view.
    Error(String),
}

/// Which input currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Prompt,
    FilePath,
    SheetName,
    TitleEdit,
    StylePanel,
}

/// Adjustable fields in the style panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleField {
    FontSize,
    TitleSize,
    FontFamily,
    AxisColor,
    BarOpacity,
    GridLines,
}

impl StyleField {
    pub fn all() -> &'static [StyleField] {
        &[
            StyleField::FontSize,
            StyleField::TitleSize,
            StyleField::FontFamily,
            StyleField::AxisColor,
            StyleField::BarOpacity,
            StyleField::GridLines,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StyleField::FontSize => "Font size",
            StyleField::TitleSize => "Title size",
            StyleField::FontFamily => "Font family",
            StyleField::AxisColor => "Axis color",
            StyleField::BarOpacity => "Bar opacity",
            StyleField::GridLines => "Grid lines",
        }
    }
}

/// A text field with a cursor, for the prompt/path/title inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }
}

/// Per-chart view state: the editable title, a private style copy, and
/// the tooltip, which belongs to this chart alone.
#[derive(Debug, Clone)]
pub struct ChartViewState {
    pub title: String,
    pub title_input: TextInput,
    pub style: StyleConfig,
    /// Tooltip anchored at a terminal cell, following the pointer.
    pub tooltip: Option<(u16, u16, Hover)>,
}

impl ChartViewState {
    fn new(desc: &ChartDescription, style: &StyleConfig) -> Self {
        Self {
            title: desc.display_title(),
            title_input: TextInput::default(),
            style: style.clone(),
            tooltip: None,
        }
    }
}

/// What a submission resolved to, handed to the request task.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Prompt(String),
    File {
        path: std::path::PathBuf,
        sheet: Option<String>,
    },
}

/// Central application state - the single source of truth.
pub struct AppState {
    pub phase: Phase,
    pub mode: InputMode,
    pub show_help: bool,
    pub theme: Theme,
    /// Config-level style; each result chart gets its own copy.
    pub default_style: StyleConfig,

    pub charts: Vec<ChartDescription>,
    pub views: Vec<ChartViewState>,
    pub selected: usize,

    pub prompt_input: TextInput,
    pub file_input: TextInput,
    pub sheet_input: TextInput,

    pub status_message: Option<(String, Instant)>,
    pub tick_count: u64,
    pub processing_started: Option<Instant>,
    pub style_field: usize,

    /// Chart canvas area from the last frame, for mouse mapping.
    pub chart_area: Option<ratatui::layout::Rect>,
}

impl AppState {
    pub fn new(theme: Theme, default_style: StyleConfig) -> Self {
        Self {
            phase: Phase::Idle,
            mode: InputMode::Normal,
            show_help: false,
            theme,
            default_style,
            charts: Vec::new(),
            views: Vec::new(),
            selected: 0,
            prompt_input: TextInput::default(),
            file_input: TextInput::default(),
            sheet_input: TextInput::default(),
            status_message: None,
            tick_count: 0,
            processing_started: None,
            style_field: 0,
            chart_area: None,
        }
    }

    /// Set a status bar message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Cycle to the next built-in theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next_builtin();
    }

    // ── Phase transitions ──────────────────────────────────────

    /// Submission is gated on `Idle`; `Processing` rejects a second
    /// request, `Results`/`Error` require an explicit reset first.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn begin_processing(&mut self) {
        self.phase = Phase::Processing;
        self.processing_started = Some(Instant::now());
    }

    /// Enter the results phase. Every chart gets a fresh view with the
    /// config style and a title derived from its source metadata.
    pub fn complete(&mut self, charts: Vec<ChartDescription>) {
        self.views = charts
            .iter()
            .map(|c| ChartViewState::new(c, &self.default_style))
            .collect();
        self.charts = charts;
        self.selected = 0;
        self.processing_started = None;
        self.phase = Phase::Results;
    }

    pub fn fail(&mut self, message: String) {
        self.charts.clear();
        self.views.clear();
        self.processing_started = None;
        self.phase = Phase::Error(message);
    }

    /// Back to a clean idle screen for a new analysis.
    pub fn reset(&mut self) {
        self.charts.clear();
        self.views.clear();
        self.selected = 0;
        self.mode = InputMode::Normal;
        self.processing_started = None;
        self.phase = Phase::Idle;
    }

    /// Progress message for the processing screen, staged by elapsed
    /// time so long waits still show movement.
    pub fn loading_stage(&self) -> &'static str {
        let secs = self
            .processing_started
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);
        if secs < 2 {
            "Uploading data"
        } else if secs < 8 {
            "Analyzing with AI"
        } else {
            "Generating charts"
        }
    }

    // ── Submission ─────────────────────────────────────────────

    /// Resolve the prompt input into a submission. Empty prompts are
    /// rejected before any network call.
    pub fn submit_prompt(&mut self) -> Option<Submission> {
        let text = self.prompt_input.text.trim().to_string();
        if text.is_empty() {
            self.set_status(crate::error::ValidationError::EmptyPrompt.to_string());
            return None;
        }
        Some(Submission::Prompt(text))
    }

    /// Resolve the file path input, checking the extension allow-list
    /// client-side so unsupported files never reach the wire.
    pub fn submit_file(&mut self) -> Option<Submission> {
        let raw = self.file_input.text.trim().to_string();
        if raw.is_empty() {
            self.set_status("File path is empty".to_string());
            return None;
        }
        let path = std::path::PathBuf::from(&raw);
        if let Err(e) = crate::utils::check_upload_extension(&path) {
            self.set_status(e.to_string());
            return None;
        }
        if !path.is_file() {
            self.set_status(crate::error::ValidationError::UnreadableFile(raw).to_string());
            return None;
        }
        let sheet = {
            let s = self.sheet_input.text.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        Some(Submission::File { path, sheet })
    }

    // ── Chart selection ────────────────────────────────────────

    pub fn selected_chart(&self) -> Option<&ChartDescription> {
        self.charts.get(self.selected)
    }

    pub fn selected_view(&self) -> Option<&ChartViewState> {
        self.views.get(self.selected)
    }

    pub fn selected_view_mut(&mut self) -> Option<&mut ChartViewState> {
        self.views.get_mut(self.selected)
    }

    /// Switching charts drops the old chart's tooltip; the pointer is
    /// no longer over it.
    pub fn next_chart(&mut self) {
        if !self.charts.is_empty() {
            self.clear_tooltip();
            self.selected = (self.selected + 1) % self.charts.len();
        }
    }

    pub fn prev_chart(&mut self) {
        if !self.charts.is_empty() {
            self.clear_tooltip();
            self.selected = (self.selected + self.charts.len() - 1) % self.charts.len();
        }
    }

    // ── Tooltip ────────────────────────────────────────────────

    pub fn set_tooltip(&mut self, col: u16, row: u16, hover: Hover) {
        if let Some(view) = self.selected_view_mut() {
            view.tooltip = Some((col, row, hover));
        }
    }

    pub fn clear_tooltip(&mut self) {
        if let Some(view) = self.selected_view_mut() {
            view.tooltip = None;
        }
    }

    // ── Title editing ──────────────────────────────────────────

    /// Start editing the selected chart's title. The input starts from
    /// the current title.
    pub fn begin_title_edit(&mut self) {
        if self.phase != Phase::Results {
            return;
        }
        if let Some(view) = self.selected_view_mut() {
            let current = view.title.clone();
            view.title_input.set(&current);
            self.mode = InputMode::TitleEdit;
        }
    }

    /// Commit the edited title. There is no cancel path: leaving the
    /// editor always applies, like an input field committing on blur.
    pub fn commit_title_edit(&mut self) {
        if let Some(view) = self.selected_view_mut() {
            view.title = view.title_input.text.clone();
            view.title_input.clear();
        }
        self.mode = InputMode::Normal;
    }

    // ── Style panel ────────────────────────────────────────────

    pub fn style_field(&self) -> StyleField {
        StyleField::all()[self.style_field % StyleField::all().len()]
    }

    pub fn style_field_next(&mut self) {
        self.style_field = (self.style_field + 1) % StyleField::all().len();
    }

    pub fn style_field_prev(&mut self) {
        let n = StyleField::all().len();
        self.style_field = (self.style_field + n - 1) % n;
    }

    /// Adjust the selected style field on the selected chart only.
    /// `direction` is +1 or -1; bounds match the original sliders.
    pub fn style_adjust(&mut self, direction: i32) {
        let field = self.style_field();
        if let Some(view) = self.selected_view_mut() {
            match field {
                StyleField::FontSize => {
                    let v = view.style.font_size as i32 + direction;
                    view.style.font_size =
                        v.clamp(FONT_SIZE_MIN as i32, FONT_SIZE_MAX as i32) as u16;
                }
                StyleField::TitleSize => {
                    let v = view.style.title_size as i32 + direction;
                    view.style.title_size =
                        v.clamp(TITLE_SIZE_MIN as i32, TITLE_SIZE_MAX as i32) as u16;
                }
                StyleField::FontFamily => {
                    let i = FONT_FAMILY_PRESETS
                        .iter()
                        .position(|f| *f == view.style.font_family)
                        .unwrap_or(0);
                    let n = FONT_FAMILY_PRESETS.len() as i32;
                    let next = (i as i32 + direction).rem_euclid(n) as usize;
                    view.style.font_family = FONT_FAMILY_PRESETS[next].to_string();
                }
                StyleField::AxisColor => {
                    let i = AXIS_COLOR_PRESETS
                        .iter()
                        .position(|c| *c == view.style.axis_color)
                        .unwrap_or(0);
                    let n = AXIS_COLOR_PRESETS.len() as i32;
                    let next = (i as i32 + direction).rem_euclid(n) as usize;
                    view.style.axis_color = AXIS_COLOR_PRESETS[next];
                }
                StyleField::BarOpacity => {
                    let v = view.style.bar_opacity + direction as f64 * BAR_OPACITY_STEP;
                    view.style.bar_opacity = v.clamp(BAR_OPACITY_MIN, BAR_OPACITY_MAX);
                }
                StyleField::GridLines => {
                    view.style.grid_lines = !view.style.grid_lines;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> AppState {
        AppState::new(Theme::default_dark(), StyleConfig::default())
    }

    fn make_chart(sheet: &str) -> ChartDescription {
        ChartDescription {
            sheet_name: sheet.to_string(),
            original_file_name: "sales.xlsx".to_string(),
            d3_data: Some(r#"{"data":[{"x":["a"],"y":[1]}]}"#.to_string()),
            ..Default::default()
        }
    }

    // ── TextInput ─────────────────────────────────────────────────

    #[test]
    fn text_input_insert_and_backspace() {
        let mut input = TextInput::default();
        input.insert('h');
        input.insert('i');
        assert_eq!(input.text, "hi");
        assert_eq!(input.cursor, 2);
        input.backspace();
        assert_eq!(input.text, "h");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn text_input_backspace_at_start_is_noop() {
        let mut input = TextInput::default();
        input.backspace();
        assert_eq!(input.text, "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn text_input_cursor_movement() {
        let mut input = TextInput::default();
        input.set("abc");
        assert_eq!(input.cursor, 3);
        input.cursor_left();
        input.cursor_left();
        assert_eq!(input.cursor, 1);
        input.cursor_left();
        input.cursor_left(); // stays at 0
        assert_eq!(input.cursor, 0);
        input.cursor_right();
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn text_input_multibyte_safe() {
        let mut input = TextInput::default();
        input.insert('é');
        input.insert('x');
        input.cursor_left();
        input.cursor_left();
        assert_eq!(input.cursor, 0);
        input.cursor_right();
        assert_eq!(input.cursor, 'é'.len_utf8());
        input.backspace();
        assert_eq!(input.text, "x");
    }

    // ── Phase machine ─────────────────────────────────────────────

    #[test]
    fn submit_only_from_idle() {
        let mut s = make_state();
        assert!(s.can_submit());
        s.begin_processing();
        assert!(!s.can_submit());
        s.complete(vec![make_chart("Sheet1")]);
        assert!(!s.can_submit());
        s.reset();
        assert!(s.can_submit());
    }

    #[test]
    fn complete_builds_one_view_per_chart() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1"), make_chart("Q2")]);
        assert_eq!(s.phase, Phase::Results);
        assert_eq!(s.views.len(), 2);
        assert_eq!(s.selected, 0);
        assert_eq!(s.views[0].title, "sales.xlsx - Q1");
        // Views carry an independent style copy.
        assert_eq!(s.views[0].style, s.default_style);
    }

    #[test]
    fn fail_replaces_results() {
        let mut s = make_state();
        s.begin_processing();
        s.fail("no numeric columns".to_string());
        assert_eq!(s.phase, Phase::Error("no numeric columns".to_string()));
        assert!(s.charts.is_empty());
        assert!(!s.can_submit());
    }

    #[test]
    fn reset_clears_results_and_returns_to_idle() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);
        s.reset();
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.charts.is_empty());
        assert!(s.views.is_empty());
        assert_eq!(s.mode, InputMode::Normal);
    }

    // ── Submission validation ─────────────────────────────────────

    #[test]
    fn empty_prompt_is_rejected_with_status() {
        let mut s = make_state();
        s.prompt_input.set("   ");
        assert_eq!(s.submit_prompt(), None);
        assert!(s.status_message.is_some());
    }

    #[test]
    fn prompt_is_trimmed() {
        let mut s = make_state();
        s.prompt_input.set("  plot revenue by year  ");
        assert_eq!(
            s.submit_prompt(),
            Some(Submission::Prompt("plot revenue by year".to_string()))
        );
    }

    #[test]
    fn unsupported_file_extension_is_rejected() {
        let mut s = make_state();
        s.file_input.set("/tmp/report.pdf");
        assert_eq!(s.submit_file(), None);
        let (msg, _) = s.status_message.as_ref().unwrap();
        assert!(msg.contains("pdf"));
    }

    #[test]
    fn file_submission_carries_optional_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut s = make_state();
        s.file_input.set(path.to_str().unwrap());
        assert_eq!(
            s.submit_file(),
            Some(Submission::File {
                path: path.clone(),
                sheet: None
            })
        );
        s.sheet_input.set("Sheet2");
        assert_eq!(
            s.submit_file(),
            Some(Submission::File {
                path,
                sheet: Some("Sheet2".to_string())
            })
        );
    }

    #[test]
    fn missing_file_is_rejected() {
        let mut s = make_state();
        s.file_input.set("/nonexistent/data.csv");
        assert_eq!(s.submit_file(), None);
    }

    // ── Title editing ─────────────────────────────────────────────

    #[test]
    fn title_edit_round_trip() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);
        s.begin_title_edit();
        assert_eq!(s.mode, InputMode::TitleEdit);
        // Editor starts from the current title.
        assert_eq!(s.views[0].title_input.text, "sales.xlsx - Q1");

        s.selected_view_mut().unwrap().title_input.set("Revenue");
        s.commit_title_edit();
        assert_eq!(s.views[0].title, "Revenue");
        assert_eq!(s.mode, InputMode::Normal);
    }

    #[test]
    fn title_edit_commits_even_when_cleared() {
        // No cancel path: an emptied title commits as empty.
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);
        s.begin_title_edit();
        s.selected_view_mut().unwrap().title_input.clear();
        s.commit_title_edit();
        assert_eq!(s.views[0].title, "");
    }

    #[test]
    fn title_edit_requires_results_phase() {
        let mut s = make_state();
        s.begin_title_edit();
        assert_eq!(s.mode, InputMode::Normal);
    }

    // ── Style panel ───────────────────────────────────────────────

    #[test]
    fn style_adjust_clamps_to_bounds() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);

        s.style_field = 0; // FontSize
        for _ in 0..50 {
            s.style_adjust(1);
        }
        assert_eq!(s.views[0].style.font_size, FONT_SIZE_MAX);
        for _ in 0..50 {
            s.style_adjust(-1);
        }
        assert_eq!(s.views[0].style.font_size, FONT_SIZE_MIN);
    }

    #[test]
    fn style_adjust_only_touches_selected_chart() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1"), make_chart("Q2")]);
        s.style_field = 5; // GridLines
        s.style_adjust(1);
        assert!(s.views[0].style.grid_lines);
        assert!(!s.views[1].style.grid_lines);
    }

    #[test]
    fn font_family_cycles_presets_and_wraps() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);
        s.style_field = 2; // FontFamily
        assert_eq!(s.views[0].style.font_family, "sans-serif");
        s.style_adjust(1);
        assert_eq!(s.views[0].style.font_family, "serif");
        s.style_adjust(-1);
        s.style_adjust(-1);
        // Wraps backwards to the last preset.
        assert_eq!(s.views[0].style.font_family, "monospace");
    }

    #[test]
    fn axis_color_cycles_presets() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1")]);
        s.style_field = 3; // AxisColor
        assert_eq!(s.views[0].style.axis_color, AXIS_COLOR_PRESETS[0]);
        s.style_adjust(1);
        assert_eq!(s.views[0].style.axis_color, AXIS_COLOR_PRESETS[1]);
        s.style_adjust(-1);
        assert_eq!(s.views[0].style.axis_color, AXIS_COLOR_PRESETS[0]);
    }

    #[test]
    fn style_field_cycles() {
        let mut s = make_state();
        assert_eq!(s.style_field(), StyleField::FontSize);
        s.style_field_next();
        assert_eq!(s.style_field(), StyleField::TitleSize);
        s.style_field_prev();
        s.style_field_prev();
        assert_eq!(s.style_field(), StyleField::GridLines);
    }

    // ── Tooltip ownership ─────────────────────────────────────────

    #[test]
    fn tooltip_is_dropped_when_switching_charts() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1"), make_chart("Q2")]);
        s.set_tooltip(
            10,
            5,
            Hover {
                category: "a".into(),
                value: 1.0,
                series: "s".into(),
                color: crate::models::Rgb::WHITE,
            },
        );
        assert!(s.views[0].tooltip.is_some());
        s.next_chart();
        assert!(s.views[0].tooltip.is_none());
        assert!(s.views[1].tooltip.is_none());
    }

    #[test]
    fn chart_selection_wraps() {
        let mut s = make_state();
        s.begin_processing();
        s.complete(vec![make_chart("Q1"), make_chart("Q2")]);
        s.next_chart();
        assert_eq!(s.selected, 1);
        s.next_chart();
        assert_eq!(s.selected, 0);
        s.prev_chart();
        assert_eq!(s.selected, 1);
    }
}
