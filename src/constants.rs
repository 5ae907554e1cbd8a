//! Application-wide constants.
//!
//! Centralizes defaults, layout numbers, and chart policy values so they
//! are not scattered across the codebase.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const EVENT_POLL_MS: u64 = 50;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;
/// Default HTTP request timeout (seconds). Analysis can be slow on big sheets.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Minimum allowed request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;

// ── API ───────────────────────────────────────────────────────────
/// Default visualization service base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

// ── Uploads ───────────────────────────────────────────────────────
/// Accepted spreadsheet file extensions (lowercase, without dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx", "csv"];
/// MIME types matching the extension allow-list, in the same spirit.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
];

// ── Chart policy ──────────────────────────────────────────────────
/// Y-axis headroom above the data maximum (10%, fixed policy).
pub const Y_AXIS_HEADROOM: f64 = 1.1;
/// Band scale padding fraction for bar charts.
pub const BAND_PADDING: f64 = 0.2;
/// Pie label placement as a fraction of the radius (between center and rim).
pub const PIE_LABEL_RADIUS_FRACTION: f64 = 0.7;
/// Pie wedge outer radius as a fraction of the available half-extent.
pub const PIE_OUTER_RADIUS_FRACTION: f64 = 0.8;
/// Scatter marker radius (scene units); larger than line point markers.
pub const SCATTER_MARKER_RADIUS: f64 = 8.0;
/// Line point marker radius (scene units).
pub const LINE_MARKER_RADIUS: f64 = 5.0;
/// Fixed scatter marker opacity.
pub const SCATTER_OPACITY: f64 = 0.8;
/// Legend swatch size (scene units).
pub const LEGEND_SWATCH: f64 = 15.0;
/// Horizontal spacing between legend entries (scene units).
pub const LEGEND_ENTRY_WIDTH: f64 = 100.0;

// ── Scene geometry ────────────────────────────────────────────────
/// Logical scene width used for SVG export.
pub const SCENE_WIDTH: f64 = 800.0;
/// Logical scene height used for SVG export.
pub const SCENE_HEIGHT: f64 = 500.0;
/// Scene margins: top, right, bottom, left (bottom leaves room for the legend).
pub const SCENE_MARGIN: (f64, f64, f64, f64) = (40.0, 30.0, 60.0, 60.0);

// ── Export ────────────────────────────────────────────────────────
/// Rasterization scale for client-side PNG export (2x pixel density).
pub const EXPORT_SCALE: f32 = 2.0;
/// Opaque export background matching the dark chart theme.
pub const EXPORT_BACKGROUND: &str = "#1e1e2f";
/// Fallback export stem when the chart title is empty after sanitization.
pub const EXPORT_FALLBACK_STEM: &str = "chart";

// ── UI Layout ─────────────────────────────────────────────────────
/// Help overlay width.
pub const HELP_POPUP_WIDTH: u16 = 55;
/// Help overlay height.
pub const HELP_POPUP_HEIGHT: u16 = 30;
/// Style panel popup width.
pub const STYLE_POPUP_WIDTH: u16 = 44;
/// Style panel popup height.
pub const STYLE_POPUP_HEIGHT: u16 = 16;
/// Maximum characters of a tooltip line before truncation.
pub const TOOLTIP_MAX_LEN: usize = 32;

// ── Style bounds ──────────────────────────────────────────────────
/// Font size range for the style panel slider.
pub const FONT_SIZE_MIN: u16 = 8;
pub const FONT_SIZE_MAX: u16 = 16;
/// Title size range for the style panel slider.
pub const TITLE_SIZE_MIN: u16 = 14;
pub const TITLE_SIZE_MAX: u16 = 24;
/// Bar opacity adjustment bounds and step.
pub const BAR_OPACITY_MIN: f64 = 0.3;
pub const BAR_OPACITY_MAX: f64 = 1.0;
pub const BAR_OPACITY_STEP: f64 = 0.1;
/// Font families the style panel cycles through. The terminal renders
/// its own glyphs; the family flows into the SVG/PNG export.
pub const FONT_FAMILY_PRESETS: &[&str] = &["sans-serif", "serif", "monospace"];

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for the processing screen.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/vizterm/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("vizterm")
}

/// Returns `~/.config/vizterm/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
