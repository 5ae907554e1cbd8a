//! User-adjustable chart style parameters, applied at render time.

use serde::Deserialize;

/// A 24-bit color usable by both the terminal and SVG backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Rgb(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_ratatui(self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.0, self.1, self.2)
    }
}

/// Axis/label colors the style panel cycles through. Light shades only;
/// the chart backdrop is dark.
pub const AXIS_COLOR_PRESETS: [Rgb; 5] = [
    Rgb::WHITE,
    Rgb(0xc0, 0xc0, 0xc0),
    Rgb(0xb0, 0xc4, 0xde),
    Rgb(0xf0, 0xe6, 0x8c),
    Rgb(0x90, 0xee, 0x90),
];

/// The d3 category10 palette, the implementation default.
pub const DEFAULT_PALETTE: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
];

/// Visual theme parameters for one chart.
///
/// Process-wide defaults come from the config file; each chart instance may
/// carry an override. Pure value type.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub font_family: String,
    pub font_size: u16,
    pub title_size: u16,
    pub axis_color: Rgb,
    pub grid_lines: bool,
    /// Bar fill opacity in [0, 1].
    pub bar_opacity: f64,
    pub palette: Vec<Rgb>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12,
            title_size: 16,
            axis_color: Rgb::WHITE,
            grid_lines: false,
            bar_opacity: 0.9,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

/// Style section of the config file; all fields optional, merged over
/// defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct FileStyleConfig {
    pub font_family: Option<String>,
    pub font_size: Option<u16>,
    pub title_size: Option<u16>,
    pub axis_color: Option<String>,
    pub grid_lines: Option<bool>,
    pub bar_opacity: Option<f64>,
    pub palette: Option<Vec<String>>,
}

impl StyleConfig {
    pub(crate) fn merge_file(&mut self, f: FileStyleConfig) {
        if let Some(v) = f.font_family {
            if !v.is_empty() {
                self.font_family = v;
            }
        }
        if let Some(v) = f.font_size {
            self.font_size = v.clamp(crate::constants::FONT_SIZE_MIN, crate::constants::FONT_SIZE_MAX);
        }
        if let Some(v) = f.title_size {
            self.title_size = v.clamp(crate::constants::TITLE_SIZE_MIN, crate::constants::TITLE_SIZE_MAX);
        }
        if let Some(v) = f.axis_color.as_deref().and_then(Rgb::from_hex) {
            self.axis_color = v;
        }
        if let Some(v) = f.grid_lines {
            self.grid_lines = v;
        }
        if let Some(v) = f.bar_opacity {
            self.bar_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(colors) = f.palette {
            let parsed: Vec<Rgb> = colors.iter().filter_map(|c| Rgb::from_hex(c)).collect();
            if !parsed.is_empty() {
                self.palette = parsed;
            }
        }
    }
}

/// Resolve the color for one series.
///
/// Priority: explicit per-series color, then the style palette indexed by
/// series position (wrapping), then the default categorical palette.
pub fn resolve_series_color(
    explicit: Option<&str>,
    series_index: usize,
    style: &StyleConfig,
) -> Rgb {
    if let Some(c) = explicit.and_then(Rgb::from_hex) {
        return c;
    }
    if !style.palette.is_empty() {
        return style.palette[series_index % style.palette.len()];
    }
    DEFAULT_PALETTE[series_index % DEFAULT_PALETTE.len()]
}
