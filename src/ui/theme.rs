use ratatui::style::{Color, Modifier, Style};

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord", "dracula"];

/// Data-driven theme: every chrome color in one struct. Chart colors
/// come from the style palette, not from here.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub accent: Color,
    pub accent_secondary: Color,
    pub bg_dark: Color,
    pub bg_panel: Color,

    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    pub list_row_selected_bg: Color,
    pub border: Color,
}

impl Theme {
    /// Default dark theme, matching the exported chart backdrop.
    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            accent_secondary: Color::Rgb(129, 230, 217),
            bg_dark: Color::Rgb(30, 30, 47),
            bg_panel: Color::Rgb(38, 38, 58),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(99, 179, 237),
            list_row_selected_bg: Color::Rgb(48, 48, 72),
            border: Color::Rgb(55, 55, 75),
        }
    }

    /// Gruvbox dark palette.
    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),
            accent_secondary: Color::Rgb(142, 192, 124),
            bg_dark: Color::Rgb(40, 40, 40),
            bg_panel: Color::Rgb(50, 48, 47),
            text_primary: Color::Rgb(235, 219, 178),
            text_dim: Color::Rgb(168, 153, 132),
            text_muted: Color::Rgb(102, 92, 84),
            success: Color::Rgb(142, 192, 124),
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            info: Color::Rgb(131, 165, 152),
            list_row_selected_bg: Color::Rgb(60, 56, 54),
            border: Color::Rgb(80, 73, 69),
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),
            accent_secondary: Color::Rgb(143, 188, 187),
            bg_dark: Color::Rgb(46, 52, 64),
            bg_panel: Color::Rgb(59, 66, 82),
            text_primary: Color::Rgb(229, 233, 240),
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            danger: Color::Rgb(191, 97, 106),
            info: Color::Rgb(129, 161, 193),
            list_row_selected_bg: Color::Rgb(67, 76, 94),
            border: Color::Rgb(76, 86, 106),
        }
    }

    /// Dracula palette.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            accent: Color::Rgb(139, 233, 253),
            accent_secondary: Color::Rgb(80, 250, 123),
            bg_dark: Color::Rgb(40, 42, 54),
            bg_panel: Color::Rgb(48, 51, 65),
            text_primary: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(188, 188, 172),
            text_muted: Color::Rgb(98, 114, 164),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(241, 250, 140),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(139, 233, 253),
            list_row_selected_bg: Color::Rgb(68, 71, 90),
            border: Color::Rgb(98, 114, 164),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Cycle to the next built-in theme.
    pub fn next_builtin(&self) -> Self {
        let idx = BUILTIN_THEME_NAMES
            .iter()
            .position(|&n| n == self.name)
            .unwrap_or(0);
        let next_idx = (idx + 1) % BUILTIN_THEME_NAMES.len();
        Self::by_name(BUILTIN_THEME_NAMES[next_idx]).unwrap()
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn list_row_normal(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn list_row_selected(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.list_row_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_all_builtins() {
        for &name in BUILTIN_THEME_NAMES {
            let theme = Theme::by_name(name);
            assert!(theme.is_some(), "Theme '{}' should exist", name);
            assert_eq!(theme.unwrap().name, name);
        }
    }

    #[test]
    fn by_name_case_insensitive() {
        assert!(Theme::by_name("DEFAULT").is_some());
        assert!(Theme::by_name("Gruvbox").is_some());
    }

    #[test]
    fn by_name_unknown() {
        assert!(Theme::by_name("nonexistent").is_none());
        assert!(Theme::by_name("").is_none());
    }

    #[test]
    fn next_builtin_cycles_through_all() {
        let mut theme = Theme::default_dark();
        let mut names = vec![theme.name.clone()];
        for _ in 0..BUILTIN_THEME_NAMES.len() - 1 {
            theme = theme.next_builtin();
            names.push(theme.name.clone());
        }
        for &expected in BUILTIN_THEME_NAMES {
            assert!(
                names.contains(&expected.to_string()),
                "Missing theme: {}",
                expected
            );
        }
    }

    #[test]
    fn next_builtin_wraps_around() {
        let mut theme = Theme::default_dark();
        for _ in 0..BUILTIN_THEME_NAMES.len() {
            theme = theme.next_builtin();
        }
        assert_eq!(theme.name, "default");
    }
}
