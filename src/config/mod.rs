use serde::Deserialize;

use crate::api::Pipeline;
use crate::constants::*;
use crate::models::StyleConfig;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/vizterm/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// Visualization service base URL (no trailing slash).
    pub api_base_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Theme name for the terminal chrome.
    pub theme: String,
    /// Directory PNG/SVG exports are written to.
    pub export_dir: std::path::PathBuf,
    /// Upload pipeline for spreadsheet submissions.
    pub pipeline: Pipeline,
    /// Default chart style, overridable per chart at runtime.
    pub style: StyleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme: "default".to_string(),
            export_dir: std::env::current_dir().unwrap_or_else(|_| home_dir()),
            pipeline: Pipeline::default(),
            style: StyleConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional — missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    theme: Option<String>,
    export_dir: Option<String>,
    pipeline: Option<Pipeline>,
    style: Option<crate::models::FileStyleConfig>,
}

impl Config {
    /// Load config from ~/.config/vizterm/config.toml, falling back to
    /// defaults for any missing fields. If the file doesn't exist, returns
    /// pure defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path (tests use a temp dir).
    pub fn load_from(path: &std::path::Path) -> Self {
        let mut config = Config::default();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config, // No config file — use defaults
        };

        let file_config: FileConfig = match toml::from_str(&content) {
            Ok(fc) => fc,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                return config;
            }
        };

        // Merge file values over defaults
        if let Some(v) = file_config.api_base_url {
            if !v.is_empty() {
                config.api_base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = file_config.request_timeout_secs {
            config.request_timeout_secs = v.max(MIN_REQUEST_TIMEOUT_SECS);
        }
        if let Some(v) = file_config.theme {
            if !v.is_empty() {
                config.theme = v;
            }
        }
        if let Some(v) = file_config.export_dir {
            if !v.is_empty() {
                config.export_dir = std::path::PathBuf::from(v);
            }
        }
        if let Some(v) = file_config.pipeline {
            config.pipeline = v;
        }
        if let Some(s) = file_config.style {
            config.style.merge_file(s);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load_from(std::path::Path::new("/nonexistent/config.toml"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.theme, "default");
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
api_base_url = "https://viz.example.com/"
[style]
grid_lines = true
bar_opacity = 0.5
"#,
        );
        let config = Config::load_from(&path);
        // trailing slash stripped
        assert_eq!(config.api_base_url, "https://viz.example.com");
        assert!(config.style.grid_lines);
        assert_eq!(config.style.bar_opacity, 0.5);
        // untouched values keep defaults
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.style.font_size, 12);
    }

    #[test]
    fn pipeline_parses_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "pipeline = \"plotly\"\n");
        let config = Config::load_from(&path);
        assert_eq!(config.pipeline, Pipeline::Plotly);
    }

    #[test]
    fn timeout_has_a_floor() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "request_timeout_secs = 1\n");
        let config = Config::load_from(&path);
        assert_eq!(config.request_timeout_secs, MIN_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "this is not toml ===");
        let config = Config::load_from(&path);
        assert_eq!(config.theme, "default");
    }
}
