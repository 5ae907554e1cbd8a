//! # vizterm - Terminal Client for AI Data Visualization
//!
//! Upload a spreadsheet or describe the data you want analyzed; the
//! remote service picks chart types with AI and returns chart
//! descriptions, rendered here as navigable terminal charts with
//! editable titles, per-chart styling, and PNG export.

mod api;
mod app;
mod chart;
mod config;
pub mod constants;
mod error;
mod export;
mod models;
mod ui;
mod utils;

use anyhow::Result;
use clap::Parser;

use config::Config;
use constants::MIN_REQUEST_TIMEOUT_SECS;

/// vizterm - AI-powered data visualization in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "vizterm",
    version,
    about = "Terminal client for an AI data visualization service"
)]
struct Cli {
    /// Visualization service base URL (e.g. "http://localhost:8000")
    #[arg(long, short = 's', value_name = "URL")]
    server: Option<String>,

    /// Color theme (default, gruvbox, nord, dracula)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// Directory exported PNGs are written to
    #[arg(long, value_name = "DIR")]
    export_dir: Option<std::path::PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Pipeline spreadsheet uploads go through
    #[arg(long, value_enum)]
    pipeline: Option<api::Pipeline>,

    /// Submit this spreadsheet immediately on startup
    #[arg(long, short = 'f', value_name = "PATH", conflicts_with = "prompt")]
    file: Option<std::path::PathBuf>,

    /// Sheet to analyze when submitting a spreadsheet
    #[arg(long, value_name = "NAME", requires = "file")]
    sheet: Option<String>,

    /// Submit this analysis prompt immediately on startup
    #[arg(long, short = 'p', value_name = "TEXT")]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let mut config = Config::load();
    if let Some(ref server) = cli.server {
        config.api_base_url = server.trim_end_matches('/').to_string();
    }
    if let Some(ref theme_name) = cli.theme {
        config.theme = theme_name.clone();
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = secs.max(MIN_REQUEST_TIMEOUT_SECS);
    }
    if let Some(pipeline) = cli.pipeline {
        config.pipeline = pipeline;
    }

    let mut app = app::App::new(config)?;
    if let Some(path) = cli.file {
        app.queue(ui::state::Submission::File {
            path,
            sheet: cli.sheet,
        });
    } else if let Some(prompt) = cli.prompt {
        app.queue(ui::state::Submission::Prompt(prompt));
    }
    app.run().await
}
