//! HTTP client for the remote visualization service.

mod client;

pub use client::VisualizeClient;

use serde::Deserialize;

use crate::models::ChartDescription;

/// Which server pipeline a spreadsheet upload goes through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Generic series data, drawn locally in the terminal.
    #[default]
    Terminal,
    /// Server-rendered static image.
    Image,
    /// Interactive plot spec; export round-trips through the server.
    Plotly,
}

/// Events sent from a request task back to the main loop.
#[derive(Debug)]
pub enum ApiEvent {
    /// The service replied with an ordered sequence of chart descriptions.
    Completed(Vec<ChartDescription>),
    /// The request failed as a whole; the message is already user-facing.
    Failed(String),
}
