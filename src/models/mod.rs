//! Data model: wire-format chart descriptions and style configuration.

mod chart;
mod style;

pub use chart::{ChartDescription, ChartKind, ChartPayload, ChartSeries, Suggestion};
pub(crate) use style::FileStyleConfig;
pub use style::{resolve_series_color, Rgb, StyleConfig, AXIS_COLOR_PRESETS, DEFAULT_PALETTE};
