//! Terminal UI: theme, state, and the renderer tree.

pub mod renderer;
pub mod state;
pub mod theme;

pub use renderer::render;
