//! Chart rendering pipeline: scales, scene building, and the SVG
//! backend. The terminal widget lives in `ui::renderer`.

pub mod scale;
mod scene;
mod svg;

pub use scene::{build_scene, Anchor, Hover, Scene, SceneNode};
pub use svg::scene_to_svg;
