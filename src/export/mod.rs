//! PNG export.
//!
//! Interactive plot specs are rasterized server-side; everything else
//! is exported client-side by rasterizing the same SVG the scene
//! backend produces, at double pixel density on an opaque dark
//! backdrop. Server-rendered images are written out as-is.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{scene_to_svg, Scene};
use crate::constants::{EXPORT_BACKGROUND, EXPORT_FALLBACK_STEM, EXPORT_SCALE};
use crate::models::StyleConfig;
use crate::utils::sanitize_filename;

/// Rasterize a scene to PNG bytes.
pub fn render_scene_png(scene: &Scene, style: &StyleConfig) -> Result<Vec<u8>> {
    let svg = scene_to_svg(scene, style, Some(EXPORT_BACKGROUND));
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(&svg, &options).context("failed to parse chart SVG")?;

    let width = (scene.width as f32 * EXPORT_SCALE).ceil() as u32;
    let height = (scene.height as f32 * EXPORT_SCALE).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .context("invalid export dimensions")?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(EXPORT_SCALE, EXPORT_SCALE),
        &mut pixmap.as_mut(),
    );
    pixmap.encode_png().context("failed to encode PNG")
}

/// Output path for an export: the sanitized chart title, or a
/// timestamped fallback when nothing printable survives.
pub fn export_path(dir: &Path, title: &str, ext: &str) -> PathBuf {
    let stem = sanitize_filename(title).unwrap_or_else(|| {
        format!(
            "{}_{}",
            EXPORT_FALLBACK_STEM,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    });
    dir.join(format!("{stem}.{ext}"))
}

/// Write PNG bytes under the title-derived filename, creating the
/// export directory if needed. Returns the path written.
pub fn write_png(dir: &Path, title: &str, bytes: &[u8]) -> Result<PathBuf> {
    write_bytes(dir, title, "png", bytes)
}

/// Write a server-side vector file as-is.
pub fn write_svg(dir: &Path, title: &str, bytes: &[u8]) -> Result<PathBuf> {
    write_bytes(dir, title, "svg", bytes)
}

fn write_bytes(dir: &Path, title: &str, ext: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create export directory {}", dir.display()))?;
    let path = export_path(dir, title, ext);
    std::fs::write(&path, bytes)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_scene;
    use crate::constants::{SCENE_HEIGHT, SCENE_WIDTH};
    use crate::models::{ChartKind, ChartSeries};

    fn sample_scene() -> Scene {
        let series = vec![ChartSeries {
            x: vec!["a".into(), "b".into()],
            y: vec![1.0, 2.0],
            ..Default::default()
        }];
        build_scene(
            &ChartKind::Bar,
            &series,
            &StyleConfig::default(),
            "Test Chart",
            (SCENE_WIDTH, SCENE_HEIGHT),
        )
        .unwrap()
    }

    #[test]
    fn rasterized_png_has_doubled_dimensions() {
        let png = render_scene_png(&sample_scene(), &StyleConfig::default()).unwrap();
        // PNG signature then IHDR with big-endian dimensions.
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        assert_eq!(width, SCENE_WIDTH as u32 * 2);
        assert_eq!(height, SCENE_HEIGHT as u32 * 2);
    }

    #[test]
    fn export_path_uses_sanitized_title() {
        let path = export_path(Path::new("/tmp/out"), "Yearly Revenue 2024", "png");
        assert_eq!(path, Path::new("/tmp/out/Yearly_Revenue_2024.png"));
    }

    #[test]
    fn export_path_falls_back_when_title_is_unusable() {
        let path = export_path(Path::new("/tmp/out"), "///", "png");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(EXPORT_FALLBACK_STEM));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn write_png_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let path = write_png(&nested, "My Chart", b"not-a-real-png").unwrap();
        assert_eq!(path, nested.join("My_Chart.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"not-a-real-png");
    }

    #[test]
    fn write_svg_uses_svg_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_svg(dir.path(), "My Chart", b"<svg/>").unwrap();
        assert_eq!(path, dir.path().join("My_Chart.svg"));
    }
}
