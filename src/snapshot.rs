use crate::error::PreviewError;
use crate::graphics::Surface;
use crate::widget::Preview;
use image::RgbImage;
use log::info;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("surface of {width}x{height} pixels does not fit an image buffer")]
    Buffer { width: usize, height: usize },
    #[error(transparent)]
    Surface(#[from] PreviewError),
    #[error("failed to write snapshot: {0}")]
    Image(#[from] image::ImageError),
}

/// Draws a single frame of `preview` at `elapsed_ms` on a fresh surface
pub fn render_frame(
    preview: &mut dyn Preview,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    elapsed_ms: f64,
) -> Result<Surface, PreviewError> {
    let mut surface = Surface::new(width, height, pixel_ratio)?;
    preview.draw_frame(&mut surface, elapsed_ms);
    Ok(surface)
}

pub fn to_image(surface: &Surface) -> Result<RgbImage, SnapshotError> {
    let (width, height) = surface.device_size();
    RgbImage::from_raw(width as u32, height as u32, surface.to_rgb8())
        .ok_or(SnapshotError::Buffer { width, height })
}

/// Renders one frame and saves it as PNG at `path`
pub fn write_snapshot(
    preview: &mut dyn Preview,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    elapsed_ms: f64,
    path: &Path,
) -> Result<(), SnapshotError> {
    let surface = render_frame(preview, width, height, pixel_ratio, elapsed_ms)?;
    let image = to_image(&surface)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    info!(
        "{} snapshot at {elapsed_ms}ms written to {} ({}x{})",
        preview.name(),
        path.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomeStyle;
    use crate::state::RotationTiming;
    use crate::voxel::ShellParams;
    use crate::widget::{DomeWidget, RingWidget};

    const BG: [u8; 3] = [0x0f, 0x12, 0x17];

    #[test]
    fn dome_frame_paints_blocks_over_background() {
        let shell = ShellParams::new(11, 1, false).unwrap();
        let mut dome = DomeWidget::new(shell, RotationTiming::default(), DomeStyle::default());
        let surface = render_frame(&mut dome, 420.0, 300.0, 2.0, 0.0).unwrap();
        assert_eq!(surface.device_size(), (840, 600));

        let image = to_image(&surface).unwrap();
        assert_eq!(image.dimensions(), (840, 600));
        assert_eq!(image.get_pixel(0, 0).0, BG);
        // voxel (6, 7, 6) lands over logical (210, 210) at angle 0
        let centre = image.get_pixel(420, 420).0;
        assert!(centre[0] > 128, "expected orange near the dome base, got {centre:?}");
    }

    #[test]
    fn ring_frame_leaves_centre_empty() {
        let mut ring = RingWidget::default();
        let surface = render_frame(&mut ring, 300.0, 300.0, 1.0, 0.0).unwrap();
        // grid lines pass through the exact centre, so sample inside a cell
        assert_ne!(surface.pixel(150, 150), None);
        let centre = surface.pixel(153, 153).unwrap();
        assert!(centre[0] < 64, "centre should stay dark, got {centre:?}");
    }

    #[test]
    fn snapshot_writes_png() {
        let path = std::env::temp_dir().join(format!("dome3d-snapshot-{}.png", std::process::id()));
        let mut ring = RingWidget::default();
        write_snapshot(&mut ring, 64.0, 48.0, 1.0, 100.0, &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn oversized_snapshot_fails_without_writing() {
        let path = std::env::temp_dir().join(format!("dome3d-huge-{}.png", std::process::id()));
        let mut ring = RingWidget::default();
        let result = write_snapshot(&mut ring, 1.0e10, 1.0e10, 1.0, 0.0, &path);
        assert!(matches!(
            result,
            Err(SnapshotError::Surface(PreviewError::SurfaceTooLarge { .. }))
        ));
        assert!(!path.exists());
    }
}
