//! Mapping image content into the machine's safe drawing rectangle.
//!
//! All functions here are pure: identical inputs always produce
//! identical scale and offsets, which downstream ordering and
//! validation depend on.

use crate::config::MachineConfig;
use crate::path::ColoredPath;
use crate::point::Point;
use image::imageops::FilterType;
use image::DynamicImage;
use log::info;

/// Upscale cap for raster inputs; small sources are not blown up
/// further than this, which bounds per-pixel processing cost.
const MAX_RASTER_SCALE: f64 = 7.0;

/// Uniform scale and centering offsets that fit `content_width` x
/// `content_height` into the machine's safe rectangle, preserving
/// aspect ratio.
pub fn scale_to_fit(
    content_width: f64,
    content_height: f64,
    machine: &MachineConfig,
) -> (f64, f64, f64) {
    let scale = (machine.safe_width() / content_width).min(machine.safe_height() / content_height);

    let offset_x = machine.safe_margin + (machine.safe_width() - content_width * scale) / 2.0;
    let offset_y = machine.safe_margin + (machine.safe_height() - content_height * scale) / 2.0;

    (scale, offset_x, offset_y)
}

/// Resize a raster so one pixel equals one machine millimeter inside
/// the safe area. Returns the resized image, the applied scale and the
/// centering offsets in mm.
pub fn scale_image_to_machine(
    img: &DynamicImage,
    machine: &MachineConfig,
) -> (DynamicImage, f64, f64, f64) {
    let width = img.width() as f64;
    let height = img.height() as f64;

    let (scale, _, _) = scale_to_fit(width, height, machine);
    let scale = scale.min(MAX_RASTER_SCALE);

    let new_width = (width * scale) as u32;
    let new_height = (height * scale) as u32;

    let offset_x = machine.safe_margin + (machine.safe_width() - new_width as f64) / 2.0;
    let offset_y = machine.safe_margin + (machine.safe_height() - new_height as f64) / 2.0;

    info!(
        "scaled {}x{} px to {}x{} mm (factor {:.3})",
        width, height, new_width, new_height, scale
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    (resized, scale, offset_x, offset_y)
}

/// Map paths from content coordinates into machine mm space with
/// `p' = p * scale + offset`.
pub fn scale_paths_to_machine(
    paths: &[ColoredPath],
    content_width: f64,
    content_height: f64,
    machine: &MachineConfig,
) -> (Vec<ColoredPath>, f64, f64, f64) {
    let (scale, offset_x, offset_y) = scale_to_fit(content_width, content_height, machine);
    let offset = Point::new(offset_x, offset_y);

    let scaled = paths
        .iter()
        .map(|path| {
            let points = path.points.iter().map(|p| *p * scale + offset).collect();
            ColoredPath::new(points, path.color, path.closed)
        })
        .collect();

    (scaled, scale, offset_x, offset_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use image::RgbImage;

    fn machine(width: f64, height: f64, margin: f64) -> MachineConfig {
        MachineConfig {
            width,
            height,
            safe_margin: margin,
            ..Default::default()
        }
    }

    #[test]
    fn scale_preserves_aspect_ratio() {
        let m = machine(200.0, 200.0, 20.0);
        let (scale, ox, oy) = scale_to_fit(80.0, 160.0, &m);

        assert_eq!(scale, 1.0);
        // Narrow content is centered horizontally, flush vertically.
        assert_eq!(ox, 20.0 + (160.0 - 80.0) / 2.0);
        assert_eq!(oy, 20.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        let m = machine(800.0, 600.0, 50.0);
        assert_eq!(scale_to_fit(123.0, 77.0, &m), scale_to_fit(123.0, 77.0, &m));
    }

    #[test]
    fn mapped_points_stay_inside_the_safe_area() {
        let m = machine(200.0, 200.0, 20.0);
        let corners = ColoredPath::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
            Rgb::new(0, 0, 0),
            true,
        );

        let (scaled, _, _, _) = scale_paths_to_machine(&[corners], 100.0, 100.0, &m);

        for p in &scaled[0].points {
            assert!(p.x >= 20.0 && p.x <= 180.0);
            assert!(p.y >= 20.0 && p.y <= 180.0);
        }
    }

    #[test]
    fn small_rasters_are_not_upscaled_past_the_cap() {
        let m = machine(800.0, 600.0, 50.0);
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 10));

        let (resized, scale, _, _) = scale_image_to_machine(&img, &m);

        assert_eq!(scale, MAX_RASTER_SCALE);
        assert_eq!((resized.width(), resized.height()), (70, 70));
    }

    #[test]
    fn large_rasters_shrink_to_the_safe_area() {
        let m = machine(200.0, 200.0, 20.0);
        let img = DynamicImage::ImageRgb8(RgbImage::new(1600, 800));

        let (resized, scale, ox, oy) = scale_image_to_machine(&img, &m);

        assert_eq!((resized.width(), resized.height()), (160, 80));
        assert!((scale - 0.1).abs() < 1e-9);
        assert_eq!(ox, 20.0);
        assert_eq!(oy, 20.0 + (160.0 - 80.0) / 2.0);
    }
}
