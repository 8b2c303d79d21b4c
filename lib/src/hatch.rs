//! Hatching and cross-hatch rendering.
//!
//! Both styles share one sweep: parallel lines at a fixed angle are
//! offset perpendicularly across the raster diagonal, clipped to the
//! raster, gated on average darkness, and broken into brightness-driven
//! segments. Cross-hatch stacks 2..=4 sweeps at evenly distributed
//! angles with progressively stricter visibility thresholds, so darker
//! regions accumulate more overlapping layers.

use crate::config::ImageProcessingConfig;
use crate::geometry::{self, Rect};
use crate::path::ColoredPath;
use crate::point::Point;
use crate::sample;
use image::DynamicImage;
use log::debug;

/// Brightness samples taken along a clipped line to estimate its
/// average darkness.
const LINE_SAMPLES: usize = 10;

/// Darkness floor for plain hatching.
const DARKNESS_FLOOR: f64 = 0.05;

/// Lines shorter than this are degenerate clips and skipped.
const MIN_LINE_LENGTH: f64 = 0.1;

/// Spacing, segment and gap parameters for one sweep. Plain hatching
/// and cross-hatch carry separate sets of these in the processing
/// config; cross-hatch defaults are denser.
#[derive(Copy, Clone, Debug)]
struct SweepParams {
    angle_degrees: f64,
    spacing_light: f64,
    spacing_dark: f64,
    segment_min_length: f64,
    segment_max_length: f64,
    segment_gap: f64,
    /// Minimum darkness for a line or segment to be drawn.
    threshold: f64,
    /// Swap darkness and brightness for light-on-dark media.
    invert: bool,
}

pub fn render_hatching(
    img: &DynamicImage,
    offset_x: f64,
    offset_y: f64,
    config: &ImageProcessingConfig,
) -> Vec<ColoredPath> {
    sweep(
        img,
        offset_x,
        offset_y,
        SweepParams {
            angle_degrees: config.hatching_angle,
            spacing_light: config.hatching_line_spacing_light,
            spacing_dark: config.hatching_line_spacing_dark,
            segment_min_length: config.hatching_segment_min_length,
            segment_max_length: config.hatching_segment_max_length,
            segment_gap: config.hatching_segment_gap,
            threshold: DARKNESS_FLOOR,
            invert: config.hatching_invert,
        },
    )
}

pub fn render_cross_hatch(
    img: &DynamicImage,
    offset_x: f64,
    offset_y: f64,
    config: &ImageProcessingConfig,
) -> Vec<ColoredPath> {
    let max_angles = config.cross_hatch_max_angles;
    let angle_step = 180.0 / max_angles as f64;
    let mut paths = Vec::new();

    for layer in 0..max_angles {
        // Layer i is only visible where average darkness reaches
        // 0.25 + i * 0.25.
        let threshold = 0.25 + layer as f64 * 0.25;
        let angle = config.cross_hatch_base_angle + layer as f64 * angle_step;

        let layer_paths = sweep(
            img,
            offset_x,
            offset_y,
            SweepParams {
                angle_degrees: angle,
                spacing_light: config.cross_hatch_line_spacing_light,
                spacing_dark: config.cross_hatch_line_spacing_dark,
                segment_min_length: config.cross_hatch_segment_min_length,
                segment_max_length: config.cross_hatch_segment_max_length,
                segment_gap: config.cross_hatch_segment_gap,
                threshold,
                invert: false,
            },
        );

        debug!(
            "cross-hatch layer {} at {:.1} deg: {} segments",
            layer,
            angle,
            layer_paths.len()
        );

        paths.extend(layer_paths);
    }

    paths
}

fn darkness_at(img: &DynamicImage, x: f64, y: f64, invert: bool) -> f64 {
    let brightness = sample::brightness(img, x as i64, y as i64);
    if invert {
        brightness
    } else {
        1.0 - brightness
    }
}

/// Average darkness over evenly spaced samples between two points.
fn average_darkness(img: &DynamicImage, a: Point, b: Point, invert: bool) -> f64 {
    let total: f64 = (0..LINE_SAMPLES)
        .map(|i| {
            let t = i as f64 / (LINE_SAMPLES - 1) as f64;
            darkness_at(img, a.x + t * (b.x - a.x), a.y + t * (b.y - a.y), invert)
        })
        .sum();

    total / LINE_SAMPLES as f64
}

fn sweep(
    img: &DynamicImage,
    offset_x: f64,
    offset_y: f64,
    params: SweepParams,
) -> Vec<ColoredPath> {
    let width = img.width() as f64;
    let height = img.height() as f64;
    let rect = Rect::from_size(width, height);

    let angle = params.angle_degrees.to_radians();
    let (dy, dx) = angle.sin_cos();
    // Perpendicular direction along which parallel lines are spaced.
    let (px, py) = (-dy, dx);

    let diagonal = (width * width + height * height).sqrt();
    let mut offset = -diagonal / 2.0;
    let mut paths = Vec::new();

    while offset < diagonal / 2.0 {
        let origin = Point::new(width / 2.0 + offset * px, height / 2.0 + offset * py);

        let Some((start, end)) = geometry::clip_line_to_rect(origin, dx, dy, rect) else {
            offset += params.spacing_light;
            continue;
        };

        let line_length = start.distance(&end);

        if line_length < MIN_LINE_LENGTH {
            offset += params.spacing_light;
            continue;
        }

        let line_darkness = average_darkness(img, start, end, params.invert);

        if line_darkness < params.threshold {
            offset += params.spacing_light;
            continue;
        }

        // Darker lines pull the next parallel line closer.
        let spacing = params.spacing_light
            - line_darkness * (params.spacing_light - params.spacing_dark);

        segment_line(
            img,
            start,
            end,
            line_length,
            offset_x,
            offset_y,
            params,
            &mut paths,
        );

        offset += spacing;
    }

    paths.retain(ColoredPath::is_drawable);
    paths
}

/// Walk one clipped line, emitting darkness-length segments separated
/// by the configured gap. Segment color is sampled at its midpoint.
#[allow(clippy::too_many_arguments)]
fn segment_line(
    img: &DynamicImage,
    start: Point,
    end: Point,
    line_length: f64,
    offset_x: f64,
    offset_y: f64,
    params: SweepParams,
    paths: &mut Vec<ColoredPath>,
) {
    let dir_x = (end.x - start.x) / line_length;
    let dir_y = (end.y - start.y) / line_length;
    let mut distance = 0.0;

    while distance < line_length {
        let seg_start = Point::new(start.x + distance * dir_x, start.y + distance * dir_y);
        let darkness = darkness_at(img, seg_start.x, seg_start.y, params.invert);

        if darkness < params.threshold {
            distance += params.segment_gap;
            continue;
        }

        // Darker local samples stretch the segment toward the maximum.
        let length = params.segment_min_length
            + darkness * (params.segment_max_length - params.segment_min_length);
        let length = length.min(line_length - distance);

        let seg_end = Point::new(seg_start.x + length * dir_x, seg_start.y + length * dir_y);

        let mid_x = (seg_start.x + seg_end.x) / 2.0;
        let mid_y = (seg_start.y + seg_end.y) / 2.0;
        let color = sample::color_at(img, mid_x as i64, mid_y as i64);

        paths.push(ColoredPath::new(
            vec![
                Point::new(seg_start.x + offset_x, seg_start.y + offset_y),
                Point::new(seg_end.x + offset_x, seg_end.y + offset_y),
            ],
            color,
            false,
        ));

        distance += length + params.segment_gap;
    }
}
