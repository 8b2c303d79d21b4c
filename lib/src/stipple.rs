//! Stipple rendering: tone as dot size and density.
//!
//! A square grid is laid over the raster; each cell either yields one
//! closed N-gon dot or nothing. All skip decisions are pure functions
//! of the cell, so the same raster and parameters always reproduce the
//! same dots.

use crate::color::Rgb;
use crate::config::ImageProcessingConfig;
use crate::path::ColoredPath;
use crate::point::Point;
use crate::sample;
use image::DynamicImage;
use std::f64::consts::PI;

/// Below this darkness a cell never produces a dot.
const DARKNESS_FLOOR: f64 = 0.1;

/// Grid pitch relative to the maximum dot radius.
const GRID_FACTOR: f64 = 2.5;

pub fn render(
    img: &DynamicImage,
    offset_x: f64,
    offset_y: f64,
    config: &ImageProcessingConfig,
) -> Vec<ColoredPath> {
    let width = img.width() as f64;
    let height = img.height() as f64;
    let grid = config.stipple_max_radius * GRID_FACTOR;

    grid_centers(width, height, grid)
        .filter_map(|(x, y)| dot_at(img, x, y, offset_x, offset_y, config))
        .filter(ColoredPath::is_drawable)
        .collect()
}

/// Cell centers of a square grid of pitch `grid` covering the raster.
fn grid_centers(width: f64, height: f64, grid: f64) -> impl Iterator<Item = (f64, f64)> {
    let columns = (width / grid).ceil() as usize;
    let rows = (height / grid).ceil() as usize;

    (0..rows).flat_map(move |row| {
        (0..columns).filter_map(move |column| {
            let x = grid / 2.0 + column as f64 * grid;
            let y = grid / 2.0 + row as f64 * grid;
            (x < width && y < height).then_some((x, y))
        })
    })
}

/// Deterministic stand-in for random thinning: hash the quantized cell
/// coordinates and keep the dot only when the hash falls below the
/// local darkness.
fn passes_density_gate(x: f64, y: f64, darkness: f64) -> bool {
    let hash = (x * 7.0 + y * 13.0) as i64 % 100;
    hash as f64 / 100.0 <= darkness
}

fn dot_at(
    img: &DynamicImage,
    x: f64,
    y: f64,
    offset_x: f64,
    offset_y: f64,
    config: &ImageProcessingConfig,
) -> Option<ColoredPath> {
    let mut darkness = 1.0 - sample::brightness(img, x as i64, y as i64);

    if config.stipple_invert {
        darkness = 1.0 - darkness;
    }

    if darkness < DARKNESS_FLOOR {
        return None;
    }

    // Thin out dots in the configured density band.
    if darkness < config.stipple_density && !passes_density_gate(x, y, darkness) {
        return None;
    }

    let radius =
        config.stipple_min_radius + darkness * (config.stipple_max_radius - config.stipple_min_radius);

    let num_points = config.stipple_points_per_circle;
    let points = (0..num_points)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / num_points as f64;
            Point::new(
                x + radius * angle.cos() + offset_x,
                y + radius * angle.sin() + offset_y,
            )
        })
        .collect();

    Some(ColoredPath::new(
        points,
        dot_color(img, x, y, radius, darkness, config.stipple_invert),
        true,
    ))
}

/// Disk-averaged raster color, inverted for dark-on-light media and
/// always attenuated by darkness so faint areas produce dim dots.
fn dot_color(img: &DynamicImage, x: f64, y: f64, radius: f64, darkness: f64, invert: bool) -> Rgb {
    let average = sample::average_color_in_disk(img, x as i64, y as i64, radius as i64);
    let average = if invert { average } else { average.inverted() };
    average.scaled(darkness)
}
