//! Raster sampling primitives shared by the style renderers.
//!
//! Out-of-bounds reads deliberately resolve to white: a sweep that runs
//! past the raster edge must never produce ink.

use crate::color::{self, Rgb};
use image::{DynamicImage, GenericImageView};

fn in_bounds(img: &DynamicImage, x: i64, y: i64) -> bool {
    let (width, height) = img.dimensions();
    x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
}

fn pixel(img: &DynamicImage, x: i64, y: i64) -> Rgb {
    let p = img.get_pixel(x as u32, y as u32);
    Rgb::new(p[0], p[1], p[2])
}

/// Brightness in [0, 1] at a pixel, 1.0 (white) out of bounds.
pub fn brightness(img: &DynamicImage, x: i64, y: i64) -> f64 {
    if in_bounds(img, x, y) {
        pixel(img, x, y).luma()
    } else {
        1.0
    }
}

/// RGB color at a pixel, white out of bounds.
pub fn color_at(img: &DynamicImage, x: i64, y: i64) -> Rgb {
    if in_bounds(img, x, y) {
        pixel(img, x, y)
    } else {
        color::WHITE
    }
}

/// Mean color over all in-bounds pixels within `radius` of the center.
/// White when the disk covers no in-bounds pixel at all.
pub fn average_color_in_disk(img: &DynamicImage, cx: i64, cy: i64, radius: i64) -> Rgb {
    let r_squared = radius * radius;
    let (mut total_r, mut total_g, mut total_b) = (0u64, 0u64, 0u64);
    let mut count = 0u64;

    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            if !in_bounds(img, x, y) {
                continue;
            }

            let dx = x - cx;
            let dy = y - cy;

            if dx * dx + dy * dy <= r_squared {
                let c = pixel(img, x, y);
                total_r += c.r as u64;
                total_g += c.g as u64;
                total_b += c.b as u64;
                count += 1;
            }
        }
    }

    if count == 0 {
        return color::WHITE;
    }

    Rgb::new(
        (total_r / count) as u8,
        (total_g / count) as u8,
        (total_b / count) as u8,
    )
}
