//! Palette reduction ahead of rendering.
//!
//! Two methods: iterative centroid clustering (better for photographs)
//! and median-cut bucketing (faster, lower fidelity). Both guarantee a
//! palette of exactly the requested size and an output raster whose
//! pixels all match a palette entry.

use crate::color::Rgb;
use image::{DynamicImage, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Centroid refinement passes; enough for palettes of 4..=32 colors.
const CLUSTER_ITERATIONS: usize = 10;

/// Neutral gray used to pad palettes of degenerate images.
const PAD_COLOR: Rgb = Rgb {
    r: 128,
    g: 128,
    b: 128,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantizeMethod {
    /// K-means over RGB space with deterministic seeding.
    Cluster,
    /// Median-cut bucketing.
    Bucket,
}

impl FromStr for QuantizeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cluster" => Ok(QuantizeMethod::Cluster),
            "bucket" => Ok(QuantizeMethod::Bucket),
            other => Err(format!("unknown quantization method '{}'", other)),
        }
    }
}

/// Reduce `img` to `num_colors` colors. Returns the re-colored raster
/// (same dimensions as the input) and the palette, always exactly
/// `num_colors` long.
pub fn quantize(
    img: &DynamicImage,
    num_colors: usize,
    method: QuantizeMethod,
) -> (DynamicImage, Vec<Rgb>) {
    let rgb = img.to_rgb8();
    let pixels: Vec<Rgb> = rgb.pixels().map(|p| Rgb::from(p.0)).collect();

    let palette = match method {
        QuantizeMethod::Cluster => cluster_palette(&pixels, num_colors),
        QuantizeMethod::Bucket => bucket_palette(&pixels, num_colors),
    };

    debug!("quantized to {} colors via {:?}", palette.len(), method);

    let mut out = RgbImage::new(rgb.width(), rgb.height());

    for (src, dst) in rgb.pixels().zip(out.pixels_mut()) {
        let c = nearest(&palette, Rgb::from(src.0));
        *dst = image::Rgb([c.r, c.g, c.b]);
    }

    (DynamicImage::ImageRgb8(out), palette)
}

fn nearest(palette: &[Rgb], color: Rgb) -> Rgb {
    let mut best = palette[0];
    let mut best_distance = f64::MAX;

    for candidate in palette {
        let distance = candidate.distance_squared(&color);

        if distance < best_distance {
            best_distance = distance;
            best = *candidate;
        }
    }

    best
}

fn pad(mut palette: Vec<Rgb>, num_colors: usize) -> Vec<Rgb> {
    while palette.len() < num_colors {
        palette.push(PAD_COLOR);
    }
    palette
}

/// K-means with centroids seeded from evenly spaced pixels, so the same
/// image and parameters always yield the same palette.
fn cluster_palette(pixels: &[Rgb], num_colors: usize) -> Vec<Rgb> {
    if pixels.is_empty() {
        return vec![PAD_COLOR; num_colors];
    }

    let mut centroids: Vec<Rgb> = (0..num_colors)
        .map(|i| pixels[i * pixels.len() / num_colors])
        .collect();

    let mut assignments = vec![0usize; pixels.len()];

    for _ in 0..CLUSTER_ITERATIONS {
        let mut changed = false;

        for (pixel, slot) in pixels.iter().zip(assignments.iter_mut()) {
            let mut best = 0;
            let mut best_distance = f64::MAX;

            for (index, centroid) in centroids.iter().enumerate() {
                let distance = centroid.distance_squared(pixel);

                if distance < best_distance {
                    best_distance = distance;
                    best = index;
                }
            }

            if *slot != best {
                *slot = best;
                changed = true;
            }
        }

        let mut sums = vec![(0u64, 0u64, 0u64, 0u64); num_colors];

        for (pixel, &slot) in pixels.iter().zip(assignments.iter()) {
            let entry = &mut sums[slot];
            entry.0 += pixel.r as u64;
            entry.1 += pixel.g as u64;
            entry.2 += pixel.b as u64;
            entry.3 += 1;
        }

        for (centroid, (r, g, b, count)) in centroids.iter_mut().zip(sums) {
            // Empty clusters keep their previous centroid.
            if count > 0 {
                *centroid = Rgb::new(
                    (r / count) as u8,
                    (g / count) as u8,
                    (b / count) as u8,
                );
            }
        }

        if !changed {
            break;
        }
    }

    centroids
}

struct Bucket {
    pixels: Vec<Rgb>,
}

impl Bucket {
    /// Channel spread, used to pick the bucket and axis to split.
    fn widest_channel(&self) -> (usize, u8) {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];

        for p in &self.pixels {
            for (i, c) in [p.r, p.g, p.b].into_iter().enumerate() {
                min[i] = min[i].min(c);
                max[i] = max[i].max(c);
            }
        }

        let mut channel = 0;
        let mut range = 0u8;

        for i in 0..3 {
            let spread = max[i] - min[i];

            if spread > range {
                range = spread;
                channel = i;
            }
        }

        (channel, range)
    }

    fn split(mut self, channel: usize) -> (Bucket, Bucket) {
        let key = |p: &Rgb| match channel {
            0 => p.r,
            1 => p.g,
            _ => p.b,
        };

        self.pixels.sort_by_key(key);
        let upper = self.pixels.split_off(self.pixels.len() / 2);

        (self, Bucket { pixels: upper })
    }

    fn mean(&self) -> Rgb {
        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);

        for p in &self.pixels {
            r += p.r as u64;
            g += p.g as u64;
            b += p.b as u64;
        }

        let count = self.pixels.len() as u64;
        Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }
}

/// Median cut: repeatedly split the bucket with the widest channel
/// range at its median until `num_colors` buckets exist.
fn bucket_palette(pixels: &[Rgb], num_colors: usize) -> Vec<Rgb> {
    if pixels.is_empty() {
        return vec![PAD_COLOR; num_colors];
    }

    let mut buckets = vec![Bucket {
        pixels: pixels.to_vec(),
    }];

    while buckets.len() < num_colors {
        let candidate = buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pixels.len() > 1)
            .max_by_key(|(_, b)| b.widest_channel().1)
            .map(|(i, b)| (i, b.widest_channel()));

        // No bucket left to split: the image has fewer natural colors
        // than requested, pad below.
        let Some((index, (channel, range))) = candidate else {
            break;
        };

        if range == 0 {
            break;
        }

        let bucket = buckets.swap_remove(index);
        let (lower, upper) = bucket.split(channel);
        buckets.push(lower);
        buckets.push(upper);
    }

    pad(buckets.iter().map(Bucket::mean).collect(), num_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb as ImageRgb;

    fn checkerboard() -> DynamicImage {
        let mut img = RgbImage::new(8, 8);

        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = if (x + y) % 2 == 0 {
                ImageRgb([250, 10, 10])
            } else {
                ImageRgb([10, 10, 250])
            };
        }

        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn palette_length_always_matches_request() {
        for method in [QuantizeMethod::Cluster, QuantizeMethod::Bucket] {
            let (_, palette) = quantize(&checkerboard(), 4, method);
            assert_eq!(palette.len(), 4);

            // A two-color image still yields the requested palette size.
            let (_, palette) = quantize(&checkerboard(), 8, method);
            assert_eq!(palette.len(), 8);
        }
    }

    #[test]
    fn output_pixels_come_from_the_palette() {
        for method in [QuantizeMethod::Cluster, QuantizeMethod::Bucket] {
            let (out, palette) = quantize(&checkerboard(), 4, method);
            let out = out.to_rgb8();

            for p in out.pixels() {
                assert!(palette.contains(&Rgb::from(p.0)));
            }
        }
    }

    #[test]
    fn dimensions_are_preserved() {
        let (out, _) = quantize(&checkerboard(), 4, QuantizeMethod::Bucket);
        assert_eq!((out.width(), out.height()), (8, 8));
    }

    #[test]
    fn quantization_is_deterministic() {
        let (a, pa) = quantize(&checkerboard(), 6, QuantizeMethod::Cluster);
        let (b, pb) = quantize(&checkerboard(), 6, QuantizeMethod::Cluster);
        assert_eq!(pa, pb);
        assert_eq!(a.to_rgb8().as_raw(), b.to_rgb8().as_raw());
    }
}
