//! Debug SVG output for visually inspecting intermediate paths.
//!
//! Not part of the machine pipeline; useful for diffing renderer output
//! without a plotter attached.

use crate::path::ColoredPath;
use std::path;
use svg::node::element::path::Data;
use svg::node::element::Path;
use svg::Document;

const PADDING: f64 = 5.0;

fn color_hex(path: &ColoredPath) -> String {
    format!("#{:02x}{:02x}{:02x}", path.color.r, path.color.g, path.color.b)
}

fn bounding_box(paths: &[ColoredPath]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for path in paths {
        for p in &path.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
    }

    if paths.iter().all(|p| p.points.is_empty()) {
        return (0.0, 0.0, 1.0, 1.0);
    }

    (min_x, min_y, max_x, max_y)
}

fn draw_path(document: Document, path: &ColoredPath) -> Document {
    if path.points.is_empty() {
        return document;
    }

    let mut data = Data::new().move_to((path.points[0].x, path.points[0].y));

    for point in path.points.iter().skip(1) {
        data = data.line_to((point.x, point.y));
    }

    let color = color_hex(path);

    let element = if path.closed {
        Path::new()
            .set("fill", color)
            .set("stroke", "none")
            .set("d", data.close())
    } else {
        Path::new()
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", "1.0")
            .set("d", data)
    };

    document.add(element)
}

/// Write all paths to an SVG file with a viewBox fitted to their
/// bounding box plus padding.
pub fn write_paths(filename: &path::Path, paths: &[ColoredPath]) -> std::io::Result<()> {
    let (min_x, min_y, max_x, max_y) = bounding_box(paths);

    let mut document = Document::new().set(
        "viewBox",
        (
            min_x - PADDING,
            min_y - PADDING,
            max_x - min_x + 2.0 * PADDING,
            max_y - min_y + 2.0 * PADDING,
        ),
    );

    for path in paths {
        document = draw_path(document, path);
    }

    svg::save(filename, &document)
}
