//! Line clipping and distance helpers used by the hatching sweep and
//! the path simplifier.

use crate::point::Point;

/// An axis-aligned rectangle, typically the raster bounds.
#[derive(Copy, Clone, Debug)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }
}

/// Clip the infinite line through `origin` with direction `(dx, dy)`
/// against a rectangle. Returns the two boundary crossings ordered by
/// the line parameter, or `None` when the line misses the rectangle.
///
/// Axis-aligned directions are handled by simply skipping the parallel
/// edge pair, so no division by a vanishing component ever happens.
pub fn clip_line_to_rect(origin: Point, dx: f64, dy: f64, rect: Rect) -> Option<(Point, Point)> {
    let mut crossings: Vec<(f64, Point)> = Vec::with_capacity(4);

    if dx.abs() > 1e-10 {
        for edge_x in [rect.min_x, rect.max_x] {
            let t = (edge_x - origin.x) / dx;
            let y = origin.y + t * dy;

            if y >= rect.min_y && y <= rect.max_y {
                crossings.push((t, Point::new(edge_x, y)));
            }
        }
    }

    if dy.abs() > 1e-10 {
        for edge_y in [rect.min_y, rect.max_y] {
            let t = (edge_y - origin.y) / dy;
            let x = origin.x + t * dx;

            if x >= rect.min_x && x <= rect.max_x {
                crossings.push((t, Point::new(x, edge_y)));
            }
        }
    }

    if crossings.len() < 2 {
        return None;
    }

    crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

    // A line through a corner reports that corner once per edge pair;
    // the second crossing must lie strictly past the first.
    let (first_t, first) = crossings[0];
    let second = crossings
        .iter()
        .find(|(t, _)| *t > first_t + 1e-10)
        .map(|(_, p)| *p)?;

    Some((first, second))
}

/// Perpendicular distance from a point to the segment chord `a`..`b`.
/// Falls back to plain point distance when the chord has zero length.
pub fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = (dx * dx + dy * dy).sqrt();

    if length < 1e-12 {
        return point.distance(&a);
    }

    let cross = dx * (a.y - point.y) - dy * (a.x - point.x);
    cross.abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_through_center() {
        let rect = Rect::from_size(100.0, 60.0);
        let (p1, p2) = clip_line_to_rect(Point::new(50.0, 30.0), 1.0, 0.0, rect)
            .expect("line crosses the rectangle");

        assert_eq!(p1, Point::new(0.0, 30.0));
        assert_eq!(p2, Point::new(100.0, 30.0));
    }

    #[test]
    fn vertical_line_through_center() {
        let rect = Rect::from_size(100.0, 60.0);
        let (p1, p2) = clip_line_to_rect(Point::new(50.0, 30.0), 0.0, 1.0, rect)
            .expect("line crosses the rectangle");

        assert_eq!(p1, Point::new(50.0, 0.0));
        assert_eq!(p2, Point::new(50.0, 60.0));
    }

    #[test]
    fn line_missing_the_rect() {
        let rect = Rect::from_size(10.0, 10.0);
        let clipped = clip_line_to_rect(Point::new(0.0, 50.0), 1.0, 0.0, rect);
        assert!(clipped.is_none());
    }

    #[test]
    fn diagonal_line_hits_corners() {
        let rect = Rect::from_size(10.0, 10.0);
        let (p1, p2) = clip_line_to_rect(Point::new(5.0, 5.0), 1.0, 1.0, rect)
            .expect("diagonal crosses the rectangle");

        assert_eq!(p1, Point::new(0.0, 0.0));
        assert_eq!(p2, Point::new(10.0, 10.0));
    }

    #[test]
    fn perpendicular_distance_to_chord() {
        let d = perpendicular_distance(
            Point::new(5.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_chord_uses_point_distance() {
        let d = perpendicular_distance(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-9);
    }
}
