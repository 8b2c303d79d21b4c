//! Douglas-Peucker polyline reduction.
//!
//! This is the main control over final command count: larger tolerances
//! trade visual fidelity for shorter plots.

use crate::geometry::perpendicular_distance;
use crate::path::ColoredPath;
use crate::point::Point;

/// Reduce a polyline so that no removed point lies further than
/// `tolerance` mm from the simplified chord. Polylines of two or fewer
/// points are returned unchanged; the result always keeps at least the
/// two endpoints.
pub fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = 0.0;
    let mut max_index = 0;

    for (index, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let distance = perpendicular_distance(*point, first, last);

        if distance > max_distance {
            max_distance = distance;
            max_index = index;
        }
    }

    if max_distance <= tolerance {
        return vec![first, last];
    }

    let mut left = douglas_peucker(&points[..=max_index], tolerance);
    let right = douglas_peucker(&points[max_index..], tolerance);

    // The split point appears in both halves; keep one copy.
    left.pop();
    left.extend(right);
    left
}

/// Simplify a path, preserving color and closure. Non-positive
/// tolerances disable simplification.
pub fn simplify_path(path: &ColoredPath, tolerance: f64) -> ColoredPath {
    if tolerance <= 0.0 {
        return path.clone();
    }

    ColoredPath::new(
        douglas_peucker(&path.points, tolerance),
        path.color,
        path.closed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn short_polylines_are_unchanged() {
        let two = points(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(douglas_peucker(&two, 1.0), two);
    }

    #[test]
    fn collinear_interior_points_collapse() {
        let line = points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let simplified = douglas_peucker(&line, 0.01);
        assert_eq!(simplified, points(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn significant_deviation_is_kept() {
        let bent = points(&[(0.0, 0.0), (5.0, 4.0), (10.0, 0.0)]);
        let simplified = douglas_peucker(&bent, 1.0);
        assert_eq!(simplified, bent);
    }

    #[test]
    fn simplification_is_idempotent() {
        let zigzag = points(&[
            (0.0, 0.0),
            (1.0, 0.3),
            (2.0, -0.2),
            (3.0, 0.5),
            (4.0, 0.0),
            (5.0, 2.0),
            (6.0, 0.0),
        ]);

        let once = douglas_peucker(&zigzag, 0.4);
        let twice = douglas_peucker(&once, 0.4);
        assert_eq!(once, twice);
    }

    #[test]
    fn removed_points_stay_within_tolerance() {
        let tolerance = 0.5;
        let wiggly = points(&[
            (0.0, 0.0),
            (1.0, 0.4),
            (2.0, -0.3),
            (3.0, 0.2),
            (4.0, 3.0),
            (5.0, 0.1),
            (6.0, 0.0),
        ]);

        let simplified = douglas_peucker(&wiggly, tolerance);

        // Every original point must lie within tolerance of some
        // simplified chord.
        for p in &wiggly {
            let within = simplified.windows(2).any(|chord| {
                perpendicular_distance(*p, chord[0], chord[1]) <= tolerance + 1e-9
            });
            assert!(within, "point {:?} drifted beyond tolerance", p);
        }
    }

    #[test]
    fn path_simplification_keeps_color_and_flag() {
        use crate::color::Rgb;

        let path = ColoredPath::new(
            points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
            Rgb::new(10, 20, 30),
            false,
        );

        let simplified = simplify_path(&path, 0.1);
        assert_eq!(simplified.points.len(), 2);
        assert_eq!(simplified.color, path.color);
        assert!(!simplified.closed);
    }

    #[test]
    fn zero_tolerance_is_a_no_op() {
        use crate::color::Rgb;

        let path = ColoredPath::new(
            points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
            Rgb::new(0, 0, 0),
            false,
        );
        assert_eq!(simplify_path(&path, 0.0), path);
    }
}
