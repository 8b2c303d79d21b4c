use crate::color::Rgb;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// An ordered point sequence with a single color, the atomic drawable
/// unit before serialization to machine commands. Points are machine
/// space millimeters. A closed path does not repeat its first point;
/// closure is implicit via the flag and only made explicit when the
/// path is exported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColoredPath {
    pub points: Vec<Point>,
    pub color: Rgb,
    pub closed: bool,
}

impl ColoredPath {
    pub fn new(points: Vec<Point>, color: Rgb, closed: bool) -> Self {
        ColoredPath {
            points,
            color,
            closed,
        }
    }

    /// Whether the path carries enough points to be drawn: two for an
    /// open segment, three for a closed polygon.
    pub fn is_drawable(&self) -> bool {
        if self.closed {
            self.points.len() >= 3
        } else {
            self.points.len() >= 2
        }
    }

    /// A new path with the point order flipped, same color and flag.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        ColoredPath::new(points, self.color, self.closed)
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Drawn length in mm, without the implicit closing edge.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    pub fn centroid(&self) -> Point {
        let sum = self
            .points
            .iter()
            .fold(Point::origin(), |acc, p| acc + *p);
        sum / self.points.len() as f64
    }
}
