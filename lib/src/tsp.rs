//! Greedy path ordering to minimize pen-up travel.
//!
//! Nearest-neighbor tour over whole paths: the tour starts with the
//! path whose start point sits closest to the machine center (the rest
//! position), then repeatedly appends the remaining path whose start
//! *or* end point is nearest to the current tour end. A match on the
//! end point appends the path reversed.

use crate::path::ColoredPath;
use crate::point::Point;
use log::debug;

/// Total pen-up travel of an ordering: the sum of gaps between each
/// path's end and the next path's start.
pub fn total_travel(paths: &[ColoredPath]) -> f64 {
    paths
        .windows(2)
        .map(|pair| pair[0].end().distance(&pair[1].start()))
        .sum()
}

fn nearest_to_center(paths: &[ColoredPath], center: Point) -> usize {
    let mut best = 0;
    let mut best_distance = f64::MAX;

    for (index, path) in paths.iter().enumerate() {
        let distance = path.start().distance(&center);

        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }

    best
}

/// Order paths into a nearest-neighbor tour seeded at `center`.
/// Ties resolve to the first candidate scanned, so the result is
/// deterministic for a given input order. O(n^2) in the path count.
pub fn order_paths(paths: Vec<ColoredPath>, center: Point) -> Vec<ColoredPath> {
    if paths.len() <= 1 {
        return paths;
    }

    let before = total_travel(&paths);

    let mut remaining = paths;
    let mut tour = Vec::with_capacity(remaining.len());

    let seed = nearest_to_center(&remaining, center);
    tour.push(remaining.swap_remove(seed));

    while !remaining.is_empty() {
        let current_end = tour[tour.len() - 1].end();

        let mut best = 0;
        let mut best_distance = f64::MAX;
        let mut best_reversed = false;

        for (index, candidate) in remaining.iter().enumerate() {
            let to_start = current_end.distance(&candidate.start());

            if to_start < best_distance {
                best_distance = to_start;
                best = index;
                best_reversed = false;
            }

            let to_end = current_end.distance(&candidate.end());

            if to_end < best_distance {
                best_distance = to_end;
                best = index;
                best_reversed = true;
            }
        }

        let chosen = remaining.swap_remove(best);
        tour.push(if best_reversed {
            chosen.reversed()
        } else {
            chosen
        });
    }

    let after = total_travel(&tour);
    debug!(
        "path ordering: travel {:.1} mm -> {:.1} mm over {} paths",
        before,
        after,
        tour.len()
    );

    tour
}
