//! Serialization of ordered paths into the firmware command stream,
//! plus bounds validation and travel estimates.
//!
//! The wire format is one textual command per line and must be kept
//! exactly as the firmware expects it:
//!
//! - `H` returns the gondola to the rest position.
//! - `M <x> <y> [<r> <g> <b>]` moves to (x, y) in mm with one decimal
//!   place; the optional RGB triple is interpolated during the move.

use crate::config::{MachineConfig, RenderStyle};
use crate::path::ColoredPath;
use log::info;

/// Converts colored paths to plotter commands against one machine
/// profile.
pub struct CommandConverter<'a> {
    machine: &'a MachineConfig,
}

/// Outcome of a validation pass. Errors accumulate; validation never
/// stops at the first offense so the caller can show all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl<'a> CommandConverter<'a> {
    pub fn new(machine: &'a MachineConfig) -> Self {
        CommandConverter { machine }
    }

    fn move_command(&self, x: f64, y: f64, color: Option<crate::color::Rgb>) -> String {
        match color {
            Some(c) => format!("M {:.1} {:.1} {} {} {}", x, y, c.r, c.g, c.b),
            None => format!("M {:.1} {:.1}", x, y),
        }
    }

    /// One move per path point, carrying the path color on every point
    /// when `include_color` is set so the firmware can interpolate the
    /// LED along the stroke. Closed paths get an explicit return to the
    /// first point here, at serialization time only.
    pub fn path_to_commands(&self, path: &ColoredPath, include_color: bool) -> Vec<String> {
        let color = include_color.then_some(path.color);
        let mut commands: Vec<String> = path
            .points
            .iter()
            .map(|p| self.move_command(p.x, p.y, color))
            .collect();

        if path.closed && !path.points.is_empty() {
            let first = path.points[0];
            commands.push(self.move_command(first.x, first.y, color));
        }

        commands
    }

    /// A stipple is physically a single dab, not an outline: move to
    /// the dot centroid dark, flash the path color, go dark again.
    fn stipple_to_commands(&self, path: &ColoredPath) -> Vec<String> {
        let center = path.centroid();
        let c = path.color;

        vec![
            format!("M {:.1} {:.1} 0 0 0", center.x, center.y),
            format!("M {:.1} {:.1} {} {} {}", center.x, center.y, c.r, c.g, c.b),
            format!("M {:.1} {:.1} 0 0 0", center.x, center.y),
        ]
    }

    /// Serialize an ordered path list into the full command stream.
    pub fn paths_to_commands(
        &self,
        paths: &[ColoredPath],
        style: RenderStyle,
        include_color: bool,
        add_home_start: bool,
        add_home_end: bool,
    ) -> Vec<String> {
        let mut commands = Vec::new();

        if add_home_start {
            commands.push("H".to_string());
        }

        for path in paths {
            if path.points.is_empty() {
                continue;
            }

            if style == RenderStyle::Stipple {
                commands.extend(self.stipple_to_commands(path));
            } else {
                commands.extend(self.path_to_commands(path, include_color));
            }
        }

        if add_home_end {
            commands.push("H".to_string());
        }

        info!("serialized {} paths into {} commands", paths.len(), commands.len());

        commands
    }

    /// Total Euclidean travel of the command stream in mm. `H` counts
    /// as a move to the machine center; unparseable commands are
    /// skipped here (validation reports them separately).
    pub fn total_distance(&self, commands: &[String]) -> f64 {
        let mut total = 0.0;
        let mut previous: Option<(f64, f64)> = None;

        for command in commands {
            let target = if command == "H" {
                let center = self.machine.center();
                Some((center.x, center.y))
            } else {
                parse_move(command)
            };

            if let Some((x, y)) = target {
                if let Some((px, py)) = previous {
                    total += ((x - px).powi(2) + (y - py).powi(2)).sqrt();
                }
                previous = Some((x, y));
            }
        }

        total
    }

    /// Estimated execution time in seconds at the configured speed.
    /// Non-positive speeds yield zero rather than a division error.
    pub fn estimate_time(&self, commands: &[String]) -> f64 {
        if self.machine.speed <= 0.0 {
            return 0.0;
        }

        self.total_distance(commands) / self.machine.speed
    }

    /// Check every command against the machine's safe rectangle and
    /// the RGB range. Collects one error message per offense and an
    /// overall pass flag.
    pub fn validate(&self, commands: &[String]) -> ValidationReport {
        let margin = self.machine.safe_margin;
        let min_x = margin;
        let max_x = self.machine.width - margin;
        let min_y = margin;
        let max_y = self.machine.height - margin;

        let mut errors = Vec::new();

        for (index, command) in commands.iter().enumerate() {
            if !command.starts_with("M ") {
                continue;
            }

            let parts: Vec<&str> = command.split_whitespace().collect();

            if parts.len() < 3 {
                errors.push(format!("command {}: truncated move", index));
                continue;
            }

            let coords = (parts[1].parse::<f64>(), parts[2].parse::<f64>());

            let (x, y) = match coords {
                (Ok(x), Ok(y)) => (x, y),
                _ => {
                    errors.push(format!("command {}: invalid coordinate format", index));
                    continue;
                }
            };

            if x < min_x || x > max_x {
                errors.push(format!(
                    "command {}: X={:.1} out of bounds ({:.1} to {:.1})",
                    index, x, min_x, max_x
                ));
            }

            if y < min_y || y > max_y {
                errors.push(format!(
                    "command {}: Y={:.1} out of bounds ({:.1} to {:.1})",
                    index, y, min_y, max_y
                ));
            }

            if parts.len() >= 6 {
                match (
                    parts[3].parse::<i64>(),
                    parts[4].parse::<i64>(),
                    parts[5].parse::<i64>(),
                ) {
                    (Ok(r), Ok(g), Ok(b)) => {
                        let in_range = |c| (0..=255).contains(&c);

                        if !(in_range(r) && in_range(g) && in_range(b)) {
                            errors.push(format!(
                                "command {}: RGB values out of range (0-255)",
                                index
                            ));
                        }
                    }
                    _ => errors.push(format!("command {}: invalid RGB values", index)),
                }
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn parse_move(command: &str) -> Option<(f64, f64)> {
    let mut parts = command.split_whitespace();

    if parts.next() != Some("M") {
        return None;
    }

    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}
