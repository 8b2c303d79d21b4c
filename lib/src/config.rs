use crate::error::PipelineError;
use crate::point::Point;
use crate::quantize::QuantizeMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The rendering algorithm used to turn a raster into drawable paths.
///
/// `Dithered` is declared for the settings UI but has no renderer yet;
/// selecting it fails the run with [`PipelineError::UnimplementedStyle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    Stipple,
    Hatching,
    CrossHatch,
    Dithered,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStyle::Stipple => "stipple",
            RenderStyle::Hatching => "hatching",
            RenderStyle::CrossHatch => "cross-hatch",
            RenderStyle::Dithered => "dithered",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stipple" => Ok(RenderStyle::Stipple),
            "hatching" => Ok(RenderStyle::Hatching),
            "cross-hatch" => Ok(RenderStyle::CrossHatch),
            "dithered" => Ok(RenderStyle::Dithered),
            other => Err(format!("unknown render style '{}'", other)),
        }
    }
}

/// Physical machine parameters, kept in sync with the firmware.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// drawing surface width in mm
    pub width: f64,

    /// drawing surface height in mm
    pub height: f64,

    /// margin in mm subtracted from every edge; moves outside the
    /// resulting safe rectangle are rejected by validation
    pub safe_margin: f64,

    pub led_enabled: bool,
    pub led_brightness: u8,

    pub steps_per_mm: f64,
    pub steps_per_revolution: u32,
    pub microstepping: u32,

    /// movement speed in mm/s, used for execution time estimates
    pub speed: f64,

    /// acceleration in mm/s^2, consumed by the firmware only
    pub acceleration: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            width: 800.0,
            height: 600.0,
            safe_margin: 50.0,
            led_enabled: true,
            led_brightness: 128,
            steps_per_mm: 5.035,
            steps_per_revolution: 200,
            microstepping: 16,
            speed: 100.0,
            acceleration: 500.0,
        }
    }
}

impl MachineConfig {
    pub fn safe_width(&self) -> f64 {
        self.width - 2.0 * self.safe_margin
    }

    pub fn safe_height(&self) -> f64 {
        self.height - 2.0 * self.safe_margin
    }

    /// The rest position the `H` command returns to.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reject degenerate geometry before any rendering starts.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.safe_margin < 0.0 {
            return Err(PipelineError::Config(
                "safe margin must not be negative".into(),
            ));
        }

        if self.safe_width() <= 0.0 || self.safe_height() <= 0.0 {
            return Err(PipelineError::Config(format!(
                "safe drawing area is empty: {}x{} mm with {} mm margin",
                self.width, self.height, self.safe_margin
            )));
        }

        Ok(())
    }
}

/// Per-style rendering tunables, one live snapshot per processing run.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProcessingConfig {
    pub render_style: RenderStyle,

    /// target palette size, 4..=32
    pub num_colors: usize,
    pub quantize_method: QuantizeMethod,

    /// Douglas-Peucker tolerance in mm; non-positive disables
    /// simplification
    pub simplify_tolerance: f64,

    pub stipple_min_radius: f64,
    pub stipple_max_radius: f64,
    pub stipple_density: f64,
    pub stipple_points_per_circle: usize,
    pub stipple_invert: bool,

    /// hatch angle in degrees, [0, 180)
    pub hatching_angle: f64,
    pub hatching_line_spacing_light: f64,
    pub hatching_line_spacing_dark: f64,
    pub hatching_segment_min_length: f64,
    pub hatching_segment_max_length: f64,
    pub hatching_segment_gap: f64,
    pub hatching_invert: bool,

    pub cross_hatch_base_angle: f64,
    /// number of hatch directions, 2..=4
    pub cross_hatch_max_angles: usize,
    pub cross_hatch_line_spacing_light: f64,
    pub cross_hatch_line_spacing_dark: f64,
    pub cross_hatch_segment_min_length: f64,
    pub cross_hatch_segment_max_length: f64,
    pub cross_hatch_segment_gap: f64,
}

impl Default for ImageProcessingConfig {
    fn default() -> Self {
        ImageProcessingConfig {
            render_style: RenderStyle::Stipple,
            num_colors: 8,
            quantize_method: QuantizeMethod::Cluster,
            simplify_tolerance: 0.2,
            stipple_min_radius: 0.15,
            stipple_max_radius: 3.0,
            stipple_density: 0.1,
            stipple_points_per_circle: 8,
            stipple_invert: false,
            hatching_angle: 45.0,
            hatching_line_spacing_light: 8.0,
            hatching_line_spacing_dark: 2.0,
            hatching_segment_min_length: 2.0,
            hatching_segment_max_length: 10.0,
            hatching_segment_gap: 1.0,
            hatching_invert: false,
            cross_hatch_base_angle: 45.0,
            cross_hatch_max_angles: 4,
            cross_hatch_line_spacing_light: 6.0,
            cross_hatch_line_spacing_dark: 1.5,
            cross_hatch_segment_min_length: 1.5,
            cross_hatch_segment_max_length: 8.0,
            cross_hatch_segment_gap: 0.8,
        }
    }
}

impl ImageProcessingConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let positive: [(&str, f64); 12] = [
            ("stipple_min_radius", self.stipple_min_radius),
            ("stipple_max_radius", self.stipple_max_radius),
            (
                "hatching_line_spacing_light",
                self.hatching_line_spacing_light,
            ),
            (
                "hatching_line_spacing_dark",
                self.hatching_line_spacing_dark,
            ),
            (
                "hatching_segment_min_length",
                self.hatching_segment_min_length,
            ),
            (
                "hatching_segment_max_length",
                self.hatching_segment_max_length,
            ),
            ("hatching_segment_gap", self.hatching_segment_gap),
            (
                "cross_hatch_line_spacing_light",
                self.cross_hatch_line_spacing_light,
            ),
            (
                "cross_hatch_line_spacing_dark",
                self.cross_hatch_line_spacing_dark,
            ),
            (
                "cross_hatch_segment_min_length",
                self.cross_hatch_segment_min_length,
            ),
            (
                "cross_hatch_segment_max_length",
                self.cross_hatch_segment_max_length,
            ),
            ("cross_hatch_segment_gap", self.cross_hatch_segment_gap),
        ];

        for (name, value) in positive {
            if value <= 0.0 {
                return Err(PipelineError::Config(format!(
                    "{} must be strictly positive, got {}",
                    name, value
                )));
            }
        }

        for (name, angle) in [
            ("hatching_angle", self.hatching_angle),
            ("cross_hatch_base_angle", self.cross_hatch_base_angle),
        ] {
            if !(0.0..180.0).contains(&angle) {
                return Err(PipelineError::Config(format!(
                    "{} must be in [0, 180), got {}",
                    name, angle
                )));
            }
        }

        if !(4..=32).contains(&self.num_colors) {
            return Err(PipelineError::Config(format!(
                "num_colors must be in 4..=32, got {}",
                self.num_colors
            )));
        }

        if !(2..=4).contains(&self.cross_hatch_max_angles) {
            return Err(PipelineError::Config(format!(
                "cross_hatch_max_angles must be in 2..=4, got {}",
                self.cross_hatch_max_angles
            )));
        }

        if self.stipple_points_per_circle < 3 {
            return Err(PipelineError::Config(
                "stipple_points_per_circle must be at least 3".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.stipple_density) {
            return Err(PipelineError::Config(format!(
                "stipple_density must be in [0, 1], got {}",
                self.stipple_density
            )));
        }

        Ok(())
    }
}

/// Serial link state as reported by the transport layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    /// Legal transitions: connect attempts start from `Disconnected`,
    /// any state may fail into `Error`, and both `Connected` and
    /// `Error` resolve back to `Disconnected` on explicit disconnect.
    pub fn can_transition(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        match (self, next) {
            (_, Error) => true,
            (Disconnected, Connecting) => true,
            (Connecting, Connected) => true,
            (Connected, Disconnected) | (Error, Disconnected) => true,
            _ => false,
        }
    }
}

/// Last known hardware telemetry. The rendering core never mutates
/// this; it exists so callers and the transport share one record type.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct PlotterState {
    pub position: Point,
    pub left_cable: f64,
    pub right_cable: f64,
    pub steps_per_mm: f64,
    pub connection: ConnectionState,
}

impl Default for PlotterState {
    fn default() -> Self {
        let machine = MachineConfig::default();

        PlotterState {
            position: machine.center(),
            left_cable: 0.0,
            right_cable: 0.0,
            steps_per_mm: machine.steps_per_mm,
            connection: ConnectionState::Disconnected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_are_valid() {
        assert!(MachineConfig::default().validate().is_ok());
        assert!(ImageProcessingConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_safe_area_is_rejected() {
        let machine = MachineConfig {
            width: 80.0,
            safe_margin: 50.0,
            ..Default::default()
        };
        assert!(machine.validate().is_err());
    }

    #[test]
    fn zero_radius_is_rejected() {
        let config = ImageProcessingConfig {
            stipple_min_radius: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn angle_out_of_range_is_rejected() {
        let config = ImageProcessingConfig {
            hatching_angle: 180.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn connection_state_machine() {
        use ConnectionState::*;

        assert!(Disconnected.can_transition(Connecting));
        assert!(Connecting.can_transition(Connected));
        assert!(Connecting.can_transition(Error));
        assert!(Connected.can_transition(Disconnected));
        assert!(Error.can_transition(Disconnected));

        assert!(!Disconnected.can_transition(Connected));
        assert!(!Connected.can_transition(Connecting));
    }
}
