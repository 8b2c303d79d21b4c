use crate::config::RenderStyle;
use thiserror::Error;

/// Failures that abort a processing run. Geometric edge cases during a
/// raster sweep are not errors; renderers resolve those locally with
/// safe defaults.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("render style '{0}' is not implemented")]
    UnimplementedStyle(RenderStyle),
}
