//! Image-to-path rendering core for a cable-driven polargraph plotter.
//!
//! The pipeline turns a decoded raster photograph into colored paths in
//! machine millimeter space and finally into the textual move/home
//! command stream the firmware consumes. Everything here is
//! synchronous and side-effect free; callers wanting a responsive UI
//! run [`process`] on a worker thread and hand the result back.

pub mod color;
pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hatch;
pub mod machine;
pub mod path;
pub mod point;
pub mod quantize;
pub mod sample;
pub mod simplify;
pub mod stipple;
#[cfg(feature = "svg")]
pub mod svg;
pub mod tsp;

use crate::color::Rgb;
use crate::config::{ImageProcessingConfig, MachineConfig, RenderStyle};
use crate::error::PipelineError;
use crate::path::ColoredPath;
use image::DynamicImage;
use log::info;
use std::path::Path;

/// Coarse pipeline stages reported through the progress callback of
/// [`process_with_progress`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Scale,
    Quantize,
    Render,
    Simplify,
    Order,
    Done,
}

/// Everything a processing run produces: the ordered path list plus
/// the metadata the preview and the serializer need.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub paths: Vec<ColoredPath>,
    pub palette: Vec<Rgb>,
    pub render_style: RenderStyle,
    pub scale_factor: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub original_width: u32,
    pub original_height: u32,
    /// total drawn length in mm
    pub total_path_length: f64,
    /// number of move commands the serializer will emit points for
    pub command_count: usize,
}

/// Decode an image file. Decoding failures surface as a single
/// [`PipelineError::Image`]; no partial pipeline is attempted.
pub fn load_image(path: &Path) -> Result<DynamicImage, PipelineError> {
    Ok(image::open(path)?)
}

/// Run the full pipeline with a no-op progress callback.
pub fn process(
    img: &DynamicImage,
    machine_config: &MachineConfig,
    processing: &ImageProcessingConfig,
) -> Result<ProcessedImage, PipelineError> {
    process_with_progress(img, machine_config, processing, |_| {})
}

/// Run the full pipeline: validate configs, scale the raster to
/// machine resolution, quantize, render the selected style, simplify,
/// and order the paths for minimal pen-up travel.
pub fn process_with_progress(
    img: &DynamicImage,
    machine_config: &MachineConfig,
    processing: &ImageProcessingConfig,
    mut progress: impl FnMut(Stage),
) -> Result<ProcessedImage, PipelineError> {
    machine_config.validate()?;
    processing.validate()?;

    let original_width = img.width();
    let original_height = img.height();

    progress(Stage::Scale);
    let (scaled, scale_factor, offset_x, offset_y) =
        machine::scale_image_to_machine(img, machine_config);

    progress(Stage::Quantize);
    let (raster, palette) = quantize::quantize(&scaled, processing.num_colors, processing.quantize_method);

    progress(Stage::Render);
    info!("rendering {} style", processing.render_style);

    let paths = match processing.render_style {
        RenderStyle::Stipple => stipple::render(&raster, offset_x, offset_y, processing),
        RenderStyle::Hatching => hatch::render_hatching(&raster, offset_x, offset_y, processing),
        RenderStyle::CrossHatch => {
            hatch::render_cross_hatch(&raster, offset_x, offset_y, processing)
        }
        style => return Err(PipelineError::UnimplementedStyle(style)),
    };

    progress(Stage::Simplify);

    // Stipple dots are serialized as centroid dabs, so reducing their
    // outline points would only distort the centroid.
    let paths: Vec<ColoredPath> = if processing.render_style == RenderStyle::Stipple {
        paths
    } else {
        paths
            .iter()
            .map(|p| simplify::simplify_path(p, processing.simplify_tolerance))
            .filter(ColoredPath::is_drawable)
            .collect()
    };

    progress(Stage::Order);
    let paths = tsp::order_paths(paths, machine_config.center());

    let total_path_length: f64 = paths.iter().map(ColoredPath::length).sum();
    let command_count: usize = paths.iter().map(|p| p.points.len()).sum();

    info!(
        "pipeline done: {} paths, {:.1} mm drawn, {} commands",
        paths.len(),
        total_path_length,
        command_count
    );

    progress(Stage::Done);

    Ok(ProcessedImage {
        paths,
        palette,
        render_style: processing.render_style,
        scale_factor,
        offset_x,
        offset_y,
        original_width,
        original_height,
        total_path_length,
        command_count,
    })
}
