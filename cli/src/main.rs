use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use polarplot::commands::CommandConverter;
use polarplot::config::{ImageProcessingConfig, MachineConfig, RenderStyle};
use polarplot::quantize::QuantizeMethod;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polarplot", about = "Render a photograph into polargraph plotter commands")]
pub struct Options {
    /// Input image (PNG or JPEG)
    #[arg(long, short)]
    input: PathBuf,

    /// Output command file, one command per line
    #[arg(long, short)]
    output: PathBuf,

    /// Optional debug SVG of the rendered paths
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Machine profile as JSON; defaults apply when omitted
    #[arg(long)]
    machine: Option<PathBuf>,

    /// Render style: stipple, hatching, cross-hatch
    #[arg(long, short, default_value = "stipple")]
    style: RenderStyle,

    /// Palette size, 4..=32
    #[arg(long, default_value = "8")]
    colors: usize,

    /// Quantization method: cluster, bucket
    #[arg(long, default_value = "cluster")]
    quantize: QuantizeMethod,

    /// Douglas-Peucker tolerance in mm, 0 disables simplification
    #[arg(long, default_value = "0.2")]
    tolerance: f64,

    /// Draw light areas instead of dark ones (LED on dark media)
    #[arg(long)]
    invert: bool,

    /// Do not wrap the stream in home commands
    #[arg(long)]
    no_home: bool,

    /// Emit bare moves without RGB color updates
    #[arg(long)]
    no_color: bool,
}

fn load_machine_config(options: &Options) -> Result<MachineConfig> {
    let Some(path) = &options.machine else {
        return Ok(MachineConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read machine profile {}", path.display()))?;

    let config = serde_json::from_str(&raw)
        .with_context(|| format!("cannot parse machine profile {}", path.display()))?;

    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse();
    let machine = load_machine_config(&options)?;

    let processing = ImageProcessingConfig {
        render_style: options.style,
        num_colors: options.colors,
        quantize_method: options.quantize,
        simplify_tolerance: options.tolerance,
        stipple_invert: options.invert,
        hatching_invert: options.invert,
        ..Default::default()
    };

    info!("loading {}", options.input.display());
    let img = polarplot::load_image(&options.input)?;

    info!("processing with {} style", options.style);
    let result = polarplot::process(&img, &machine, &processing)?;

    info!(
        "{} paths, {:.1} mm drawn, estimated palette of {} colors",
        result.paths.len(),
        result.total_path_length,
        result.palette.len()
    );

    if let Some(svg_path) = &options.svg {
        polarplot::svg::write_paths(svg_path, &result.paths)
            .with_context(|| format!("cannot write {}", svg_path.display()))?;
        info!("wrote debug SVG to {}", svg_path.display());
    }

    let converter = CommandConverter::new(&machine);
    let commands = converter.paths_to_commands(
        &result.paths,
        result.render_style,
        !options.no_color,
        !options.no_home,
        !options.no_home,
    );

    let report = converter.validate(&commands);

    if !report.valid {
        for error in &report.errors {
            eprintln!("{}", error);
        }
        bail!("{} commands failed validation, nothing written", report.errors.len());
    }

    info!(
        "{} commands, {:.0} mm travel, about {:.0} s at {:.0} mm/s",
        commands.len(),
        converter.total_distance(&commands),
        converter.estimate_time(&commands),
        machine.speed
    );

    fs::write(&options.output, commands.join("\n") + "\n")
        .with_context(|| format!("cannot write {}", options.output.display()))?;

    info!("wrote {}", options.output.display());

    Ok(())
}
