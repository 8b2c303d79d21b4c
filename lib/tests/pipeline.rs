use image::{DynamicImage, Rgb as ImageRgb, RgbImage};
use polarplot::commands::CommandConverter;
use polarplot::config::{ImageProcessingConfig, MachineConfig, RenderStyle};
use polarplot::error::PipelineError;
use polarplot::{process, process_with_progress, Stage};

fn gray_image(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        ImageRgb([value, value, value]),
    ))
}

fn small_machine() -> MachineConfig {
    MachineConfig {
        width: 200.0,
        height: 200.0,
        safe_margin: 20.0,
        ..Default::default()
    }
}

#[test]
fn stipple_pipeline_produces_a_valid_command_stream() {
    let machine = small_machine();
    let processing = ImageProcessingConfig {
        render_style: RenderStyle::Stipple,
        ..Default::default()
    };

    let result = process(&gray_image(100, 100, 128), &machine, &processing)
        .expect("pipeline succeeds on a mid-gray image");

    assert_eq!(result.render_style, RenderStyle::Stipple);
    assert_eq!(result.palette.len(), processing.num_colors);
    assert!(!result.paths.is_empty());
    assert!(result.total_path_length > 0.0);

    // Dot centers must land inside the safe rectangle.
    for path in &result.paths {
        let center = path.centroid();
        assert!(center.x >= 20.0 && center.x <= 180.0);
        assert!(center.y >= 20.0 && center.y <= 180.0);
    }

    let converter = CommandConverter::new(&machine);
    let commands = converter.paths_to_commands(&result.paths, result.render_style, true, true, true);
    let report = converter.validate(&commands);

    assert!(report.valid, "errors: {:?}", report.errors);
    assert_eq!(commands.len(), result.paths.len() * 3 + 2);
}

#[test]
fn hatching_pipeline_on_white_emits_nothing() {
    let machine = small_machine();
    let processing = ImageProcessingConfig {
        render_style: RenderStyle::Hatching,
        ..Default::default()
    };

    let result = process(&gray_image(80, 80, 255), &machine, &processing)
        .expect("pipeline succeeds on a white image");

    assert!(result.paths.is_empty());
    assert_eq!(result.command_count, 0);
}

#[test]
fn cross_hatch_pipeline_respects_bounds() {
    let machine = small_machine();
    let processing = ImageProcessingConfig {
        render_style: RenderStyle::CrossHatch,
        ..Default::default()
    };

    let result = process(&gray_image(80, 80, 30), &machine, &processing)
        .expect("pipeline succeeds on a dark image");

    assert!(!result.paths.is_empty());

    let converter = CommandConverter::new(&machine);
    let commands = converter.paths_to_commands(&result.paths, result.render_style, true, true, true);
    let report = converter.validate(&commands);
    assert!(report.valid, "errors: {:?}", report.errors);
}

#[test]
fn progress_reports_stages_in_order() {
    let machine = small_machine();
    let processing = ImageProcessingConfig::default();
    let mut stages = Vec::new();

    process_with_progress(&gray_image(50, 50, 100), &machine, &processing, |s| {
        stages.push(s)
    })
    .expect("pipeline succeeds");

    assert_eq!(
        stages,
        vec![
            Stage::Scale,
            Stage::Quantize,
            Stage::Render,
            Stage::Simplify,
            Stage::Order,
            Stage::Done,
        ]
    );
}

#[test]
fn unimplemented_style_fails_the_run() {
    let machine = small_machine();
    let processing = ImageProcessingConfig {
        render_style: RenderStyle::Dithered,
        ..Default::default()
    };

    let result = process(&gray_image(50, 50, 100), &machine, &processing);
    assert!(matches!(
        result,
        Err(PipelineError::UnimplementedStyle(RenderStyle::Dithered))
    ));
}

#[test]
fn degenerate_machine_config_is_rejected_before_rendering() {
    let machine = MachineConfig {
        width: 30.0,
        height: 30.0,
        safe_margin: 20.0,
        ..Default::default()
    };

    let result = process(
        &gray_image(50, 50, 100),
        &machine,
        &ImageProcessingConfig::default(),
    );
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn identical_runs_are_bit_reproducible() {
    let machine = small_machine();
    let processing = ImageProcessingConfig {
        render_style: RenderStyle::Hatching,
        ..Default::default()
    };

    let img = gray_image(60, 60, 90);
    let a = process(&img, &machine, &processing).expect("first run");
    let b = process(&img, &machine, &processing).expect("second run");

    assert_eq!(a.paths, b.paths);
    assert_eq!(a.palette, b.palette);
}
