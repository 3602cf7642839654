use plate_edges::config::edge_tool::load_config;
use plate_edges::image::io::{load_grayscale_image, save_grayscale_u8, write_json_file};
use plate_edges::{EdgeFinder, PipelineContext};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let crop = gray.crop(&config.region);
    if crop.width() as u32 != config.region.width || crop.height() as u32 != config.region.height {
        return Err(format!(
            "Region {:?} is not fully inside the {}x{} input",
            config.region,
            gray.width(),
            gray.height()
        ));
    }
    let text_lines: Vec<_> = config
        .text_lines
        .iter()
        .map(|line| line.to_text_line())
        .collect();

    let finder = EdgeFinder::new(config.refiner.clone());
    let ctx = PipelineContext {
        image: gray.as_view(),
        crop: crop.as_view(),
        region: config.region,
        text_lines: &text_lines,
        config: &config.plate,
    };
    let report = finder
        .find_edge_corners_detailed(&ctx)
        .map_err(|e| format!("Edge finder failed: {e}"))?;

    write_json_file(&config.output.report_json, &report)?;
    println!(
        "Saved report to {} (branch {:?}, confidence {:.3}, {:.3} ms)",
        config.output.report_json.display(),
        report.branch,
        report.confidence,
        report.timings.total_ms
    );

    if let (Some(path), Some(image)) = (&config.output.canonical_image, &report.canonical_image) {
        save_grayscale_u8(image, path)?;
        println!(
            "Saved {}x{} canonical crop to {}",
            image.width(),
            image.height(),
            path.display()
        );
    }

    Ok(())
}

fn usage() -> String {
    "Usage: plate_edges <config.json>".to_string()
}
