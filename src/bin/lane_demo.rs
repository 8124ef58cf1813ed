use lane_pilot::config::pipeline;
use lane_pilot::image::io::{load_frame, save_grayscale_u8, write_json_file};
use lane_pilot::LaneDetector;
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
    let config = pipeline::load_config(Path::new(&config_path))?;
    let input = config
        .inputs
        .first()
        .ok_or("Config lists no inputs")?;

    let frame = load_frame(input)?;
    let detector = LaneDetector::new(config.detector_params()).map_err(|e| e.to_string())?;
    let report = detector.process_with_diagnostics(&frame.as_view());

    println!("{}: {}", input.display(), report.trace.summary_line());
    for (idx, cluster) in report.trace.clusters.iter().enumerate() {
        println!(
            "  cluster {idx}: size={} m={:.3} c={:.1}",
            cluster.size, cluster.key_slope, cluster.key_intercept
        );
    }
    if let Some(lanes) = &report.trace.lanes {
        for lane in [&lanes.first, &lanes.second] {
            println!(
                "  lane ({}, {}) -> ({}, {}) m={:.3} support={}",
                lane.x1, lane.y1, lane.x2, lane.y2, lane.slope, lane.support
            );
        }
    }

    if let (Some(path), Some(mask)) = (&config.output.mask_image, &report.mask) {
        save_grayscale_u8(mask, path)?;
        println!("Saved edge mask to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report.trace)?;
        println!("Saved frame report to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: lane_demo <config.json>".to_string()
}
