use lane_pilot::config::pipeline;
use lane_pilot::diagnostics::FrameReport;
use lane_pilot::image::io::{load_frame, write_json_file};
use lane_pilot::LaneDetector;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<FrameReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let config_path = args.next().ok_or_else(usage)?;
    let config = pipeline::load_config(Path::new(&config_path))?;
    let mut inputs: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if inputs.is_empty() {
        inputs = config.inputs.clone();
    }
    if inputs.is_empty() {
        return Err(usage());
    }

    let detector = LaneDetector::new(config.detector_params()).map_err(|e| e.to_string())?;
    let process = |input: &PathBuf| match load_frame(input) {
        Ok(frame) => BatchEntry {
            input: input.clone(),
            report: Some(detector.process_with_diagnostics(&frame.as_view()).trace),
            error: None,
        },
        Err(err) => BatchEntry {
            input: input.clone(),
            report: None,
            error: Some(err),
        },
    };

    // Collected in input order.
    #[cfg(feature = "parallel")]
    let entries: Vec<BatchEntry> = inputs.par_iter().map(process).collect();
    #[cfg(not(feature = "parallel"))]
    let entries: Vec<BatchEntry> = inputs.iter().map(process).collect();

    for entry in &entries {
        match (&entry.report, &entry.error) {
            (Some(report), _) => println!("{}: {}", entry.input.display(), report.summary_line()),
            (None, Some(err)) => println!("{}: error: {err}", entry.input.display()),
            (None, None) => {}
        }
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &entries)?;
        println!("Saved {} reports to {}", entries.len(), path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: lane_batch <config.json> [image...]".to_string()
}
