use lane_pilot::control::{run_control_loop, FrameQueue, LogActuator};
use lane_pilot::image::{OwnedFrame, PixelFormat};
use lane_pilot::segments::HoughOptions;
use lane_pilot::{DetectorParams, FallbackPolicy, LaneDetector};
use log::info;

const WIDTH: usize = 800;
const HEIGHT: usize = 600;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Demo: a short synthetic drive, drifting right and back, then a frame
    // with no markings to exercise the fallback.
    let params = DetectorParams {
        hough: HoughOptions {
            threshold: 80,
            ..HoughOptions::default()
        },
        ..DetectorParams::default()
    };
    let detector = match LaneDetector::new(params) {
        Ok(detector) => detector,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let frames: Vec<OwnedFrame> = [0.0f32, 100.0, 200.0, 100.0, 0.0]
        .iter()
        .map(|&shift| road_frame(shift))
        .chain(std::iter::once(blank_frame()))
        .collect();
    info!("running control loop over {} synthetic frames", frames.len());

    let mut source = FrameQueue::from(frames);
    let mut actuator = LogActuator;
    let summary = run_control_loop(&mut source, &detector, &mut actuator, FallbackPolicy::Straight);
    println!(
        "frames={} decided={} fallbacks={} actuated={:?}",
        summary.frames, summary.decided, summary.fallbacks, summary.actuated
    );
}

/// Two lane markings whose far ends are shifted right by `shift` pixels.
fn road_frame(shift: f32) -> OwnedFrame {
    let mut img = vec![20u8; WIDTH * HEIGHT];
    paint_marking(&mut img, (240.0 + shift, 300.0), (100.0, 580.0));
    paint_marking(&mut img, (540.0 + shift, 300.0), (652.0, 580.0));
    OwnedFrame::new(WIDTH, HEIGHT, PixelFormat::Gray8, img)
}

fn blank_frame() -> OwnedFrame {
    OwnedFrame::new(WIDTH, HEIGHT, PixelFormat::Gray8, vec![20u8; WIDTH * HEIGHT])
}

fn paint_marking(img: &mut [u8], top: (f32, f32), bottom: (f32, f32)) {
    let (y0, y1) = (top.1 as usize, bottom.1 as usize);
    for y in y0..=y1.min(HEIGHT - 1) {
        let t = (y as f32 - top.1) / (bottom.1 - top.1);
        let xc = (top.0 + t * (bottom.0 - top.0)).round() as i64;
        for x in (xc - 3).max(0)..=(xc + 3).min(WIDTH as i64 - 1) {
            img[y * WIDTH + x as usize] = 235;
        }
    }
}
