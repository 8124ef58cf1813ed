mod common;

use common::init_logger;
use common::synthetic_frame::{blank_gray, gray_to_rgb, mirrored_two_lane_road, two_lane_road};
use lane_pilot::control::{run_control_loop, FrameQueue, RecordingActuator};
use lane_pilot::image::{FrameU8, OwnedFrame, PixelFormat};
use lane_pilot::segments::HoughOptions;
use lane_pilot::{Decision, DetectorParams, FallbackPolicy, FrameError, LaneDetector};

fn road_params() -> DetectorParams {
    DetectorParams {
        hough: HoughOptions {
            threshold: 80,
            ..HoughOptions::default()
        },
        ..DetectorParams::default()
    }
}

#[test]
fn two_lane_road_keeps_straight() {
    init_logger();
    let (w, h) = (800usize, 600usize);
    let buffer = gray_to_rgb(&two_lane_road());
    let frame = FrameU8::packed(w, h, PixelFormat::Rgb8, &buffer);

    let detector = LaneDetector::new(road_params()).expect("valid params");
    let report = detector.process_with_diagnostics(&frame);
    let outcome = report.outcome.expect("two lanes on a clean road");

    assert_eq!(outcome.decision, Decision::SteerStraight);
    let (a, b) = outcome.lanes.slopes();
    assert!(a * b < 0.0, "lanes should lean opposite ways: {a}, {b}");
    let (left, right) = if a < 0.0 { (a, b) } else { (b, a) };
    assert!((-2.4..-1.6).contains(&left), "unexpected left slope {left}");
    assert!((2.0..3.0).contains(&right), "unexpected right slope {right}");
    assert!(report.trace.edge_pixels > 0);
    assert!(report.trace.segments >= 2);
    let mask = report.mask.expect("mask available");
    assert_eq!((mask.width(), mask.height()), (w, h));
}

#[test]
fn pipeline_is_deterministic() {
    init_logger();
    let buffer = two_lane_road();
    let frame = FrameU8::packed(800, 600, PixelFormat::Gray8, &buffer);
    let detector = LaneDetector::new(road_params()).expect("valid params");
    let first = detector.process_with_diagnostics(&frame);
    let second = detector.process_with_diagnostics(&frame);
    assert!(first.outcome.is_ok(), "{:?}", first.outcome);
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.mask, second.mask);
    assert_eq!(first.trace.clusters, second.trace.clusters);
}

#[test]
fn mirrored_markings_share_one_cluster() {
    init_logger();
    let buffer = mirrored_two_lane_road();
    let frame = FrameU8::packed(800, 600, PixelFormat::Gray8, &buffer);
    let detector = LaneDetector::new(road_params()).expect("valid params");
    let report = detector.process_with_diagnostics(&frame);
    match report.outcome {
        Err(FrameError::NoLanes(err)) => {
            assert!(err.segments >= 2, "both markings should yield segments");
            assert_eq!(err.usable, err.segments);
            assert_eq!(err.clusters, 1);
        }
        other => panic!("expected a single cluster, got {other:?}"),
    }
    assert_eq!(report.trace.clusters.len(), 1);
}

#[test]
fn empty_road_reports_no_lanes() {
    init_logger();
    let buffer = blank_gray(800, 600);
    let frame = FrameU8::packed(800, 600, PixelFormat::Gray8, &buffer);
    let detector = LaneDetector::new(road_params()).expect("valid params");
    match detector.process(&frame) {
        Err(FrameError::NoLanes(err)) => assert_eq!(err.segments, 0),
        other => panic!("expected NoLanesFound, got {other:?}"),
    }
}

#[test]
fn control_loop_falls_back_between_good_frames() {
    init_logger();
    let road = OwnedFrame::new(800, 600, PixelFormat::Gray8, two_lane_road());
    let empty = OwnedFrame::new(800, 600, PixelFormat::Gray8, blank_gray(800, 600));
    let mut source = FrameQueue::from(vec![road.clone(), empty, road]);
    let detector = LaneDetector::new(road_params()).expect("valid params");
    let mut actuator = RecordingActuator::default();

    let summary = run_control_loop(
        &mut source,
        &detector,
        &mut actuator,
        FallbackPolicy::Suppress,
    );

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.decided, 2);
    assert_eq!(summary.suppressed, 1);
    assert_eq!(
        actuator.decisions,
        vec![Decision::SteerStraight, Decision::SteerStraight]
    );
}
