mod common;

use common::init_logger;
use lane_pilot::lanes::{extract_lanes, LaneOptions};
use lane_pilot::segments::RawSegment;
use lane_pilot::{decide, extract_dominant_lanes, Decision, NoLanesFound};

/// Three segments per lane boundary plus one steep noise segment.
fn two_lanes_and_noise() -> Vec<RawSegment> {
    vec![
        RawSegment::new(100, 300, 300, 500),
        RawSegment::new(700, 300, 500, 500),
        RawSegment::new(400, 300, 420, 370),
        RawSegment::new(110, 300, 310, 520),
        RawSegment::new(690, 310, 490, 530),
        RawSegment::new(120, 320, 320, 500),
        RawSegment::new(680, 300, 480, 480),
    ]
}

#[test]
fn dominant_lanes_ignore_noise_and_keep_straight() {
    init_logger();
    let opts = LaneOptions::default();
    let extraction = extract_lanes(&two_lanes_and_noise(), &opts);
    let sizes: Vec<usize> = extraction.clusters.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);

    let lanes = extract_dominant_lanes(&two_lanes_and_noise(), &opts).expect("two lanes");
    assert_eq!(lanes.first.support, 3);
    assert_eq!(lanes.second.support, 3);
    let (a, b) = lanes.slopes();
    assert_eq!(decide(a, b), Decision::SteerStraight);
}

#[test]
fn representative_lane_is_rounded_mean() {
    init_logger();
    let lanes = extract_dominant_lanes(&two_lanes_and_noise(), &LaneOptions::default())
        .expect("two lanes");
    // Left members projected onto y=300 and y=600:
    // (100, 400), (110, 382.7), (97.8, 431.1)
    let left = lanes.first;
    assert_eq!((left.y1, left.y2), (300, 600));
    assert_eq!(left.slope, 1.0);
    assert_eq!(left.x1, 103);
    assert_eq!(left.x2, 405);
}

#[test]
fn input_order_decides_cluster_keys() {
    init_logger();
    let opts = LaneOptions::default();
    let mut reversed = two_lanes_and_noise();
    reversed.reverse();
    let forward = extract_lanes(&two_lanes_and_noise(), &opts);
    let backward = extract_lanes(&reversed, &opts);
    assert_eq!(forward.clusters[0].key_slope(), 1.0);
    assert_eq!(backward.clusters[0].key_slope(), -0.9);
}

#[test]
fn only_degenerate_segments_yield_no_lanes() {
    init_logger();
    let segments = [
        RawSegment::new(400, 300, 400, 500),
        RawSegment::new(100, 450, 300, 450),
    ];
    assert_eq!(
        extract_dominant_lanes(&segments, &LaneOptions::default()),
        Err(NoLanesFound {
            segments: 2,
            usable: 0,
            clusters: 0
        })
    );
}

#[test]
fn both_lanes_leaning_right_steer_right() {
    init_logger();
    let segments = [
        RawSegment::new(300, 300, 100, 500),
        RawSegment::new(310, 310, 110, 510),
        RawSegment::new(700, 300, 500, 400),
    ];
    let lanes = extract_dominant_lanes(&segments, &LaneOptions::default()).expect("two lanes");
    assert_eq!(Decision::from_lanes(&lanes), Decision::SteerRight);
}
