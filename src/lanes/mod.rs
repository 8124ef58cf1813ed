//! Lane clustering engine.
//!
//! Turns the raw segments of one frame into the two dominant lane lines:
//!
//! 1. Horizon: `min_y` is the smallest y over all segments; `max_y` is the
//!    configured frame bottom.
//! 2. Fit: each segment becomes `y = m·x + c`, re-projected onto `min_y` and
//!    `max_y`. Vertical, horizontal, non-finite and far off-screen fits are
//!    rejected (see [`DegenerateSegment`]) and only logged.
//! 3. Cluster: greedy, first-match, single pass in detection order
//!    ([`cluster_lines`]).
//! 4. Select: the two largest clusters, ties resolved by creation order.
//! 5. Average: each selected cluster is reduced to a [`RepresentativeLane`].
//!
//! Nothing is retained between calls; the output is a pure function of the
//! input sequence and the options.

mod cluster;
mod equation;
mod options;
mod representative;

pub use cluster::{cluster_lines, dominant_pair, Cluster};
pub use equation::{fit_segment, DegenerateSegment, LineEquation};
pub use options::{LaneOptions, LaneOptionsError};
pub use representative::{DominantLanes, RepresentativeLane};

use crate::segments::RawSegment;
use log::debug;
use serde::Serialize;

/// Too little evidence for two lane boundaries in this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoLanesFound {
    /// Segments received.
    pub segments: usize,
    /// Segments that survived fitting.
    pub usable: usize,
    /// Clusters formed from the usable segments.
    pub clusters: usize,
}

impl std::fmt::Display for NoLanesFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no lanes found ({} segments, {} usable, {} clusters; need 2 clusters)",
            self.segments, self.usable, self.clusters
        )
    }
}

impl std::error::Error for NoLanesFound {}

/// Per-reason counts of segments kept out of clustering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionCounts {
    pub vertical: usize,
    pub horizontal: usize,
    pub non_finite: usize,
    pub out_of_bounds: usize,
}

impl RejectionCounts {
    fn record(&mut self, reason: &DegenerateSegment) {
        match reason {
            DegenerateSegment::Vertical => self.vertical += 1,
            DegenerateSegment::Horizontal => self.horizontal += 1,
            DegenerateSegment::NonFinite => self.non_finite += 1,
            DegenerateSegment::OutOfBounds { .. } => self.out_of_bounds += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.vertical + self.horizontal + self.non_finite + self.out_of_bounds
    }
}

/// Full clustering outcome for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneExtraction {
    pub segments: usize,
    /// Horizon row; `None` for an empty frame.
    pub min_y: Option<i32>,
    pub max_y: i32,
    pub clusters: Vec<Cluster>,
    pub rejected: RejectionCounts,
}

impl LaneExtraction {
    pub fn usable(&self) -> usize {
        self.segments - self.rejected.total()
    }

    /// Reduce the two largest clusters to representative lanes.
    pub fn dominant(&self) -> Result<DominantLanes, NoLanesFound> {
        let (a, b) = dominant_pair(&self.clusters).ok_or(NoLanesFound {
            segments: self.segments,
            usable: self.usable(),
            clusters: self.clusters.len(),
        })?;
        Ok(DominantLanes {
            first: self.clusters[a].representative(),
            second: self.clusters[b].representative(),
        })
    }
}

/// Fit and cluster all segments of a frame.
pub fn extract_lanes(segments: &[RawSegment], options: &LaneOptions) -> LaneExtraction {
    let Some(min_y) = segments
        .iter()
        .map(RawSegment::min_y)
        .min()
    else {
        return LaneExtraction {
            segments: 0,
            min_y: None,
            max_y: options.max_y,
            clusters: Vec::new(),
            rejected: RejectionCounts::default(),
        };
    };

    let mut rejected = RejectionCounts::default();
    let mut lines = Vec::with_capacity(segments.len());
    for (idx, seg) in segments.iter().enumerate() {
        match fit_segment(seg, min_y, options) {
            Ok(line) => lines.push(line),
            Err(reason) => {
                debug!("lanes: segment #{idx} {seg:?} rejected: {reason}");
                rejected.record(&reason);
            }
        }
    }

    let clusters = cluster_lines(lines, options.tolerance);
    debug!(
        "lanes: {} segments, {} rejected, {} clusters, horizon y={}",
        segments.len(),
        rejected.total(),
        clusters.len(),
        min_y
    );

    LaneExtraction {
        segments: segments.len(),
        min_y: Some(min_y),
        max_y: options.max_y,
        clusters,
        rejected,
    }
}

/// Find the two dominant lanes among a frame's segments.
///
/// Fails with [`NoLanesFound`] when `segments` is empty or fewer than two
/// clusters can be formed from the usable segments.
pub fn extract_dominant_lanes(
    segments: &[RawSegment],
    options: &LaneOptions,
) -> Result<DominantLanes, NoLanesFound> {
    if segments.is_empty() {
        return Err(NoLanesFound {
            segments: 0,
            usable: 0,
            clusters: 0,
        });
    }
    extract_lanes(segments, options).dominant()
}
