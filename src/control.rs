//! Frame loop: acquire → detect → decide → actuate.
//!
//! Frame acquisition and actuation are traits so the loop can be driven by
//! recorded images in tools and tests. Per-frame failures never stop the loop;
//! a [`FallbackPolicy`] decides what, if anything, is actuated instead.

use crate::decision::Decision;
use crate::detector::{FrameError, LaneDetector};
use crate::diagnostics::FpsCounter;
use crate::image::io::load_frame;
use crate::image::OwnedFrame;
use crate::segments::SegmentDetector;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

/// Synchronous frame provider; `None` ends the loop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<OwnedFrame>;
}

/// Consumer of steering decisions.
pub trait Actuator {
    fn apply(&mut self, decision: Decision);
}

/// Frames decoded one at a time from a list of image files.
///
/// Files that fail to load are logged and skipped.
#[derive(Clone, Debug, Default)]
pub struct ImageSequence {
    paths: VecDeque<PathBuf>,
}

impl ImageSequence {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Option<OwnedFrame> {
        while let Some(path) = self.paths.pop_front() {
            match load_frame(&path) {
                Ok(frame) => return Some(frame),
                Err(err) => warn!("ImageSequence: skipping frame: {err}"),
            }
        }
        None
    }
}

/// Frames already held in memory.
#[derive(Clone, Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<OwnedFrame>,
}

impl From<Vec<OwnedFrame>> for FrameQueue {
    fn from(frames: Vec<OwnedFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for FrameQueue {
    fn next_frame(&mut self) -> Option<OwnedFrame> {
        self.frames.pop_front()
    }
}

/// Logs each decision as `left`, `right` or `straight`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogActuator;

impl Actuator for LogActuator {
    fn apply(&mut self, decision: Decision) {
        info!("{decision}");
    }
}

/// Keeps every applied decision in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingActuator {
    pub decisions: Vec<Decision>,
}

impl Actuator for RecordingActuator {
    fn apply(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }
}

/// What to actuate for a frame without a decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Actuate `SteerStraight`.
    #[default]
    Straight,
    /// Repeat the last actuated decision; nothing before the first one.
    HoldPrevious,
    /// Actuate nothing.
    Suppress,
}

impl FallbackPolicy {
    pub fn resolve(&self, previous: Option<Decision>) -> Option<Decision> {
        match self {
            FallbackPolicy::Straight => Some(Decision::SteerStraight),
            FallbackPolicy::HoldPrevious => previous,
            FallbackPolicy::Suppress => None,
        }
    }
}

/// Counters gathered by [`run_control_loop`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSummary {
    pub frames: u64,
    /// Frames with a decision of their own.
    pub decided: u64,
    /// Frames where the fallback policy actuated something.
    pub fallbacks: u64,
    /// Frames where nothing was actuated.
    pub suppressed: u64,
    /// Actuations per decision, fallbacks included.
    pub actuated: BTreeMap<String, u64>,
    /// Failed frames per [`FrameError::kind`].
    pub failures: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fps: Option<f64>,
}

impl LoopSummary {
    pub fn failed(&self) -> u64 {
        self.failures.values().sum()
    }

    fn record_failure(&mut self, err: &FrameError) {
        *self.failures.entry(err.kind().to_string()).or_default() += 1;
    }

    fn record_actuation(&mut self, decision: Decision) {
        *self
            .actuated
            .entry(decision.as_str().to_string())
            .or_default() += 1;
    }
}

/// Drive frames from `source` through `detector` into `actuator` until the
/// source is exhausted.
pub fn run_control_loop<S, D, A>(
    source: &mut S,
    detector: &LaneDetector<D>,
    actuator: &mut A,
    policy: FallbackPolicy,
) -> LoopSummary
where
    S: FrameSource + ?Sized,
    D: SegmentDetector,
    A: Actuator + ?Sized,
{
    let mut summary = LoopSummary::default();
    let mut fps = FpsCounter::new();
    let mut previous: Option<Decision> = None;

    while let Some(frame) = source.next_frame() {
        summary.frames += 1;
        let applied = match detector.process(&frame.as_view()) {
            Ok(outcome) => {
                summary.decided += 1;
                Some(outcome.decision)
            }
            Err(err) => {
                debug!("frame {}: {err}", summary.frames);
                summary.record_failure(&err);
                let fallback = policy.resolve(previous);
                if fallback.is_some() {
                    summary.fallbacks += 1;
                }
                fallback
            }
        };

        match applied {
            Some(decision) => {
                actuator.apply(decision);
                summary.record_actuation(decision);
                previous = Some(decision);
            }
            None => summary.suppressed += 1,
        }

        if let Some(rate) = fps.tick() {
            info!("FPS: {rate:.1}");
            summary.last_fps = Some(rate);
        }
    }

    info!(
        "control loop done: frames={} decided={} fallbacks={} suppressed={}",
        summary.frames, summary.decided, summary.fallbacks, summary.suppressed
    );
    summary
}
