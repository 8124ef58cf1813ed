//! Per-frame diagnostics: stage timings, the serializable [`FrameReport`]
//! and a frame-rate counter for the control loop.

mod fps;
mod report;
mod timing;

pub use fps::FpsCounter;
pub use report::{ClusterSummary, FrameReport, InputDescriptor};
pub use timing::{StageTiming, TimingBreakdown};

pub(crate) use timing::elapsed_ms;
