use super::timing::TimingBreakdown;
use crate::decision::Decision;
use crate::lanes::{Cluster, DominantLanes, LaneExtraction, RejectionCounts, RepresentativeLane};
use serde::Serialize;

/// Serializable summary of one processed frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    /// Edge pixels left after preprocessing.
    pub edge_pixels: usize,
    pub segments: usize,
    pub rejected: RejectionCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_y: Option<i32>,
    pub clusters: Vec<ClusterSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanes: Option<DominantLanes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl FrameReport {
    pub fn new(input: InputDescriptor) -> Self {
        Self {
            input,
            timings: TimingBreakdown::default(),
            edge_pixels: 0,
            segments: 0,
            rejected: RejectionCounts::default(),
            horizon_y: None,
            clusters: Vec::new(),
            lanes: None,
            decision: None,
            failure: None,
        }
    }

    pub(crate) fn record_extraction(&mut self, extraction: &LaneExtraction) {
        self.segments = extraction.segments;
        self.rejected = extraction.rejected;
        self.horizon_y = extraction.min_y;
        self.clusters = extraction
            .clusters
            .iter()
            .map(ClusterSummary::from_cluster)
            .collect();
    }

    /// One-line human summary, as printed by the demo tools.
    pub fn summary_line(&self) -> String {
        match (&self.decision, &self.failure) {
            (Some(decision), _) => format!(
                "{decision} (segments={} clusters={} total={:.2}ms)",
                self.segments,
                self.clusters.len(),
                self.timings.total_ms
            ),
            (None, Some(reason)) => format!("no decision: {reason}"),
            (None, None) => "no decision".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub key_slope: f64,
    pub key_intercept: f64,
    pub size: usize,
    pub representative: RepresentativeLane,
}

impl ClusterSummary {
    pub fn from_cluster(cluster: &Cluster) -> Self {
        Self {
            key_slope: cluster.key_slope(),
            key_intercept: cluster.key_intercept(),
            size: cluster.len(),
            representative: cluster.representative(),
        }
    }
}
