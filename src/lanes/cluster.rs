use super::equation::LineEquation;
use super::representative::RepresentativeLane;
use nalgebra::Vector4;
use serde::Serialize;

/// Group of line equations judged to belong to one lane boundary.
///
/// The founding member's slope and intercept are the cluster's keys and never
/// change; later members are compared against them only. A cluster always
/// holds at least its founder.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    key_slope: f64,
    key_intercept: f64,
    members: Vec<LineEquation>,
}

impl Cluster {
    pub fn new(founder: LineEquation) -> Self {
        Self {
            key_slope: founder.slope,
            key_intercept: founder.intercept,
            members: vec![founder],
        }
    }

    pub fn key_slope(&self) -> f64 {
        self.key_slope
    }

    pub fn key_intercept(&self) -> f64 {
        self.key_intercept
    }

    pub fn members(&self) -> &[LineEquation] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Both slope and intercept magnitudes must fall strictly inside the
    /// `±tolerance` band around the founder's. Signs are not compared.
    pub fn accepts(&self, line: &LineEquation, tolerance: f64) -> bool {
        within_band(self.key_slope, line.slope, tolerance)
            && within_band(self.key_intercept, line.intercept, tolerance)
    }

    /// Coordinate-wise mean of the members' projected endpoints, rounded to
    /// whole pixels, tagged with the founding slope.
    pub fn representative(&self) -> RepresentativeLane {
        let sum = self
            .members
            .iter()
            .fold(Vector4::<f64>::zeros(), |acc, line| {
                acc + line.endpoints_vector()
            });
        let mean = sum / self.members.len() as f64;
        RepresentativeLane {
            x1: mean[0].round() as i32,
            y1: mean[1].round() as i32,
            x2: mean[2].round() as i32,
            y2: mean[3].round() as i32,
            slope: self.key_slope,
            support: self.members.len(),
        }
    }
}

#[inline]
fn within_band(key: f64, value: f64, tolerance: f64) -> bool {
    let (key, value) = (key.abs(), value.abs());
    key * (1.0 - tolerance) < value && value < key * (1.0 + tolerance)
}

/// Greedy single-pass clustering in input order.
///
/// Each line joins the first existing cluster (in creation order) that
/// accepts it, otherwise it founds a new one. Clusters are never merged and
/// members never move, so the result depends on input order.
pub fn cluster_lines<I>(lines: I, tolerance: f64) -> Vec<Cluster>
where
    I: IntoIterator<Item = LineEquation>,
{
    let mut clusters: Vec<Cluster> = Vec::new();
    for line in lines {
        let mut placed = false;
        for existing in clusters.iter_mut() {
            if existing.accepts(&line, tolerance) {
                existing.members.push(line);
                placed = true;
                break;
            }
        }
        if !placed {
            clusters.push(Cluster::new(line));
        }
    }
    clusters
}

/// Indices of the two largest clusters, largest first. Ties keep creation
/// order. `None` when fewer than two clusters exist.
pub fn dominant_pair(clusters: &[Cluster]) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    // stable: equal sizes stay in creation order
    order.sort_by(|&a, &b| clusters[b].len().cmp(&clusters[a].len()));
    match order.as_slice() {
        [first, second, ..] => Some((*first, *second)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 0.2;

    fn line(slope: f64, intercept: f64) -> LineEquation {
        LineEquation::new(slope, intercept, [0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn near_founder_joins_and_outside_band_splits() {
        let clusters = cluster_lines([line(1.0, 100.0), line(1.19, 115.0), line(1.21, 115.0)], TOL);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].key_slope(), 1.21);
    }

    #[test]
    fn slope_band_is_strict_on_both_ends() {
        let founder = Cluster::new(line(10.0, 100.0));
        assert!(founder.accepts(&line(8.01, 100.0), TOL));
        assert!(!founder.accepts(&line(8.0, 100.0), TOL));
        assert!(founder.accepts(&line(11.99, 100.0), TOL));
        assert!(!founder.accepts(&line(12.0, 100.0), TOL));
        assert!(!founder.accepts(&line(1.2, 100.0), TOL));
        let unit = Cluster::new(line(1.0, 100.0));
        assert!(!unit.accepts(&line(1.2, 100.0), TOL));
        assert!(unit.accepts(&line(0.81, 100.0), TOL));
        assert!(!unit.accepts(&line(0.79, 100.0), TOL));
    }

    #[test]
    fn intercept_band_is_strict_on_both_ends() {
        let founder = Cluster::new(line(1.0, 100.0));
        assert!(founder.accepts(&line(1.0, 80.5), TOL));
        assert!(!founder.accepts(&line(1.0, 80.0), TOL));
        assert!(founder.accepts(&line(1.0, 119.5), TOL));
        assert!(!founder.accepts(&line(1.0, 120.0), TOL));
    }

    #[test]
    fn slope_and_intercept_are_tested_independently() {
        let founder = Cluster::new(line(1.0, 100.0));
        // slope fine, intercept out
        assert!(!founder.accepts(&line(1.1, 130.0), TOL));
        // intercept fine, slope out
        assert!(!founder.accepts(&line(1.3, 110.0), TOL));
    }

    #[test]
    fn sign_is_ignored_by_the_band() {
        let founder = Cluster::new(line(1.0, 100.0));
        assert!(founder.accepts(&line(-1.05, -95.0), TOL));
    }

    #[test]
    fn zero_intercept_founder_accepts_nothing() {
        let clusters = cluster_lines([line(1.0, 0.0), line(1.0, 0.0)], TOL);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn first_matching_cluster_wins() {
        // the third line fits both clusters; it must join the older one
        let clusters = cluster_lines([line(1.0, 100.0), line(1.25, 100.0), line(1.12, 100.0)], TOL);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn members_are_never_reassigned() {
        // 1.15 joins the first cluster even though 1.3 arrives later and
        // would be a closer founder
        let clusters = cluster_lines([line(1.0, 100.0), line(1.15, 100.0), line(1.3, 100.0)], TOL);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].members(), &[line(1.3, 100.0)]);
    }

    #[test]
    fn averaging_rounds_to_whole_pixels() {
        let mut cluster = Cluster::new(LineEquation::new(1.5, 0.0, [10.0, 300.0, 200.0, 600.0]));
        cluster
            .members
            .push(LineEquation::new(1.6, 0.0, [20.0, 300.0, 220.0, 600.0]));
        let lane = cluster.representative();
        assert_eq!((lane.x1, lane.y1, lane.x2, lane.y2), (15, 300, 210, 600));
        assert_eq!(lane.slope, 1.5);
        assert_eq!(lane.support, 2);
    }

    #[test]
    fn dominant_pair_prefers_size_then_age() {
        let clusters = cluster_lines(
            [
                line(1.0, 100.0),
                line(-1.0, 900.0),
                line(3.5, -1100.0),
                line(3.6, -1150.0),
            ],
            TOL,
        );
        assert_eq!(clusters.len(), 3);
        assert_eq!(dominant_pair(&clusters), Some((2, 0)));
        assert_eq!(dominant_pair(&clusters[..1]), None);
    }
}
