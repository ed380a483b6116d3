//! Crossing-based metrics sharing one segment-intersection scan.

use crate::geom::{Point, segments_intersect};
use crate::graph::{EdgeKey, Graph, Layout};
use crate::metric::{Improvement, LayoutMetric};

/// Visits every unordered pair of crossing edges that do not share an
/// endpoint. Edges without both endpoint positions are left out of the scan.
fn for_each_crossing<F>(graph: &Graph, layout: &Layout, mut f: F)
where
    F: FnMut((Point, Point), (Point, Point)),
{
    let segments: Vec<(&EdgeKey, (Point, Point))> = graph
        .edges()
        .filter_map(|key| Some((key, layout.segment(key)?)))
        .collect();
    for i in 0..segments.len() {
        let (ki, si) = segments[i];
        for &(kj, sj) in segments.iter().take(i) {
            if shares_endpoint(ki, kj) {
                continue;
            }
            if segments_intersect(si.0, si.1, sj.0, sj.1) {
                f(si, sj);
            }
        }
    }
}

fn shares_endpoint(a: &EdgeKey, b: &EdgeKey) -> bool {
    a.v == b.v || a.v == b.w || a.w == b.v || a.w == b.w
}

/// Total number of edge crossings. Zero for planar drawings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberOfCrossings;

impl LayoutMetric for NumberOfCrossings {
    fn name(&self) -> &'static str {
        "NumberOfCrossings"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let mut crossings = 0.0;
        for_each_crossing(graph, layout, |_, _| crossings += 1.0);
        crossings
    }
}

/// Minimum angle, in degrees, between any two crossing edges. 90 when the
/// drawing has no crossings at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossingAngleResolution;

impl CrossingAngleResolution {
    const NO_CROSSINGS: f64 = 90.0;

    fn crossing_angle_degrees(a: (Point, Point), b: (Point, Point)) -> Option<f64> {
        let (ax, ay) = (a.1.x - a.0.x, a.1.y - a.0.y);
        let (bx, by) = (b.1.x - b.0.x, b.1.y - b.0.y);
        let la = (ax * ax + ay * ay).sqrt();
        let lb = (bx * bx + by * by).sqrt();
        if la == 0.0 || lb == 0.0 {
            return None;
        }
        let cos = ((ax * bx + ay * by) / la / lb).abs().min(1.0);
        Some(cos.acos().to_degrees())
    }
}

impl LayoutMetric for CrossingAngleResolution {
    fn name(&self) -> &'static str {
        "CrossingAngleResolution"
    }

    fn improvement(&self) -> Improvement {
        Improvement::HigherIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let mut min_angle = Self::NO_CROSSINGS;
        for_each_crossing(graph, layout, |a, b| {
            if let Some(angle) = Self::crossing_angle_degrees(a, b) {
                min_angle = min_angle.min(angle);
            }
        });
        min_angle
    }
}
