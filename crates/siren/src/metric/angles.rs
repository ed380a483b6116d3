//! Angular resolution around individual nodes.

use std::f64::consts::PI;

use crate::graph::{Graph, Layout};
use crate::metric::{Improvement, LayoutMetric};

/// Minimum angular gap, in degrees, between consecutive incident edges over
/// all nodes of the drawing. Higher values mean edge directions around each
/// node are easier to tell apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeAngleResolution;

impl NodeAngleResolution {
    /// Reported when no node has two distinct neighbors: a full circle of
    /// freedom, nothing constrains the resolution.
    const UNCONSTRAINED: f64 = 360.0;

    fn canonical_angle(mut angle: f64) -> f64 {
        while angle < 0.0 {
            angle += 2.0 * PI;
        }
        while angle >= 2.0 * PI {
            angle -= 2.0 * PI;
        }
        angle
    }
}

impl LayoutMetric for NodeAngleResolution {
    fn name(&self) -> &'static str {
        "NodeAngleResolution"
    }

    fn improvement(&self) -> Improvement {
        Improvement::HigherIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let mut min_angle = f64::INFINITY;
        for node in graph.nodes() {
            let Some(node_point) = layout.point(node) else {
                continue;
            };
            let mut angles: Vec<f64> = graph
                .neighbors(node)
                .into_iter()
                .filter(|&neighbor| neighbor != node)
                .filter_map(|neighbor| {
                    let p = layout.point(neighbor)?;
                    Some(Self::canonical_angle(
                        (p.y - node_point.y).atan2(p.x - node_point.x),
                    ))
                })
                .collect();
            angles.sort_by(f64::total_cmp);
            for pair in angles.windows(2) {
                min_angle = min_angle.min(pair[1] - pair[0]);
            }
            if angles.len() > 1 {
                // wraparound gap between the largest and smallest direction
                let wrap = 2.0 * PI + angles[0] - angles[angles.len() - 1];
                min_angle = min_angle.min(wrap);
            }
        }
        if min_angle.is_finite() {
            min_angle.to_degrees()
        } else {
            Self::UNCONSTRAINED
        }
    }
}
