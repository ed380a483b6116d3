//! Edge-length statistics and pairwise-distance uniformity.

use crate::graph::{Graph, Layout};
use crate::metric::{Improvement, LayoutMetric};

/// Average geometric edge length, counting only edges with both endpoint
/// positions. `None` when no such edge exists.
fn mean_edge_length(graph: &Graph, layout: &Layout) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for key in graph.edges() {
        if let Some((p, q)) = layout.segment(key) {
            sum += p.distance(q);
            count += 1;
        }
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Population standard deviation of edge lengths. 0 for graphs without
/// edges; uniform drawings score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeLengthStd;

impl LayoutMetric for EdgeLengthStd {
    fn name(&self) -> &'static str {
        "EdgeLengthStd"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let mut sum = 0.0;
        let mut sum_of_squares = 0.0;
        let mut count = 0usize;
        for key in graph.edges() {
            if let Some((p, q)) = layout.segment(key) {
                sum += p.distance(q);
                sum_of_squares += p.distance_sq(q);
                count += 1;
            }
        }
        if count == 0 {
            return 0.0;
        }
        let mean = sum / count as f64;
        let mean_of_squares = sum_of_squares / count as f64;
        (mean_of_squares - mean * mean).max(0.0).sqrt()
    }
}

/// Sum of inverse-square pairwise node distances, normalized by the mean
/// edge length. Tightly clustered drawings score high, so lower is better.
/// 0 when the graph has no measurable edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeNonUniformity;

impl LayoutMetric for NodeNonUniformity {
    fn name(&self) -> &'static str {
        "NodeNonUniformity"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let Some(mean_length) = mean_edge_length(graph, layout) else {
            return 0.0;
        };
        if mean_length == 0.0 {
            return 0.0;
        }
        let points: Vec<_> = graph
            .nodes()
            .filter_map(|id| layout.point(id))
            .collect();
        let mut total = 0.0;
        for (i, &p) in points.iter().enumerate() {
            for (j, &q) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let normalized = p.distance(q) / mean_length;
                total += 1.0 / (normalized * normalized);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeLengthStd, NodeNonUniformity, mean_edge_length};
    use crate::geom::Point;
    use crate::graph::{Layout, new_graph};
    use crate::metric::LayoutMetric;

    fn two_edge_graph() -> (crate::graph::Graph, Layout) {
        // edge lengths 3 and 5
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        let mut layout = Layout::new();
        layout.set("a", Point::new(0.0, 0.0));
        layout.set("b", Point::new(3.0, 0.0));
        layout.set("c", Point::new(3.0, 5.0));
        (g, layout)
    }

    #[test]
    fn std_of_lengths_three_and_five_is_one() {
        let (g, layout) = two_edge_graph();
        let std = EdgeLengthStd.calculate(&g, &layout);
        assert!((std - 1.0).abs() < 1e-12, "got {std}");
    }

    #[test]
    fn uniform_lengths_score_zero() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        let mut layout = Layout::new();
        layout.set("a", Point::new(0.0, 0.0));
        layout.set("b", Point::new(2.0, 0.0));
        layout.set("c", Point::new(4.0, 0.0));
        assert_eq!(EdgeLengthStd.calculate(&g, &layout), 0.0);
    }

    #[test]
    fn no_edges_is_a_defined_zero() {
        let mut g = new_graph();
        g.ensure_node("lonely");
        let layout = Layout::new();
        assert_eq!(EdgeLengthStd.calculate(&g, &layout), 0.0);
        assert_eq!(NodeNonUniformity.calculate(&g, &layout), 0.0);
    }

    #[test]
    fn mean_length_averages_measurable_edges() {
        let (g, layout) = two_edge_graph();
        assert_eq!(mean_edge_length(&g, &layout), Some(4.0));
    }

    #[test]
    fn metric_is_idempotent() {
        let (g, layout) = two_edge_graph();
        let first = EdgeLengthStd.calculate(&g, &layout);
        let second = EdgeLengthStd.calculate(&g, &layout);
        assert_eq!(first, second);
    }

    #[test]
    fn spreading_nodes_lowers_non_uniformity() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");

        let mut tight = Layout::new();
        tight.set("a", Point::new(0.0, 0.0));
        tight.set("b", Point::new(1.0, 0.0));
        tight.set("c", Point::new(1.1, 0.0));

        let mut spread = Layout::new();
        spread.set("a", Point::new(0.0, 0.0));
        spread.set("b", Point::new(1.0, 0.0));
        spread.set("c", Point::new(2.0, 0.0));

        let tight_score = NodeNonUniformity.calculate(&g, &tight);
        let spread_score = NodeNonUniformity.calculate(&g, &spread);
        assert!(spread_score < tight_score);
    }
}
