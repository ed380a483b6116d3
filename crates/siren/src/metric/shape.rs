//! Shape-graph similarity: does the geometry of the drawing resemble the
//! topology of the graph?
//!
//! Builds a k-nearest-neighbor "shape graph" over node positions and compares
//! it against the original topology with a mean per-node Jaccard index of
//! neighbor sets.

use rustc_hash::FxHashSet;
use siren_graphlib::GraphOptions;

use crate::geom::Point;
use crate::graph::{Graph, Layout};
use crate::metric::{Improvement, LayoutMetric};

type ShapeGraph = siren_graphlib::Graph<(), (), ()>;

/// Exact k-nearest-neighbor search over a fixed point set. Small and
/// recursive; node counts in this domain are far below where an approximate
/// index would pay off.
struct KdTree {
    points: Vec<Point>,
    root: Option<Box<KdNode>>,
}

struct KdNode {
    point_idx: usize,
    axis: usize,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

impl KdTree {
    fn build(points: Vec<Point>) -> Self {
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let root = Self::build_node(&points, &mut indices, 0);
        Self { points, root }
    }

    fn build_node(points: &[Point], indices: &mut [usize], depth: usize) -> Option<Box<KdNode>> {
        if indices.is_empty() {
            return None;
        }
        let axis = depth % 2;
        indices.sort_by(|&a, &b| {
            let ka = if axis == 0 { points[a].x } else { points[a].y };
            let kb = if axis == 0 { points[b].x } else { points[b].y };
            ka.total_cmp(&kb)
        });
        let median = indices.len() / 2;
        let point_idx = indices[median];
        let (left, rest) = indices.split_at_mut(median);
        let right = &mut rest[1..];
        Some(Box::new(KdNode {
            point_idx,
            axis,
            left: Self::build_node(points, left, depth + 1),
            right: Self::build_node(points, right, depth + 1),
        }))
    }

    /// Indices of the `k` points closest to `query`, nearest first. The
    /// query point itself is part of the point set and may appear in the
    /// result; callers filter it out.
    fn k_nearest(&self, query: Point, k: usize) -> Vec<usize> {
        if k == 0 {
            return Vec::new();
        }
        // (distance², point index), kept sorted, worst candidate last.
        let mut best: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        self.search(self.root.as_deref(), query, k, &mut best);
        best.into_iter().map(|(_, idx)| idx).collect()
    }

    fn search(
        &self,
        node: Option<&KdNode>,
        query: Point,
        k: usize,
        best: &mut Vec<(f64, usize)>,
    ) {
        let Some(node) = node else {
            return;
        };
        let point = self.points[node.point_idx];
        let dist_sq = query.distance_sq(point);
        let pos = best.partition_point(|&(d, _)| d <= dist_sq);
        best.insert(pos, (dist_sq, node.point_idx));
        if best.len() > k {
            best.pop();
        }

        let axis_delta = if node.axis == 0 {
            query.x - point.x
        } else {
            query.y - point.y
        };
        let (near, far) = if axis_delta <= 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };
        self.search(near, query, k, best);
        // The far side can hold a closer point only if the splitting plane is
        // nearer than the current worst candidate.
        let worst = best.last().map(|&(d, _)| d).unwrap_or(f64::INFINITY);
        if best.len() < k || axis_delta * axis_delta < worst {
            self.search(far, query, k, best);
        }
    }
}

/// Mean per-node Jaccard index between leaving-neighbor sets in `graph` and
/// adjacency sets in the shape graph. A node with an empty set on either
/// side scores a perfect 1.
fn mean_jaccard(graph: &Graph, shape: &ShapeGraph) -> f64 {
    if graph.node_count() == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for node in graph.nodes() {
        let a: FxHashSet<&str> = graph.successors(node).into_iter().collect();
        let b: FxHashSet<&str> = shape.neighbors(node).into_iter().collect();
        if a.is_empty() || b.is_empty() {
            total += 1.0;
            continue;
        }
        let intersection = a.intersection(&b).count();
        let union = a.union(&b).count();
        total += intersection as f64 / union as f64;
    }
    total / graph.node_count() as f64
}

/// Compares the drawing's k-nearest-neighbor structure to the graph's
/// topology. 1 means geometric proximity mirrors connectivity exactly.
#[derive(Debug, Clone, Copy)]
pub struct ShapeGraphSimilarity {
    k: usize,
}

impl ShapeGraphSimilarity {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Default for ShapeGraphSimilarity {
    fn default() -> Self {
        Self::new(5)
    }
}

impl LayoutMetric for ShapeGraphSimilarity {
    fn name(&self) -> &'static str {
        "ShapeGraphSimilarity"
    }

    fn improvement(&self) -> Improvement {
        Improvement::HigherIsBetter
    }

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64 {
        let mut ids: Vec<&str> = Vec::with_capacity(graph.node_count());
        let mut points: Vec<Point> = Vec::with_capacity(graph.node_count());
        let mut shape = ShapeGraph::new(GraphOptions {
            multigraph: false,
            directed: false,
        });
        for id in graph.nodes() {
            shape.ensure_node(id);
            if let Some(p) = layout.point(id) {
                ids.push(id);
                points.push(p);
            }
        }
        let tree = KdTree::build(points.clone());
        for (i, &id) in ids.iter().enumerate() {
            // k + 1 because the query point finds itself.
            for neighbor_idx in tree.k_nearest(points[i], self.k + 1) {
                let neighbor = ids[neighbor_idx];
                if neighbor != id && !shape.has_edge_between(id, neighbor) {
                    shape.set_edge(id, neighbor);
                }
            }
        }
        mean_jaccard(graph, &shape)
    }
}

#[cfg(test)]
mod tests {
    use super::{KdTree, ShapeGraphSimilarity, mean_jaccard};
    use crate::geom::Point;
    use crate::graph::{Layout, new_graph};
    use crate::metric::LayoutMetric;
    use siren_graphlib::GraphOptions;

    #[test]
    fn kd_tree_matches_brute_force() {
        let points: Vec<Point> = (0..40)
            .map(|i| {
                let f = i as f64;
                Point::new((f * 0.73).sin() * 10.0, (f * 1.31).cos() * 10.0)
            })
            .collect();
        let tree = KdTree::build(points.clone());
        for (qi, &q) in points.iter().enumerate() {
            let mut expected: Vec<usize> = (0..points.len()).collect();
            expected.sort_by(|&a, &b| {
                q.distance_sq(points[a]).total_cmp(&q.distance_sq(points[b]))
            });
            expected.truncate(4);
            let got = tree.k_nearest(q, 4);
            let mut got_dists: Vec<f64> = got.iter().map(|&i| q.distance_sq(points[i])).collect();
            let expected_dists: Vec<f64> =
                expected.iter().map(|&i| q.distance_sq(points[i])).collect();
            got_dists
                .iter()
                .zip(&expected_dists)
                .for_each(|(g, e)| assert!((g - e).abs() < 1e-12, "query {qi}: {g} vs {e}"));
        }
    }

    #[test]
    fn kd_tree_finds_itself_first() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(-3.0, 2.0),
        ];
        let tree = KdTree::build(points.clone());
        assert_eq!(tree.k_nearest(points[1], 1), vec![1]);
    }

    #[test]
    fn jaccard_compares_leaving_sets_against_shape_adjacency() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        let mut shape = siren_graphlib::Graph::<(), (), ()>::new(GraphOptions {
            multigraph: false,
            directed: false,
        });
        shape.set_edge("a", "b");
        shape.set_edge("b", "c");
        shape.ensure_node("c");
        // "c" has no leaving edges in the directed original, which scores 1
        // by the empty-set rule; "a" and "b" match their shape neighbors
        // only partially.
        let value = mean_jaccard(&g, &shape);
        assert!(value > 0.8, "got {value}");
    }

    #[test]
    fn nodes_without_neighbors_score_perfect() {
        let mut g = new_graph();
        g.ensure_node("x");
        g.ensure_node("y");
        let shape = siren_graphlib::Graph::<(), (), ()>::new(GraphOptions {
            multigraph: false,
            directed: false,
        });
        assert_eq!(mean_jaccard(&g, &shape), 1.0);
    }

    #[test]
    fn chain_laid_out_as_a_line_scores_high() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("c", "d");
        let mut layout = Layout::new();
        layout.set("a", Point::new(0.0, 0.0));
        layout.set("b", Point::new(1.0, 0.0));
        layout.set("c", Point::new(2.0, 0.0));
        layout.set("d", Point::new(3.0, 0.0));
        let value = ShapeGraphSimilarity::new(1).calculate(&g, &layout);
        assert!(value > 0.5, "got {value}");
    }

    #[test]
    fn empty_graph_scores_zero() {
        let g = new_graph();
        let layout = Layout::new();
        assert_eq!(ShapeGraphSimilarity::default().calculate(&g, &layout), 0.0);
    }
}
