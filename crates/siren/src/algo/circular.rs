//! Deterministic circular placement.

use std::f64::consts::PI;

use crate::algo::LayoutAlgorithm;
use crate::error::Result;
use crate::geom::Point;
use crate::graph::{Graph, Layout};

/// Evenly spaces nodes on a circle, in node insertion order starting at the
/// top of the circle.
#[derive(Debug, Clone, Copy)]
pub struct Circular {
    pub radius: f64,
}

impl Circular {
    pub fn new() -> Self {
        Self { radius: 1.0 }
    }
}

impl Default for Circular {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm for Circular {
    fn name(&self) -> &'static str {
        "Circular"
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn layout(&self, graph: &Graph, _seed: u64) -> Result<Layout> {
        let mut layout = Layout::new();
        let count = graph.node_count();
        if count == 0 {
            return Ok(layout);
        }
        let r = self.radius;
        let phi = 2.0 * PI / count as f64;
        for (i, id) in graph.nodes().enumerate() {
            let angle = i as f64 * phi;
            layout.set(id, Point::new(r + r * angle.sin(), r + r * angle.cos()));
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::Circular;
    use crate::algo::LayoutAlgorithm;
    use crate::graph::new_graph;

    #[test]
    fn repeated_invocations_are_identical() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("c", "d");
        let algo = Circular::new();
        let first = algo.layout(&g, 1).unwrap();
        let second = algo.layout(&g, 99).unwrap();
        for id in g.nodes() {
            let p = first.point(id).unwrap();
            let q = second.point(id).unwrap();
            assert_eq!(p, q);
        }
    }

    #[test]
    fn nodes_sit_on_the_circle() {
        let mut g = new_graph();
        for id in ["a", "b", "c", "d", "e"] {
            g.ensure_node(id);
        }
        let layout = Circular::new().layout(&g, 0).unwrap();
        layout.validate(&g).unwrap();
        for (_, p) in layout.iter() {
            let dx = p.x - 1.0;
            let dy = p.y - 1.0;
            assert!(((dx * dx + dy * dy).sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_graph_yields_empty_layout() {
        let g = new_graph();
        let layout = Circular::new().layout(&g, 0).unwrap();
        assert!(layout.is_empty());
    }
}
