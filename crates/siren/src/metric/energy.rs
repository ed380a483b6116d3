//! Topology-only metrics: spectral energy and logarithmic edge density.

use nalgebra::DMatrix;

use crate::graph::Graph;
use crate::metric::{GraphMetric, Improvement};

/// Graph energy: the sum of singular values of the 0/1 adjacency matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacencyMatrixEnergy;

impl AdjacencyMatrixEnergy {
    fn adjacency_matrix(graph: &Graph) -> DMatrix<f64> {
        let ids = graph.node_ids();
        let n = ids.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);
        for (i, v) in ids.iter().enumerate() {
            for (j, w) in ids.iter().enumerate() {
                if i != j && graph.has_edge_between(v, w) {
                    matrix[(i, j)] = 1.0;
                }
            }
        }
        matrix
    }
}

impl GraphMetric for AdjacencyMatrixEnergy {
    fn name(&self) -> &'static str {
        "AdjacencyMatrixEnergy"
    }

    fn improvement(&self) -> Improvement {
        Improvement::HigherIsBetter
    }

    fn calculate(&self, graph: &Graph) -> f64 {
        if graph.node_count() == 0 {
            return 0.0;
        }
        let matrix = Self::adjacency_matrix(graph);
        let svd = nalgebra::linalg::SVD::new(matrix, false, false);
        svd.singular_values.iter().sum()
    }
}

/// Logarithmic edge density: `ln(edge count) / node count`. 0 for graphs
/// without nodes or edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baimuratov;

impl GraphMetric for Baimuratov {
    fn name(&self) -> &'static str {
        "Baimuratov"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph) -> f64 {
        if graph.node_count() == 0 || graph.edge_count() == 0 {
            return 0.0;
        }
        (graph.edge_count() as f64).ln() / graph.node_count() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{AdjacencyMatrixEnergy, Baimuratov};
    use crate::graph::new_graph;
    use crate::metric::GraphMetric;

    #[test]
    fn single_directed_edge_has_energy_one() {
        // adjacency [[0, 1], [0, 0]] has one singular value: 1
        let mut g = new_graph();
        g.set_edge("a", "b");
        let energy = AdjacencyMatrixEnergy.calculate(&g);
        assert!((energy - 1.0).abs() < 1e-9, "got {energy}");
    }

    #[test]
    fn two_cycle_has_energy_two() {
        // adjacency [[0, 1], [1, 0]] has singular values {1, 1}
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "a");
        let energy = AdjacencyMatrixEnergy.calculate(&g);
        assert!((energy - 2.0).abs() < 1e-9, "got {energy}");
    }

    #[test]
    fn empty_graph_has_zero_energy() {
        let g = new_graph();
        assert_eq!(AdjacencyMatrixEnergy.calculate(&g), 0.0);
    }

    #[test]
    fn parallel_edges_do_not_inflate_adjacency() {
        let mut g = new_graph();
        g.set_edge_named("a", "b", Some("e1"), None);
        g.set_edge_named("a", "b", Some("e2"), None);
        let energy = AdjacencyMatrixEnergy.calculate(&g);
        assert!((energy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn triangle_density_is_log_three_over_three() {
        let mut g = new_graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("c", "a");
        let value = Baimuratov.calculate(&g);
        assert!((value - 3.0_f64.ln() / 3.0).abs() < 1e-12, "got {value}");
    }

    #[test]
    fn single_edge_density_is_zero() {
        // ln(1) = 0 regardless of node count
        let mut g = new_graph();
        g.set_edge("a", "b");
        assert_eq!(Baimuratov.calculate(&g), 0.0);
    }

    #[test]
    fn edgeless_graph_density_is_a_defined_zero() {
        let mut g = new_graph();
        g.ensure_node("a");
        assert_eq!(Baimuratov.calculate(&g), 0.0);
    }
}
