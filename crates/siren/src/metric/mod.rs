//! Aesthetic (layout) and topology-only (graph) quality metrics.
//!
//! Every metric carries its direction of improvement; selection code compares
//! values through [`Improvement`] and never hardcodes an ordering.

mod angles;
mod crossings;
mod edge_lengths;
mod energy;
mod entropy;
mod shape;

pub use angles::NodeAngleResolution;
pub use crossings::{CrossingAngleResolution, NumberOfCrossings};
pub use edge_lengths::{EdgeLengthStd, NodeNonUniformity};
pub use energy::{AdjacencyMatrixEnergy, Baimuratov};
pub use entropy::{DegreeEntropy, HosoyaEntropy};
pub use shape::ShapeGraphSimilarity;

use crate::graph::{Graph, Layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Improvement {
    HigherIsBetter,
    LowerIsBetter,
}

impl Improvement {
    /// True when `candidate` is strictly better than `incumbent`. False for
    /// ties and for any NaN operand, so incumbents survive degenerate values.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Improvement::HigherIsBetter => candidate > incumbent,
            Improvement::LowerIsBetter => candidate < incumbent,
        }
    }
}

/// A scalar quality function over a laid-out graph.
///
/// Implementations are stateless: calling [`LayoutMetric::calculate`] twice
/// on the same input yields the same value. Degenerate inputs (no edges, one
/// node) produce the metric's documented sentinel, never a panic.
pub trait LayoutMetric {
    fn name(&self) -> &'static str;

    fn improvement(&self) -> Improvement;

    fn calculate(&self, graph: &Graph, layout: &Layout) -> f64;
}

/// A scalar quality function over graph topology alone.
pub trait GraphMetric {
    fn name(&self) -> &'static str;

    fn improvement(&self) -> Improvement;

    fn calculate(&self, graph: &Graph) -> f64;
}
