//! Layout algorithms: deterministic placements and stochastic force
//! simulations.

mod circular;
mod force;

pub use circular::Circular;
pub use force::{ForceDirected, ForceDirectedOptions, ForceModel};

use crate::error::Result;
use crate::graph::{Graph, Layout};

/// Produces a layout for a graph without mutating it.
///
/// Stochastic implementations draw all randomness from `seed`, so a fixed
/// seed reproduces a layout exactly; deterministic ones ignore it. The
/// returned layout assigns a position to every node of the input.
pub trait LayoutAlgorithm {
    fn name(&self) -> &'static str;

    /// Deterministic algorithms are invoked exactly once per evaluation;
    /// stochastic ones once per trial.
    fn is_deterministic(&self) -> bool;

    fn layout(&self, graph: &Graph, seed: u64) -> Result<Layout>;
}
