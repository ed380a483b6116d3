//! Stochastic force-directed spring embedders.
//!
//! Both models start from a random placement drawn from the trial seed and
//! iterate a spring simulation until the stabilization score (fraction of
//! nodes that have effectively stopped moving) crosses the configured limit.
//! A hard iteration cap bounds the "loop until stabilized" form: hitting it
//! returns the latest snapshot instead of hanging.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::algo::LayoutAlgorithm;
use crate::error::Result;
use crate::geom::Point;
use crate::graph::{Graph, Layout};
use crate::rng::XorShift64Star;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceModel {
    /// Linear spring attraction toward the ideal edge length, inverse-square
    /// repulsion.
    SpringBox,
    /// Logarithmic attraction, inverse-linear repulsion. Tends to expose
    /// cluster structure more than `SpringBox`.
    LinLog,
}

#[derive(Debug, Clone, Copy)]
pub struct ForceDirectedOptions {
    /// Fraction of at-rest nodes at which the simulation is considered
    /// stabilized.
    pub stabilization_limit: f64,
    /// Safety cap on simulation steps.
    pub max_iterations: usize,
    pub ideal_edge_length: f64,
    /// Per-step decay of the maximum node displacement.
    pub cooling_factor: f64,
    /// A node moving less than this per step counts as at rest.
    pub motion_epsilon: f64,
}

impl Default for ForceDirectedOptions {
    fn default() -> Self {
        Self {
            stabilization_limit: 0.9,
            max_iterations: 5000,
            ideal_edge_length: 1.0,
            cooling_factor: 0.99,
            motion_epsilon: 1e-4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForceDirected {
    model: ForceModel,
    options: ForceDirectedOptions,
}

impl ForceDirected {
    pub fn spring_box() -> Self {
        Self::with_options(ForceModel::SpringBox, ForceDirectedOptions::default())
    }

    pub fn lin_log() -> Self {
        Self::with_options(ForceModel::LinLog, ForceDirectedOptions::default())
    }

    pub fn with_options(model: ForceModel, options: ForceDirectedOptions) -> Self {
        Self { model, options }
    }

    fn repulsion(&self, distance: f64) -> f64 {
        let k = self.options.ideal_edge_length;
        match self.model {
            ForceModel::SpringBox => k * k / (distance * distance),
            ForceModel::LinLog => k / distance,
        }
    }

    fn attraction(&self, distance: f64) -> f64 {
        let k = self.options.ideal_edge_length;
        match self.model {
            ForceModel::SpringBox => (distance - k) * 0.5,
            ForceModel::LinLog => (1.0 + distance / k).ln(),
        }
    }
}

impl LayoutAlgorithm for ForceDirected {
    fn name(&self) -> &'static str {
        match self.model {
            ForceModel::SpringBox => "SpringBox",
            ForceModel::LinLog => "LinLog",
        }
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    fn layout(&self, graph: &Graph, seed: u64) -> Result<Layout> {
        let ids = graph.node_ids();
        let n = ids.len();
        let mut layout = Layout::new();
        if n == 0 {
            return Ok(layout);
        }

        let index: FxHashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        // Self loops exert no force.
        let springs: Vec<(usize, usize)> = graph
            .edges()
            .filter(|key| key.v != key.w)
            .map(|key| (index[key.v.as_str()], index[key.w.as_str()]))
            .collect();

        let mut rng = XorShift64Star::new(seed);
        let mut positions: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.next_f64_signed(), rng.next_f64_signed()))
            .collect();

        let opts = &self.options;
        // Maximum per-step displacement; cools geometrically so the
        // simulation always comes to rest within the iteration cap.
        let mut step = 0.1 * opts.ideal_edge_length;
        let mut stabilization = 0.0;
        let mut iterations = 0usize;

        while n > 1 && stabilization < opts.stabilization_limit {
            if iterations >= opts.max_iterations {
                warn!(
                    algorithm = self.name(),
                    iterations,
                    stabilization,
                    "force simulation hit its iteration cap; returning latest snapshot"
                );
                break;
            }
            iterations += 1;

            let mut forces = vec![(0.0, 0.0); n];
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let d = (dx * dx + dy * dy).sqrt().max(1e-9);
                    let f = self.repulsion(d) / d;
                    forces[i].0 += dx * f;
                    forces[i].1 += dy * f;
                    forces[j].0 -= dx * f;
                    forces[j].1 -= dy * f;
                }
            }
            for &(a, b) in &springs {
                let dx = positions[b].x - positions[a].x;
                let dy = positions[b].y - positions[a].y;
                let d = (dx * dx + dy * dy).sqrt().max(1e-9);
                let f = self.attraction(d) / d;
                forces[a].0 += dx * f;
                forces[a].1 += dy * f;
                forces[b].0 -= dx * f;
                forces[b].1 -= dy * f;
            }

            let mut at_rest = 0usize;
            for i in 0..n {
                let (fx, fy) = forces[i];
                let magnitude = (fx * fx + fy * fy).sqrt();
                let moved = magnitude.min(step);
                if magnitude > 0.0 {
                    positions[i].x += fx / magnitude * moved;
                    positions[i].y += fy / magnitude * moved;
                }
                if moved < opts.motion_epsilon {
                    at_rest += 1;
                }
            }
            stabilization = at_rest as f64 / n as f64;
            step *= opts.cooling_factor;
        }

        for (i, id) in ids.iter().enumerate() {
            layout.set(id.clone(), positions[i]);
        }
        Ok(layout)
    }
}
