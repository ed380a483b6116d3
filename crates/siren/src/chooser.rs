//! Layout selection: repeated trials per algorithm, statistical convergence
//! detection, and cross-algorithm comparison on mean metric value.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::algo::LayoutAlgorithm;
use crate::error::{Error, Result};
use crate::graph::{Graph, Layout};
use crate::metric::LayoutMetric;
use crate::rng::XorShift64Star;
use crate::stats::StatsAccumulator;

/// Trial budget and convergence knobs for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TrialConfig {
    /// Trials per stochastic algorithm; deterministic algorithms always get
    /// exactly one.
    pub n_trials: usize,
    /// Convergence is not checked before this many finite-valued trials have
    /// run.
    pub min_trials: usize,
    /// Relative change of the running mean below which trials stop early.
    pub change_threshold: f64,
    /// Means this close to zero are treated as converged outright, since the
    /// relative change becomes numerically meaningless there.
    pub mean_epsilon: f64,
    /// Seed for the per-trial seeds handed to stochastic algorithms.
    pub seed: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            n_trials: 5,
            min_trials: 5,
            change_threshold: 0.01,
            mean_epsilon: 1e-9,
            seed: 0,
        }
    }
}

/// Cooperative cancellation, polled between trials. Stochastic algorithms
/// can be slow to stabilize, so long evaluations stay interruptible without
/// any threading inside the chooser.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of running one algorithm for its trials. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutVariant {
    pub layout_name: String,
    pub layout: Layout,
    /// Every recorded trial value, non-finite ones included.
    pub all_metric_values: Vec<f64>,
    pub best_metric_value: f64,
    /// Mean over the finite trial values.
    pub average_metric_value: f64,
}

impl LayoutVariant {
    fn new(
        layout_name: String,
        layout: Layout,
        best_metric_value: f64,
        all_metric_values: Vec<f64>,
    ) -> Self {
        let mut acc = StatsAccumulator::new();
        for &v in all_metric_values.iter().filter(|v| v.is_finite()) {
            acc.add(v);
        }
        Self {
            layout_name,
            layout,
            all_metric_values,
            best_metric_value,
            average_metric_value: acc.mean(),
        }
    }
}

/// The cross-algorithm outcome of one evaluation.
///
/// Invariant: the winner's average metric value is extremal among all
/// variants, per the metric's improvement direction.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedLayout {
    variants: IndexMap<String, LayoutVariant>,
    winner: String,
}

impl EvaluatedLayout {
    /// Per-algorithm results, in candidate order.
    pub fn variants(&self) -> &IndexMap<String, LayoutVariant> {
        &self.variants
    }

    pub fn best_variant(&self) -> &LayoutVariant {
        self.variants
            .get(self.winner.as_str())
            .expect("winner should always name a variant")
    }

    /// Name of the winning algorithm.
    pub fn layout_name(&self) -> &str {
        &self.winner
    }

    pub fn best_layout(&self) -> &Layout {
        &self.best_variant().layout
    }
}

pub struct LayoutChooser<'a> {
    algorithms: &'a [Box<dyn LayoutAlgorithm>],
    config: &'a TrialConfig,
    metric: &'a dyn LayoutMetric,
    cancel: Option<&'a CancelToken>,
}

impl<'a> LayoutChooser<'a> {
    pub fn new(
        algorithms: &'a [Box<dyn LayoutAlgorithm>],
        config: &'a TrialConfig,
        metric: &'a dyn LayoutMetric,
    ) -> Self {
        Self {
            algorithms,
            config,
            metric,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Runs every candidate algorithm and picks the best layout and the best
    /// algorithm on average, per the metric's improvement direction.
    pub fn choose(&self, graph: &Graph) -> Result<EvaluatedLayout> {
        if self.algorithms.is_empty() {
            return Err(Error::invalid_configuration("empty algorithm set"));
        }
        if self.config.n_trials == 0 {
            return Err(Error::invalid_configuration("n_trials must be at least 1"));
        }

        let improvement = self.metric.improvement();
        let mut seed_rng = XorShift64Star::new(self.config.seed);
        let mut variants: IndexMap<String, LayoutVariant> = IndexMap::new();

        for algorithm in self.algorithms {
            match self.run_trials(graph, algorithm.as_ref(), &mut seed_rng)? {
                Some(variant) => {
                    variants.insert(variant.layout_name.clone(), variant);
                }
                None => {
                    warn!(
                        algorithm = algorithm.name(),
                        "algorithm produced no usable trial; excluding it from selection"
                    );
                }
            }
        }

        let mut winner: Option<&LayoutVariant> = None;
        for variant in variants.values() {
            let better = match winner {
                None => true,
                Some(current) => improvement.is_better(
                    variant.average_metric_value,
                    current.average_metric_value,
                ),
            };
            if better {
                winner = Some(variant);
            }
        }
        let winner = winner.ok_or(Error::NoUsableAlgorithm)?.layout_name.clone();
        Ok(EvaluatedLayout { variants, winner })
    }

    /// One algorithm's trial loop. `None` when no trial produced a finite
    /// metric value.
    fn run_trials(
        &self,
        graph: &Graph,
        algorithm: &dyn LayoutAlgorithm,
        seed_rng: &mut XorShift64Star,
    ) -> Result<Option<LayoutVariant>> {
        let n_trials = if algorithm.is_deterministic() {
            1
        } else {
            self.config.n_trials
        };
        let improvement = self.metric.improvement();

        let mut best_layout: Option<Layout> = None;
        let mut best_value = f64::NAN;
        let mut values: Vec<f64> = Vec::with_capacity(n_trials);
        let mut acc = StatsAccumulator::new();
        let mut prev_mean: Option<f64> = None;
        let mut change_ratio = f64::INFINITY;
        let mut converged = false;
        let mut trials_run = 0usize;

        for trial in 0..n_trials {
            self.check_cancelled()?;
            // Every trial draws a seed even when the layout fails, so a
            // flaky algorithm does not shift the seeds of later trials.
            let trial_seed = seed_rng.next_u64();

            let layout = match algorithm.layout(graph, trial_seed) {
                Ok(layout) => layout,
                Err(err) => {
                    warn!(
                        algorithm = algorithm.name(),
                        trial,
                        error = %err,
                        "layout trial failed; excluding it"
                    );
                    continue;
                }
            };
            if let Err(err) = layout.validate(graph) {
                warn!(
                    algorithm = algorithm.name(),
                    trial,
                    error = %err,
                    "layout broke its contract; excluding the trial"
                );
                continue;
            }
            trials_run += 1;

            let value = self.metric.calculate(graph, &layout);
            values.push(value);
            if value.is_finite() {
                if best_layout.is_none() || improvement.is_better(value, best_value) {
                    best_layout = Some(layout);
                    best_value = value;
                }
                acc.add(value);

                // The ratio is only meaningful on trials that moved the
                // accumulator; a skipped non-finite value leaves the mean
                // unchanged and must not read as a zero change.
                let mean = acc.mean();
                if acc.count() as usize >= self.config.min_trials {
                    if let Some(prev) = prev_mean {
                        change_ratio = (mean - prev).abs() / prev.abs();
                        let eps = self.config.mean_epsilon;
                        if (mean.abs() < eps && prev.abs() < eps)
                            || change_ratio < self.config.change_threshold
                        {
                            converged = true;
                        }
                    }
                }
                prev_mean = Some(mean);
            }
            if converged {
                break;
            }
        }

        if converged {
            debug!(
                algorithm = algorithm.name(),
                metric = self.metric.name(),
                trials = trials_run,
                "converged"
            );
        } else if n_trials > 1 {
            warn!(
                algorithm = algorithm.name(),
                metric = self.metric.name(),
                change_ratio,
                "trial budget exhausted without convergence"
            );
        }

        Ok(best_layout.map(|layout| {
            LayoutVariant::new(algorithm.name().to_string(), layout, best_value, values)
        }))
    }
}

/// Primary entry point: evaluate `algorithms` on `graph` under `metric` and
/// return the best layout plus the full per-algorithm breakdown.
pub fn choose_layout(
    graph: &Graph,
    algorithms: &[Box<dyn LayoutAlgorithm>],
    config: &TrialConfig,
    metric: &dyn LayoutMetric,
) -> Result<EvaluatedLayout> {
    LayoutChooser::new(algorithms, config, metric).choose(graph)
}
