//! Aggregation of repeated evaluations into per-algorithm statistics and a
//! majority-vote winner.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chooser::{EvaluatedLayout, LayoutVariant};
use crate::error::{Error, Result};
use crate::metric::LayoutMetric;
use crate::stats::{Stats, StatsAccumulator};

/// Pooled outcome of many [`EvaluatedLayout`] results for one metric.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummary {
    /// How often each algorithm was the chosen winner.
    pub votes: BTreeMap<String, usize>,
    /// Most-voted algorithm; ties break alphabetically.
    pub winning_algorithm: String,
    /// Statistics over the union of all per-trial metric values, per
    /// algorithm. Non-finite trial values are left out of the pool.
    pub stats_by_algorithm: BTreeMap<String, Stats>,
    /// The single best variant seen for each algorithm, compared on mean
    /// metric value.
    pub best_variant_by_algorithm: BTreeMap<String, LayoutVariant>,
}

impl ExperimentSummary {
    pub fn aggregate(metric: &dyn LayoutMetric, trials: &[EvaluatedLayout]) -> Result<Self> {
        if trials.is_empty() {
            return Err(Error::invalid_configuration(
                "experiment needs at least one evaluated layout",
            ));
        }
        let improvement = metric.improvement();

        let mut votes: BTreeMap<String, usize> = BTreeMap::new();
        let mut accumulators: BTreeMap<String, StatsAccumulator> = BTreeMap::new();
        let mut best_variant_by_algorithm: BTreeMap<String, LayoutVariant> = BTreeMap::new();

        for trial in trials {
            *votes.entry(trial.layout_name().to_string()).or_insert(0) += 1;
            for (name, variant) in trial.variants() {
                let acc = accumulators.entry(name.clone()).or_default();
                for &value in variant.all_metric_values.iter().filter(|v| v.is_finite()) {
                    acc.add(value);
                }
                let replace = match best_variant_by_algorithm.get(name) {
                    Some(best) => improvement
                        .is_better(variant.average_metric_value, best.average_metric_value),
                    None => true,
                };
                if replace {
                    best_variant_by_algorithm.insert(name.clone(), variant.clone());
                }
            }
        }

        // BTreeMap iterates alphabetically, and only a strictly greater count
        // replaces the leader, so ties resolve to the lexicographically
        // smallest name.
        let mut winning_algorithm = String::new();
        let mut winning_votes = 0usize;
        for (name, &count) in &votes {
            if count > winning_votes {
                winning_algorithm = name.clone();
                winning_votes = count;
            }
        }

        let stats_by_algorithm = accumulators
            .into_iter()
            .map(|(name, acc)| (name, acc.snapshot()))
            .collect();

        Ok(Self {
            votes,
            winning_algorithm,
            stats_by_algorithm,
            best_variant_by_algorithm,
        })
    }
}

/// Aggregation entry point mirroring [`crate::choose_layout`].
pub fn run_experiment(
    metric: &dyn LayoutMetric,
    trials: &[EvaluatedLayout],
) -> Result<ExperimentSummary> {
    ExperimentSummary::aggregate(metric, trials)
}
