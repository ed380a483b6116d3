//! Streaming statistics over metric values.

use serde::{Deserialize, Serialize};

/// Welford accumulator: single pass, numerically stable mean and population
/// variance. Mirrors what the chooser needs between trials (running mean) and
/// what the experiment aggregator needs after pooling (mean + std dev).
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// NaN when no values have been added.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.mean
    }

    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        (self.m2 / self.count as f64).max(0.0)
    }

    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }

    pub fn snapshot(&self) -> Stats {
        Stats {
            count: self.count,
            mean: self.mean(),
            std_dev: self.population_std_dev(),
        }
    }
}

/// Immutable summary of one pooled value series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stats {
    pub count: u64,
    pub mean: f64,
    pub std_dev: f64,
}
