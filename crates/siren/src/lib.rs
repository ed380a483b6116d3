#![forbid(unsafe_code)]

//! Headless graph layout selection and aesthetic-metric evaluation.
//!
//! Given an abstract graph, `siren` computes candidate layouts under several
//! algorithms, scores each with a pluggable aesthetic metric, tracks
//! statistical convergence across repeated randomized trials, and returns the
//! best layout together with the best-performing algorithm on average.
//! [`ExperimentSummary`] then pools many such evaluations into per-algorithm
//! statistics and a majority-vote winner.
//!
//! The crate is runtime-agnostic and does no I/O; graph construction and
//! result export belong to its collaborators.

pub mod algo;
pub mod chooser;
pub mod error;
pub mod experiment;
pub mod geom;
pub mod graph;
pub mod metric;
pub mod rng;
pub mod stats;

pub use algo::{Circular, ForceDirected, ForceDirectedOptions, ForceModel, LayoutAlgorithm};
pub use chooser::{
    CancelToken, EvaluatedLayout, LayoutChooser, LayoutVariant, TrialConfig, choose_layout,
};
pub use error::{Error, Result};
pub use experiment::{ExperimentSummary, run_experiment};
pub use geom::Point;
pub use graph::{EdgeAttrs, Graph, Layout, NodeAttrs, new_graph};
pub use metric::{
    AdjacencyMatrixEnergy, Baimuratov, CrossingAngleResolution, DegreeEntropy, EdgeLengthStd,
    GraphMetric, HosoyaEntropy, Improvement, LayoutMetric, NodeAngleResolution, NodeNonUniformity,
    NumberOfCrossings, ShapeGraphSimilarity,
};
