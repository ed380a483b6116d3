#![forbid(unsafe_code)]

//! Graph container APIs used by `siren`.
//!
//! A mutable, directed-capable multigraph with string node ids and generic
//! node/edge/graph labels. Layout results live outside the graph: algorithms
//! and metrics treat the container as topology plus labels, never as a place
//! to stash coordinates.

mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions};
