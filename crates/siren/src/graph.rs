//! Engine-facing graph and layout types.
//!
//! The container comes from `siren-graphlib`; this module pins its label
//! types and defines [`Layout`], the positional half of a layout result.
//! Positions are never stored on the graph itself: a `Layout` is meaningful
//! only in the context of the one algorithm invocation that produced it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::Point;

pub use siren_graphlib::{EdgeKey, GraphOptions};

/// Node payload: a display label plus nothing else. Domain annotations of
/// upstream converters stay upstream.
#[derive(Debug, Clone, Default)]
pub struct NodeAttrs {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeAttrs {
    pub label: Option<String>,
}

/// The graph every algorithm and metric in this crate operates on.
pub type Graph = siren_graphlib::Graph<NodeAttrs, EdgeAttrs, ()>;

/// Convenience constructor for the directed multigraph shape the engine
/// expects from its collaborators.
pub fn new_graph() -> Graph {
    Graph::new(GraphOptions {
        multigraph: true,
        directed: true,
    })
}

/// An assignment of 2D coordinates to node ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    positions: BTreeMap<String, Point>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, p: Point) {
        self.positions.insert(id.into(), p);
    }

    pub fn point(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, &p)| (id.as_str(), p))
    }

    /// Checks the algorithm contract: every node of `graph` has a position.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        for id in graph.nodes() {
            if !self.positions.contains_key(id) {
                return Err(Error::MissingPosition {
                    node: id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Both endpoint positions of an edge, when present.
    pub fn segment(&self, key: &EdgeKey) -> Option<(Point, Point)> {
        Some((self.point(&key.v)?, self.point(&key.w)?))
    }
}
