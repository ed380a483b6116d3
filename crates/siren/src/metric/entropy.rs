//! Entropy metrics over node classifications.
//!
//! Both metrics share one shape: partition the nodes into classes, then
//! take the Shannon entropy of the class-size distribution. Regular
//! structure scores 0; a graph where every node is structurally unique
//! scores ln(n).

use std::collections::{BTreeMap, VecDeque};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::graph::Graph;
use crate::metric::{GraphMetric, Improvement};

/// Shannon entropy of the class sizes of a node partition.
fn class_entropy<T: Hash + Eq>(classes: impl IntoIterator<Item = T>) -> f64 {
    let mut sizes: FxHashMap<T, usize> = FxHashMap::default();
    let mut n = 0usize;
    for class in classes {
        *sizes.entry(class).or_insert(0) += 1;
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    sizes
        .values()
        .map(|&size| {
            let p = size as f64 / n as f64;
            -p * p.ln()
        })
        .sum()
}

/// Shannon entropy of the node-degree distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeEntropy;

impl GraphMetric for DegreeEntropy {
    fn name(&self) -> &'static str {
        "DegreeEntropy"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph) -> f64 {
        class_entropy(graph.nodes().map(|node| graph.degree(node)))
    }
}

/// `Some(d)` maps to the number of other nodes at directed hop distance
/// `d`; `None` counts the unreachable ones.
type DistanceProfile = BTreeMap<Option<usize>, usize>;

fn distance_profile<'g>(graph: &'g Graph, start: &'g str) -> DistanceProfile {
    let mut distances: FxHashMap<&'g str, usize> = FxHashMap::default();
    distances.insert(start, 0);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let d = distances[node];
        for next in graph.successors(node) {
            if !distances.contains_key(next) {
                distances.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    let mut profile = DistanceProfile::new();
    for other in graph.nodes().filter(|&other| other != start) {
        *profile.entry(distances.get(other).copied()).or_insert(0) += 1;
    }
    profile
}

/// Entropy of per-node shortest-path distance profiles.
///
/// Classifies every node by how many other nodes sit at each directed BFS
/// distance from it; nodes with identical profiles fall into one class.
/// Vertex-transitive graphs (a directed cycle, say) score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct HosoyaEntropy;

impl GraphMetric for HosoyaEntropy {
    fn name(&self) -> &'static str {
        "HosoyaEntropy"
    }

    fn improvement(&self) -> Improvement {
        Improvement::LowerIsBetter
    }

    fn calculate(&self, graph: &Graph) -> f64 {
        class_entropy(graph.nodes().map(|node| distance_profile(graph, node)))
    }
}
