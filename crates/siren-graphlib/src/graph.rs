//! Core multigraph container.
//!
//! Node identity is a unique string id. Edges are identified by an
//! [`EdgeKey`] of `(v, w, name)`; the optional `name` disambiguates parallel
//! edges when the graph is a multigraph. Inserting an edge ensures both
//! endpoints exist, so an edge always references two nodes present in the
//! same graph instance.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: false,
            directed: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }
}

impl PartialEq for EdgeKey {
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v && self.w == other.w && self.name == other.name
    }
}

impl Eq for EdgeKey {}

impl Hash for EdgeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v.hash(state);
        self.w.hash(state);
        self.name.hash(state);
    }
}

/// Borrowed view used for lookups without allocating an owned key.
#[derive(Clone, Copy, Hash)]
struct EdgeKeyView<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl<'a> hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'a> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

#[derive(Debug, Clone)]
struct AdjCache {
    generation: u64,
    out: Vec<Vec<usize>>,
    in_: Vec<Vec<usize>>,
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,
    graph_label: G,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Metric scans call `successors` / `predecessors` / `neighbors` once per
    // node; scanning `self.edges` each time would be O(E) per query. The
    // cache is rebuilt lazily after any structural mutation.
    //
    // Note: interior mutability keeps the query APIs on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<AdjCache>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn ensure_adj(&self) -> std::cell::RefMut<'_, AdjCache> {
        let generation = self.adj_gen;
        let mut cache = self.adj_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            let mut out: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
            let mut in_: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
            for (edge_idx, e) in self.edges.iter().enumerate() {
                let Some(&v_idx) = self.node_index.get(&e.key.v) else {
                    continue;
                };
                let Some(&w_idx) = self.node_index.get(&e.key.w) else {
                    continue;
                };
                out[v_idx].push(edge_idx);
                in_[w_idx].push(edge_idx);
            }
            *cache = Some(AdjCache {
                generation,
                out,
                in_,
            });
        }
        std::cell::RefMut::map(cache, |c| {
            c.as_mut()
                .expect("adjacency cache should be present after ensure")
        })
    }

    fn canonicalize_endpoints(&self, v: String, w: String) -> (String, String) {
        if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        }
    }

    fn canonicalize_name(&self, name: Option<String>) -> Option<String> {
        if self.options.multigraph { name } else { None }
    }

    fn edge_key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let (v, w) = self.canonicalize_endpoints(v.into(), w.into());
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        let name = self.canonicalize_name(name.map(Into::into));
        let key = EdgeKey { v, w, name };

        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        self.invalidate_adj();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label: label.unwrap_or_default(),
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        let view = self.edge_key_view(v, w, name);
        self.edge_index.get(&view).is_some()
    }

    /// True when at least one edge leads from `v` toward `w` (for undirected
    /// graphs: connects `v` and `w`), regardless of the edge name.
    pub fn has_edge_between(&self, v: &str, w: &str) -> bool {
        if !self.options.multigraph {
            return self.has_edge(v, w, None);
        }
        let Some(&v_idx) = self.node_index.get(v) else {
            return false;
        };
        let cache = self.ensure_adj();
        let from_v = cache.out[v_idx].iter().any(|&i| self.edges[i].key.w == w);
        if from_v || self.options.directed {
            return from_v;
        }
        cache.in_[v_idx].iter().any(|&i| self.edges[i].key.v == w)
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let view = self.edge_key_view(v, w, name);
        let idx = *self.edge_index.get(&view)?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let view = self.edge_key_view(v, w, name);
        let idx = *self.edge_index.get(&view)?;
        Some(&mut self.edges[idx].label)
    }

    fn remove_edge_at_index(&mut self, idx: usize) {
        self.invalidate_adj();
        let _ = self.edge_index.remove_entry(&self.edges[idx].key);
        self.edges.remove(idx);
        for i in idx..self.edges.len() {
            let k = &self.edges[i].key;
            if let Some(v) = self.edge_index.get_mut(k) {
                *v = i;
            }
        }
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let view = self.edge_key_view(v, w, name);
        let Some(&idx) = self.edge_index.get(&view) else {
            return false;
        };
        self.remove_edge_at_index(idx);
        true
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.invalidate_adj();
        self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            let node_id = self.nodes[i].id.as_str();
            if let Some(v) = self.node_index.get_mut(node_id) {
                *v = i;
            }
        }

        // Remove incident edges.
        let mut removed_any_edge = false;
        for e in &self.edges {
            if e.key.v == id || e.key.w == id {
                removed_any_edge = true;
                let _ = self.edge_index.remove_entry(&e.key);
            }
        }
        if removed_any_edge {
            self.edges.retain(|e| e.key.v != id && e.key.w != id);
            for (i, e) in self.edges.iter().enumerate() {
                if let Some(v) = self.edge_index.get_mut(&e.key) {
                    *v = i;
                }
            }
        }

        true
    }

    /// Targets of edges leaving `v`. For undirected graphs this is the full
    /// adjacency (same as [`Graph::neighbors`]), duplicates included for
    /// parallel edges.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        let mut out: Vec<&str> = Vec::with_capacity(cache.out[v_idx].len());
        for &edge_idx in &cache.out[v_idx] {
            out.push(self.edges[edge_idx].key.w.as_str());
        }
        if !self.options.directed {
            for &edge_idx in &cache.in_[v_idx] {
                let u = self.edges[edge_idx].key.v.as_str();
                if u != v {
                    out.push(u);
                }
            }
        }
        out
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.successors(v);
        }
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        let mut out: Vec<&str> = Vec::with_capacity(cache.in_[v_idx].len());
        for &edge_idx in &cache.in_[v_idx] {
            out.push(self.edges[edge_idx].key.v.as_str());
        }
        out
    }

    /// Distinct adjacent nodes in either direction, in first-seen order.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for w in self.successors(v) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        for u in self.predecessors(v) {
            if !out.contains(&u) {
                out.push(u);
            }
        }
        out
    }

    /// Number of edge endpoints incident to `v` (self loops count twice).
    pub fn degree(&self, v: &str) -> usize {
        let Some(&v_idx) = self.node_index.get(v) else {
            return 0;
        };
        let cache = self.ensure_adj();
        cache.out[v_idx].len() + cache.in_[v_idx].len()
    }

    pub fn out_degree(&self, v: &str) -> usize {
        let Some(&v_idx) = self.node_index.get(v) else {
            return 0;
        };
        self.ensure_adj().out[v_idx].len()
    }

    pub fn in_degree(&self, v: &str) -> usize {
        let Some(&v_idx) = self.node_index.get(v) else {
            return 0;
        };
        self.ensure_adj().in_[v_idx].len()
    }
}

impl<N, E, G> Clone for Graph<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }
}

impl<N, E, G> std::fmt::Debug for Graph<N, E, G>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
    G: Default + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Graph, GraphOptions};

    type G = Graph<(), (), ()>;

    fn directed_multi() -> G {
        Graph::new(GraphOptions {
            multigraph: true,
            directed: true,
        })
    }

    #[test]
    fn set_edge_ensures_endpoints() {
        let mut g = directed_multi();
        g.set_edge("a", "b");
        assert!(g.has_node("a"));
        assert!(g.has_node("b"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_need_distinct_names() {
        let mut g = directed_multi();
        g.set_edge_named("a", "b", Some("e1"), None);
        g.set_edge_named("a", "b", Some("e2"), None);
        g.set_edge_named("a", "b", Some("e1"), None);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge_between("a", "b"));
        assert!(!g.has_edge_between("b", "a"));
    }

    #[test]
    fn undirected_canonicalizes_endpoints() {
        let mut g: G = Graph::new(GraphOptions {
            multigraph: false,
            directed: false,
        });
        g.set_edge("b", "a");
        assert!(g.has_edge("a", "b", None));
        assert!(g.has_edge("b", "a", None));
        assert!(g.has_edge_between("a", "b"));
        assert_eq!(g.neighbors("a"), vec!["b"]);
        assert_eq!(g.neighbors("b"), vec!["a"]);
    }

    #[test]
    fn successors_and_degree_track_direction() {
        let mut g = directed_multi();
        g.set_edge("a", "b");
        g.set_edge("a", "c");
        g.set_edge("c", "a");
        assert_eq!(g.successors("a"), vec!["b", "c"]);
        assert_eq!(g.predecessors("a"), vec!["c"]);
        assert_eq!(g.out_degree("a"), 2);
        assert_eq!(g.in_degree("a"), 1);
        assert_eq!(g.degree("a"), 3);
        assert_eq!(g.neighbors("a"), vec!["b", "c"]);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = directed_multi();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("a", "c");
        assert!(g.remove_node("b"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("a", "c", None));
        assert_eq!(g.successors("a"), vec!["c"]);
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut g = directed_multi();
        g.set_edge("a", "b");
        let mut copy = g.clone();
        copy.set_edge("b", "c");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(copy.edge_count(), 2);
    }
}
