//! Call graph wrapper using petgraph::DiGraph keyed by Node identity
//!
//! Edges point from callee to caller, so the outgoing neighbours of a node
//! are exactly its callers. That adjacency is the reverse index the closure
//! walks.

use crate::descriptor::CallEdge;
use crate::model::*;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Class descriptor prefixes treated as standard-library code.
pub const DEFAULT_PLATFORM_PREFIXES: &[&str] = &["Ljava"];

/// Decides which class descriptors belong to the standard library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFilter {
    prefixes: Vec<String>,
}

impl PlatformFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlatformFilter {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_platform(&self, class: &str) -> bool {
        self.prefixes.iter().any(|prefix| class.starts_with(prefix.as_str()))
    }
}

impl Default for PlatformFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM_PREFIXES.iter().copied())
    }
}

/// A call graph at one granularity. Edges are unique (callee, caller) pairs.
pub struct CallGraph {
    granularity: Granularity,
    inner: DiGraph<Node, ()>,
    index: HashMap<Node, NodeIndex>,
}

impl std::fmt::Debug for CallGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallGraph")
            .field("granularity", &self.granularity)
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl CallGraph {
    pub fn new(granularity: Granularity) -> Self {
        CallGraph {
            granularity,
            inner: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Build a graph from edges, dropping duplicates.
    pub fn from_edges<I>(granularity: Granularity, edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = CallGraph::new(granularity);
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn intern(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.inner.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }

    /// Add an edge. Returns false when the pair was already present.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let callee = self.intern(edge.callee);
        let caller = self.intern(edge.caller);
        if self.inner.find_edge(callee, caller).is_some() {
            return false;
        }
        self.inner.add_edge(callee, caller, ());
        true
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.index.contains_key(node)
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// Iterate over all edges as (callee, caller).
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.inner
            .edge_references()
            .map(move |e| (&self.inner[e.source()], &self.inner[e.target()]))
    }

    /// Direct callers of a node.
    pub fn callers(&self, callee: &Node) -> impl Iterator<Item = &Node> {
        self.index
            .get(callee)
            .into_iter()
            .flat_map(move |&idx| self.inner.neighbors_directed(idx, Direction::Outgoing))
            .map(move |idx| &self.inner[idx])
    }

    pub(crate) fn index_of(&self, node: &Node) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    pub(crate) fn caller_indices(&self, callee: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.neighbors_directed(callee, Direction::Outgoing)
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.inner[idx]
    }
}

/// The two projections every run works with.
#[derive(Debug)]
pub struct Graphs {
    pub class: CallGraph,
    pub method: CallGraph,
}

impl Graphs {
    pub fn get(&self, granularity: Granularity) -> &CallGraph {
        match granularity {
            Granularity::Class => &self.class,
            Granularity::Method => &self.method,
        }
    }
}

/// Projects normalized call edges onto class and method graphs.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    platform: PlatformFilter,
}

impl GraphBuilder {
    pub fn new(platform: PlatformFilter) -> Self {
        GraphBuilder { platform }
    }

    fn keeps(&self, edge: &CallEdge) -> bool {
        !self.platform.is_platform(&edge.callee.class) && !self.platform.is_platform(&edge.caller.class)
    }

    /// Class graph: method detail dropped, standard-library pairs excluded.
    pub fn class_graph(&self, edges: &BTreeSet<CallEdge>) -> CallGraph {
        CallGraph::from_edges(
            Granularity::Class,
            edges.iter().filter(|e| self.keeps(e)).map(|e| {
                Edge::new(Node::class(e.callee.class.clone()), Node::class(e.caller.class.clone()))
            }),
        )
    }

    /// Method graph: full identity with the dotted package form.
    pub fn method_graph(&self, edges: &BTreeSet<CallEdge>) -> CallGraph {
        CallGraph::from_edges(
            Granularity::Method,
            edges
                .iter()
                .filter(|e| self.keeps(e))
                .map(|e| Edge::new(Node::from_method_ref(&e.callee), Node::from_method_ref(&e.caller))),
        )
    }

    pub fn build(&self, edges: &BTreeSet<CallEdge>) -> Graphs {
        let graphs = Graphs {
            class: self.class_graph(edges),
            method: self.method_graph(edges),
        };
        tracing::info!(
            "Built class graph ({} nodes, {} edges) and method graph ({} nodes, {} edges)",
            graphs.class.node_count(),
            graphs.class.edge_count(),
            graphs.method.node_count(),
            graphs.method.edge_count()
        );
        graphs
    }
}
