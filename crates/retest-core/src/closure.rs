//! Ancestor closure: everything that transitively calls a changed element

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::graph::CallGraph;
use crate::model::Node;

/// Nodes affected by a change set, with the number of growth rounds it took.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    nodes: HashSet<Node>,
    rounds: usize,
}

impl Closure {
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Growth rounds until the fixed point. Never exceeds the node count.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Compute the ancestor closure of `seeds` over `graph`.
///
/// A seed enters the closure only if it is the callee of some edge; from
/// there the closure grows along callers until no round adds a node. Callees
/// of closure members are never pulled in.
pub fn compute_closure<'a, I>(seeds: I, graph: &CallGraph) -> Closure
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut frontier: Vec<NodeIndex> = seeds
        .into_iter()
        .filter_map(|seed| graph.index_of(seed))
        .filter(|&idx| graph.caller_indices(idx).next().is_some())
        .filter(|&idx| visited.insert(idx))
        .collect();

    let mut rounds = usize::from(!frontier.is_empty());
    loop {
        let mut next = Vec::new();
        for &callee in &frontier {
            for caller in graph.caller_indices(callee) {
                if visited.insert(caller) {
                    next.push(caller);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        rounds += 1;
        frontier = next;
    }

    let nodes: HashSet<Node> = visited.into_iter().map(|idx| graph.node_at(idx).clone()).collect();
    tracing::debug!(
        "Closure over {} graph: {} nodes after {} rounds",
        graph.granularity(),
        nodes.len(),
        rounds
    );
    Closure { nodes, rounds }
}
