//! Test selection: refine a change closure down to the affected test methods

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::closure::compute_closure;
use crate::error::{Result, RetestError};
use crate::graph::{CallGraph, Graphs};
use crate::model::{ChangeSet, Granularity, Node, TestUniverse};

/// How affected classes are matched against bare test-file base names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ClassMatch {
    /// The class descriptor contains the base name anywhere.
    #[default]
    Substring,
    /// The simple class name equals the base name.
    Exact,
}

impl ClassMatch {
    pub fn matches(&self, class: &str, base_name: &str) -> bool {
        match self {
            ClassMatch::Substring => class.contains(base_name),
            ClassMatch::Exact => simple_name(class) == base_name,
        }
    }
}

/// `Lcom/pkg/FooTest` becomes `FooTest`; `LTopLevel` becomes `TopLevel`.
fn simple_name(class: &str) -> &str {
    match class.rsplit_once('/') {
        Some((_, name)) => name,
        None => class.strip_prefix('L').unwrap_or(class),
    }
}

impl fmt::Display for ClassMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassMatch::Substring => f.write_str("substring"),
            ClassMatch::Exact => f.write_str("exact"),
        }
    }
}

impl FromStr for ClassMatch {
    type Err = RetestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(ClassMatch::Substring),
            "exact" => Ok(ClassMatch::Exact),
            _ => Err(RetestError::UnknownClassMatch(s.to_string())),
        }
    }
}

impl TryFrom<String> for ClassMatch {
    type Error = RetestError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Outcome of one selection run.
#[derive(Debug, Clone)]
pub struct Selection {
    pub granularity: Granularity,
    /// Selected test methods, always a subset of the test universe.
    pub tests: BTreeSet<Node>,
    pub closure_len: usize,
    /// Test classes matched in class mode; empty in method mode.
    pub candidate_classes: BTreeSet<Node>,
    /// Changed nodes that do not occur in the graph being walked.
    pub unmatched_changes: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Picks tests from the graphs of one run.
pub struct TestSelector<'a> {
    graphs: &'a Graphs,
    universe: &'a TestUniverse,
    class_match: ClassMatch,
}

impl<'a> TestSelector<'a> {
    pub fn new(graphs: &'a Graphs, universe: &'a TestUniverse) -> Self {
        TestSelector {
            graphs,
            universe,
            class_match: ClassMatch::default(),
        }
    }

    pub fn with_class_match(mut self, class_match: ClassMatch) -> Self {
        self.class_match = class_match;
        self
    }

    /// Select tests for a change set. Its granularity decides the strategy;
    /// `test_names` are only consulted in class mode.
    pub fn select(&self, changes: &ChangeSet, test_names: &[String]) -> Selection {
        let selection = match changes.granularity() {
            Granularity::Method => self.select_by_method(changes),
            Granularity::Class => self.select_by_class(changes, test_names),
        };
        tracing::info!(
            "Selected {} of {} tests at {} granularity (closure: {} nodes)",
            selection.len(),
            self.universe.len(),
            selection.granularity,
            selection.closure_len
        );
        if selection.unmatched_changes > 0 {
            tracing::warn!(
                "{} of {} changed {} nodes do not occur in the call graph",
                selection.unmatched_changes,
                changes.len(),
                selection.granularity
            );
        }
        selection
    }

    /// Closure over the method graph, intersected with the test universe.
    pub fn select_by_method(&self, changes: &ChangeSet) -> Selection {
        let closure = compute_closure(changes.nodes(), &self.graphs.method);
        let tests = closure
            .iter()
            .filter(|node| self.universe.contains(node))
            .cloned()
            .collect();
        Selection {
            granularity: Granularity::Method,
            tests,
            closure_len: closure.len(),
            candidate_classes: BTreeSet::new(),
            unmatched_changes: unmatched(changes, &self.graphs.method),
        }
    }

    /// Closure over the class graph, narrowed to test classes, then refined
    /// against the method graph so the result names test methods.
    pub fn select_by_class(&self, changes: &ChangeSet, test_names: &[String]) -> Selection {
        let closure = compute_closure(changes.nodes(), &self.graphs.class);

        let candidate_classes: BTreeSet<Node> = closure
            .iter()
            .filter(|class| {
                test_names
                    .iter()
                    .any(|name| self.class_match.matches(class.class_name(), name))
            })
            .cloned()
            .collect();
        tracing::debug!("{} candidate test classes", candidate_classes.len());

        let candidates: HashSet<&str> = candidate_classes.iter().map(Node::class_name).collect();
        let mut tests = BTreeSet::new();
        for (callee, caller) in self.graphs.method.edges() {
            for node in [callee, caller] {
                if candidates.contains(node.class_name()) && self.universe.contains(node) {
                    tests.insert(node.clone());
                }
            }
        }

        Selection {
            granularity: Granularity::Class,
            tests,
            closure_len: closure.len(),
            candidate_classes,
            unmatched_changes: unmatched(changes, &self.graphs.class),
        }
    }
}

fn unmatched(changes: &ChangeSet, graph: &CallGraph) -> usize {
    changes.nodes().filter(|node| !graph.contains(node)).count()
}
