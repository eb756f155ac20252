//! Core data structures for call graphs and test selection

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};

/// Identity level used throughout a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Granularity {
    /// Whole classes, e.g. `Lnet/mooctest/CMD`.
    Class,
    /// Individual methods, e.g. `Lnet/mooctest/CMD net.mooctest.CMD.run()V`.
    Method,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Class => "class",
            Granularity::Method => "method",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = RetestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Granularity::Class),
            "method" => Ok(Granularity::Method),
            _ => Err(RetestError::UnknownGranularity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = RetestError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Class loader a frame was resolved by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loader {
    Application,
    Primordial,
    Extension,
}

impl Loader {
    /// Platform loaders only ever load JDK/library code.
    pub fn is_platform(&self) -> bool {
        !matches!(self, Loader::Application)
    }
}

impl FromStr for Loader {
    type Err = RetestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Application" => Ok(Loader::Application),
            "Primordial" => Ok(Loader::Primordial),
            "Extension" => Ok(Loader::Extension),
            other => Err(RetestError::malformed("unknown class loader", other)),
        }
    }
}

/// A method as the call-graph engine names it: internal class descriptor plus selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    /// Internal class descriptor, e.g. `Lnet/mooctest/CMD`.
    pub class: String,
    /// Method selector, e.g. `<init>()V`.
    pub selector: String,
}

impl MethodRef {
    pub fn new(class: impl Into<String>, selector: impl Into<String>) -> Self {
        MethodRef {
            class: class.into(),
            selector: selector.into(),
        }
    }

    /// Dotted class name: `Lnet/mooctest/CMD` becomes `net.mooctest.CMD`.
    pub fn dotted_class(&self) -> String {
        let bare = self.class.strip_prefix('L').unwrap_or(&self.class);
        bare.replace('/', ".")
    }

    /// Dotted, fully qualified selector: `net.mooctest.CMD.<init>()V`.
    pub fn qualified_selector(&self) -> String {
        format!("{}.{}", self.dotted_class(), self.selector)
    }
}

/// A program element at either granularity.
///
/// Class nodes carry only the class descriptor; method nodes also carry the
/// qualified selector. Equality is equality of the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    class: String,
    member: Option<String>,
}

impl Node {
    pub fn class(class: impl Into<String>) -> Self {
        Node {
            class: class.into(),
            member: None,
        }
    }

    pub fn method(class: impl Into<String>, signature: impl Into<String>) -> Self {
        Node {
            class: class.into(),
            member: Some(signature.into()),
        }
    }

    /// Method-granularity node for an engine method reference.
    pub fn from_method_ref(method: &MethodRef) -> Self {
        Node::method(method.class.clone(), method.qualified_selector())
    }

    /// Parse one identifier line at the given granularity.
    ///
    /// Class granularity keeps only the first whitespace-separated field, so
    /// method-form lines reduce to their class. The class field may be either
    /// `Lpkg/Cls` or dotted `pkg.Cls`.
    pub fn parse(text: &str, granularity: Granularity) -> Result<Self> {
        let invalid = || RetestError::InvalidNode {
            granularity,
            text: text.to_string(),
        };
        let trimmed = text.trim();
        match granularity {
            Granularity::Class => trimmed
                .split_whitespace()
                .next()
                .map(|class| Node::class(class_descriptor(class)))
                .ok_or_else(invalid),
            Granularity::Method => {
                let (class, member) = trimmed.split_once(char::is_whitespace).ok_or_else(invalid)?;
                let member = member.trim();
                if class.is_empty() || member.is_empty() {
                    return Err(invalid());
                }
                Ok(Node::method(class_descriptor(class), member))
            }
        }
    }

    /// Internal class descriptor of this node.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Qualified method selector, `None` for class nodes.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn granularity(&self) -> Granularity {
        match self.member {
            Some(_) => Granularity::Method,
            None => Granularity::Class,
        }
    }

    /// The class node enclosing this node (itself for class nodes).
    pub fn to_class(&self) -> Node {
        Node::class(self.class.clone())
    }
}

/// `net.mooctest.CMD` becomes `Lnet/mooctest/CMD`; descriptors pass through.
fn class_descriptor(class: &str) -> String {
    if class.contains('/') || !class.contains('.') {
        class.to_string()
    } else {
        format!("L{}", class.replace('.', "/"))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{} {}", self.class, member),
            None => f.write_str(&self.class),
        }
    }
}

/// "callee is invoked from caller".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub callee: Node,
    pub caller: Node,
}

impl Edge {
    pub fn new(callee: Node, caller: Node) -> Self {
        Edge { callee, caller }
    }
}

/// Elements modified since the baseline, at one granularity.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    granularity: Granularity,
    nodes: HashSet<Node>,
    skipped: usize,
}

impl ChangeSet {
    pub fn new(granularity: Granularity) -> Self {
        ChangeSet {
            granularity,
            nodes: HashSet::new(),
            skipped: 0,
        }
    }

    /// Parse change-info lines. Blank lines are ignored; lines that do not
    /// form a node at this granularity are skipped and counted.
    pub fn parse<'a, I>(lines: I, granularity: Granularity) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = ChangeSet::new(granularity);
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match Node::parse(line, granularity) {
                Ok(node) => {
                    set.nodes.insert(node);
                }
                Err(e) => {
                    tracing::warn!("Skipping change entry: {}", e);
                    set.skipped += 1;
                }
            }
        }
        set
    }

    pub fn insert(&mut self, node: Node) -> bool {
        self.nodes.insert(node)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of lines rejected while parsing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Method nodes the upstream engine flagged as executable tests.
#[derive(Debug, Clone, Default)]
pub struct TestUniverse {
    tests: HashSet<Node>,
}

impl TestUniverse {
    /// Parse one method node per line; blank and unparsable lines are dropped.
    pub fn parse<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match Node::parse(line, Granularity::Method) {
                Ok(node) => Some(node),
                Err(e) => {
                    tracing::warn!("Skipping test entry: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.tests.contains(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.tests.iter()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl FromIterator<Node> for TestUniverse {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        TestUniverse {
            tests: iter.into_iter().collect(),
        }
    }
}
