//! Output writers: selection files, Graphviz renderings, and the JSON run report

use anyhow::Context;
use chrono::{DateTime, Utc};
use retest_core::{CallGraph, Granularity, NormalizeStats, Selection};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `selection-class.txt` or `selection-method.txt`.
pub fn selection_file_name(granularity: Granularity) -> String {
    format!("selection-{}.txt", granularity)
}

/// One test identifier per line, sorted, each newline-terminated.
pub fn render_selection(selection: &Selection) -> String {
    selection.tests.iter().map(|test| format!("{}\n", test)).collect()
}

/// A rendered output that has not been written yet.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub path: PathBuf,
    pub contents: String,
}

impl PendingFile {
    pub fn new(path: PathBuf, contents: String) -> Self {
        PendingFile { path, contents }
    }

    fn write(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create output directory {}", parent.display()))?;
        }
        std::fs::write(&self.path, &self.contents).with_context(|| format!("Cannot write {}", self.path.display()))
    }
}

/// Write every file or none of them: on the first failure, files already
/// written by this call are removed again.
pub fn write_all(files: &[PendingFile]) -> anyhow::Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    for file in files {
        if let Err(e) = file.write() {
            for path in &written {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    tracing::warn!("Cannot remove {}: {}", path.display(), remove_err);
                }
            }
            return Err(e);
        }
        tracing::debug!("Wrote {}", file.path.display());
        written.push(file.path.clone());
    }
    Ok(written)
}

/// The selection file for `out_dir`.
pub fn selection_file(out_dir: &Path, selection: &Selection) -> PendingFile {
    PendingFile::new(
        out_dir.join(selection_file_name(selection.granularity)),
        render_selection(selection),
    )
}

/// Render a graph as a Graphviz digraph with edges pointing callee -> caller.
///
/// Class nodes print as their class descriptor; method nodes print as the
/// dotted selector only.
pub fn render_dot(graph: &CallGraph, label: &str) -> String {
    let name = |node: &retest_core::Node| node.member().unwrap_or(node.class_name()).to_string();
    let mut lines: Vec<String> = graph
        .edges()
        .map(|(callee, caller)| format!("\t\"{}\" -> \"{}\";\n", name(callee), name(caller)))
        .collect();
    lines.sort();
    lines.dedup();

    let mut out = format!("digraph \"{}_{}\" {{\n", label.to_lowercase(), graph.granularity());
    for line in lines {
        out.push_str(&line);
    }
    out.push_str("}\n");
    out
}

/// `class-ALU.dot` style file name.
pub fn dot_file_name(granularity: Granularity, label: &str) -> String {
    format!("{}-{}.dot", granularity, label)
}

pub fn dot_file(out_dir: &Path, graph: &CallGraph, label: &str) -> PendingFile {
    PendingFile::new(
        out_dir.join(dot_file_name(graph.granularity(), label)),
        render_dot(graph, label),
    )
}

/// Machine-readable summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub granularity: Granularity,
    pub generated_at: DateTime<Utc>,
    pub descriptors: usize,
    pub malformed_descriptors: usize,
    pub class_graph: GraphSummary,
    pub method_graph: GraphSummary,
    pub changes: usize,
    pub unmatched_changes: usize,
    pub closure_size: usize,
    pub candidate_classes: Vec<String>,
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

impl From<&CallGraph> for GraphSummary {
    fn from(graph: &CallGraph) -> Self {
        GraphSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        }
    }
}

impl RunReport {
    pub fn new(
        stats: &NormalizeStats,
        class_graph: &CallGraph,
        method_graph: &CallGraph,
        changes: usize,
        selection: &Selection,
    ) -> Self {
        RunReport {
            granularity: selection.granularity,
            generated_at: Utc::now(),
            descriptors: stats.descriptors,
            malformed_descriptors: stats.malformed,
            class_graph: class_graph.into(),
            method_graph: method_graph.into(),
            changes,
            unmatched_changes: selection.unmatched_changes,
            closure_size: selection.closure_len,
            candidate_classes: selection.candidate_classes.iter().map(ToString::to_string).collect(),
            selected: selection.tests.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn report_file(path: &Path, report: &RunReport) -> anyhow::Result<PendingFile> {
    let json = serde_json::to_string_pretty(report).context("Cannot serialize run report")?;
    Ok(PendingFile::new(path.to_path_buf(), json))
}
