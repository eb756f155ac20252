//! End-to-end runs: read inputs, build graphs, select, then write outputs

use crate::artifacts::{project_label, test_file_names, verify_artifact_root};
use crate::config::RunConfig;
use crate::emit::{PendingFile, RunReport, dot_file, report_file, selection_file, write_all};
use crate::inputs::{read_change_set, read_descriptors, read_name_list, read_test_universe, require_file};
use retest_core::{GraphBuilder, Graphs, Granularity, NormalizeStats, PlatformFilter, Selection, TestSelector, normalize};
use std::path::{Path, PathBuf};

/// Everything a finished selection run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub selection: Selection,
    pub selection_path: PathBuf,
    pub dot_paths: Vec<PathBuf>,
    pub report: RunReport,
}

/// Read descriptors and build both graph projections.
pub fn load_graphs(descriptors: &Path, platform: &PlatformFilter) -> anyhow::Result<(Graphs, NormalizeStats)> {
    let records = read_descriptors(descriptors)?;
    let normalized = normalize(&records);
    tracing::info!(
        "Normalized {} descriptors: {} edges, {} malformed, {} isolated",
        normalized.stats.descriptors,
        normalized.stats.edges,
        normalized.stats.malformed,
        normalized.stats.isolated
    );
    let graphs = GraphBuilder::new(platform.clone()).build(&normalized.edges);
    Ok((graphs, normalized.stats))
}

/// Run a full selection. All inputs are read and every output rendered
/// before anything is written, and a failed write removes what this run
/// already wrote, so a failed run leaves no output behind.
pub fn run_selection(config: &RunConfig) -> anyhow::Result<RunOutcome> {
    tracing::info!(
        "Selecting tests at {} granularity for {}",
        config.granularity,
        config.artifact_root.display()
    );

    verify_artifact_root(&config.artifact_root)?;
    for path in [&config.changes, &config.descriptors, &config.tests] {
        require_file(path)?;
    }

    let (graphs, stats) = load_graphs(&config.descriptors, &config.platform)?;
    let changes = read_change_set(&config.changes, config.granularity)?;
    let universe = read_test_universe(&config.tests)?;
    let test_names = match (config.granularity, &config.test_names) {
        (Granularity::Method, _) => Vec::new(),
        (Granularity::Class, Some(path)) => read_name_list(path)?,
        (Granularity::Class, None) => test_file_names(&config.artifact_root)?,
    };

    let selection = TestSelector::new(&graphs, &universe)
        .with_class_match(config.class_match)
        .select(&changes, &test_names);

    let report = RunReport::new(&stats, &graphs.class, &graphs.method, changes.len(), &selection);

    let mut pending = Vec::new();
    if let Some(path) = &config.report {
        pending.push(report_file(path, &report)?);
    }
    let dots = if config.emit_dot {
        graph_files(&graphs, &config.out_dir, &project_label(&config.artifact_root))
    } else {
        Vec::new()
    };
    let dot_paths: Vec<PathBuf> = dots.iter().map(|file| file.path.clone()).collect();
    pending.extend(dots);
    let selection_out = selection_file(&config.out_dir, &selection);
    let selection_path = selection_out.path.clone();
    pending.push(selection_out);

    write_all(&pending)?;
    tracing::info!("Wrote {} selected tests to {}", selection.len(), selection_path.display());

    Ok(RunOutcome {
        selection,
        selection_path,
        dot_paths,
        report,
    })
}

/// The class and method graphs rendered as Graphviz files.
fn graph_files(graphs: &Graphs, out_dir: &Path, label: &str) -> Vec<PendingFile> {
    vec![
        dot_file(out_dir, &graphs.class, label),
        dot_file(out_dir, &graphs.method, label),
    ]
}

/// Build graphs from a descriptor file and write only their renderings.
pub fn export_graphs(
    artifact_root: &Path,
    descriptors: &Path,
    out_dir: &Path,
    platform: &PlatformFilter,
) -> anyhow::Result<Vec<PathBuf>> {
    require_file(descriptors)?;
    let (graphs, _) = load_graphs(descriptors, platform)?;
    let paths = write_all(&graph_files(&graphs, out_dir, &project_label(artifact_root)))?;
    tracing::info!("Wrote {} graphs to {}", paths.len(), out_dir.display());
    Ok(paths)
}
