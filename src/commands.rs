//! CLI command implementations

use retest_io::{FileConfig, RunConfig, RunOverrides};
use std::path::{Path, PathBuf};

fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<FileConfig> {
    FileConfig::discover(explicit.as_deref(), Path::new("."))
}

pub fn select(config: Option<PathBuf>, overrides: RunOverrides) -> anyhow::Result<()> {
    let file = load_config(config)?;
    let config = RunConfig::resolve(file, overrides)?;

    let outcome = retest_io::run_selection(&config)?;

    for test in &outcome.selection.tests {
        tracing::debug!("selected {}", test);
    }
    println!(
        "Selected {} tests -> {}",
        outcome.selection.len(),
        outcome.selection_path.display()
    );
    for path in &outcome.dot_paths {
        println!("Graph written to {}", path.display());
    }
    Ok(())
}

pub fn graph(
    config: Option<PathBuf>,
    root: PathBuf,
    descriptors: PathBuf,
    out: PathBuf,
) -> anyhow::Result<()> {
    let platform = load_config(config)?.platform_filter();

    tracing::info!("Exporting graphs from {}", descriptors.display());
    for path in retest_io::export_graphs(&root, &descriptors, &out, &platform)? {
        println!("Graph written to {}", path.display());
    }
    Ok(())
}
