//! Readers for the files produced by the upstream call-graph engine

use anyhow::Context;
use retest_core::{ChangeSet, Granularity, RetestError, TestUniverse};
use std::path::Path;

/// Fail with `InputNotFound` unless `path` is an existing file.
pub fn require_file(path: &Path) -> anyhow::Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RetestError::InputNotFound {
            path: path.to_path_buf(),
        }
        .into())
    }
}

/// Fail with `InputNotFound` unless `path` is an existing directory.
pub fn require_dir(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(RetestError::InputNotFound {
            path: path.to_path_buf(),
        }
        .into())
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    require_file(path)?;
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {} file {}", what, path.display()))
}

/// Split descriptor text into records. A line starting with whitespace
/// continues the previous record. Blank lines are dropped.
pub fn split_descriptors(text: &str) -> Vec<String> {
    let mut records: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(current) = records.last_mut() {
                current.push('\n');
                current.push_str(line);
                continue;
            }
        }
        records.push(line.to_string());
    }
    records
}

/// Read the raw node descriptors file.
pub fn read_descriptors(path: &Path) -> anyhow::Result<Vec<String>> {
    let records = split_descriptors(&read_text(path, "descriptor")?);
    tracing::debug!("Read {} descriptors from {}", records.len(), path.display());
    Ok(records)
}

/// Read the change-info file at the run's granularity.
pub fn read_change_set(path: &Path, granularity: Granularity) -> anyhow::Result<ChangeSet> {
    let text = read_text(path, "change-info")?;
    let changes = ChangeSet::parse(text.lines(), granularity);
    tracing::info!(
        "Loaded {} changed {} entries from {}",
        changes.len(),
        granularity,
        path.display()
    );
    if changes.skipped() > 0 {
        tracing::warn!("{} change entries did not parse as {} nodes", changes.skipped(), granularity);
    }
    Ok(changes)
}

/// Read the test-universe file: one method node per line.
pub fn read_test_universe(path: &Path) -> anyhow::Result<TestUniverse> {
    let universe = TestUniverse::parse(read_text(path, "test")?.lines());
    tracing::info!("Loaded {} test methods from {}", universe.len(), path.display());
    Ok(universe)
}

/// Read a plain list of names, one per line.
pub fn read_name_list(path: &Path) -> anyhow::Result<Vec<String>> {
    Ok(read_text(path, "name list")?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
