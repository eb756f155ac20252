//! Compiled-artifact layout: `<root>/classes` and `<root>/test-classes`

use crate::inputs::require_dir;
use ignore::WalkBuilder;
use std::path::Path;

/// Production class files, relative to the artifact root.
pub const CLASSES_DIR: &str = "classes";

/// Test class files, relative to the artifact root.
pub const TEST_CLASSES_DIR: &str = "test-classes";

/// Label used when the artifact root has no usable parent name.
pub const DEFAULT_LABEL: &str = "callgraph";

/// Check the artifact root has both class directories.
pub fn verify_artifact_root(root: &Path) -> anyhow::Result<()> {
    require_dir(root)?;
    require_dir(&root.join(CLASSES_DIR))?;
    require_dir(&root.join(TEST_CLASSES_DIR))?;
    Ok(())
}

/// Bare base names of every file under `test-classes`: no package, no
/// extension. `FooTest$Inner.class` yields `FooTest$Inner`.
pub fn test_file_names(root: &Path) -> anyhow::Result<Vec<String>> {
    let dir = root.join(TEST_CLASSES_DIR);
    require_dir(&dir)?;

    let mut names = Vec::new();
    for entry in WalkBuilder::new(&dir).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if let Some(stem) = file_name.split('.').next().filter(|s| !s.is_empty()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    names.dedup();

    tracing::debug!("Found {} test files under {}", names.len(), dir.display());
    Ok(names)
}

/// Project label for graph output: the artifact root's parent directory
/// name without a leading `<n>-` ordinal (`1-ALU/target` gives `ALU`).
pub fn project_label(root: &Path) -> String {
    let parent = root
        .canonicalize()
        .ok()
        .and_then(|p| p.parent().and_then(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned()))
        .or_else(|| {
            root.parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
        });

    match parent {
        Some(name) if !name.is_empty() => match name.split_once('-') {
            Some((_, rest)) if !rest.is_empty() => rest.to_string(),
            _ => name,
        },
        _ => DEFAULT_LABEL.to_string(),
    }
}
