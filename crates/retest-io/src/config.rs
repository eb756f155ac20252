//! Run configuration: optional `retest.toml` merged with command-line values

use anyhow::Context;
use retest_core::{ClassMatch, Granularity, PlatformFilter, DEFAULT_PLATFORM_PREFIXES};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE: &str = "retest.toml";

/// Default directory results are written to.
pub const DEFAULT_OUT_DIR: &str = ".";

/// Values that may be set in `retest.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub granularity: Option<Granularity>,
    pub platform_prefixes: Option<Vec<String>>,
    pub class_match: Option<ClassMatch>,
    pub out_dir: Option<PathBuf>,
    pub emit_dot: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load an explicit config file, or `retest.toml` in `dir` when present.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = dir.join(CONFIG_FILE);
        if default.is_file() {
            tracing::debug!("Using config file {}", default.display());
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    /// Platform prefixes from the file, or the standard-library default.
    pub fn platform_filter(&self) -> PlatformFilter {
        match &self.platform_prefixes {
            Some(prefixes) => PlatformFilter::new(prefixes.iter().cloned()),
            None => PlatformFilter::new(DEFAULT_PLATFORM_PREFIXES.iter().copied()),
        }
    }
}

/// Per-invocation values from the command line. `None` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub granularity: Option<Granularity>,
    pub artifact_root: PathBuf,
    pub changes: PathBuf,
    pub descriptors: PathBuf,
    pub tests: PathBuf,
    pub test_names: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub emit_dot: bool,
    pub report: Option<PathBuf>,
    pub class_match: Option<ClassMatch>,
}

/// Fully resolved configuration of a selection run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub granularity: Granularity,
    pub artifact_root: PathBuf,
    pub changes: PathBuf,
    pub descriptors: PathBuf,
    pub tests: PathBuf,
    /// Explicit list of bare test-file names; enumerated from the artifact root when absent.
    pub test_names: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub emit_dot: bool,
    pub report: Option<PathBuf>,
    pub platform: PlatformFilter,
    pub class_match: ClassMatch,
}

impl RunConfig {
    /// Merge command-line values over file values. Granularity has no
    /// default: a run without one is rejected.
    pub fn resolve(file: FileConfig, cli: RunOverrides) -> anyhow::Result<Self> {
        let granularity = cli
            .granularity
            .or(file.granularity)
            .context("No granularity given (use --granularity class|method or set it in retest.toml)")?;

        let platform = file.platform_filter();

        Ok(RunConfig {
            granularity,
            artifact_root: cli.artifact_root,
            changes: cli.changes,
            descriptors: cli.descriptors,
            tests: cli.tests,
            test_names: cli.test_names,
            out_dir: cli
                .out_dir
                .or(file.out_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            emit_dot: cli.emit_dot || file.emit_dot.unwrap_or(false),
            report: cli.report,
            platform,
            class_match: cli.class_match.or(file.class_match).unwrap_or_default(),
        })
    }
}
