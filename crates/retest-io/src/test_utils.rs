//! Test utilities for Retest IO

use crate::config::{FileConfig, RunConfig, RunOverrides};
use retest_core::Granularity;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Node descriptors for a small calculator project, as the engine prints them.
pub const DESCRIPTORS: &str = r#"Node: < Application, Lnet/mooctest/CalcTest, testAdd()V > Context: Everywhere
 - invokespecial < Application, Lnet/mooctest/Calc, <init>()V >@4
 - invokevirtual < Application, Lnet/mooctest/Calc, add(II)I >@9
 - invokestatic < Primordial, Lorg/junit/Assert, assertEquals(JJ)V >@14
Node: < Application, Lnet/mooctest/Service, compute()I > Context: Everywhere
 - invokevirtual < Application, Lnet/mooctest/Calc, add(II)I >@3
Node: < Application, Lnet/mooctest/ServiceTest, testCompute()V > Context: Everywhere
 - invokevirtual < Application, Lnet/mooctest/Service, compute()I >@5
Node: < Application, Lnet/mooctest/Calc, add(II)I > Context: Everywhere
Node: Application net.mooctest.Broken
"#;

pub const TESTS: &str = "Lnet/mooctest/CalcTest net.mooctest.CalcTest.testAdd()V
Lnet/mooctest/ServiceTest net.mooctest.ServiceTest.testCompute()V
";

pub const ADD_TEST: &str = "Lnet/mooctest/CalcTest net.mooctest.CalcTest.testAdd()V";
pub const COMPUTE_TEST: &str = "Lnet/mooctest/ServiceTest net.mooctest.ServiceTest.testCompute()V";

/// A temporary project with compiled artifacts and engine output files.
pub struct Fixture {
    pub dir: TempDir,
    pub root: PathBuf,
    pub descriptors: PathBuf,
    pub tests: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = create_repo_with_structure(&[
            ("1-Calc/target/classes/net/mooctest/Calc.class", ""),
            ("1-Calc/target/classes/net/mooctest/Service.class", ""),
            ("1-Calc/target/test-classes/net/mooctest/CalcTest.class", ""),
            ("1-Calc/target/test-classes/net/mooctest/ServiceTest.class", ""),
            ("inputs/descriptors.txt", DESCRIPTORS),
            ("inputs/tests.txt", TESTS),
        ]);
        let root = dir.path().join("1-Calc/target");
        let descriptors = dir.path().join("inputs/descriptors.txt");
        let tests = dir.path().join("inputs/tests.txt");
        Fixture {
            dir,
            root,
            descriptors,
            tests,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Write a change-info file and return its path.
    pub fn changes(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("inputs/change_info.txt");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self, granularity: Granularity, changes: &Path) -> RunConfig {
        let overrides = RunOverrides {
            granularity: Some(granularity),
            artifact_root: self.root.clone(),
            changes: changes.to_path_buf(),
            descriptors: self.descriptors.clone(),
            tests: self.tests.clone(),
            out_dir: Some(self.out_dir()),
            ..RunOverrides::default()
        };
        RunConfig::resolve(FileConfig::default(), overrides).unwrap()
    }
}

/// Create a repository with a specific file structure
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}
