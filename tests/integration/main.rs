//! Integration tests for Retest
//!
//! These tests drive the `retest` binary over a temporary artifact tree.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const DESCRIPTORS: &str = r#"Node: < Application, Lcom/pkg/FooTest, testFoo()V > Context: Everywhere
 - invokespecial < Application, Lcom/pkg/Foo, <init>()V >@4
 - invokevirtual < Application, Lcom/pkg/Foo, run()I >@9
 - invokestatic < Primordial, Lorg/junit/Assert, assertEquals(JJ)V >@14
Node: < Application, Lcom/pkg/FooBarTest, testBar()V > Context: Everywhere
 - invokevirtual < Application, Lcom/pkg/Bar, go()V >@2
Node: < Application, Lcom/pkg/Bar, go()V > Context: Everywhere
 - invokevirtual < Application, Lcom/pkg/Foo, run()I >@7
"#;

const TESTS: &str = "Lcom/pkg/FooTest com.pkg.FooTest.testFoo()V
Lcom/pkg/FooBarTest com.pkg.FooBarTest.testBar()V
";

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for path in [
        "2-Foo/target/classes/com/pkg/Foo.class",
        "2-Foo/target/classes/com/pkg/Bar.class",
        "2-Foo/target/test-classes/com/pkg/FooTest.class",
        "2-Foo/target/test-classes/com/pkg/FooBarTest.class",
    ] {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }
    fs::write(root.join("descriptors.txt"), DESCRIPTORS).unwrap();
    fs::write(root.join("tests.txt"), TESTS).unwrap();
    dir
}

fn retest(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_retest"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to execute retest")
}

fn select(cwd: &Path, granularity: &str, changes: &str) -> Output {
    fs::write(cwd.join("change_info.txt"), changes).unwrap();
    retest(
        cwd,
        &[
            "--root", "2-Foo/target",
            "select",
            "--granularity", granularity,
            "--changes", "change_info.txt",
            "--descriptors", "descriptors.txt",
            "--tests", "tests.txt",
            "--out", "out",
        ],
    )
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let dir = workspace();
    let output = retest(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Change-impact regression test selection"));
}

#[test]
fn test_method_selection_end_to_end() {
    let dir = workspace();
    let output = select(dir.path(), "method", "Lcom/pkg/Foo com.pkg.Foo.run()I\n");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let selected = fs::read_to_string(dir.path().join("out/selection-method.txt")).unwrap();
    assert_eq!(
        selected,
        "Lcom/pkg/FooBarTest com.pkg.FooBarTest.testBar()V\nLcom/pkg/FooTest com.pkg.FooTest.testFoo()V\n"
    );
}

#[test]
fn test_class_selection_substring_matching() {
    let dir = workspace();
    // Bar is only reached from FooBarTest; FooTest must not be pulled in.
    let output = select(dir.path(), "class", "Lcom/pkg/Bar\n");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let selected = fs::read_to_string(dir.path().join("out/selection-class.txt")).unwrap();
    assert_eq!(selected, "Lcom/pkg/FooBarTest com.pkg.FooBarTest.testBar()V\n");
}

#[test]
fn test_empty_change_info_writes_empty_file() {
    let dir = workspace();
    let output = select(dir.path(), "method", "");
    assert!(output.status.success());
    let selected = fs::read_to_string(dir.path().join("out/selection-method.txt")).unwrap();
    assert!(selected.is_empty());
}

#[test]
fn test_unknown_granularity_is_rejected() {
    let dir = workspace();
    let output = select(dir.path(), "package", "Lcom/pkg/Foo\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown granularity"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_artifacts_abort_without_output() {
    let dir = workspace();
    fs::remove_dir_all(dir.path().join("2-Foo/target/classes")).unwrap();
    let output = select(dir.path(), "class", "Lcom/pkg/Foo\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("required input not found"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_granularity_from_config_file() {
    let dir = workspace();
    fs::write(dir.path().join("retest.toml"), "granularity = \"method\"\nemit_dot = true\n").unwrap();
    fs::write(dir.path().join("change_info.txt"), "Lcom/pkg/Bar com.pkg.Bar.go()V\n").unwrap();
    let output = retest(
        dir.path(),
        &[
            "--root", "2-Foo/target",
            "select",
            "--changes", "change_info.txt",
            "--descriptors", "descriptors.txt",
            "--tests", "tests.txt",
            "--out", "out",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("out/class-Foo.dot").exists());
    assert!(dir.path().join("out/method-Foo.dot").exists());
    let selected = fs::read_to_string(dir.path().join("out/selection-method.txt")).unwrap();
    assert_eq!(selected, "Lcom/pkg/FooBarTest com.pkg.FooBarTest.testBar()V\n");
}

#[test]
fn test_graph_command_writes_dot_files() {
    let dir = workspace();
    let output = retest(
        dir.path(),
        &["--root", "2-Foo/target", "graph", "--descriptors", "descriptors.txt", "--out", "graphs"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let method = fs::read_to_string(dir.path().join("graphs/method-Foo.dot")).unwrap();
    assert!(method.starts_with("digraph \"foo_method\" {"));
    assert!(method.contains("\"com.pkg.Foo.run()I\" -> \"com.pkg.Bar.go()V\";"));
}
