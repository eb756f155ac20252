//! Retest CLI entry point

use clap::{Parser, Subcommand};
use retest_core::{ClassMatch, Granularity};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "retest")]
#[command(about = "Change-impact regression test selection over a call graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./retest.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifact root holding classes/ and test-classes/
    #[arg(short, long, global = true, default_value = "target")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the tests affected by a change set
    Select {
        /// Selection granularity: class or method
        #[arg(short, long, value_parser = parse_granularity)]
        granularity: Option<Granularity>,

        /// Change-info file, one changed element per line
        #[arg(short, long)]
        changes: PathBuf,

        /// Raw call-graph node descriptors
        #[arg(short, long)]
        descriptors: PathBuf,

        /// Test methods known to the call-graph engine
        #[arg(short, long)]
        tests: PathBuf,

        /// Bare test-file names (defaults to scanning test-classes/)
        #[arg(long)]
        test_names: Option<PathBuf>,

        /// How test classes are matched against test-file names
        #[arg(long, value_parser = parse_class_match)]
        class_match: Option<ClassMatch>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write class and method graphs as Graphviz files
        #[arg(long)]
        emit_dot: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write the class and method graphs as Graphviz files and exit
    Graph {
        /// Raw call-graph node descriptors
        #[arg(short, long)]
        descriptors: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Show version
    Version,
}

fn parse_granularity(value: &str) -> Result<Granularity, retest_core::RetestError> {
    value.parse()
}

fn parse_class_match(value: &str) -> Result<ClassMatch, retest_core::RetestError> {
    value.parse()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "retest={0},retest_core={0},retest_io={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Retest v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Select {
            granularity,
            changes,
            descriptors,
            tests,
            test_names,
            class_match,
            out,
            emit_dot,
            report,
        } => {
            let overrides = retest_io::RunOverrides {
                granularity,
                artifact_root: cli.root,
                changes,
                descriptors,
                tests,
                test_names,
                out_dir: out,
                emit_dot,
                report,
                class_match,
            };
            commands::select(cli.config, overrides)
        }
        Commands::Graph { descriptors, out } => {
            commands::graph(cli.config, cli.root, descriptors, out)
        }
        Commands::Version => {
            println!("Retest v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
