//! Retest IO — input loading, artifact discovery, configuration, and output writers

pub mod config;
pub mod inputs;
pub mod artifacts;
pub mod emit;
pub mod pipeline;


#[cfg(test)]
pub mod test_utils;

pub use config::{CONFIG_FILE, FileConfig, RunConfig, RunOverrides};
pub use emit::{GraphSummary, RunReport, render_dot, render_selection};
pub use pipeline::{RunOutcome, export_graphs, load_graphs, run_selection};
