//! Run command implementation
//!
//! Loads feature files and executes their scenarios.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::failure::CategorizedFailure;
use crate::feature::{collect_feature_paths, load_feature};
use crate::runner::{run_features_into, RunOptions, RunSummary};
use crate::steps::StepRegistry;

/// Configuration for the run command
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Feature files or directories to run
    pub paths: Vec<PathBuf>,
    pub options: RunOptions,
}

/// Load every feature under `config.paths` and run it.
///
/// Files that fail to parse are recorded in the summary rather than aborting
/// the run; a path that does not exist is an error.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let paths = collect_feature_paths(&config.paths)?;
    let registry = StepRegistry::standard();
    info!(
        files = paths.len(),
        steps = registry.len(),
        "discovered feature files"
    );
    let mut summary = RunSummary::new();
    let mut features = Vec::with_capacity(paths.len());

    for path in &paths {
        match load_feature(path) {
            Ok(feature) => features.push(feature),
            Err(err) => summary.record_load_failure(CategorizedFailure::parse_failed(
                path.display(),
                format!("{:#}", err),
            )),
        }
    }

    if config.options.fail_fast && !summary.load_failures.is_empty() {
        return Ok(summary);
    }

    run_features_into(&mut summary, &features, &registry, &config.options);
    Ok(summary)
}
