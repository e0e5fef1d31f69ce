//! Validate command implementation

use std::path::PathBuf;

use anyhow::Result;

use crate::feature::{collect_feature_paths, load_feature};
use crate::steps::StepRegistry;
use crate::validate::{validate_feature, ValidationResult};

/// Parse and statically check every feature under `paths`.
///
/// Parse failures are reported as errors on the file rather than aborting.
pub fn validate_paths(paths: &[PathBuf]) -> Result<ValidationResult> {
    let registry = StepRegistry::standard();
    let mut result = ValidationResult::new();

    let files = collect_feature_paths(paths)?;
    if files.is_empty() {
        if let Some(first) = paths.first() {
            result.add_warning(first, 0, "no .feature files found");
        }
    }

    for path in &files {
        match load_feature(path) {
            Ok(feature) => result.merge(validate_feature(&feature, &registry)),
            Err(err) => result.add_error(path, 0, format!("{:#}", err)),
        }
    }

    Ok(result)
}
