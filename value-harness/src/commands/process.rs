//! Process command implementation
//!
//! One-shot `set_input` + `process` on a fresh processor.

use serde::Serialize;
use value_processor::{CoefficientPair, ValueProcessor};

/// Outcome of processing a single value
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub input: i64,
    /// Flat `[coeff1, value1, ...]` output on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<CoefficientPair>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub fn run(value: i64) -> ProcessReport {
    let mut processor = ValueProcessor::new();
    processor.set_input(value);

    match processor.process_pairs() {
        Ok(pairs) => ProcessReport {
            input: value,
            output: Some(value_processor::flatten(&pairs)),
            pairs: Some(pairs),
            error: None,
        },
        Err(err) => ProcessReport {
            input: value,
            output: None,
            pairs: None,
            error: Some(err.to_string()),
        },
    }
}
