//! Value processor with a two-state input lifecycle

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};

/// One coefficient-value pair of the processed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientPair {
    pub coefficient: i64,
    pub value: i64,
}

impl CoefficientPair {
    pub const fn new(coefficient: i64, value: i64) -> Self {
        Self { coefficient, value }
    }
}

/// Pairs produced for every accepted input, in output order.
pub const COEFFICIENT_PAIRS: [CoefficientPair; 4] = [
    CoefficientPair::new(1, 0),
    CoefficientPair::new(5, 0),
    CoefficientPair::new(10, 0),
    CoefficientPair::new(25, 0),
];

/// Whether an input has been stored yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    #[default]
    Unset,
    Set { value: i64 },
}

/// Stores one input value and processes it on demand
#[derive(Debug, Default)]
pub struct ValueProcessor {
    state: InputState,
}

impl ValueProcessor {
    /// Create a processor with no input stored
    pub fn new() -> Self {
        Self::default()
    }

    /// Current input state
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Store the input value, replacing any previous one.
    ///
    /// Any integer is accepted here; range checks happen in [`process`](Self::process).
    pub fn set_input(&mut self, value: i64) {
        self.state = InputState::Set { value };
    }

    /// Validate the stored input and return the pairs in flat format
    /// `[coeff1, value1, coeff2, value2, ...]`.
    ///
    /// The stored input is left untouched, so repeated calls return the same result.
    pub fn process(&self) -> Result<Vec<i64>> {
        Ok(flatten(&self.process_pairs()?))
    }

    /// Same as [`process`](Self::process) but keeps the pair structure.
    pub fn process_pairs(&self) -> Result<Vec<CoefficientPair>> {
        match self.state {
            InputState::Unset => Err(ProcessorError::Precondition),
            InputState::Set { value } if value < 0 => Err(ProcessorError::InvalidArgument(value)),
            InputState::Set { .. } => Ok(COEFFICIENT_PAIRS.to_vec()),
        }
    }
}

/// Flatten pairs into `[coeff1, value1, coeff2, value2, ...]`
pub fn flatten(pairs: &[CoefficientPair]) -> Vec<i64> {
    pairs
        .iter()
        .flat_map(|p| [p.coefficient, p.value])
        .collect()
}
