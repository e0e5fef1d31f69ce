//! value-processor library
//!
//! A single stateful component: store an input value, then process it into a
//! fixed sequence of coefficient-value pairs in flat format.

pub mod error;
pub mod processor;

// Re-export main types for convenience
pub use error::{ProcessorError, Result};
pub use processor::{flatten, CoefficientPair, InputState, ValueProcessor, COEFFICIENT_PAIRS};
