//! Feature files
//!
//! Parses Gherkin `.feature` files into structured types and expands
//! backgrounds and scenario outlines into runnable scenarios.

mod loader;
mod parser;
mod types;

pub use loader::{collect_feature_paths, discover_features, load_feature};
pub use parser::{parse_feature, ParseError};
pub use types::{
    Background, ConcreteScenario, DataTable, Examples, Feature, Scenario, Step, StepKeyword,
};
