use thiserror::Error;

/// Errors returned by [`ValueProcessor::process`](crate::ValueProcessor::process).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// `process` was called before any input was stored.
    #[error("set_input must be called before process")]
    Precondition,

    /// The stored input is outside the accepted range.
    #[error("input value is not valid: {0}")]
    InvalidArgument(i64),
}

impl ProcessorError {
    /// Short kind name, used by the harness when matching expected errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessorError::Precondition => "precondition",
            ProcessorError::InvalidArgument(_) => "invalid argument",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message() {
        let msg = ProcessorError::Precondition.to_string();
        assert!(msg.contains("must be called before"));
    }

    #[test]
    fn test_invalid_argument_message() {
        let msg = ProcessorError::InvalidArgument(-3).to_string();
        assert!(msg.contains("not valid"));
        assert!(msg.contains("-3"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(ProcessorError::Precondition.kind(), "precondition");
        assert_eq!(ProcessorError::InvalidArgument(-1).kind(), "invalid argument");
    }
}
