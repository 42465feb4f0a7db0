use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct RhaiSpecError {
    pub code: String,
    pub message: String,
}

impl RhaiSpecError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let error = RhaiSpecError::new("CONTEXT_PARENT_MISSING", "no parent to borrow from.");
        assert_eq!(
            error.to_string(),
            "CONTEXT_PARENT_MISSING: no parent to borrow from."
        );
    }
}
