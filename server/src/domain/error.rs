//! Errors raised while turning a list request into statements

use thiserror::Error;

use crate::data::search::SearchError;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),
}

impl RequestError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Body(_) => "INVALID_BODY",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Search(_) => "INVALID_SEARCH",
            Self::UnknownEntity(_) => "UNKNOWN_ENTITY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_error() {
        let err: RequestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "INVALID_BODY");
        assert!(err.to_string().starts_with("Invalid request body"));
    }

    #[test]
    fn test_unknown_entity() {
        let err = RequestError::UnknownEntity("sys_nope".to_string());
        assert_eq!(err.code(), "UNKNOWN_ENTITY");
        assert_eq!(err.to_string(), "Unknown entity 'sys_nope'");
    }
}
