use std::path::PathBuf;

use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PineconeError {
    /// A required identifier was empty.
    #[error("{0}")]
    InvalidArgument(String),

    /// The index spec resolved to neither (or both) of pod and serverless.
    #[error("Invalid specification for index {0}")]
    InvalidSpecification(String),

    #[error("JSON does not validate. Errors: {0}")]
    ValidationFailed(String),

    #[error("Schema file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("Invalid schema file {}: {details}", path.display())]
    SchemaInvalid { path: PathBuf, details: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid server response: {0}")]
    InvalidServerResponse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type PineconeResult<T> = Result<T, PineconeError>;

impl PineconeError {
    pub(crate) fn empty(field_name: &str) -> Self {
        PineconeError::InvalidArgument(format!("{} cannot be empty", field_name))
    }
}

impl From<reqwest::Error> for PineconeError {
    fn from(err: reqwest::Error) -> Self {
        PineconeError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argument_message() {
        let err = PineconeError::empty("Index name");
        assert!(matches!(err, PineconeError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Index name cannot be empty");
    }

    #[test]
    fn test_schema_not_found_message_contains_path() {
        let err = PineconeError::SchemaNotFound(PathBuf::from("/tmp/missing.json"));
        assert_eq!(err.to_string(), "Schema file not found: /tmp/missing.json");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: PineconeError = ConfigError::MissingEnvVar("PINECONE_API_KEY".to_string()).into();
        assert!(err.to_string().contains("PINECONE_API_KEY"));
    }
}
