use std::path::{Path, PathBuf};

use core_config::{ConfigError, FromEnv, env_optional, env_parse_or, env_required, non_empty};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection parameters for one client instance.
///
/// Every string field must be non-blank; the struct cannot be mutated once it
/// has been handed to a client.
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    api_key: String,
    environment: String,
    api_version: String,
    custom_endpoint: String,
    timeout_secs: u64,
    schema_dir: Option<PathBuf>,
}

impl PineconeConfig {
    /// `environment` is the control-plane base URL; `custom_endpoint` is the
    /// dedicated host of a single index (data-plane operations).
    pub fn new(
        api_key: impl Into<String>,
        environment: impl Into<String>,
        api_version: impl Into<String>,
        custom_endpoint: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: non_empty("api_key", api_key.into())?,
            environment: non_empty("environment", environment.into())?,
            api_version: non_empty("api_version", api_version.into())?,
            custom_endpoint: non_empty("custom_endpoint", custom_endpoint.into())?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            schema_dir: None,
        })
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Read request/response schemas from `dir` instead of the bundled store.
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn custom_endpoint(&self) -> &str {
        &self.custom_endpoint
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }
}

impl FromEnv for PineconeConfig {
    /// Reads:
    /// - PINECONE_API_KEY, PINECONE_ENVIRONMENT, PINECONE_API_VERSION,
    ///   PINECONE_CUSTOM_ENDPOINT (required)
    /// - PINECONE_TIMEOUT_SECS (default 30)
    /// - PINECONE_SCHEMA_DIR (optional)
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(
            env_required("PINECONE_API_KEY")?,
            env_required("PINECONE_ENVIRONMENT")?,
            env_required("PINECONE_API_VERSION")?,
            env_required("PINECONE_CUSTOM_ENDPOINT")?,
        )?
        .with_timeout(env_parse_or("PINECONE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);

        if let Some(dir) = env_optional("PINECONE_SCHEMA_DIR") {
            config = config.with_schema_dir(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 4] = [
        ("PINECONE_API_KEY", Some("pk-test")),
        ("PINECONE_ENVIRONMENT", Some("https://api.pinecone.io")),
        ("PINECONE_API_VERSION", Some("2024-07")),
        ("PINECONE_CUSTOM_ENDPOINT", Some("https://idx-abc.svc.pinecone.io")),
    ];

    #[test]
    fn test_new_rejects_empty_fields() {
        let err = PineconeConfig::new("", "https://api", "2024-07", "https://idx").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref f) if f == "api_key"));

        let err = PineconeConfig::new("k", "https://api", " ", "https://idx").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref f) if f == "api_version"));

        let err = PineconeConfig::new("k", "https://api", "2024-07", "").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref f) if f == "custom_endpoint"));
    }

    #[test]
    fn test_new_defaults() {
        let config = PineconeConfig::new("k", "https://api", "2024-07", "https://idx").unwrap();
        assert_eq!(config.api_key(), "k");
        assert_eq!(config.environment(), "https://api");
        assert_eq!(config.api_version(), "2024-07");
        assert_eq!(config.custom_endpoint(), "https://idx");
        assert_eq!(config.timeout_secs(), 30);
        assert!(config.schema_dir().is_none());
    }

    #[test]
    fn test_from_env_success() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PINECONE_TIMEOUT_SECS", Some("5")));
        vars.push(("PINECONE_SCHEMA_DIR", Some("/etc/pcdb/schemas")));

        temp_env::with_vars(vars, || {
            let config = PineconeConfig::from_env().unwrap();
            assert_eq!(config.api_key(), "pk-test");
            assert_eq!(config.custom_endpoint(), "https://idx-abc.svc.pinecone.io");
            assert_eq!(config.timeout_secs(), 5);
            assert_eq!(config.schema_dir(), Some(Path::new("/etc/pcdb/schemas")));
        });
    }

    #[test]
    fn test_from_env_missing_api_key() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("PINECONE_API_KEY", None);

        temp_env::with_vars(vars, || {
            let err = PineconeConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PINECONE_API_KEY"));
        });
    }

    #[test]
    fn test_from_env_invalid_timeout() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PINECONE_TIMEOUT_SECS", Some("forever")));

        temp_env::with_vars(vars, || {
            let err = PineconeConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "PINECONE_TIMEOUT_SECS"));
        });
    }
}
