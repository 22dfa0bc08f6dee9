//! JSON-Schema contract checks for outbound payloads and inbound responses,
//! plus the identifier preconditions both services run first.

use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{PineconeError, PineconeResult};

/// Bundled schema store shipped with this crate.
pub const DEFAULT_SCHEMA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/schemas");

/// Either a bare index name or something that carries one.
pub enum IndexNameSource<'a> {
    Name(&'a str),
    Config(&'a dyn HasIndexName),
}

/// Implemented by configuration types that expose an index name.
pub trait HasIndexName {
    fn index_name(&self) -> &str;
}

impl<'a> IndexNameSource<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            IndexNameSource::Name(name) => name,
            IndexNameSource::Config(config) => config.index_name(),
        }
    }
}

impl<'a> From<&'a str> for IndexNameSource<'a> {
    fn from(name: &'a str) -> Self {
        IndexNameSource::Name(name)
    }
}

impl<'a> From<&'a String> for IndexNameSource<'a> {
    fn from(name: &'a String) -> Self {
        IndexNameSource::Name(name.as_str())
    }
}

impl<'a, T: HasIndexName> From<&'a T> for IndexNameSource<'a> {
    fn from(config: &'a T) -> Self {
        IndexNameSource::Config(config)
    }
}

#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema_dir: PathBuf,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::with_schema_dir(DEFAULT_SCHEMA_DIR)
    }

    pub fn with_schema_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: dir.into(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Validate `document` against the schema file `schema_name`.
    ///
    /// `schema_dir` overrides the validator's store for this call only. The
    /// document is round-tripped through [`serde_json::Value`] first so any
    /// `Serialize` type is checked in the same representation the wire uses.
    pub fn validate<T>(
        &self,
        document: &T,
        schema_name: &str,
        schema_dir: Option<&Path>,
    ) -> PineconeResult<bool>
    where
        T: Serialize + ?Sized,
    {
        let path = schema_dir
            .unwrap_or(&self.schema_dir)
            .join(schema_name);
        let schema = load_schema(&path)?;

        let instance = serde_json::to_value(document).map_err(|e| {
            PineconeError::ValidationFailed(format!("Failed to encode data to JSON: {}", e))
        })?;

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| PineconeError::SchemaInvalid {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!(schema = schema_name, "Validating document against schema");

        if let Err(errors) = compiled.validate(&instance) {
            let violations: Vec<String> = errors.map(|e| describe_violation(&e)).collect();
            return Err(PineconeError::ValidationFailed(violations.join(", ")));
        }

        Ok(true)
    }

    /// Fails with `"<field_name> cannot be empty"`.
    pub fn check_non_empty_value(&self, value: &str, field_name: &str) -> PineconeResult<()> {
        if value.is_empty() {
            return Err(PineconeError::empty(field_name));
        }
        Ok(())
    }

    pub fn check_index_name<'a>(&self, source: impl Into<IndexNameSource<'a>>) -> PineconeResult<()> {
        self.check_non_empty_value(source.into().as_str(), "Index name")
    }

    pub fn check_backup_name(&self, backup_name: &str) -> PineconeResult<()> {
        self.check_non_empty_value(backup_name, "Backup name")
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn load_schema(path: &Path) -> PineconeResult<Value> {
    if !path.exists() {
        return Err(PineconeError::SchemaNotFound(path.to_path_buf()));
    }

    let invalid = |details: String| PineconeError::SchemaInvalid {
        path: path.to_path_buf(),
        details,
    };

    let content =
        fs::read_to_string(path).map_err(|e| invalid(format!("Failed to read schema file: {}", e)))?;
    let schema: Value = serde_json::from_str(&content)
        .map_err(|e| invalid(format!("Invalid JSON in schema file: {}", e)))?;

    if !schema.is_object() {
        return Err(invalid("Schema should be a valid JSON object".to_string()));
    }

    Ok(schema)
}

/// `[spec.pod.pods] 0 is less than the minimum of 1`; for missing properties
/// the property itself is appended to the path.
fn describe_violation(error: &ValidationError<'_>) -> String {
    let mut segments: Vec<String> = error
        .instance_path
        .to_string()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();

    if let ValidationErrorKind::Required { property } = &error.kind {
        match property.as_str() {
            Some(name) => segments.push(name.to_string()),
            None => segments.push(property.to_string()),
        }
    }

    let field_path = if segments.is_empty() {
        "$".to_string()
    } else {
        segments.join(".")
    };

    format!("[{}] {}", field_path, error)
}
