use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PineconeError, PineconeResult};
use crate::validation::HasIndexName;

pub const DEFAULT_TOP_K: u32 = 10;
pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const DEFAULT_DELETION_PROTECTION: &str = "disabled";

/// Similarity metric of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::DotProduct => "dotproduct",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = PineconeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "euclidean" => Ok(Metric::Euclidean),
            "dotproduct" => Ok(Metric::DotProduct),
            other => Err(PineconeError::InvalidArgument(format!(
                "Unknown metric '{}': expected cosine, euclidean or dotproduct",
                other
            ))),
        }
    }
}

/// Pod fields as read from a spec document; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodFields {
    pub environment: Option<String>,
    pub pod_type: Option<String>,
    pub pods: Option<u32>,
}

/// Serverless fields as read from a spec document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerlessFields {
    pub cloud: Option<String>,
    pub region: Option<String>,
}

/// Index topology exactly as the caller supplied it.
///
/// Nothing is checked here; [`IndexSpecSource::resolve`] decides whether the
/// fields describe a pod index or a serverless one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSpecSource {
    pub pod: PodFields,
    pub serverless: ServerlessFields,
    pub replicas: Option<u32>,
    pub shards: Option<u32>,
}

/// The one topology a spec source resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSpec {
    Pod {
        environment: String,
        pod_type: String,
        pods: u32,
    },
    Serverless {
        cloud: String,
        region: String,
    },
}

impl IndexSpecSource {
    pub fn pod(environment: impl Into<String>, pod_type: impl Into<String>, pods: u32) -> Self {
        Self {
            pod: PodFields {
                environment: Some(environment.into()),
                pod_type: Some(pod_type.into()),
                pods: Some(pods),
            },
            ..Self::default()
        }
    }

    pub fn serverless(cloud: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            serverless: ServerlessFields {
                cloud: Some(cloud.into()),
                region: Some(region.into()),
            },
            ..Self::default()
        }
    }

    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = Some(replicas);
        self
    }

    pub fn with_shards(mut self, shards: u32) -> Self {
        self.shards = Some(shards);
        self
    }

    pub fn replicas(&self) -> u32 {
        self.replicas.unwrap_or(1)
    }

    pub fn shards(&self) -> u32 {
        self.shards.unwrap_or(1)
    }

    /// Exactly one of the pod block (environment, pod type and pod count all
    /// present) or the serverless block (cloud and region present) must be
    /// complete. `operation` names the caller in the error message.
    pub fn resolve(&self, operation: &str) -> PineconeResult<ResolvedSpec> {
        let pod = match (&self.pod.environment, &self.pod.pod_type, self.pod.pods) {
            (Some(environment), Some(pod_type), Some(pods))
                if !environment.is_empty() && !pod_type.is_empty() =>
            {
                Some(ResolvedSpec::Pod {
                    environment: environment.clone(),
                    pod_type: pod_type.clone(),
                    pods,
                })
            }
            _ => None,
        };

        let serverless = match (&self.serverless.cloud, &self.serverless.region) {
            (Some(cloud), Some(region)) if !cloud.is_empty() && !region.is_empty() => {
                Some(ResolvedSpec::Serverless {
                    cloud: cloud.clone(),
                    region: region.clone(),
                })
            }
            _ => None,
        };

        match (pod, serverless) {
            (Some(spec), None) | (None, Some(spec)) => Ok(spec),
            _ => Err(PineconeError::InvalidSpecification(operation.to_string())),
        }
    }
}

/// Desired index settings for create and configure operations.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub index_name: String,
    pub metric: Metric,
    pub dimension: u32,
    pub spec: IndexSpecSource,
    /// Pod-only `metadata_config`, e.g. `{"indexed": ["genre"]}`.
    pub metadata_config: Option<Value>,
    /// `"enabled"` or `"disabled"`; create defaults to `"disabled"`.
    pub deletion_protection: Option<String>,
}

impl IndexConfig {
    pub fn new(
        index_name: impl Into<String>,
        metric: Metric,
        dimension: u32,
        spec: IndexSpecSource,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            metric,
            dimension,
            spec,
            metadata_config: None,
            deletion_protection: None,
        }
    }

    /// Settings for a configure call, where metric and dimension are ignored.
    pub fn for_update(index_name: impl Into<String>, spec: IndexSpecSource) -> Self {
        Self::new(index_name, Metric::default(), 0, spec)
    }

    pub fn with_metadata_config(mut self, metadata_config: Value) -> Self {
        self.metadata_config = Some(metadata_config);
        self
    }

    pub fn with_deletion_protection(mut self, deletion_protection: impl Into<String>) -> Self {
        self.deletion_protection = Some(deletion_protection.into());
        self
    }
}

impl HasIndexName for IndexConfig {
    fn index_name(&self) -> &str {
        &self.index_name
    }
}

/// A stored vector.
///
/// `values.len()` should equal the index dimension; the server enforces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    pub id: String,
    pub values: Vec<f32>,
    /// Sparse component as index → value, kept in insertion order.
    pub sparse_values: Option<IndexMap<u32, f32>>,
    pub metadata: Option<Map<String, Value>>,
}

impl Vector {
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            sparse_values: None,
            metadata: None,
        }
    }

    pub fn with_sparse_values(mut self, sparse: impl IntoIterator<Item = (u32, f32)>) -> Self {
        self.sparse_values = Some(sparse.into_iter().collect());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Similarity search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub top_k: u32,
    pub namespace: Option<String>,
    /// Metadata filter, e.g. `{"genre": {"$eq": "drama"}}`. Absent means unfiltered.
    pub filter: Option<Map<String, Value>>,
    pub include_values: bool,
    pub include_metadata: bool,
}

impl VectorQuery {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            top_k: DEFAULT_TOP_K,
            namespace: None,
            filter: None,
            include_values: false,
            include_metadata: false,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn include_values(mut self, include: bool) -> Self {
        self.include_values = include;
        self
    }

    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

/// Parameters of a list-vector-ids call. Blank strings count as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListVectorIds {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    /// Page size; 100 when unset.
    pub limit: Option<u32>,
    pub pagination_token: Option<String>,
}

impl ListVectorIds {
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_pagination_token(mut self, token: impl Into<String>) -> Self {
        self.pagination_token = Some(token.into());
        self
    }
}
