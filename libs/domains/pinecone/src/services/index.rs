use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{Pipeline, encode};
use crate::error::PineconeResult;
use crate::models::{DEFAULT_DELETION_PROTECTION, IndexConfig, Metric, ResolvedSpec};
use crate::transport::{JsonObject, Method, Transport};
use crate::validation::SchemaValidator;

const CREATE_INDEX_REQUEST: &str = "create_index_request.json";
const CREATE_INDEX_RESPONSE: &str = "create_index_response.json";
const INDEX_NAME_REQUEST: &str = "index_name_request.json";
const DELETE_INDEX_RESPONSE: &str = "delete_index_response.json";
const DESCRIBE_INDEX_RESPONSE: &str = "describe_index_response.json";
const LIST_INDEXES_RESPONSE: &str = "list_indexes_response.json";
const CONFIGURE_INDEX_REQUEST: &str = "configure_index_request.json";
const CONFIGURE_INDEX_RESPONSE: &str = "configure_index_response.json";
const STATS_REQUEST: &str = "describe_index_stats_request.json";
const STATS_RESPONSE: &str = "describe_index_stats_response.json";
const CREATE_BACKUP_REQUEST: &str = "create_backup_request.json";
const CREATE_BACKUP_RESPONSE: &str = "create_backup_response.json";
const RESTORE_BACKUP_REQUEST: &str = "restore_backup_request.json";
const RESTORE_BACKUP_RESPONSE: &str = "restore_backup_response.json";
const BACKUP_NAME_REQUEST: &str = "backup_name_request.json";
const LIST_BACKUPS_RESPONSE: &str = "list_backups_response.json";
const DESCRIBE_BACKUP_RESPONSE: &str = "describe_backup_response.json";
const DELETE_BACKUP_RESPONSE: &str = "delete_backup_response.json";

#[derive(Debug, Serialize)]
struct PodBlock<'a> {
    environment: &'a str,
    pod_type: &'a str,
    pods: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_config: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct ServerlessBlock<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateSpec<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pod: Option<PodBlock<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serverless: Option<ServerlessBlock<'a>>,
    replicas: u32,
    shards: u32,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: u32,
    metric: Metric,
    spec: CreateSpec<'a>,
    deletion_protection: &'a str,
}

/// Shards are fixed at creation, so a pod reconfigure only carries replicas.
#[derive(Debug, Serialize)]
struct ConfigureSpec<'a> {
    pod: PodBlock<'a>,
    replicas: u32,
}

#[derive(Debug, Serialize)]
struct ConfigureIndexRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<ConfigureSpec<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion_protection: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct StatsRequest<'a> {
    index_name: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateBackupRequest<'a> {
    name: &'a str,
    source: &'a str,
}

#[derive(Debug, Serialize)]
struct RestoreBackupRequest<'a> {
    name: &'a str,
    dimension: u32,
    metric: Metric,
    source_collection: &'a str,
}

fn pod_block<'a>(spec: &'a ResolvedSpec, metadata_config: Option<&'a Value>) -> Option<PodBlock<'a>> {
    match spec {
        ResolvedSpec::Pod {
            environment,
            pod_type,
            pods,
        } => Some(PodBlock {
            environment,
            pod_type,
            pods: *pods,
            metadata_config,
        }),
        ResolvedSpec::Serverless { .. } => None,
    }
}

/// Index lifecycle operations against the control plane.
///
/// Every call checks its identifiers first, then validates the request
/// document, sends it, and validates the response before returning it.
pub struct IndexService<T: Transport> {
    pipeline: Pipeline<T>,
}

impl<T: Transport> IndexService<T> {
    pub fn new(transport: Arc<T>, validator: SchemaValidator) -> Self {
        Self {
            pipeline: Pipeline::new(transport, validator),
        }
    }

    /// `POST /indexes`
    pub async fn create_index(&self, config: &IndexConfig) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(config)?;
        let payload = build_create_payload(config)?;

        let body = self.pipeline.prepare(&payload, CREATE_INDEX_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/indexes", Some(body), CREATE_INDEX_RESPONSE)
            .await
    }

    /// `DELETE /indexes/{name}`
    pub async fn delete_index(&self, index_name: &str) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline
            .prepare(&NameRequest { name: index_name }, INDEX_NAME_REQUEST)?;

        self.pipeline
            .dispatch(
                Method::DELETE,
                &format!("/indexes/{}", index_name),
                None,
                DELETE_INDEX_RESPONSE,
            )
            .await
    }

    /// `GET /indexes`
    pub async fn list_indexes(&self) -> PineconeResult<JsonObject> {
        self.pipeline
            .dispatch(Method::GET, "/indexes", None, LIST_INDEXES_RESPONSE)
            .await
    }

    /// `GET /indexes/{name}`
    pub async fn describe_index(&self, index_name: &str) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline
            .prepare(&NameRequest { name: index_name }, INDEX_NAME_REQUEST)?;

        self.pipeline
            .dispatch(
                Method::GET,
                &format!("/indexes/{}", index_name),
                None,
                DESCRIBE_INDEX_RESPONSE,
            )
            .await
    }

    /// `PATCH /indexes/{name}`
    ///
    /// Pod indexes get their pod block and replica count re-sent. Serverless
    /// topology is immutable, so for those only `deletion_protection` changes.
    pub async fn update_index(
        &self,
        index_name: &str,
        config: &IndexConfig,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline
            .prepare(&NameRequest { name: index_name }, INDEX_NAME_REQUEST)?;
        let payload = build_configure_payload(config)?;

        let body = self.pipeline.prepare(&payload, CONFIGURE_INDEX_REQUEST)?;
        self.pipeline
            .dispatch(
                Method::PATCH,
                &format!("/indexes/{}", index_name),
                Some(body),
                CONFIGURE_INDEX_RESPONSE,
            )
            .await
    }

    /// `POST /describe_index_stats`
    pub async fn describe_index_stats(&self, index_name: &str) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;

        let body = self
            .pipeline
            .prepare(&StatsRequest { index_name }, STATS_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/describe_index_stats", Some(body), STATS_RESPONSE)
            .await
    }

    /// `POST /collections`: snapshot `index_name` into a backup.
    pub async fn create_backup(
        &self,
        index_name: &str,
        backup_name: &str,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline.validator().check_backup_name(backup_name)?;

        let request = CreateBackupRequest {
            name: backup_name,
            source: index_name,
        };
        let body = self.pipeline.prepare(&request, CREATE_BACKUP_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/collections", Some(body), CREATE_BACKUP_RESPONSE)
            .await
    }

    /// `POST /indexes` with `source_collection`: a new index seeded from a backup.
    pub async fn restore_from_backup(
        &self,
        index_name: &str,
        dimension: u32,
        metric: Metric,
        backup_name: &str,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline.validator().check_backup_name(backup_name)?;

        let request = RestoreBackupRequest {
            name: index_name,
            dimension,
            metric,
            source_collection: backup_name,
        };
        let body = self.pipeline.prepare(&request, RESTORE_BACKUP_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/indexes", Some(body), RESTORE_BACKUP_RESPONSE)
            .await
    }

    /// `GET /collections`
    pub async fn list_backups(&self) -> PineconeResult<JsonObject> {
        self.pipeline
            .dispatch(Method::GET, "/collections", None, LIST_BACKUPS_RESPONSE)
            .await
    }

    /// `GET /collections/{name}`
    pub async fn describe_backup(&self, backup_name: &str) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_backup_name(backup_name)?;
        self.pipeline
            .prepare(&NameRequest { name: backup_name }, BACKUP_NAME_REQUEST)?;

        self.pipeline
            .dispatch(
                Method::GET,
                &format!("/collections/{}", backup_name),
                None,
                DESCRIBE_BACKUP_RESPONSE,
            )
            .await
    }

    /// `DELETE /collections/{name}`
    pub async fn delete_backup(&self, backup_name: &str) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_backup_name(backup_name)?;
        self.pipeline
            .prepare(&NameRequest { name: backup_name }, BACKUP_NAME_REQUEST)?;

        self.pipeline
            .dispatch(
                Method::DELETE,
                &format!("/collections/{}", backup_name),
                None,
                DELETE_BACKUP_RESPONSE,
            )
            .await
    }
}

/// Request document for `create_index`, before schema validation.
pub fn build_create_payload(config: &IndexConfig) -> PineconeResult<Value> {
    let resolved = config.spec.resolve("creation")?;

    let spec = CreateSpec {
        pod: pod_block(&resolved, config.metadata_config.as_ref()),
        serverless: match &resolved {
            ResolvedSpec::Serverless { cloud, region } => Some(ServerlessBlock { cloud, region }),
            ResolvedSpec::Pod { .. } => None,
        },
        replicas: config.spec.replicas(),
        shards: config.spec.shards(),
    };

    let request = CreateIndexRequest {
        name: &config.index_name,
        dimension: config.dimension,
        metric: config.metric,
        spec,
        deletion_protection: config
            .deletion_protection
            .as_deref()
            .unwrap_or(DEFAULT_DELETION_PROTECTION),
    };

    encode(&request)
}

/// Request document for `update_index`, before schema validation.
pub fn build_configure_payload(config: &IndexConfig) -> PineconeResult<Value> {
    let resolved = config.spec.resolve("update")?;
    let deletion_protection = config
        .deletion_protection
        .as_deref()
        .filter(|v| !v.is_empty());

    let request = ConfigureIndexRequest {
        spec: pod_block(&resolved, None).map(|pod| ConfigureSpec {
            pod,
            replicas: config.spec.replicas(),
        }),
        deletion_protection,
    };

    encode(&request)
}
