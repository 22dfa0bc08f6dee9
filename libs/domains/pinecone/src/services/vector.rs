use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::{Pipeline, encode, present, query_string, with_query};
use crate::error::{PineconeError, PineconeResult};
use crate::models::{DEFAULT_LIST_LIMIT, ListVectorIds, Vector, VectorQuery};
use crate::transport::{JsonObject, Method, Transport};
use crate::validation::SchemaValidator;

const UPSERT_REQUEST: &str = "upsert_request.json";
const UPSERT_RESPONSE: &str = "upsert_response.json";
const FETCH_REQUEST: &str = "fetch_request.json";
const FETCH_RESPONSE: &str = "fetch_response.json";
const QUERY_REQUEST: &str = "query_request.json";
const QUERY_RESPONSE: &str = "query_response.json";
const UPDATE_REQUEST: &str = "update_request.json";
const UPDATE_RESPONSE: &str = "update_response.json";
const LIST_IDS_REQUEST: &str = "list_vector_ids_request.json";
const LIST_IDS_RESPONSE: &str = "list_vector_ids_response.json";
const DELETE_REQUEST: &str = "delete_vectors_request.json";
const DELETE_RESPONSE: &str = "delete_vectors_response.json";

/// Result of [`VectorService::delete_namespace`] when there was nothing to delete.
pub const NAMESPACE_EMPTY_MESSAGE: &str = "No vectors found in the namespace";

#[derive(Debug, Serialize)]
struct SparseValues {
    indices: Vec<u32>,
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct VectorRecord<'a> {
    id: &'a str,
    values: &'a [f32],
    #[serde(rename = "sparseValues", skip_serializing_if = "Option::is_none")]
    sparse_values: Option<SparseValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Map<String, Value>>,
}

impl<'a> From<&'a Vector> for VectorRecord<'a> {
    fn from(vector: &'a Vector) -> Self {
        let sparse_values = vector
            .sparse_values
            .as_ref()
            .filter(|sparse| !sparse.is_empty())
            .map(|sparse| SparseValues {
                indices: sparse.keys().copied().collect(),
                values: sparse.values().copied().collect(),
            });

        Self {
            id: &vector.id,
            values: &vector.values,
            sparse_values,
            metadata: vector.metadata.as_ref().filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<VectorRecord<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FetchRequest<'a> {
    ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u32,
    include_values: bool,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id: &'a str,
    values: &'a [f32],
    set_metadata: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListIdsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<&'a str>,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination_token: Option<&'a str>,
}

impl ListIdsRequest<'_> {
    fn query(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(namespace) = self.namespace {
            pairs.push(("namespace", namespace.to_string()));
        }
        if let Some(prefix) = self.prefix {
            pairs.push(("prefix", prefix.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        if let Some(token) = self.pagination_token {
            pairs.push(("paginationToken", token.to_string()));
        }
        query_string(pairs)
    }
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

/// Vector operations against an index host.
///
/// Same pipeline as [`super::IndexService`], plus [`delete_namespace`], which
/// composes a listing and a delete.
///
/// [`delete_namespace`]: VectorService::delete_namespace
pub struct VectorService<T: Transport> {
    pipeline: Pipeline<T>,
}

impl<T: Transport> VectorService<T> {
    pub fn new(transport: Arc<T>, validator: SchemaValidator) -> Self {
        Self {
            pipeline: Pipeline::new(transport, validator),
        }
    }

    /// `POST /vectors/upsert`
    pub async fn upsert(
        &self,
        index_name: &str,
        vectors: &[Vector],
        namespace: Option<&str>,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;

        let body = self
            .pipeline
            .prepare(&build_upsert_payload(vectors, namespace)?, UPSERT_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/vectors/upsert", Some(body), UPSERT_RESPONSE)
            .await
    }

    /// `GET /vectors/fetch?ids=..&ids=..[&namespace=..]`
    pub async fn fetch(
        &self,
        index_name: &str,
        ids: &[String],
        namespace: Option<&str>,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        let namespace = present(namespace);

        self.pipeline
            .prepare(&FetchRequest { ids, namespace }, FETCH_REQUEST)?;

        let mut pairs: Vec<(&str, String)> = ids.iter().map(|id| ("ids", id.clone())).collect();
        if let Some(namespace) = namespace {
            pairs.push(("namespace", namespace.to_string()));
        }
        let path = with_query("/vectors/fetch", &query_string(pairs));

        self.pipeline
            .dispatch(Method::GET, &path, None, FETCH_RESPONSE)
            .await
    }

    /// `POST /query`
    pub async fn query(&self, index_name: &str, query: &VectorQuery) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;

        let request = QueryRequest {
            vector: &query.vector,
            top_k: query.top_k,
            include_values: query.include_values,
            include_metadata: query.include_metadata,
            filter: query.filter.as_ref().filter(|f| !f.is_empty()),
            namespace: present(query.namespace.as_deref()),
        };
        let body = self.pipeline.prepare(&request, QUERY_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/query", Some(body), QUERY_RESPONSE)
            .await
    }

    /// `POST /vectors/update`
    ///
    /// `metadata` is sent as `setMetadata`, which the service applies as a
    /// replacement of the stored metadata, not a merge.
    pub async fn update(
        &self,
        index_name: &str,
        vector_id: &str,
        values: &[f32],
        metadata: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline
            .validator()
            .check_non_empty_value(vector_id, "Vector ID")?;

        let request = UpdateRequest {
            id: vector_id,
            values,
            set_metadata: metadata,
            namespace: present(namespace),
        };
        let body = self.pipeline.prepare(&request, UPDATE_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/vectors/update", Some(body), UPDATE_RESPONSE)
            .await
    }

    /// `GET /vectors/list?..`, one page of ids.
    pub async fn list_vector_ids(
        &self,
        index_name: &str,
        params: &ListVectorIds,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;

        let request = ListIdsRequest {
            namespace: present(params.namespace.as_deref()),
            prefix: present(params.prefix.as_deref()),
            limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            pagination_token: present(params.pagination_token.as_deref()),
        };
        self.pipeline.prepare(&request, LIST_IDS_REQUEST)?;

        let path = with_query("/vectors/list", &request.query());
        self.pipeline
            .dispatch(Method::GET, &path, None, LIST_IDS_RESPONSE)
            .await
    }

    /// `POST /vectors/delete`
    pub async fn delete_vectors(
        &self,
        index_name: &str,
        ids: &[String],
        namespace: Option<&str>,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;

        let request = DeleteRequest {
            ids,
            namespace: present(namespace),
        };
        let body = self.pipeline.prepare(&request, DELETE_REQUEST)?;
        self.pipeline
            .dispatch(Method::POST, "/vectors/delete", Some(body), DELETE_RESPONSE)
            .await
    }

    /// Delete every vector the first listing page of `namespace` returns.
    ///
    /// There is no server endpoint for this: the ids are listed, then deleted
    /// in a second call. Vectors written in between, and ids beyond the first
    /// page, survive; call again until the result is the
    /// [`NAMESPACE_EMPTY_MESSAGE`] sentinel to drain a large namespace.
    pub async fn delete_namespace(
        &self,
        index_name: &str,
        namespace: &str,
    ) -> PineconeResult<JsonObject> {
        self.pipeline.validator().check_index_name(index_name)?;
        self.pipeline
            .validator()
            .check_non_empty_value(namespace, "Namespace name")?;

        let listing = self
            .list_vector_ids(index_name, &ListVectorIds::in_namespace(namespace))
            .await?;
        let ids = listed_ids(&listing)?;

        if ids.is_empty() {
            info!(index_name, namespace, "Namespace has no vectors, nothing to delete");
            let mut result = JsonObject::new();
            result.insert(
                "message".to_string(),
                Value::String(NAMESPACE_EMPTY_MESSAGE.to_string()),
            );
            return Ok(result);
        }

        info!(index_name, namespace, count = ids.len(), "Deleting listed vectors");
        self.delete_vectors(index_name, &ids, Some(namespace)).await
    }
}

/// Request document for `upsert`. Formatting is pure, so the same input
/// always yields the same document.
pub fn build_upsert_payload(vectors: &[Vector], namespace: Option<&str>) -> PineconeResult<Value> {
    let request = UpsertRequest {
        vectors: vectors.iter().map(VectorRecord::from).collect(),
        namespace: present(namespace),
    };
    encode(&request)
}

/// Ids of one listing page, read from `ids` (plain strings) or, failing that,
/// from the `id` of each `vectors` entry. A listing with neither is empty.
fn listed_ids(listing: &JsonObject) -> PineconeResult<Vec<String>> {
    if let Some(value) = listing.get("ids") {
        let Value::Array(items) = value else {
            return Err(PineconeError::InvalidServerResponse(
                "expected listed ids to be an array of strings".to_string(),
            ));
        };
        return items.iter().map(vector_id).collect();
    }

    match listing.get("vectors") {
        None => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry.get("id").map(vector_id).unwrap_or_else(|| {
                    Err(PineconeError::InvalidServerResponse(format!(
                        "listed vector has no id: {}",
                        entry
                    )))
                })
            })
            .collect(),
        Some(_) => Err(PineconeError::InvalidServerResponse(
            "expected listed vectors to be an array".to_string(),
        )),
    }
}

fn vector_id(item: &Value) -> PineconeResult<String> {
    item.as_str().map(str::to_string).ok_or_else(|| {
        PineconeError::InvalidServerResponse(format!(
            "expected vector id to be a string, got {}",
            item
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("test response must be an object"),
        }
    }

    fn service(mock: MockTransport) -> VectorService<MockTransport> {
        VectorService::new(Arc::new(mock), SchemaValidator::new())
    }

    fn service_without_schemas(mock: MockTransport) -> VectorService<MockTransport> {
        VectorService::new(
            Arc::new(mock),
            SchemaValidator::with_schema_dir("/nonexistent/pinecone/schemas"),
        )
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_upsert_payload_sparse_values_in_insertion_order() {
        let vector = Vector::new("vec1", vec![0.5, 0.25])
            .with_sparse_values([(9, 0.5), (1, 0.25), (4, 0.125)]);

        let payload = build_upsert_payload(&[vector], Some("ns1")).unwrap();
        assert_eq!(
            payload,
            json!({
                "vectors": [{
                    "id": "vec1",
                    "values": [0.5, 0.25],
                    "sparseValues": {"indices": [9, 1, 4], "values": [0.5, 0.25, 0.125]}
                }],
                "namespace": "ns1"
            })
        );
    }

    #[test]
    fn test_upsert_payload_is_deterministic() {
        let mut metadata = Map::new();
        metadata.insert("genre".to_string(), json!("drama"));
        let vectors = vec![
            Vector::new("a", vec![0.5]).with_metadata(metadata),
            Vector::new("b", vec![0.25]).with_sparse_values([(3, 0.5)]),
        ];

        let first = build_upsert_payload(&vectors, None).unwrap();
        let second = build_upsert_payload(&vectors, None).unwrap();
        assert_eq!(first, second);
        assert!(first.get("namespace").is_none());
        assert_eq!(first["vectors"][0]["metadata"], json!({"genre": "drama"}));
    }

    #[test]
    fn test_upsert_payload_omits_empty_optional_parts() {
        let vector = Vector::new("a", vec![0.5])
            .with_sparse_values(Vec::<(u32, f32)>::new())
            .with_metadata(Map::new());

        let payload = build_upsert_payload(&[vector], Some("")).unwrap();
        assert_eq!(payload, json!({"vectors": [{"id": "a", "values": [0.5]}]}));
    }

    #[test]
    fn test_list_query_order() {
        let request = ListIdsRequest {
            namespace: Some("ns 1"),
            prefix: Some("doc#"),
            limit: 5,
            pagination_token: Some("tok"),
        };
        assert_eq!(
            request.query(),
            "namespace=ns%201&prefix=doc%23&limit=5&paginationToken=tok"
        );
    }

    #[test]
    fn test_listed_ids() {
        assert!(listed_ids(&JsonObject::new()).unwrap().is_empty());
        assert_eq!(
            listed_ids(&object(json!({"ids": ["v1", "v2"]}))).unwrap(),
            ids(&["v1", "v2"])
        );
        assert!(matches!(
            listed_ids(&object(json!({"ids": "v1"}))),
            Err(PineconeError::InvalidServerResponse(_))
        ));
    }

    #[test]
    fn test_listed_ids_from_vector_entries() {
        let listing = object(json!({
            "vectors": [{"id": "v1"}, {"id": "v2"}],
            "namespace": "ns1"
        }));
        assert_eq!(listed_ids(&listing).unwrap(), ids(&["v1", "v2"]));

        assert!(matches!(
            listed_ids(&object(json!({"vectors": [{"id": 3}]}))),
            Err(PineconeError::InvalidServerResponse(_))
        ));
        assert!(matches!(
            listed_ids(&object(json!({"vectors": [{}]}))),
            Err(PineconeError::InvalidServerResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_sends_payload() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/vectors/upsert"
                    && body.as_ref().map(|b| b["vectors"][0]["id"] == "vec1") == Some(true)
            })
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"upsertedCount": 1}))));

        let response = service(mock)
            .upsert("test-index", &[Vector::new("vec1", vec![0.5, 0.25])], None)
            .await
            .unwrap();
        assert_eq!(response["upsertedCount"], json!(1));
    }

    #[tokio::test]
    async fn test_upsert_response_must_carry_count() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_, _, _| Ok(JsonObject::new()));

        let err = service(mock)
            .upsert("test-index", &[Vector::new("vec1", vec![0.5])], None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "JSON does not validate. Errors: [upsertedCount] \"upsertedCount\" is a required property"
        );
    }

    #[tokio::test]
    async fn test_empty_upsert_is_rejected_before_sending() {
        let mut mock = MockTransport::new();
        mock.expect_send().never();

        let err = service(mock).upsert("test-index", &[], None).await.unwrap_err();
        assert!(matches!(err, PineconeError::ValidationFailed(ref m) if m.contains("[vectors]")));
    }

    #[tokio::test]
    async fn test_fetch_path_repeats_ids() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::GET && path == "/vectors/fetch?ids=vec1&ids=vec2" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(object(json!({
                    "vectors": {
                        "vec1": {"id": "vec1", "values": [0.5]},
                        "vec2": {"id": "vec2", "values": [0.25]}
                    }
                })))
            });

        let response = service(mock)
            .fetch("test-index", &ids(&["vec1", "vec2"]), None)
            .await
            .unwrap();
        assert_eq!(response["vectors"]["vec2"]["values"], json!([0.25]));
    }

    #[tokio::test]
    async fn test_fetch_appends_namespace() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|_, path, _| path == "/vectors/fetch?ids=vec1&namespace=ns1")
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"vectors": {}, "namespace": "ns1"}))));

        service(mock)
            .fetch("test-index", &ids(&["vec1"]), Some("ns1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_query_wire_names() {
        let mut filter = Map::new();
        filter.insert("genre".to_string(), json!({"$eq": "drama"}));
        let query = VectorQuery::new(vec![0.5, 0.25])
            .with_top_k(3)
            .with_filter(filter)
            .include_metadata(true);

        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/query"
                    && *body
                        == Some(json!({
                            "vector": [0.5, 0.25],
                            "topK": 3,
                            "includeValues": false,
                            "includeMetadata": true,
                            "filter": {"genre": {"$eq": "drama"}}
                        }))
            })
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"matches": [{"id": "vec1", "score": 0.5}]}))));

        let response = service(mock).query("test-index", &query).await.unwrap();
        assert_eq!(response["matches"][0]["id"], json!("vec1"));
    }

    #[tokio::test]
    async fn test_query_with_empty_vector_fails_validation() {
        let mut mock = MockTransport::new();
        mock.expect_send().never();

        let err = service(mock)
            .query("test-index", &VectorQuery::new(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, PineconeError::ValidationFailed(ref m) if m.contains("[vector]")));
    }

    #[tokio::test]
    async fn test_update_sends_set_metadata_verbatim() {
        let mut metadata = Map::new();
        metadata.insert("genre".to_string(), json!("comedy"));
        metadata.insert("year".to_string(), json!(2020));

        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/vectors/update"
                    && *body
                        == Some(json!({
                            "id": "vec1",
                            "values": [0.5],
                            "setMetadata": {"genre": "comedy", "year": 2020},
                            "namespace": "ns1"
                        }))
            })
            .times(1)
            .returning(|_, _, _| Ok(JsonObject::new()));

        service(mock)
            .update("test-index", "vec1", &[0.5], &metadata, Some("ns1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_vector_ids_default_limit() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::GET && path == "/vectors/list?limit=100" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"vectors": [{"id": "vec1"}]}))));

        service(mock)
            .list_vector_ids("test-index", &ListVectorIds::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_vectors_body() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/vectors/delete"
                    && *body == Some(json!({"ids": ["vec1"]}))
            })
            .times(1)
            .returning(|_, _, _| Ok(JsonObject::new()));

        service(mock)
            .delete_vectors("test-index", &ids(&["vec1"]), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_identifiers_fail_before_validation() {
        let mut mock = MockTransport::new();
        mock.expect_send().never();
        let service = service_without_schemas(mock);
        let one = ids(&["vec1"]);

        let index_failures = vec![
            service.upsert("", &[Vector::new("vec1", vec![0.5])], None).await,
            service.fetch("", &one, None).await,
            service.query("", &VectorQuery::new(vec![0.5])).await,
            service.update("", "vec1", &[0.5], &Map::new(), None).await,
            service.list_vector_ids("", &ListVectorIds::default()).await,
            service.delete_vectors("", &one, None).await,
            service.delete_namespace("", "ns1").await,
        ];
        for result in index_failures {
            assert_eq!(result.unwrap_err().to_string(), "Index name cannot be empty");
        }

        let err = service
            .update("test-index", "", &[0.5], &Map::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Vector ID cannot be empty");

        let err = service.delete_namespace("test-index", "").await.unwrap_err();
        assert!(matches!(err, PineconeError::InvalidArgument(ref m) if m == "Namespace name cannot be empty"));
    }

    #[tokio::test]
    async fn test_delete_namespace_with_no_vectors_returns_sentinel() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, _| *method == Method::GET && path == "/vectors/list?namespace=ns1&limit=100")
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"ids": []}))));
        mock.expect_send()
            .withf(|_, path, _| path == "/vectors/delete")
            .never();

        let result = service(mock)
            .delete_namespace("test-index", "ns1")
            .await
            .unwrap();
        assert_eq!(result, object(json!({"message": NAMESPACE_EMPTY_MESSAGE})));
    }

    #[tokio::test]
    async fn test_delete_namespace_deletes_listed_ids_once() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, _| *method == Method::GET && path.starts_with("/vectors/list"))
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"ids": ["v1", "v2"]}))));
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/vectors/delete"
                    && *body == Some(json!({"ids": ["v1", "v2"], "namespace": "ns1"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(JsonObject::new()));

        let result = service(mock)
            .delete_namespace("test-index", "ns1")
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_delete_namespace_rejects_non_string_ids() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|_, path, _| path.starts_with("/vectors/list"))
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"ids": ["v1", 7]}))));
        mock.expect_send()
            .withf(|_, path, _| path == "/vectors/delete")
            .never();

        let err = service(mock)
            .delete_namespace("test-index", "ns1")
            .await
            .unwrap_err();
        assert!(matches!(err, PineconeError::InvalidServerResponse(_)));
    }

    #[tokio::test]
    async fn test_delete_namespace_reads_vector_entries_listing() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|method, path, _| {
                *method == Method::GET && path == "/vectors/list?namespace=ns1&limit=100"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(object(json!({
                    "vectors": [{"id": "v1"}, {"id": "v2"}],
                    "namespace": "ns1"
                })))
            });
        mock.expect_send()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/vectors/delete"
                    && *body == Some(json!({"ids": ["v1", "v2"], "namespace": "ns1"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(JsonObject::new()));

        let result = service(mock)
            .delete_namespace("test-index", "ns1")
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_delete_namespace_rejects_non_string_vector_entry_id() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|_, path, _| path.starts_with("/vectors/list"))
            .times(1)
            .returning(|_, _, _| Ok(object(json!({"vectors": [{"id": "v1"}, {"id": 7}]}))));
        mock.expect_send()
            .withf(|_, path, _| path == "/vectors/delete")
            .never();

        let err = service(mock)
            .delete_namespace("test-index", "ns1")
            .await
            .unwrap_err();
        assert!(matches!(err, PineconeError::InvalidServerResponse(_)));
    }
}
