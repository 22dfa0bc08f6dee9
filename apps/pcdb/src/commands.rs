use domain_pinecone::{
    IndexConfig, IndexSpecSource, JsonObject, ListVectorIds, PineconeClient, PineconeConfig,
    PodFields, ServerlessFields, Vector, VectorQuery,
};
use eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing::info;

use crate::{Commands, SpecArgs};

impl SpecArgs {
    fn into_source(self) -> IndexSpecSource {
        IndexSpecSource {
            pod: PodFields {
                environment: self.environment,
                pod_type: self.pod_type,
                pods: self.pods,
            },
            serverless: ServerlessFields {
                cloud: self.cloud,
                region: self.region,
            },
            replicas: self.replicas,
            shards: self.shards,
        }
    }
}

/// Execute one command and return the response document to print.
pub async fn run(command: Commands, config: &PineconeConfig) -> Result<JsonObject> {
    let output = match command {
        Commands::ListIndexes => control(config)?.indexes().list_indexes().await?,
        Commands::DescribeIndex { index } => {
            control(config)?.indexes().describe_index(&index).await?
        }
        Commands::CreateIndex {
            index,
            dimension,
            metric,
            spec,
            metadata_config,
        } => {
            let deletion_protection = spec.deletion_protection.clone();
            let mut index_config = IndexConfig::new(index, metric, dimension, spec.into_source());
            if let Some(raw) = metadata_config {
                index_config = index_config.with_metadata_config(parse_json(&raw, "metadata config")?);
            }
            if let Some(protection) = deletion_protection {
                index_config = index_config.with_deletion_protection(protection);
            }

            info!(index = %index_config.index_name, "Creating index");
            control(config)?.indexes().create_index(&index_config).await?
        }
        Commands::DeleteIndex { index } => control(config)?.indexes().delete_index(&index).await?,
        Commands::ConfigureIndex { index, spec } => {
            let deletion_protection = spec.deletion_protection.clone();
            let mut index_config = IndexConfig::for_update(index.clone(), spec.into_source());
            if let Some(protection) = deletion_protection {
                index_config = index_config.with_deletion_protection(protection);
            }
            control(config)?
                .indexes()
                .update_index(&index, &index_config)
                .await?
        }
        Commands::Stats { index } => {
            control(config)?
                .indexes()
                .describe_index_stats(&index)
                .await?
        }
        Commands::Backup { index, backup } => {
            control(config)?
                .indexes()
                .create_backup(&index, &backup)
                .await?
        }
        Commands::Restore {
            index,
            backup,
            dimension,
            metric,
        } => {
            control(config)?
                .indexes()
                .restore_from_backup(&index, dimension, metric, &backup)
                .await?
        }
        Commands::ListBackups => control(config)?.indexes().list_backups().await?,
        Commands::DescribeBackup { backup } => {
            control(config)?.indexes().describe_backup(&backup).await?
        }
        Commands::DeleteBackup { backup } => control(config)?.indexes().delete_backup(&backup).await?,
        Commands::Upsert {
            index,
            id,
            values,
            sparse,
            metadata,
            namespace,
        } => {
            let mut vector = Vector::new(id, values);
            if !sparse.is_empty() {
                vector = vector.with_sparse_values(parse_sparse(&sparse)?);
            }
            if let Some(raw) = metadata {
                vector = vector.with_metadata(parse_object(&raw, "metadata")?);
            }
            data(config)?
                .vectors()
                .upsert(&index, &[vector], namespace.as_deref())
                .await?
        }
        Commands::Update {
            index,
            id,
            values,
            metadata,
            namespace,
        } => {
            let metadata = parse_object(&metadata, "metadata")?;
            data(config)?
                .vectors()
                .update(&index, &id, &values, &metadata, namespace.as_deref())
                .await?
        }
        Commands::Fetch {
            index,
            ids,
            namespace,
        } => {
            data(config)?
                .vectors()
                .fetch(&index, &ids, namespace.as_deref())
                .await?
        }
        Commands::Query {
            index,
            vector,
            top_k,
            namespace,
            filter,
            include_values,
            include_metadata,
        } => {
            let mut query = VectorQuery::new(vector)
                .with_top_k(top_k)
                .include_values(include_values)
                .include_metadata(include_metadata);
            if let Some(namespace) = namespace {
                query = query.with_namespace(namespace);
            }
            if let Some(raw) = filter {
                query = query.with_filter(parse_object(&raw, "filter")?);
            }
            data(config)?.vectors().query(&index, &query).await?
        }
        Commands::ListIds {
            index,
            namespace,
            prefix,
            limit,
            pagination_token,
        } => {
            let params = ListVectorIds {
                namespace,
                prefix,
                limit,
                pagination_token,
            };
            data(config)?.vectors().list_vector_ids(&index, &params).await?
        }
        Commands::DeleteVectors {
            index,
            ids,
            namespace,
        } => {
            data(config)?
                .vectors()
                .delete_vectors(&index, &ids, namespace.as_deref())
                .await?
        }
        Commands::DeleteNamespace { index, namespace } => {
            data(config)?
                .vectors()
                .delete_namespace(&index, &namespace)
                .await?
        }
    };

    Ok(output)
}

fn control(config: &PineconeConfig) -> Result<PineconeClient<domain_pinecone::HttpTransport>> {
    PineconeClient::connect(config).wrap_err("Failed to build control-plane client")
}

fn data(config: &PineconeConfig) -> Result<PineconeClient<domain_pinecone::HttpTransport>> {
    PineconeClient::connect_index_host(config).wrap_err("Failed to build index host client")
}

/// `index:value` pairs, kept in the order given.
fn parse_sparse(pairs: &[String]) -> Result<Vec<(u32, f32)>> {
    pairs
        .iter()
        .map(|pair| {
            let (index, value) = pair
                .split_once(':')
                .ok_or_else(|| eyre!("sparse value '{}' must be index:value", pair))?;
            let index = index
                .trim()
                .parse::<u32>()
                .wrap_err_with(|| format!("Invalid sparse index in '{}'", pair))?;
            let value = value
                .trim()
                .parse::<f32>()
                .wrap_err_with(|| format!("Invalid sparse value in '{}'", pair))?;
            Ok((index, value))
        })
        .collect()
}

fn parse_json(raw: &str, what: &str) -> Result<Value> {
    serde_json::from_str(raw).wrap_err_with(|| format!("Invalid {} JSON", what))
}

fn parse_object(raw: &str, what: &str) -> Result<JsonObject> {
    match parse_json(raw, what)? {
        Value::Object(map) => Ok(map),
        _ => Err(eyre!("{} must be a JSON object", what)),
    }
}
