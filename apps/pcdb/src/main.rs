//! pcdb
//!
//! Command-line client for a Pinecone project. Index commands talk to the
//! control-plane environment, vector commands to the index host in
//! `PINECONE_CUSTOM_ENDPOINT`.

use clap::{Args, Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_pinecone::{Metric, PineconeConfig};
use eyre::Result;

mod commands;

#[derive(Parser)]
#[command(name = "pcdb")]
#[command(about = "Manage Pinecone indexes, backups and vectors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all indexes in the project
    ListIndexes,

    /// Show the configuration and status of an index
    DescribeIndex { index: String },

    /// Create a pod or serverless index
    CreateIndex {
        index: String,

        #[arg(short, long)]
        dimension: u32,

        #[arg(short, long, default_value = "cosine")]
        metric: Metric,

        #[command(flatten)]
        spec: SpecArgs,

        /// Pod metadata config as JSON, e.g. '{"indexed": ["genre"]}'
        #[arg(long)]
        metadata_config: Option<String>,
    },

    /// Delete an index
    DeleteIndex { index: String },

    /// Change replicas or pod type of a pod index, or deletion protection
    ConfigureIndex {
        index: String,

        #[command(flatten)]
        spec: SpecArgs,
    },

    /// Show vector counts per namespace
    Stats { index: String },

    /// Snapshot an index into a backup
    Backup { index: String, backup: String },

    /// Create a new index from a backup
    Restore {
        index: String,
        backup: String,

        #[arg(short, long)]
        dimension: u32,

        #[arg(short, long, default_value = "cosine")]
        metric: Metric,
    },

    /// List all backups in the project
    ListBackups,

    /// Show the status of a backup
    DescribeBackup { backup: String },

    /// Delete a backup
    DeleteBackup { backup: String },

    /// Insert or overwrite one vector
    Upsert {
        index: String,
        id: String,

        /// Dense values, comma separated
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f32>,

        /// Sparse values as index:value pairs, e.g. 3:0.5,7:0.25
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        sparse: Vec<String>,

        /// Metadata as JSON, e.g. '{"genre": "drama"}'
        #[arg(long)]
        metadata: Option<String>,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Replace the values and metadata of one vector
    Update {
        index: String,
        id: String,

        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f32>,

        /// Replacement metadata as JSON; stored metadata is not merged
        #[arg(long, default_value = "{}")]
        metadata: String,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Fetch vectors by id
    Fetch {
        index: String,

        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Similarity search
    Query {
        index: String,

        /// Query vector, comma separated
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        vector: Vec<f32>,

        #[arg(short = 'k', long, default_value_t = domain_pinecone::models::DEFAULT_TOP_K)]
        top_k: u32,

        #[arg(short, long)]
        namespace: Option<String>,

        /// Metadata filter as JSON, e.g. '{"genre": {"$eq": "drama"}}'
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(long)]
        include_values: bool,

        #[arg(long)]
        include_metadata: bool,
    },

    /// List one page of vector ids
    ListIds {
        index: String,

        #[arg(short, long)]
        namespace: Option<String>,

        #[arg(short, long)]
        prefix: Option<String>,

        #[arg(short, long)]
        limit: Option<u32>,

        #[arg(long)]
        pagination_token: Option<String>,
    },

    /// Delete vectors by id
    DeleteVectors {
        index: String,

        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Delete the first page of vectors listed in a namespace
    DeleteNamespace { index: String, namespace: String },
}

/// Topology flags. Supply either the pod group or the serverless group.
#[derive(Args, Debug, Default)]
struct SpecArgs {
    #[arg(long)]
    cloud: Option<String>,

    #[arg(long)]
    region: Option<String>,

    /// Pod environment, e.g. us-west1-gcp
    #[arg(long)]
    environment: Option<String>,

    #[arg(long)]
    pod_type: Option<String>,

    #[arg(long)]
    pods: Option<u32>,

    #[arg(long)]
    replicas: Option<u32>,

    #[arg(long)]
    shards: Option<u32>,

    /// enabled or disabled
    #[arg(long)]
    deletion_protection: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let config = PineconeConfig::from_env()?;

    let output = commands::run(cli.command, &config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_index() {
        let cli = Cli::try_parse_from([
            "pcdb",
            "create-index",
            "docs",
            "--dimension",
            "1536",
            "--metric",
            "dotproduct",
            "--cloud",
            "aws",
            "--region",
            "us-east-1",
        ])
        .unwrap();

        match cli.command {
            Commands::CreateIndex {
                index,
                dimension,
                metric,
                spec,
                metadata_config,
            } => {
                assert_eq!(index, "docs");
                assert_eq!(dimension, 1536);
                assert_eq!(metric, Metric::DotProduct);
                assert_eq!(spec.cloud.as_deref(), Some("aws"));
                assert!(spec.pods.is_none());
                assert!(metadata_config.is_none());
            }
            _ => panic!("expected create-index"),
        }
    }

    #[test]
    fn test_parse_query_vector_with_negatives() {
        let cli = Cli::try_parse_from([
            "pcdb", "query", "docs", "--vector", "0.5,-0.25", "-k", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Query { vector, top_k, .. } => {
                assert_eq!(vector, vec![0.5, -0.25]);
                assert_eq!(top_k, 3);
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn test_parse_comma_separated_ids() {
        let cli = Cli::try_parse_from(["pcdb", "fetch", "docs", "vec1,vec2", "-n", "ns1"]).unwrap();

        match cli.command {
            Commands::Fetch { ids, namespace, .. } => {
                assert_eq!(ids, vec!["vec1", "vec2"]);
                assert_eq!(namespace.as_deref(), Some("ns1"));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_parse_upsert_with_sparse_pairs() {
        let cli = Cli::try_parse_from([
            "pcdb", "upsert", "docs", "vec1", "--values", "0.5,-0.25", "--sparse", "3:0.5,7:0.25",
        ])
        .unwrap();

        match cli.command {
            Commands::Upsert {
                id,
                values,
                sparse,
                metadata,
                ..
            } => {
                assert_eq!(id, "vec1");
                assert_eq!(values, vec![0.5, -0.25]);
                assert_eq!(sparse, vec!["3:0.5", "7:0.25"]);
                assert!(metadata.is_none());
            }
            _ => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_parse_update_defaults_to_empty_metadata() {
        let cli = Cli::try_parse_from(["pcdb", "update", "docs", "vec1", "--values", "0.5"]).unwrap();

        match cli.command {
            Commands::Update { metadata, .. } => assert_eq!(metadata, "{}"),
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_parse_backup_lookups() {
        let cli = Cli::try_parse_from(["pcdb", "describe-backup", "nightly"]).unwrap();
        assert!(matches!(cli.command, Commands::DescribeBackup { ref backup } if backup == "nightly"));

        let cli = Cli::try_parse_from(["pcdb", "delete-backup", "nightly"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteBackup { ref backup } if backup == "nightly"));
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let result = Cli::try_parse_from([
            "pcdb", "restore", "docs", "nightly", "--dimension", "8", "--metric", "manhattan",
        ]);
        assert!(result.is_err());
    }
}
