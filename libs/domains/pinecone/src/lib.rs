//! Pinecone Domain
//!
//! Schema-validated client for the Pinecone vector database REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  PineconeClient  │  ← Facade over both services, one shared transport
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │     Services     │  ← IndexService (control plane), VectorService (data plane)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │    Validation    │  ← Identifier checks, JSON-Schema on request and response
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │    Transport     │  ← Trait + reqwest implementation
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_pinecone::{IndexConfig, IndexSpecSource, Metric, PineconeClient, PineconeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PineconeConfig::from_env()?;
//! let client = PineconeClient::connect(&config)?;
//!
//! let index = IndexConfig::new(
//!     "docs",
//!     Metric::Cosine,
//!     1536,
//!     IndexSpecSource::serverless("aws", "us-east-1"),
//! );
//! client.indexes().create_index(&index).await?;
//!
//! let vectors = PineconeClient::connect_index_host(&config)?;
//! vectors.vectors().delete_namespace("docs", "drafts").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use client::PineconeClient;
pub use config::PineconeConfig;
pub use error::{PineconeError, PineconeResult};
pub use models::{
    IndexConfig, IndexSpecSource, ListVectorIds, Metric, PodFields, ResolvedSpec,
    ServerlessFields, Vector, VectorQuery,
};
pub use services::{IndexService, NAMESPACE_EMPTY_MESSAGE, VectorService};
pub use transport::{HttpTransport, JsonObject, Method, Transport};
pub use validation::{HasIndexName, IndexNameSource, SchemaValidator};
