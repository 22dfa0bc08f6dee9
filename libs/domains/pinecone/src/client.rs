use std::sync::Arc;

use tracing::info;

use crate::config::PineconeConfig;
use crate::error::PineconeResult;
use crate::services::{IndexService, VectorService};
use crate::transport::{HttpTransport, Transport};
use crate::validation::SchemaValidator;

/// Both services over one transport.
///
/// The control plane (index lifecycle) and the data plane (vectors) live on
/// different hosts, so a typical program builds two clients: one with
/// [`PineconeClient::connect`] and one with [`PineconeClient::connect_index_host`].
pub struct PineconeClient<T: Transport> {
    indexes: IndexService<T>,
    vectors: VectorService<T>,
}

impl<T: Transport> PineconeClient<T> {
    pub fn new(transport: Arc<T>, validator: SchemaValidator) -> Self {
        Self {
            indexes: IndexService::new(Arc::clone(&transport), validator.clone()),
            vectors: VectorService::new(transport, validator),
        }
    }

    pub fn indexes(&self) -> &IndexService<T> {
        &self.indexes
    }

    pub fn vectors(&self) -> &VectorService<T> {
        &self.vectors
    }
}

impl PineconeClient<HttpTransport> {
    /// Client for the control-plane environment URL.
    pub fn connect(config: &PineconeConfig) -> PineconeResult<Self> {
        let transport = HttpTransport::new(config, None)?;
        info!(base_url = transport.base_url(), "Pinecone client connected");
        Ok(Self::new(Arc::new(transport), validator_for(config)))
    }

    /// Client for the dedicated index host in `custom_endpoint`.
    pub fn connect_index_host(config: &PineconeConfig) -> PineconeResult<Self> {
        let transport = HttpTransport::for_custom_endpoint(config)?;
        info!(base_url = transport.base_url(), "Pinecone index host connected");
        Ok(Self::new(Arc::new(transport), validator_for(config)))
    }
}

fn validator_for(config: &PineconeConfig) -> SchemaValidator {
    match config.schema_dir() {
        Some(dir) => SchemaValidator::with_schema_dir(dir),
        None => SchemaValidator::new(),
    }
}
