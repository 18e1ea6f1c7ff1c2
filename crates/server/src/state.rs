use crate::config::ServerConfig;
use crate::error::ServerResult;
use coffee_journey::{BlobStore, CoffeeStore, FileBlobStore, ObjectId};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Document store holding coffee records (shared across requests)
    pub store: Arc<dyn CoffeeStore>,

    /// Image storage keyed by record id
    pub blobs: Arc<dyn BlobStore>,
}

impl ServerState {
    /// Create server state with the backends named in `config`.
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = config.store.build().await?;
        let blobs = Arc::new(FileBlobStore::open(&config.image_store_dir)?);

        tracing::info!(
            backend = ?config.store.backend,
            image_store_dir = %config.image_store_dir.display(),
            "storage initialized"
        );

        Ok(Self::with_backends(config, store, blobs))
    }

    /// Create server state around already-built backends.
    pub fn with_backends(
        config: ServerConfig,
        store: Arc<dyn CoffeeStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            blobs,
        }
    }

    /// Public URL of the image attached to `id`
    pub fn image_url(&self, id: &ObjectId) -> String {
        self.config.image_url(&id.to_hex())
    }
}
