use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::model::{CoffeeFields, CoffeeRecord};

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

/// Document store holding coffee records.
///
/// Every method is a single round trip; none of them coordinate with the blob
/// store. Implementations must be safe to share across request tasks.
#[async_trait]
pub trait CoffeeStore: Send + Sync {
    /// Insert a new record and return the id the store assigned to it.
    async fn insert(&self, fields: &CoffeeFields) -> StoreResult<ObjectId>;

    /// Every record, in insertion order.
    async fn find_all(&self) -> StoreResult<Vec<CoffeeRecord>>;

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<CoffeeRecord>>;

    /// `$set` the supplied fields. Returns `false` when no record matched.
    async fn update(&self, id: &ObjectId, fields: &CoffeeFields) -> StoreResult<bool>;

    /// Set `imageUrl`. Returns `false` when no record matched.
    async fn set_image_url(&self, id: &ObjectId, url: &str) -> StoreResult<bool>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Cheap reachability check used by the readiness probe.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Which backend [`StoreConfig::build`] produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Ephemeral, process-local. Used by tests and demos.
    Memory,
    /// MongoDB. Requires the `mongo` feature at compile time.
    Mongo,
}

impl Default for StoreBackend {
    fn default() -> Self {
        if cfg!(feature = "mongo") {
            StoreBackend::Mongo
        } else {
            StoreBackend::Memory
        }
    }
}

/// Document store selection and connection settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// MongoDB connection string
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl StoreConfig {
    /// In-memory configuration, handy for tests.
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Build the configured backend.
    ///
    /// Selecting `mongo` in a build without the `mongo` feature is a
    /// configuration error rather than a silent fallback.
    pub async fn build(&self) -> StoreResult<Arc<dyn CoffeeStore>> {
        match self.backend {
            StoreBackend::Memory => {
                tracing::warn!("using the in-memory document store; records are lost on restart");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreBackend::Mongo => {
                #[cfg(feature = "mongo")]
                {
                    let store =
                        MongoStore::connect(&self.uri, &self.database, &self.collection).await?;
                    Ok(Arc::new(store))
                }
                #[cfg(not(feature = "mongo"))]
                {
                    Err(crate::error::StoreError::Config(
                        "mongo backend disabled at compile time".to_string(),
                    ))
                }
            }
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "coffee-journey".to_string()
}

fn default_collection() -> String {
    "coffees".to_string()
}
