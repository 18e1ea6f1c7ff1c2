use std::sync::RwLock;

use async_trait::async_trait;
use bson::oid::ObjectId;

use super::CoffeeStore;
use crate::error::{StoreError, StoreResult};
use crate::model::{CoffeeFields, CoffeeRecord};

/// An in-memory store using a `RwLock` around an insertion-ordered `Vec`.
///
/// Lookups are linear, which is fine for the collection sizes this backend is
/// meant for (tests, demos).
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CoffeeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_record<T>(
        &self,
        id: &ObjectId,
        f: impl FnOnce(&mut CoffeeRecord) -> T,
    ) -> StoreResult<Option<T>> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.iter_mut().find(|r| r.id == *id).map(f))
    }
}

#[async_trait]
impl CoffeeStore for MemoryStore {
    async fn insert(&self, fields: &CoffeeFields) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .push(CoffeeRecord::new(id, fields.clone()));
        Ok(id)
    }

    async fn find_all(&self) -> StoreResult<Vec<CoffeeRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.clone())
    }

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<CoffeeRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.iter().find(|r| r.id == *id).cloned())
    }

    async fn update(&self, id: &ObjectId, fields: &CoffeeFields) -> StoreResult<bool> {
        Ok(self.with_record(id, |r| r.apply(fields))?.is_some())
    }

    async fn set_image_url(&self, id: &ObjectId, url: &str) -> StoreResult<bool> {
        Ok(self
            .with_record(id, |r| r.image_url = Some(url.to_string()))?
            .is_some())
    }

    async fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let before = guard.len();
        guard.retain(|r| r.id != *id);
        Ok(guard.len() < before)
    }
}
