use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{BlobError, BlobResult};

/// Storage for coffee images, addressed by a flat name (the record id).
///
/// The default implementation ([`FileBlobStore`]) keeps one file per key in a
/// single directory.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob. Overwrites if the key already exists.
    async fn put(&self, key: &str, data: Bytes) -> BlobResult<()>;

    /// Retrieve a blob. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> BlobResult<Option<Bytes>>;

    /// Delete a blob. No-op if the key does not exist.
    async fn delete(&self, key: &str) -> BlobResult<()>;
}

/// Local-filesystem blob store rooted at `base_dir`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base_dir: PathBuf,
}

impl FileBlobStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl AsRef<Path>) -> BlobResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        tracing::debug!(dir = %base_dir.display(), "blob directory ready");
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Keys are single path components; anything that could leave
    /// `base_dir` is refused.
    fn resolve(&self, key: &str) -> BlobResult<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
        {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(key))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, key: &str, data: Bytes) -> BlobResult<()> {
        let path = self.resolve(key)?;
        // Write beside the target and rename so readers never see a torn file.
        let staging = self.base_dir.join(format!(".{key}.partial"));
        tokio::fs::write(&staging, &data).await?;
        if let Err(err) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Option<Bytes>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
