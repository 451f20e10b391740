//! [`sync::RemoteStore`] over `object_store`.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectStore, PutOptions, WriteMultipart,
};
use tracing::debug;

use sync::{
    ObjectMeta, RemoteObject, RemoteStore, Result, SyncError, TransferMode,
    DEFAULT_CONTENT_TYPE,
};

use crate::config::ObjectStoreConfig;

/// Remote container backed by any `object_store` implementation.
///
/// The local-filesystem backend cannot carry object attributes, so
/// content-type tags degrade to an extension guess there and
/// `set_content_type` becomes a no-op.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
    supports_attributes: bool,
}

impl Storage {
    pub fn from_config(config: &ObjectStoreConfig) -> Result<Self> {
        match config {
            ObjectStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let store = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(true)
                    .build()
                    .map_err(SyncError::remote)?;
                Ok(Self {
                    inner: Arc::new(store),
                    supports_attributes: true,
                })
            }
            ObjectStoreConfig::Local { path } => {
                std::fs::create_dir_all(path)
                    .map_err(|e| SyncError::local_io(path.clone(), e))?;
                let store =
                    LocalFileSystem::new_with_prefix(path).map_err(SyncError::remote)?;
                Ok(Self {
                    inner: Arc::new(store),
                    supports_attributes: false,
                })
            }
            ObjectStoreConfig::Memory => Ok(Self {
                inner: Arc::new(InMemory::new()),
                supports_attributes: true,
            }),
        }
    }

    async fn content_type_of(&self, location: &StorePath) -> Result<String> {
        if !self.supports_attributes {
            return Ok(guess_content_type(location.as_ref()));
        }
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self
            .inner
            .get_opts(location, options)
            .await
            .map_err(SyncError::remote)?;
        Ok(result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()))
    }
}

#[async_trait]
impl RemoteStore for Storage {
    async fn list(&self) -> Result<Vec<RemoteObject>> {
        let metas: Vec<object_store::ObjectMeta> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(SyncError::remote)?;

        let mut objects = Vec::with_capacity(metas.len());
        for meta in metas {
            let content_type = self.content_type_of(&meta.location).await?;
            objects.push(RemoteObject {
                key: meta.location.to_string(),
                content_type,
                modified_utc: Some(meta.last_modified),
            });
        }
        Ok(objects)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self.inner.head(&StorePath::from(key)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(SyncError::remote(err)),
        }
    }

    async fn upload(&self, key: &str, bytes: Bytes, mode: TransferMode) -> Result<()> {
        let location = StorePath::from(key);
        match mode {
            TransferMode::Whole => {
                self.inner
                    .put_opts(&location, bytes.into(), PutOptions::default())
                    .await
                    .map_err(SyncError::remote)?;
            }
            TransferMode::Chunked => {
                let upload = self
                    .inner
                    .put_multipart(&location)
                    .await
                    .map_err(SyncError::remote)?;
                let mut writer = WriteMultipart::new(upload);
                writer.write(&bytes);
                writer.finish().await.map_err(SyncError::remote)?;
            }
        }
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Bytes> {
        let result = self
            .inner
            .get(&StorePath::from(key))
            .await
            .map_err(SyncError::remote)?;
        result.bytes().await.map_err(SyncError::remote)
    }

    async fn metadata(&self, key: &str) -> Result<Option<ObjectMeta>> {
        let location = StorePath::from(key);
        let meta = match self.inner.head(&location).await {
            Ok(meta) => meta,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(SyncError::remote(err)),
        };
        let content_type = self.content_type_of(&location).await?;
        Ok(Some(ObjectMeta {
            content_type,
            modified_utc: Some(meta.last_modified),
        }))
    }

    async fn set_content_type(&self, key: &str, content_type: &str) -> Result<()> {
        if !self.supports_attributes {
            debug!(key, "backend does not carry content-type attributes");
            return Ok(());
        }

        // object_store has no metadata-only update; rewrite the object
        // with the new attribute set
        let location = StorePath::from(key);
        let bytes = self.download(key).await?;
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.inner
            .put_opts(&location, bytes.into(), options)
            .await
            .map_err(SyncError::remote)?;
        Ok(())
    }
}

fn guess_content_type(key: &str) -> String {
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
