use std::{io::Write, sync::Arc};

use crate::{S3Err, S3Result};
use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use object_store::{aws::AmazonS3Builder, path::Path as ObjectPath, ObjectStore, PutPayload};
use sea_spool_types::{SpoolErr, UnitBackend};

/// Appended to every object key.
pub const COMPRESSION_SUFFIX: &str = "gz";

#[derive(Debug, Clone, Copy)]
pub struct ObjectOptions {
    compression: Compression,
}

/// Buffers a unit in memory and uploads it, compressed, on commit.
///
/// Memory usage is proportional to the unit size.
#[derive(Debug)]
pub struct ObjectBackend {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    options: ObjectOptions,
    unit: Option<OpenObject>,
}

#[derive(Debug)]
struct OpenObject {
    name: String,
    buffer: Vec<u8>,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
        }
    }
}

impl ObjectOptions {
    pub fn compression_level(&self) -> u32 {
        self.compression.level()
    }

    /// 0 (store only) to 9 (best).
    pub fn set_compression_level(&mut self, level: u32) -> &mut Self {
        self.compression = Compression::new(level.min(9));
        self
    }
}

impl ObjectBackend {
    pub fn new<S: Into<String>>(store: Arc<dyn ObjectStore>, bucket: S, options: ObjectOptions) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            options,
            unit: None,
        }
    }

    /// Amazon S3, configured from the environment (`AWS_REGION`, `AWS_ACCESS_KEY_ID` and friends).
    pub fn s3(bucket: &str, options: ObjectOptions) -> S3Result<Self> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| SpoolErr::Config(format!("S3 bucket {bucket}: {e}")))?;
        Ok(Self::new(Arc::new(store), bucket, options))
    }

    /// A backend sharing this store client, with no open unit.
    pub fn reopen(&self) -> Self {
        Self::new(self.store.clone(), self.bucket.clone(), self.options)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn options(&self) -> &ObjectOptions {
        &self.options
    }

    /// Bytes buffered for the open unit.
    pub fn buffered(&self) -> usize {
        self.unit.as_ref().map(|u| u.buffer.len()).unwrap_or(0)
    }
}

/// The object key of a unit.
pub fn object_key(name: &str) -> String {
    format!("{name}.{COMPRESSION_SUFFIX}")
}

pub fn compress(bytes: &[u8], compression: Compression) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 4 + 32), compression);
    encoder.write_all(bytes)?;
    encoder.finish()
}

impl UnitBackend for ObjectBackend {
    type Error = S3Err;

    async fn new_file(&mut self, name: &str) -> Result<(), S3Err> {
        if let Some(unit) = &self.unit {
            return Err(S3Err::AlreadyOpened(unit.name.clone()));
        }
        self.unit = Some(OpenObject {
            name: name.to_owned(),
            buffer: Vec::new(),
        });
        Ok(())
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), S3Err> {
        let unit = self.unit.as_mut().ok_or(S3Err::NotOpened)?;
        unit.buffer.extend_from_slice(bytes);
        Ok(())
    }

    async fn close_file(&mut self) -> Result<(), S3Err> {
        let OpenObject { name, buffer } = self.unit.take().ok_or(S3Err::NotOpened)?;
        let key = object_key(&name);
        let size = buffer.len();
        let compression = self.options.compression;
        // a unit can be large; keep gzip off the async workers
        let compressed = tokio::task::spawn_blocking(move || compress(&buffer, compression))
            .await
            .map_err(|e| S3Err::IoError(e.into()))?
            .map_err(S3Err::IoError)?;
        log::info!(
            "Writing new object {key} to bucket {} ({size} -> {} bytes)",
            self.bucket,
            compressed.len()
        );

        self.store
            .put(
                &ObjectPath::from(key.as_str()),
                PutPayload::from(Bytes::from(compressed)),
            )
            .await
            .map_err(S3Err::ObjectStore)?;
        Ok(())
    }
}
