use std::future::Future;

use crate::{FilenameGenerator, SpoolErr, SpoolResult};

/// 20 MiB
pub const DEFAULT_ROTATION_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Records are separated by a single newline byte.
pub const RECORD_BOUNDARY: u8 = b'\n';

/// The primitives a persistence backend provides. A backend holds at most one open unit.
///
/// [`Sink`] guarantees the call order: `new_file`, any number of `write_bytes`, then `close_file`,
/// before the next `new_file`.
pub trait UnitBackend {
    type Error: std::error::Error;

    /// Open a new unit under the given name.
    fn new_file(&mut self, name: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Append bytes to the open unit.
    fn write_bytes(&mut self, bytes: &[u8])
        -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Commit the open unit. Once this returns, the unit is visible under its final name.
    fn close_file(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Splits a byte stream into units of roughly `threshold` bytes, only ever cutting at a
/// [`RECORD_BOUNDARY`].
///
/// The threshold is a soft bound: a unit over the threshold keeps growing until a chunk containing
/// a boundary arrives. An empty chunk ends the stream and commits the open unit.
#[derive(Debug)]
pub struct Sink<B: UnitBackend> {
    backend: B,
    names: FilenameGenerator,
    threshold: u64,
    index: u64,
    unit: Option<String>,
    written: u64,
}

impl<B: UnitBackend> Sink<B> {
    pub fn new(backend: B, names: FilenameGenerator, threshold: u64) -> Self {
        Self {
            backend,
            names,
            threshold,
            index: 0,
            unit: None,
            written: 0,
        }
    }

    /// Write one chunk. Must be called in stream order, one call at a time.
    pub async fn write(&mut self, chunk: &[u8]) -> SpoolResult<(), B::Error> {
        if chunk.is_empty() {
            return self.close_file().await;
        }

        if self.unit.is_none() {
            self.new_file().await?;
        }

        let mut chunk = chunk;
        self.written += chunk.len() as u64;
        if self.written > self.threshold {
            // only the first boundary of this chunk is considered
            if let Some(pos) = chunk.iter().position(|b| *b == RECORD_BOUNDARY) {
                let (before, after) = (&chunk[..pos], &chunk[pos + 1..]);
                self.backend
                    .write_bytes(before)
                    .await
                    .map_err(SpoolErr::Backend)?;
                self.close_file().await?;
                self.new_file().await?;
                chunk = after;
                self.written = after.len() as u64;
            }
        }

        self.backend
            .write_bytes(chunk)
            .await
            .map_err(SpoolErr::Backend)
    }

    async fn new_file(&mut self) -> SpoolResult<(), B::Error> {
        self.index += 1;
        let name = self.names.generate(self.index);
        self.backend
            .new_file(&name)
            .await
            .map_err(SpoolErr::Backend)?;
        log::debug!("Opened unit {} ({name})", self.index);
        self.unit = Some(name);
        self.written = 0;
        Ok(())
    }

    async fn close_file(&mut self) -> SpoolResult<(), B::Error> {
        if let Some(name) = self.unit.take() {
            self.written = 0;
            self.backend.close_file().await.map_err(SpoolErr::Backend)?;
            log::debug!("Committed unit {} ({name})", self.index);
        }
        Ok(())
    }

    /// Number of units opened so far.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Name of the open unit, if any.
    pub fn current_unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn bytes_in_unit(&self) -> u64 {
        self.written
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
