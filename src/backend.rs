use std::{fmt::Display, path::PathBuf};

use crate::{map_err, BackendErr, SeaResult};
use sea_spool_file::FileBackend;
use sea_spool_s3::{ObjectBackend, ObjectOptions};
use sea_spool_types::UnitBackend;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// `sea-spool` Enum for identifying the underlying backend.
pub enum Backend {
    File,
    S3,
}

/// Where units end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// An existing local directory.
    Path(PathBuf),
    /// An S3 bucket; credentials and region come from the environment.
    S3(String),
}

/// A backend selected on runtime.
#[derive(Debug)]
pub enum SpoolBackend {
    File(FileBackend),
    S3(ObjectBackend),
}

impl Destination {
    /// Validate the destination and set up its backend. Nothing is written yet.
    pub fn connect(&self, options: ObjectOptions) -> SeaResult<SpoolBackend> {
        let backend = match self {
            Self::Path(dir) => {
                SpoolBackend::File(FileBackend::new(dir.as_path()).map_err(map_err)?)
            }
            Self::S3(bucket) => {
                SpoolBackend::S3(ObjectBackend::s3(bucket, options).map_err(map_err)?)
            }
        };
        log::debug!("Spooling to {self}");
        Ok(backend)
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(dir) => write!(f, "{}", dir.display()),
            Self::S3(bucket) => write!(f, "s3://{bucket}"),
        }
    }
}

impl SpoolBackend {
    /// Identifies the underlying backend
    pub fn backend(&self) -> Backend {
        match self {
            Self::File(_) => Backend::File,
            Self::S3(_) => Backend::S3,
        }
    }

    /// Get the concrete type for the File backend. None if it's another Backend
    pub fn get_file(&mut self) -> Option<&mut FileBackend> {
        match self {
            Self::File(b) => Some(b),
            Self::S3(_) => None,
        }
    }

    /// Get the concrete type for the S3 backend. None if it's another Backend
    pub fn get_s3(&mut self) -> Option<&mut ObjectBackend> {
        match self {
            Self::File(_) => None,
            Self::S3(b) => Some(b),
        }
    }

    /// A backend for the same destination with no open unit. The object store client is shared.
    pub fn reopen(&self) -> Self {
        match self {
            Self::File(b) => Self::File(b.reopen()),
            Self::S3(b) => Self::S3(b.reopen()),
        }
    }
}

impl From<FileBackend> for SpoolBackend {
    fn from(b: FileBackend) -> Self {
        Self::File(b)
    }
}

impl From<ObjectBackend> for SpoolBackend {
    fn from(b: ObjectBackend) -> Self {
        Self::S3(b)
    }
}

impl UnitBackend for SpoolBackend {
    type Error = BackendErr;

    async fn new_file(&mut self, name: &str) -> Result<(), BackendErr> {
        match self {
            Self::File(b) => b.new_file(name).await.map_err(Into::into),
            Self::S3(b) => b.new_file(name).await.map_err(Into::into),
        }
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BackendErr> {
        match self {
            Self::File(b) => b.write_bytes(bytes).await.map_err(Into::into),
            Self::S3(b) => b.write_bytes(bytes).await.map_err(Into::into),
        }
    }

    async fn close_file(&mut self) -> Result<(), BackendErr> {
        match self {
            Self::File(b) => b.close_file().await.map_err(Into::into),
            Self::S3(b) => b.close_file().await.map_err(Into::into),
        }
    }
}
