use sea_spool_types::SpoolResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum S3Err {
    #[error("ObjectStore Error: {0}")]
    ObjectStore(#[source] object_store::Error),
    #[error("IO Error: {0}")]
    IoError(#[source] std::io::Error),
    #[error("No object is open")]
    NotOpened,
    #[error("An object is already open: {0}")]
    AlreadyOpened(String),
}

pub type S3Result<T> = SpoolResult<T, S3Err>;
