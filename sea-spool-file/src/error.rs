use sea_spool_types::SpoolResult;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileErr {
    #[error("IO Error: {0}")]
    IoError(#[source] std::io::Error),
    #[error("No file is open")]
    NotOpened,
    #[error("A file is already open: {0}")]
    AlreadyOpened(PathBuf),
}

pub type FileResult<T> = SpoolResult<T, FileErr>;
