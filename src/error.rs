use sea_spool_file::FileErr;
use sea_spool_s3::S3Err;
use sea_spool_types::{SpoolErr, SpoolResult};
use thiserror::Error;

/// `sea-spool` the concrete error type.
pub type Error = SpoolErr<BackendErr>;

#[derive(Error, Debug)]
/// `sea-spool` the concrete backend error.
pub enum BackendErr {
    #[error("FileBackendErr: {0}")]
    File(FileErr),
    #[error("S3BackendErr: {0}")]
    S3(S3Err),
}

impl From<FileErr> for BackendErr {
    fn from(err: FileErr) -> Self {
        Self::File(err)
    }
}

impl From<S3Err> for BackendErr {
    fn from(err: S3Err) -> Self {
        Self::S3(err)
    }
}

pub type SeaResult<T> = SpoolResult<T, BackendErr>;

pub(crate) fn map_err<E: std::error::Error + Into<BackendErr>>(
    err: SpoolErr<E>,
) -> SpoolErr<BackendErr> {
    match err {
        SpoolErr::Backend(err) => SpoolErr::Backend(err.into()),
        SpoolErr::Template(e) => SpoolErr::Template(e),
        SpoolErr::Config(e) => SpoolErr::Config(e),
    }
}
