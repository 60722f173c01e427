//! ### `sea-spool-s3`: Object storage backend
//!
//! A unit is buffered in memory, gzip-compressed when it is committed, then uploaded with a single
//! put as `<name>.gz`. An object is either absent or complete; there are no partial uploads.
//!
//! The backend is written against [`object_store::ObjectStore`], so anything `object_store` can
//! talk to works; [`ObjectBackend::s3`] builds an Amazon S3 store from the `AWS_*` environment
//! variables.

mod backend;
mod error;

pub use backend::*;
pub use error::*;

pub mod export {
    pub use object_store;
}
