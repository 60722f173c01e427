//! <div align="center">
//!
//!   <h1>SeaSpool</h1>
//!
//!   <p>
//!     <strong>🌊 Spool an endless HTTP stream into rotated files or S3 objects</strong>
//!   </p>
//!
//! </div>
//!
//! SeaSpool reads a long-lived HTTP response (think newline-delimited JSON firehose) and cuts it
//! into units of roughly a configured size. A unit only ever ends at a newline, so every unit
//! holds whole records.
//!
//! Units go either to a local directory, where a file appears under its final name only once it
//! is complete, or to an S3 bucket as gzip objects uploaded in one put.
//!
//! ## Architecture
//!
//! `sea-spool` is the facade crate re-exporting implementation from a number of sub-crates:
//!
//! + `sea-spool-types`: filename templates, the [`UnitBackend`] trait and the rotating [`Sink`]
//! + `sea-spool-file`: the local file backend
//! + `sea-spool-s3`: the object storage backend
//! + `sea-spool-http`: the HTTP client and the retrying [`http::StreamDriver`]
//!
//! This crate adds [`SpoolBackend`], which selects a backend *on runtime*, and the `sea-spool`
//! command line program:
//!
//! ```shell
//! sea-spool --path ./dump --buffer 1048576 --template 'dump-$year$month$day-$index.ndjson' \
//!     https://example.com/firehose
//! sea-spool --s3 my-bucket --user me --password secret -vv https://example.com/firehose
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod backend;
mod error;

pub use backend::*;
pub use error::*;
pub use sea_spool_types::*;

pub use sea_spool_file as file;
pub use sea_spool_http as http;
pub use sea_spool_s3 as s3;
