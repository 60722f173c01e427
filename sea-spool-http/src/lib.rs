//! ### `sea-spool-http`: HTTP stream driver
//!
//! [`StreamDriver`] issues one long-lived GET request and feeds the response body, chunk by
//! chunk, to a [`Sink`](sea_spool_types::Sink). When the body breaks off mid-way, the download
//! restarts from scratch with a fresh sink; every other error ends the run.

mod client;
mod driver;
mod error;
mod meter;

pub use client::*;
pub use driver::*;
pub use error::*;
pub use meter::*;
