//! ### `sea-spool-file`: Local file backend
//!
//! Each unit is written to `<name>._` in the destination directory, then renamed to `<name>`
//! when it is committed. A reader listing the directory never sees a partial file under its
//! final name.

mod backend;
mod error;

pub use backend::*;
pub use error::*;
