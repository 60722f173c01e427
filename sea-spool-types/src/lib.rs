//! # 🌊 SeaSpool Types
//!
//! This crate defines the traits and types shared by every SeaSpool backend: the filename
//! [`Template`], the [`UnitBackend`] capability trait and the [`Sink`] that rotates a byte stream
//! across units. It does not persist anything by itself.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod error;
mod sink;
mod template;

pub use error::*;
pub use sink::*;
pub use template::*;

pub mod export {
    pub use time;
}
