#![forbid(unsafe_code)]
//! opbind-core: identifiers, values, operator metadata and namespace routing.
//!
//! Everything here is pure. Engine access lives in `opbind-engine`; the
//! discovery pass, registry and delegators live in `opbind-registry`.

pub mod config;
pub mod dtype;
pub mod error;
pub mod hash;
pub mod ident;
pub mod metadata;
pub mod namespace;
pub mod prelude;
pub mod value;

pub use error::{Error, Result};
