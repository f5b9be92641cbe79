#![forbid(unsafe_code)]
//! opbind-registry: discovery pass, namespaced registry and delegators.
//!
//! Flow (runs once, synchronously):
//! - `discovery::discover` lists operator names, resolves handles, fetches and
//!   validates metadata, routes each operator to a namespace.
//! - Every operator is registered into a `RegistryBuilder`, which binds a
//!   `Delegator` for it.
//! - `RegistryBuilder::freeze` yields the immutable `Registry`.
//!
//! Any failure drops the builder, so a half-built registry is never visible.
//! `global` holds the one process-wide registry.

pub mod delegator;
pub mod discovery;
pub mod doc;
pub mod global;
pub mod registry;

pub use delegator::{CallArgs, Delegator};
pub use discovery::discover;
pub use registry::{Registry, RegistryBuilder, RegistryEntry};
