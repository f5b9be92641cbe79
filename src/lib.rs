#![forbid(unsafe_code)]
//! opbind: discover the operators a native computation engine exposes and
//! bind them as namespaced, argument-checked callables.
//!
//! ```no_run
//! use std::sync::Arc;
//! use opbind::prelude::*;
//! use opbind::{discover, CallArgs, OperatorManifest};
//!
//! # fn main() -> opbind::Result<()> {
//! let engine = OperatorManifest::from_path("ops.yaml")?.into_engine()?;
//! let registry = discover(Arc::new(engine))?;
//! let out = registry.call(
//!     NamespaceName::Default,
//!     "concat",
//!     CallArgs::new().arg(ArrayHandle::new(1)).arg(ArrayHandle::new(2)),
//! )?;
//! println!("{out}");
//! # Ok(())
//! # }
//! ```

pub use opbind_core::{config, dtype, error, hash, ident, metadata, namespace, prelude, value};
pub use opbind_core::{Error, Result};
pub use opbind_engine::{
    locate, Invocation, Kernel, KernelResult, MemoryEngine, OperatorEngine, OperatorManifest,
    ResolvedArg,
};
pub use opbind_registry::{
    discover, doc, global, CallArgs, Delegator, Registry, RegistryBuilder, RegistryEntry,
};
