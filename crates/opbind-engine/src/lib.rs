#![forbid(unsafe_code)]
//! opbind-engine: the narrow surface opbind needs from a native engine.
//!
//! - `api`: the `OperatorEngine` trait (list / resolve / fetch / invoke).
//! - `memory`: an in-process engine for tests, tooling and benches.
//! - `manifest`: YAML/JSON operator descriptions loaded into a `MemoryEngine`.
//! - `locate`: where the engine's shared library might live.
//!
//! A native adapter implements `OperatorEngine` over the engine's C API; the
//! binding layer above only ever sees the trait.

pub mod api;
pub mod locate;
pub mod manifest;
pub mod memory;

pub use api::{Invocation, OperatorEngine, ResolvedArg};
pub use manifest::OperatorManifest;
pub use memory::{builtin_kernel, Kernel, KernelResult, MemoryEngine};
