//! The process-wide registry.
//!
//! Set exactly once by `init`; read-only afterwards. A failed `init` leaves
//! the slot empty, so a later `init` may try again. Concurrent `init` calls
//! run a single discovery pass; the others wait for it.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use opbind_core::prelude::*;
use opbind_engine::OperatorEngine;

use crate::discovery::discover;
use crate::registry::Registry;

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Run discovery against `engine` and publish the result.
///
/// Returns `AlreadyInitialized` if a registry has been published, including
/// by a concurrent `init` that finished first.
pub fn init(engine: Arc<dyn OperatorEngine>) -> Result<&'static Registry> {
    let mut ran = false;
    let registry = REGISTRY.get_or_try_init(|| {
        ran = true;
        discover(engine)
    })?;
    if ran {
        Ok(registry)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

pub fn get() -> Result<&'static Registry> {
    REGISTRY.get().ok_or(Error::NotInitialized)
}

pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}
