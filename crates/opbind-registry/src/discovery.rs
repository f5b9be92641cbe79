//! Single-pass operator discovery.
//!
//! List every operator the engine exposes, resolve its handle, fetch and
//! normalize its descriptor, route it to a namespace and bind its delegator.
//! Any failure aborts the pass and no registry is returned.

use std::sync::Arc;
use std::time::Instant;

use opbind_core::prelude::*;
use opbind_engine::OperatorEngine;

use crate::registry::{Registry, RegistryBuilder};

pub fn discover(engine: Arc<dyn OperatorEngine>) -> Result<Registry> {
    let started = Instant::now();
    let names = engine.list_operator_names().map_err(|e| {
        tracing::error!(error = %e, "operator listing failed");
        e
    })?;
    tracing::info!(operators = names.len(), "operator discovery started");

    let mut builder = RegistryBuilder::new(Arc::clone(&engine));
    for name in &names {
        if let Err(e) = discover_one(engine.as_ref(), &mut builder, name) {
            tracing::error!(operator = %name, error = %e, "operator discovery aborted");
            return Err(e);
        }
    }

    let registry = builder.freeze();
    tracing::info!(
        functions = registry.len(),
        declared = registry.declared_len(),
        namespaces = ?registry.namespaces(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "operator discovery finished"
    );
    Ok(registry)
}

fn discover_one(
    engine: &dyn OperatorEngine,
    builder: &mut RegistryBuilder,
    name: &str,
) -> Result<()> {
    let handle = engine.resolve_handle(name)?;
    let raw = engine.fetch_metadata(handle)?;
    let metadata = OperatorMetadata::from_raw(name, raw)?;
    let route = route_metadata(&metadata);
    tracing::debug!(
        operator = %name,
        handle = %handle,
        namespace = %route.namespace,
        function = %route.function_name,
        "bound operator"
    );
    builder.register(route.namespace, route.function_name, handle, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opbind_engine::MemoryEngine;

    fn raw(real: &str) -> RawOperatorInfo {
        RawOperatorInfo {
            real_name: real.into(),
            description: format!("{real} operator"),
            ..Default::default()
        }
    }

    #[test]
    fn every_listed_name_is_registered() {
        let engine = MemoryEngine::new()
            .with_operator("relu", raw("relu"))
            .with_operator("_contrib_box_nms", raw("_contrib_box_nms"))
            .with_operator("_linalg_gemm", raw("_linalg_gemm"))
            .with_operator("_copy", raw("_copy"));
        let reg = discover(Arc::new(engine)).unwrap();

        assert_eq!(reg.declared_len(), 4);
        for name in ["relu", "_contrib_box_nms", "_linalg_gemm", "_copy"] {
            assert!(reg.lookup_metadata(name).is_ok(), "{name}");
        }
        assert!(reg.lookup(NamespaceName::Contrib, "box_nms").is_ok());
        assert!(reg.lookup(NamespaceName::Linalg, "gemm").is_ok());
        assert!(reg.lookup(NamespaceName::Internal, "_copy").is_ok());
    }

    #[test]
    fn malformed_descriptor_aborts() {
        let bad = RawOperatorInfo {
            real_name: "broken".into(),
            arg_names: vec!["a".into(), "b".into()],
            arg_type_infos: vec!["int".into()],
            arg_descriptions: vec!["".into(), "".into()],
            ..Default::default()
        };
        let engine = MemoryEngine::new()
            .with_operator("relu", raw("relu"))
            .with_operator("broken", bad);
        assert!(matches!(
            discover(Arc::new(engine)),
            Err(Error::MalformedOperatorDescriptor { .. })
        ));
    }

    #[test]
    fn empty_engine_yields_empty_registry() {
        let reg = discover(Arc::new(MemoryEngine::new())).unwrap();
        assert!(reg.is_empty());
        assert!(reg.namespaces().is_empty());
    }
}
