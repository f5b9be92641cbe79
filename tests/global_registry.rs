//! Process-wide registry lifecycle. Kept to a single test: the registry is
//! set once per process and this file is its own test binary.

use std::sync::Arc;

use opbind::prelude::*;
use opbind::{global, CallArgs, MemoryEngine};

fn engine() -> MemoryEngine {
    MemoryEngine::new()
        .with_operator(
            "_internal_foo",
            RawOperatorInfo {
                real_name: "_internal_foo".into(),
                arg_names: vec!["data".into()],
                arg_type_infos: vec!["NDArray-or-Symbol".into()],
                arg_descriptions: vec!["input".into()],
                ..Default::default()
            },
        )
        .with_kernel("_internal_foo", |call| {
            Ok(call.get("data").cloned().unwrap_or(Value::None))
        })
}

#[test]
fn test_global_registry_lifecycle() {
    assert!(!global::is_initialized());
    assert!(matches!(global::get(), Err(Error::NotInitialized)));

    // A failed pass publishes nothing.
    let mut down = engine();
    down.set_available(false);
    assert!(matches!(
        global::init(Arc::new(down)),
        Err(Error::EngineUnavailable(_))
    ));
    assert!(!global::is_initialized());

    let reg = global::init(Arc::new(engine())).unwrap();
    assert_eq!(reg.len(), 1);
    assert!(global::is_initialized());
    assert!(std::ptr::eq(reg, global::get().unwrap()));

    assert!(matches!(
        global::init(Arc::new(engine())),
        Err(Error::AlreadyInitialized)
    ));

    let x = ArrayHandle::new(5);
    let out = global::get()
        .unwrap()
        .call(NamespaceName::Internal, "foo", CallArgs::new().arg(x))
        .unwrap();
    assert_eq!(out, Value::Array(x));
}
