//! Manifest-backed engine tests using tests/fixtures/ops.yaml.

use std::sync::Arc;

use opbind::prelude::*;
use opbind::{discover, doc, CallArgs, OperatorEngine, OperatorManifest, Registry};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/ops.yaml");

fn registry() -> Registry {
    let engine = OperatorManifest::from_path(FIXTURE)
        .unwrap()
        .into_engine()
        .unwrap();
    discover(Arc::new(engine)).unwrap()
}

#[test]
fn test_fixture_routes_into_every_namespace() {
    let reg = registry();
    assert_eq!(reg.declared_len(), 8);
    assert_eq!(reg.len(), 7);

    assert!(reg.lookup(NamespaceName::Default, "concat").is_ok());
    assert!(reg.lookup(NamespaceName::Default, "activation").is_ok());
    assert!(reg.lookup(NamespaceName::Internal, "foo").is_ok());
    assert!(reg.lookup(NamespaceName::Internal, "_plus_scalar").is_ok());
    assert!(reg.lookup(NamespaceName::Contrib, "roialign").is_ok());
    assert!(reg.lookup(NamespaceName::Linalg, "gemm2").is_ok());
    assert!(reg.lookup(NamespaceName::Sparse, "retain").is_ok());

    let gemm = reg.lookup_metadata("_linalg_gemm2").unwrap();
    assert_eq!(gemm.return_type, "NDArray");
    assert_eq!(gemm.arguments[2].type_info, "boolean, optional, default=0");
}

#[test]
fn test_manifest_kernels_execute() {
    let reg = registry();
    let x = ArrayHandle::new(10);
    let rois = ArrayHandle::new(11);

    let count = reg
        .call(
            NamespaceName::Default,
            "concat",
            CallArgs::new().arg(x).arg(rois).arg(x),
        )
        .unwrap();
    assert_eq!(count, Value::Int(3));

    let first = reg
        .call(
            NamespaceName::Contrib,
            "roialign",
            CallArgs::new()
                .arg(x)
                .arg(rois)
                .kwarg("pooled_size", vec![7i64, 7])
                .kwarg("name", "roi0"),
        )
        .unwrap();
    assert_eq!(first, Value::Array(x));

    let echoed = reg
        .call(
            NamespaceName::Internal,
            "_plus_scalar",
            CallArgs::new().arg(x).kwarg("scalar", 0.5),
        )
        .unwrap();
    assert_eq!(echoed, Value::List(vec![Value::Array(x), Value::Float(0.5)]));
}

#[test]
fn test_activation_call_checks() {
    let reg = registry();
    let err = reg
        .call(
            NamespaceName::Default,
            "activation",
            CallArgs::new()
                .arg(ArrayHandle::new(1))
                .arg("relu")
                .arg(true),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ArgumentMismatch { .. }));

    let ok = reg
        .call(
            NamespaceName::Default,
            "activation",
            CallArgs::new()
                .arg(ArrayHandle::new(1))
                .kwarg("act_type", "relu")
                .kwarg("out", ArrayHandle::new(2)),
        )
        .unwrap();
    assert_eq!(
        ok,
        Value::List(vec![Value::Array(ArrayHandle::new(1)), Value::from("relu")])
    );
}

#[test]
fn test_fingerprint_is_deterministic() {
    let a = registry().fingerprint().unwrap();
    let b = registry().fingerprint().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_hex().len(), 64);

    let yaml = std::fs::read_to_string(FIXTURE).unwrap();
    let mut manifest = OperatorManifest::from_yaml(&yaml).unwrap();
    manifest.operators[1].description.push_str(" Changed.");
    let changed = discover(Arc::new(manifest.into_engine().unwrap()))
        .unwrap()
        .fingerprint()
        .unwrap();
    assert_ne!(a, changed);
}

#[test]
fn test_rendered_docs_mention_every_argument() {
    let reg = registry();
    let entry = reg.entry(NamespaceName::Contrib, "roialign").unwrap();
    let text = doc::render(entry);
    assert!(text.starts_with(
        "contrib.roialign(data=None, rois=None, pooled_size=None, out=None, name=None)"
    ));
    for arg in &entry.metadata.arguments {
        assert!(text.contains(arg.name.as_str()));
    }
    let concat = doc::render(reg.entry(NamespaceName::Default, "concat").unwrap());
    assert!(concat.contains("Aliases: concat"));
}

#[test]
fn test_json_manifest_matches_yaml() {
    let yaml = std::fs::read_to_string(FIXTURE).unwrap();
    let manifest = OperatorManifest::from_yaml(&yaml).unwrap();
    let json = serde_json::to_string(&manifest).unwrap();
    let engine = OperatorManifest::from_json(&json).unwrap().into_engine().unwrap();
    assert_eq!(engine.list_operator_names().unwrap().len(), 8);
    let reg = discover(Arc::new(engine)).unwrap();
    assert_eq!(reg.fingerprint().unwrap(), registry().fingerprint().unwrap());
}
