//! Operator manifests: YAML/JSON descriptions of an engine's operator surface.
//!
//! Example:
//! ```yaml
//! operators:
//!   - name: concat
//!     real_name: Concat
//!     description: Joins input arrays along a given axis.
//!     variadic_count_argument: num_args
//!     kernel: count
//!     aliases: [concatenate]
//!     arguments:
//!       - { name: data,     type_info: "NDArray-or-Symbol[]", description: "inputs" }
//!       - { name: num_args, type_info: "int, required",       description: "number of inputs" }
//!       - { name: dim,      type_info: "int, optional, default='1'", description: "axis" }
//! ```
//!
//! Loading a manifest yields a `MemoryEngine` whose `fetch_metadata` answers
//! with the same parallel-sequence shape a native engine returns.

use std::path::Path;

use serde::{Deserialize, Serialize};

use opbind_core::prelude::*;

use crate::memory::{builtin_kernel, MemoryEngine};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorManifest {
    pub operators: Vec<ManifestOperator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestOperator {
    /// Name the engine lists the operator under.
    pub name: String,
    /// Engine-internal name; defaults to `name`.
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<ManifestArgument>,
    #[serde(default)]
    pub variadic_count_argument: Option<String>,
    #[serde(default)]
    pub return_type: String,
    /// Extra listed names resolving to the same operator.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Builtin kernel name (`echo`, `first`, `count`).
    #[serde(default)]
    pub kernel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestArgument {
    pub name: String,
    #[serde(alias = "type")]
    pub type_info: String,
    #[serde(default)]
    pub description: String,
}

impl ManifestOperator {
    pub fn to_raw(&self) -> RawOperatorInfo {
        RawOperatorInfo {
            real_name: self.real_name.clone().unwrap_or_else(|| self.name.clone()),
            description: self.description.clone(),
            arg_names: self.arguments.iter().map(|a| a.name.clone()).collect(),
            arg_type_infos: self.arguments.iter().map(|a| a.type_info.clone()).collect(),
            arg_descriptions: self.arguments.iter().map(|a| a.description.clone()).collect(),
            variadic_count_name: self.variadic_count_argument.clone().unwrap_or_default(),
            return_type: self.return_type.clone(),
        }
    }
}

impl OperatorManifest {
    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a manifest file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read manifest {}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let manifest = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        tracing::debug!(
            path = %path.display(),
            operators = manifest.operators.len(),
            "loaded operator manifest"
        );
        Ok(manifest)
    }

    /// Build an engine exposing every operator (and alias) in manifest order.
    pub fn into_engine(self) -> Result<MemoryEngine> {
        let mut engine = MemoryEngine::new();
        for op in &self.operators {
            if op.name.trim().is_empty() {
                return Err(Error::Manifest("operator with empty name".into()));
            }
            engine.add_operator(&op.name, op.to_raw());
            if let Some(kernel_name) = &op.kernel {
                let kernel = builtin_kernel(kernel_name).ok_or_else(|| {
                    Error::Manifest(format!(
                        "operator '{}': unknown kernel '{kernel_name}'",
                        op.name
                    ))
                })?;
                engine.set_kernel(&op.name, kernel)?;
            }
            for alias in &op.aliases {
                engine.add_alias(alias, &op.name)?;
            }
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperatorEngine;

    const YAML: &str = r#"
operators:
  - name: concat
    real_name: Concat
    description: Joins input arrays along a given axis.
    variadic_count_argument: num_args
    kernel: count
    aliases: [concatenate]
    arguments:
      - { name: data, type_info: "NDArray-or-Symbol[]", description: inputs }
      - { name: num_args, type: "int, required" }
  - name: _internal_foo
"#;

    #[test]
    fn yaml_manifest_builds_engine() {
        let engine = OperatorManifest::from_yaml(YAML).unwrap().into_engine().unwrap();
        assert_eq!(
            engine.list_operator_names().unwrap(),
            ["concat", "concatenate", "_internal_foo"]
        );
        let raw = engine
            .fetch_metadata(engine.resolve_handle("concat").unwrap())
            .unwrap();
        assert_eq!(raw.real_name, "Concat");
        assert_eq!(raw.arg_names, ["data", "num_args"]);
        assert_eq!(raw.arg_type_infos[1], "int, required");
        assert_eq!(raw.arg_descriptions[1], "");
        assert_eq!(raw.variadic_count_name, "num_args");

        let foo = engine
            .fetch_metadata(engine.resolve_handle("_internal_foo").unwrap())
            .unwrap();
        assert_eq!(foo.real_name, "_internal_foo");
    }

    #[test]
    fn unknown_kernel_is_rejected() {
        let manifest = OperatorManifest::from_yaml(
            "operators:\n  - { name: relu, kernel: warp_drive }\n",
        )
        .unwrap();
        assert!(matches!(manifest.into_engine(), Err(Error::Manifest(_))));
    }

    #[test]
    fn json_manifest_parses() {
        let manifest =
            OperatorManifest::from_json(r#"{"operators":[{"name":"relu"}]}"#).unwrap();
        assert_eq!(manifest.operators.len(), 1);
    }
}
