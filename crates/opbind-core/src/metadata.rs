//! Operator metadata model.
//!
//! `RawOperatorInfo` is exactly what the engine hands back for one operator:
//! three parallel argument sequences plus a few strings. `OperatorMetadata` is
//! the structured, validated form every later stage works with. Construction is
//! pure; argument order is kept verbatim because it is the positional calling
//! contract.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ident::Ident;

/// Raw metadata tuple as returned by the engine's `fetch_metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOperatorInfo {
    pub real_name: String,
    pub description: String,
    pub arg_names: Vec<String>,
    pub arg_type_infos: Vec<String>,
    pub arg_descriptions: Vec<String>,
    /// Empty means "no variadic count argument".
    pub variadic_count_name: String,
    /// Empty means "engine default".
    pub return_type: String,
}

/// How an argument is passed, derived from its declared type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentKind {
    /// A single engine array (`NDArray...` / `Symbol...`).
    Input,
    /// A variable number of engine arrays (`NDArray-or-Symbol[]`).
    RepeatedInput,
    /// Anything else: scalars, shapes, enums, strings.
    Param,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorArgument {
    pub name: Ident,
    pub type_info: String,
    pub description: String,
}

impl OperatorArgument {
    pub fn kind(&self) -> ArgumentKind {
        let ty = self.type_info.trim();
        if ty.starts_with("NDArray") || ty.starts_with("Symbol") {
            if ty.ends_with("[]") {
                ArgumentKind::RepeatedInput
            } else {
                ArgumentKind::Input
            }
        } else {
            ArgumentKind::Param
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorMetadata {
    pub declared_name: Ident,
    pub real_name: Ident,
    pub description: String,
    pub arguments: Vec<OperatorArgument>,
    pub variadic_count_argument: Option<Ident>,
    pub return_type: String,
}

impl OperatorMetadata {
    /// Build metadata for `declared_name` from the engine's raw tuple.
    ///
    /// Fails with `MalformedOperatorDescriptor` when the parallel argument
    /// sequences disagree in length, when the real name is empty, or when the
    /// variadic count argument names no declared argument.
    pub fn from_raw(declared_name: impl Into<Ident>, raw: RawOperatorInfo) -> Result<Self> {
        let declared_name = declared_name.into();
        let RawOperatorInfo {
            real_name,
            description,
            arg_names,
            arg_type_infos,
            arg_descriptions,
            variadic_count_name,
            return_type,
        } = raw;

        if arg_names.len() != arg_type_infos.len() || arg_names.len() != arg_descriptions.len() {
            return Err(Error::malformed(
                declared_name.as_str(),
                format!(
                    "argument sequences have unequal lengths (names={}, types={}, descriptions={})",
                    arg_names.len(),
                    arg_type_infos.len(),
                    arg_descriptions.len()
                ),
            ));
        }

        let real_name = Ident::new(&real_name);
        if real_name.is_empty() {
            return Err(Error::malformed(declared_name.as_str(), "empty real name"));
        }

        let arguments: Vec<OperatorArgument> = arg_names
            .into_iter()
            .zip(arg_type_infos)
            .zip(arg_descriptions)
            .map(|((name, type_info), description)| OperatorArgument {
                name: Ident::new(&name),
                type_info,
                description,
            })
            .collect();

        let variadic_count_argument = Some(Ident::new(&variadic_count_name))
            .filter(|name| !name.is_empty());
        if let Some(count) = &variadic_count_argument {
            if !arguments.iter().any(|a| &a.name == count) {
                return Err(Error::malformed(
                    declared_name.as_str(),
                    format!("variadic count argument '{count}' is not a declared argument"),
                ));
            }
        }

        Ok(Self {
            declared_name,
            real_name,
            description,
            arguments,
            variadic_count_argument,
            return_type,
        })
    }

    pub fn argument(&self, name: &str) -> Option<&OperatorArgument> {
        self.arguments.iter().find(|a| a.name.as_str() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.arguments.iter().position(|a| a.name.as_str() == name)
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic_count_argument.is_some()
    }

    /// Index of the argument that collects repeated inputs, if the operator has one.
    ///
    /// This is the first `RepeatedInput` argument. A variadic operator that
    /// declares none falls back to its first argument other than the count.
    pub fn repeated_input(&self) -> Option<usize> {
        self.arguments
            .iter()
            .position(|a| a.kind() == ArgumentKind::RepeatedInput)
            .or_else(|| {
                let count = self.variadic_count_argument.as_ref()?;
                self.arguments.iter().position(|a| &a.name != count)
            })
    }

    /// Render a call signature for `function_name`, e.g.
    /// `concat(*data, dim=None, out=None, name=None)`.
    ///
    /// The variadic count argument is omitted since callers never pass it.
    pub fn signature(&self, function_name: &str) -> String {
        let repeated = self.repeated_input();
        let mut parts = Vec::with_capacity(self.arguments.len() + 2);
        if let Some(idx) = repeated {
            parts.push(format!("*{}", self.arguments[idx].name));
        }
        for (i, arg) in self.arguments.iter().enumerate() {
            if Some(i) == repeated || self.variadic_count_argument.as_ref() == Some(&arg.name) {
                continue;
            }
            parts.push(format!("{}=None", arg.name));
        }
        for reserved in ["out", "name"] {
            if self.argument(reserved).is_none() {
                parts.push(format!("{reserved}=None"));
            }
        }
        format!("{}({})", function_name, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(names: &[&str], types: &[&str], descs: &[&str], count: &str) -> RawOperatorInfo {
        RawOperatorInfo {
            real_name: "Concat".into(),
            description: "Joins input arrays along a given axis.".into(),
            arg_names: names.iter().map(|s| s.to_string()).collect(),
            arg_type_infos: types.iter().map(|s| s.to_string()).collect(),
            arg_descriptions: descs.iter().map(|s| s.to_string()).collect(),
            variadic_count_name: count.into(),
            return_type: String::new(),
        }
    }

    #[test]
    fn argument_order_is_preserved() {
        let meta = OperatorMetadata::from_raw(
            "concat",
            raw(
                &["data", "num_args", "dim"],
                &["NDArray-or-Symbol[]", "int, required", "int, optional, default='1'"],
                &["inputs", "number of inputs", "axis"],
                "num_args",
            ),
        )
        .unwrap();

        let names: Vec<&str> = meta.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["data", "num_args", "dim"]);
        assert_eq!(meta.arguments[2].type_info, "int, optional, default='1'");
        assert_eq!(meta.arguments[1].description, "number of inputs");
        assert_eq!(meta.variadic_count_argument, Some(Ident::new("num_args")));
        assert_eq!(meta.real_name.as_str(), "Concat");
        assert_eq!(meta.declared_name.as_str(), "concat");
    }

    #[test]
    fn unequal_sequences_are_malformed() {
        let err = OperatorMetadata::from_raw(
            "broken",
            raw(&["a", "b"], &["int"], &["x", "y"], ""),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedOperatorDescriptor { .. }));
    }

    #[test]
    fn empty_count_name_means_absent() {
        let meta =
            OperatorMetadata::from_raw("relu", raw(&["data"], &["NDArray"], &["x"], "  ")).unwrap();
        assert!(!meta.is_variadic());
        assert_eq!(meta.repeated_input(), None);
    }

    #[test]
    fn count_name_must_be_declared() {
        let err = OperatorMetadata::from_raw(
            "concat",
            raw(&["data"], &["NDArray-or-Symbol[]"], &["x"], "num_args"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedOperatorDescriptor { .. }));
    }

    #[test]
    fn argument_kinds_follow_type_strings() {
        let meta = OperatorMetadata::from_raw(
            "op",
            raw(
                &["a", "b", "c", "d"],
                &["NDArray-or-Symbol", "Symbol[]", "Shape(tuple)", "NDArray"],
                &["", "", "", ""],
                "",
            ),
        )
        .unwrap();
        let kinds: Vec<ArgumentKind> = meta.arguments.iter().map(|a| a.kind()).collect();
        assert_eq!(
            kinds,
            [
                ArgumentKind::Input,
                ArgumentKind::RepeatedInput,
                ArgumentKind::Param,
                ArgumentKind::Input
            ]
        );
    }

    #[test]
    fn signature_hides_count_and_stars_repeated_input() {
        let meta = OperatorMetadata::from_raw(
            "concat",
            raw(
                &["data", "num_args", "dim"],
                &["NDArray-or-Symbol[]", "int", "int"],
                &["", "", ""],
                "num_args",
            ),
        )
        .unwrap();
        assert_eq!(
            meta.signature("concat"),
            "concat(*data, dim=None, out=None, name=None)"
        );
    }
}
