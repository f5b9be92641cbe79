//! Plain-text documentation for a bound function.

use std::fmt::Write as _;

use opbind_core::prelude::*;

use crate::registry::RegistryEntry;

/// Return type shown when the engine declares none.
pub const DEFAULT_RETURN_TYPE: &str = "NDArray or list of NDArrays";

pub fn render(entry: &RegistryEntry) -> String {
    let meta = entry.metadata.as_ref();
    let mut out = String::new();

    let _ = writeln!(out, "{}", meta.signature(&entry.qualified_name()));
    let _ = writeln!(out);
    if !meta.description.trim().is_empty() {
        let _ = writeln!(out, "{}", meta.description.trim_end());
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "Operator: {} (real name {})", meta.declared_name, meta.real_name);
    if !entry.aliases.is_empty() {
        let aliases: Vec<&str> = entry.aliases.iter().map(Ident::as_str).collect();
        let _ = writeln!(out, "Aliases: {}", aliases.join(", "));
    }

    if !meta.arguments.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Parameters");
        let _ = writeln!(out, "----------");
        for arg in &meta.arguments {
            let inferred = meta.variadic_count_argument.as_ref() == Some(&arg.name);
            let _ = write!(out, "{} : {}", arg.name, arg.type_info);
            if inferred {
                let _ = write!(out, " (inferred)");
            }
            let _ = writeln!(out);
            if !arg.description.trim().is_empty() {
                let _ = writeln!(out, "    {}", arg.description.trim());
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Returns");
    let _ = writeln!(out, "-------");
    let ret = if meta.return_type.trim().is_empty() {
        DEFAULT_RETURN_TYPE
    } else {
        meta.return_type.trim()
    };
    let _ = writeln!(out, "{ret}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use opbind_engine::MemoryEngine;
    use std::sync::Arc;

    #[test]
    fn renders_signature_parameters_and_default_return() {
        let raw = RawOperatorInfo {
            real_name: "Concat".into(),
            description: "Joins input arrays along a given axis.".into(),
            arg_names: vec!["data".into(), "num_args".into(), "dim".into()],
            arg_type_infos: vec![
                "NDArray-or-Symbol[]".into(),
                "int, required".into(),
                "int, optional, default='1'".into(),
            ],
            arg_descriptions: vec!["inputs".into(), "".into(), "axis".into()],
            variadic_count_name: "num_args".into(),
            return_type: String::new(),
        };
        let engine = MemoryEngine::new().with_operator("Concat", raw);
        let reg = discover(Arc::new(engine)).unwrap();
        let text = render(reg.entry(NamespaceName::Default, "concat").unwrap());

        assert!(text.starts_with("ops.concat(*data, dim=None, out=None, name=None)\n"));
        assert!(text.contains("Joins input arrays"));
        assert!(text.contains("num_args : int, required (inferred)"));
        assert!(text.contains("    axis\n"));
        assert!(text.ends_with(&format!("{DEFAULT_RETURN_TYPE}\n")));
    }
}
