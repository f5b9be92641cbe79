//! Binding configuration that the engine and CLI layers serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindConfig {
    /// Base name of the engine shared library (`mxnet` → `libmxnet.so`).
    pub library_name: String,

    /// Explicit path to the engine library. Tried before any search path.
    pub library_path: Option<String>,

    /// Library directory shipped with the package, searched after `library_path`.
    pub package_lib_dir: Option<String>,

    /// Also search each `LD_LIBRARY_PATH` entry (ignored on macOS and Windows).
    pub search_ld_library_path: bool,

    /// Operator manifest used by the manifest-backed engine.
    pub manifest_path: Option<String>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            library_name: "mxnet".to_string(),
            library_path: None,
            package_lib_dir: None,
            search_ld_library_path: true,
            manifest_path: None,
        }
    }
}

impl BindConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `OPBIND_LIBRARY_NAME`: base name of the engine library
    /// - `OPBIND_ENGINE_LIBRARY`: explicit library path
    /// - `OPBIND_PACKAGE_LIB_DIR`: bundled library directory
    /// - `OPBIND_SEARCH_LD_LIBRARY_PATH`: `0`/`false`/`no` disables the search
    /// - `OPBIND_MANIFEST`: operator manifest path
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("OPBIND_LIBRARY_NAME") {
            if !s.trim().is_empty() {
                cfg.library_name = s.trim().to_string();
            }
        }

        if let Ok(s) = std::env::var("OPBIND_ENGINE_LIBRARY") {
            cfg.library_path = Some(s);
        }

        if let Ok(s) = std::env::var("OPBIND_PACKAGE_LIB_DIR") {
            cfg.package_lib_dir = Some(s);
        }

        if let Ok(s) = std::env::var("OPBIND_SEARCH_LD_LIBRARY_PATH") {
            cfg.search_ld_library_path = parse_flag(&s).unwrap_or(cfg.search_ld_library_path);
        }

        if let Ok(s) = std::env::var("OPBIND_MANIFEST") {
            cfg.manifest_path = Some(s);
        }

        cfg
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
