//! Locating the engine's shared library on disk.
//!
//! Search order: the explicit `library_path`, the package library directory,
//! then each `LD_LIBRARY_PATH` entry (skipped on macOS and Windows). Only
//! existing files are returned.

use std::path::PathBuf;

use opbind_core::prelude::*;

#[cfg(target_os = "windows")]
const LIB_PREFIX: &str = "";
#[cfg(not(target_os = "windows"))]
const LIB_PREFIX: &str = "lib";

#[cfg(target_os = "windows")]
const LIB_SUFFIX: &str = "dll";
#[cfg(target_os = "macos")]
const LIB_SUFFIX: &str = "dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIB_SUFFIX: &str = "so";

/// Platform file name for a library base name (`mxnet` → `libmxnet.so`).
pub fn library_file_name(base: &str) -> String {
    format!("{LIB_PREFIX}{base}.{LIB_SUFFIX}")
}

/// Every path that would be tried, in order, whether or not it exists.
pub fn candidate_paths(cfg: &BindConfig) -> Vec<PathBuf> {
    let ld_library_path = std::env::var("LD_LIBRARY_PATH").ok();
    candidate_paths_with(cfg, ld_library_path.as_deref())
}

/// Same as [`candidate_paths`] with an explicit `LD_LIBRARY_PATH` value.
pub fn candidate_paths_with(cfg: &BindConfig, ld_library_path: Option<&str>) -> Vec<PathBuf> {
    let file_name = library_file_name(&cfg.library_name);
    let mut out = Vec::new();

    if let Some(path) = cfg.library_path.as_deref().filter(|p| !p.trim().is_empty()) {
        out.push(PathBuf::from(path));
    }
    if let Some(dir) = cfg.package_lib_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push(PathBuf::from(dir).join(&file_name));
    }
    if cfg.search_ld_library_path && !cfg!(any(target_os = "windows", target_os = "macos")) {
        if let Some(paths) = ld_library_path {
            out.extend(
                paths
                    .split(':')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| PathBuf::from(p).join(&file_name)),
            );
        }
    }
    out
}

/// Existing library candidates. None found is `EngineUnavailable`, listing what was tried.
pub fn locate_library(cfg: &BindConfig) -> Result<Vec<PathBuf>> {
    let candidates = candidate_paths(cfg);
    let found: Vec<PathBuf> = candidates.iter().filter(|p| p.is_file()).cloned().collect();
    tracing::debug!(
        tried = candidates.len(),
        found = found.len(),
        "engine library lookup"
    );
    if found.is_empty() {
        let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        return Err(Error::EngineUnavailable(format!(
            "unable to find the {} shared library; candidates tried:\n{}",
            cfg.library_name,
            tried.join("\n")
        )));
    }
    Ok(found)
}
