//! Manifest discovery and dependency extraction for a single module directory.
use crate::errors::ModGraphError;
use crate::parser::{parse_literal, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Current manifest file name.
pub const MANIFEST_FILE: &str = "__manifest__.py";
/// Legacy manifest file name, consulted when `MANIFEST_FILE` is absent.
pub const LEGACY_MANIFEST_FILE: &str = "__openerp__.py";

/// Key holding the dependency list inside a manifest mapping.
pub const DEPENDS_KEY: &str = "depends";

/// Resolve which manifest variant exists in `module_dir`, preferring the current name.
#[must_use]
pub fn manifest_path(module_dir: &Path) -> Option<PathBuf> {
    [MANIFEST_FILE, LEGACY_MANIFEST_FILE]
        .iter()
        .map(|name| module_dir.join(name))
        .find(|p| p.is_file())
}

/// Read the declared dependencies of `module_name` under `root`.
///
/// Never fails: a missing module directory, a missing manifest or an unparsable manifest
/// is reported as a warning and yields an empty list.
#[must_use]
pub fn read_dependencies(root: &Path, module_name: &str) -> Vec<String> {
    match load_dependencies(root, module_name) {
        Ok(deps) => deps,
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    }
}

/// Fallible counterpart of [`read_dependencies`].
///
/// # Errors
/// - `ModuleNotFound` if `root/module_name` is not a directory.
/// - `ManifestNotFound` if neither manifest variant exists.
/// - `ReadManifest` if the manifest cannot be read or is not UTF-8.
/// - `Manifest` if the content is not a valid literal.
/// - `MalformedDepends` if the literal is not a mapping or `depends` is not a list of strings.
pub fn load_dependencies(root: &Path, module_name: &str) -> Result<Vec<String>, ModGraphError> {
    let module_dir = root.join(module_name);
    if !module_dir.is_dir() {
        return Err(ModGraphError::ModuleNotFound { name: module_name.to_string() });
    }
    if !module_dir.join(MANIFEST_FILE).is_file() {
        info!("{MANIFEST_FILE} not found in {module_name}, trying {LEGACY_MANIFEST_FILE}");
    }
    let Some(path) = manifest_path(&module_dir) else {
        return Err(ModGraphError::ManifestNotFound { name: module_name.to_string() });
    };
    let content = fs::read_to_string(&path)
        .map_err(|source| ModGraphError::ReadManifest { file: path.clone(), source })?;
    parse_dependencies(&content, &path)
}

/// Extract the `depends` list from manifest `content`. `file` is used for error context only.
///
/// # Errors
/// Returns `Manifest` on literal syntax errors and `MalformedDepends` on an unexpected shape.
pub fn parse_dependencies(content: &str, file: &Path) -> Result<Vec<String>, ModGraphError> {
    let manifest = parse_literal(content)
        .map_err(|source| ModGraphError::Manifest { file: file.to_path_buf(), source })?;
    if !matches!(manifest, Value::Dict(_)) {
        return Err(ModGraphError::MalformedDepends {
            file: file.to_path_buf(),
            reason: format!("expected a mapping, found {}", manifest.type_name()),
        });
    }
    let Some(depends) = manifest.get(DEPENDS_KEY) else {
        return Ok(Vec::new());
    };
    let malformed = |reason: String| ModGraphError::MalformedDepends { file: file.to_path_buf(), reason };
    let items = depends.as_sequence().ok_or_else(|| {
        malformed(format!("'{DEPENDS_KEY}' must be a list, found {}", depends.type_name()))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                malformed(format!("'{DEPENDS_KEY}' entries must be strings, found {}", item.type_name()))
            })
        })
        .collect()
}
