//! Purpose: Shared schema-directory and schema-name path resolution helpers.
//! Exports: `default_schema_dir` and `resolve_named_schema_path`.
//! Role: Keep CLI schema-ref semantics aligned from one source.
//! Invariants: Default schema directory remains `~/.schemite/schemas`.
//! Invariants: Named schema refs must not contain path separators.

use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SchemaNameResolveError {
    ContainsPathSeparator,
}

pub(crate) fn default_schema_dir() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".schemite").join("schemas")
}

pub(crate) fn resolve_named_schema_path(
    name: &str,
    schema_dir: &Path,
) -> Result<PathBuf, SchemaNameResolveError> {
    if name.contains('/') {
        return Err(SchemaNameResolveError::ContainsPathSeparator);
    }
    if name.ends_with(".schema.json") {
        return Ok(schema_dir.join(name));
    }
    Ok(schema_dir.join(format!("{name}.schema.json")))
}
