//! Argument and filesystem checks run before a registry is touched.

use crate::error::ValidationError;
use crate::platform::Platform;
use std::path::{Path, PathBuf};

/// `path` must be an existing directory we can create files in.
pub fn writable_dir(path: &Path) -> Result<(), ValidationError> {
    if !path.is_dir() {
        return Err(ValidationError::NotADirectory(path.to_path_buf()));
    }
    // Try a real file; mode bits miss ACLs and read-only mounts.
    tempfile::Builder::new()
        .prefix(".gamsreg-check-")
        .tempfile_in(path)
        .map(drop)
        .map_err(|_| ValidationError::NotWritable(path.to_path_buf()))
}

/// Registry file of `sysdir`; it must exist.
pub fn registry_file(sysdir: &Path, platform: Platform) -> Result<PathBuf, ValidationError> {
    let registry = platform.registry_path(sysdir);
    if registry.is_file() {
        Ok(registry)
    } else {
        Err(ValidationError::MissingRegistry(registry))
    }
}

pub fn existing_file(path: &Path) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::NotAFile(path.to_path_buf()))
    }
}

pub fn solver_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidSolverName(name.to_string()));
    }
    Ok(())
}

/// Solver ids are exactly three non-whitespace characters.
pub fn solver_id(id: &str) -> Result<(), ValidationError> {
    if id.chars().count() != 3 || id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidSolverId(id.to_string()));
    }
    Ok(())
}

pub fn model_types(types: &str) -> Result<(), ValidationError> {
    if types.trim().is_empty() {
        return Err(ValidationError::NoModelTypes);
    }
    Ok(())
}

pub fn dict_type(dict: &str) -> Result<(), ValidationError> {
    if dict.is_empty() || !dict.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidDictType(dict.to_string()));
    }
    Ok(())
}

pub fn option_file(path: &Path) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingOptionFile(path.to_path_buf()))
    }
}
