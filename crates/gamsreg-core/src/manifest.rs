//! Rewriting of `gamsconfig.yaml` solver manifests.
//!
//! The manifest produced by the build references solver libraries through
//! their libtool archives:
//!
//! ```yaml
//! solverConfig:
//! - CBC:
//!     libName: /build/src/cbc/libGamsCbc.la
//!     defName: /build/src/cbc/optcbc.def
//! ```
//!
//! Resolution swaps each archive for the library it describes. The file is
//! edited line by line so comments and layout survive untouched.

use crate::error::ManifestError;
use crate::libtool::{is_libtool_archive, LibtoolArchive};
use crate::platform::{PathConverter, Platform};
use crate::registry::line_content;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the rewritten manifest inside the install directory.
pub const MANIFEST_FILE_NAME: &str = "gamsconfig.yaml";

/// Rewritten manifest text and what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub text: String,
    /// Library references that were rewritten.
    pub replaced: usize,
    /// Directories that must be on `PATH` for the libraries to load.
    pub library_dirs: BTreeSet<PathBuf>,
}

/// Rewrites library and option-definition paths in a manifest.
pub struct ConfigPathResolver {
    converter: Box<dyn PathConverter>,
    windows: bool,
}

fn replace_last(line: &str, from: &str, to: &str) -> String {
    match line.rfind(from) {
        Some(pos) => format!("{}{}{}", &line[..pos], to, &line[pos + from.len()..]),
        None => line.to_string(),
    }
}

fn referenced_path<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    if content.starts_with('#') || !content.contains(key) {
        return None;
    }
    content.split_whitespace().last()
}

impl ConfigPathResolver {
    pub fn new(platform: Platform) -> Self {
        Self {
            converter: platform.path_converter(),
            windows: platform.needs_path_conversion(),
        }
    }

    /// Resolver with an explicit path converter; `windows` selects the
    /// DLL layout and the `defName` conversion.
    pub fn with_converter(converter: Box<dyn PathConverter>, windows: bool) -> Self {
        Self { converter, windows }
    }

    /// Rewrite manifest text.
    pub fn resolve(&self, text: &str) -> Result<ResolvedManifest, ManifestError> {
        let mut resolved = ResolvedManifest::default();

        for raw in text.split_inclusive('\n') {
            let mut line = raw.to_string();

            if let Some(library) = referenced_path(line_content(raw), "libName") {
                if is_libtool_archive(Path::new(library)) {
                    let archive = LibtoolArchive::read(Path::new(library))?;
                    let installed =
                        archive.installed_library(self.converter.as_ref(), self.windows)?;
                    if self.windows {
                        if let Some(dir) = installed.parent() {
                            resolved.library_dirs.insert(dir.to_path_buf());
                        }
                    }
                    debug!(from = library, to = %installed.display(), "resolved library");
                    line = replace_last(&line, library, &installed.display().to_string());
                    resolved.replaced += 1;
                }
            }

            if self.windows {
                let content = line_content(&line).to_string();
                if let Some(def) = referenced_path(&content, "defName") {
                    let native = self.converter.to_native(def)?;
                    if !Path::new(&native).is_file() {
                        return Err(ManifestError::DefinitionNotFound(PathBuf::from(native)));
                    }
                    line = replace_last(&line, def, &native);
                }
            }

            resolved.text.push_str(&line);
        }

        if !resolved.library_dirs.is_empty() {
            resolved.text.push('\n');
            resolved.text.push_str("environmentVariables:\n");
            for dir in &resolved.library_dirs {
                resolved.text.push_str("- PATH:\n");
                resolved.text.push_str(&format!("    value: {}\n", dir.display()));
                resolved.text.push_str("    pathVariable: True\n");
            }
        }

        Ok(resolved)
    }

    /// Rewrite the manifest at `manifest` into `install_dir`, returning the
    /// path written together with the rewritten manifest.
    pub fn resolve_file(
        &self,
        manifest: &Path,
        install_dir: &Path,
    ) -> Result<(PathBuf, ResolvedManifest), ManifestError> {
        let text = fs::read_to_string(manifest).map_err(|source| ManifestError::Io {
            action: "read",
            path: manifest.to_path_buf(),
            source,
        })?;
        let resolved = self.resolve(&text)?;

        let out = install_dir.join(MANIFEST_FILE_NAME);
        fs::write(&out, &resolved.text).map_err(|source| ManifestError::Io {
            action: "write",
            path: out.clone(),
            source,
        })?;
        Ok((out, resolved))
    }
}
