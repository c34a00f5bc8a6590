//! Libtool archive (`.la`) descriptors.
//!
//! Libtool leaves a small shell-syntax text file next to every library it
//! builds. Two assignments matter here:
//!
//! ```text
//! dlname='libGamsIpopt.so.0'
//! libdir='/usr/local/lib'
//! ```
//!
//! Joined, they name the shared library that `make install` put in place.

use crate::error::LibtoolError;
use crate::platform::PathConverter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether `path` names a libtool archive rather than a library.
pub fn is_libtool_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "la")
}

/// The `dlname` and `libdir` assignments of a libtool archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibtoolArchive {
    pub path: PathBuf,
    pub dlname: String,
    pub libdir: String,
}

fn assignment<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let value = line.strip_prefix(name)?.strip_prefix('=')?;
    Some(value.trim().trim_matches('\''))
}

impl LibtoolArchive {
    /// Read and parse the archive at `path`.
    pub fn read(path: &Path) -> Result<Self, LibtoolError> {
        let text = fs::read_to_string(path).map_err(|source| LibtoolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse archive text; the last assignment of each name wins.
    pub fn parse(path: &Path, text: &str) -> Result<Self, LibtoolError> {
        let mut dlname = None;
        let mut libdir = None;

        for line in text.lines() {
            if let Some(value) = assignment(line, "dlname") {
                dlname = Some(value);
            }
            if let Some(value) = assignment(line, "libdir") {
                libdir = Some(value);
            }
        }

        match (dlname, libdir) {
            (Some(dlname), Some(libdir)) if !dlname.is_empty() && !libdir.is_empty() => Ok(Self {
                path: path.to_path_buf(),
                dlname: dlname.to_string(),
                libdir: libdir.to_string(),
            }),
            _ => Err(LibtoolError::MissingFields(path.to_path_buf())),
        }
    }

    /// Directory holding the installed library, in native form.
    ///
    /// When `windows_layout` is set the DLL is expected in `bin` next to
    /// `libdir`, and `libdir` itself is passed through `converter` first.
    pub fn library_dir(
        &self,
        converter: &dyn PathConverter,
        windows_layout: bool,
    ) -> Result<PathBuf, LibtoolError> {
        let libdir = PathBuf::from(converter.to_native(&self.libdir)?);
        if windows_layout {
            Ok(libdir.join("..").join("bin"))
        } else {
            Ok(libdir)
        }
    }

    /// Path of the installed shared library; it must exist.
    pub fn installed_library(
        &self,
        converter: &dyn PathConverter,
        windows_layout: bool,
    ) -> Result<PathBuf, LibtoolError> {
        let library = self
            .library_dir(converter, windows_layout)?
            .join(&self.dlname);
        if !library.is_file() {
            return Err(LibtoolError::LibraryNotFound(library));
        }
        debug!(
            archive = %self.path.display(),
            library = %library.display(),
            "resolved libtool archive"
        );
        Ok(library)
    }
}
