//! Platform naming conventions for GAMS system directories.

use crate::error::LibtoolError;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

/// Target convention of the GAMS system directory being modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Name of the solver registry file inside the system directory.
    pub fn registry_file_name(&self) -> &'static str {
        match self {
            Platform::Unix => "gmscmpun.txt",
            Platform::Windows => "gmscmpnt.txt",
        }
    }

    /// Path of the solver registry file inside `sysdir`.
    pub fn registry_path(&self, sysdir: &Path) -> PathBuf {
        sysdir.join(self.registry_file_name())
    }

    /// Script GAMS runs to start a generic linked solver.
    pub fn generator_script(&self) -> &'static str {
        match self {
            Platform::Unix => "gmsgenus.run",
            Platform::Windows => "gmsgennt.cmd",
        }
    }

    /// Executable GAMS runs to load a generic linked solver.
    pub fn generator_executable(&self) -> &'static str {
        match self {
            Platform::Unix => "gmsgenux.out",
            Platform::Windows => "gmsgennx.exe",
        }
    }

    /// Whether paths produced by the build toolchain must be converted and
    /// library directories exported through `PATH`.
    pub fn needs_path_conversion(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Path converter matching this platform.
    pub fn path_converter(&self) -> Box<dyn PathConverter> {
        match self {
            Platform::Unix => Box::new(IdentityPaths),
            Platform::Windows => Box::new(Cygpath::default()),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Unix => write!(f, "unix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" | "linux" | "macos" | "darwin" => Ok(Platform::Unix),
            "windows" | "win" | "nt" => Ok(Platform::Windows),
            other => Err(format!("unknown platform '{other}' (expected unix or windows)")),
        }
    }
}

/// Absolute form of `path` against the current directory, with `.` and
/// `..` components folded away lexically. Symlinks are not resolved.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Converts paths written by the build environment into native paths.
pub trait PathConverter {
    fn to_native(&self, path: &str) -> Result<String, LibtoolError>;
}

/// Leaves paths untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPaths;

impl PathConverter for IdentityPaths {
    fn to_native(&self, path: &str) -> Result<String, LibtoolError> {
        Ok(path.to_string())
    }
}

/// Converts MSYS/Cygwin paths with `cygpath -w`.
#[derive(Debug, Clone)]
pub struct Cygpath {
    program: PathBuf,
}

impl Default for Cygpath {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cygpath"),
        }
    }
}

impl Cygpath {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PathConverter for Cygpath {
    fn to_native(&self, path: &str) -> Result<String, LibtoolError> {
        let conversion_error = |message: String| LibtoolError::PathConversion {
            path: path.to_string(),
            message,
        };

        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| conversion_error(format!("cannot run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            return Err(conversion_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let converted = String::from_utf8(output.stdout)
            .map_err(|e| conversion_error(e.to_string()))?
            .trim()
            .to_string();
        tracing::debug!(from = path, to = %converted, "converted path");
        Ok(converted)
    }
}
