//! Core logic for linking third-party solvers into a GAMS system directory.
//!
//! GAMS discovers solvers through a flat-text registry file in its system
//! directory (`gmscmpun.txt` on Unix, `gmscmpnt.txt` on Windows). Each solver
//! owns a block of lines in that file, and all solver blocks precede the
//! `DEFAULTS` section.
//!
//! # Architecture
//!
//! ```text
//! gamsreg install ──> RegistryTransaction::begin   (.orig once, .bak always)
//!                         │
//!                         ▼
//!                     RegistryPatch::apply         (remove old block, insert new)
//!                         │
//!                 ok ─────┴───── err
//!                 ▼              ▼
//!              commit         rollback             (restore from .bak)
//! ```
//!
//! The manifest side ([`manifest`]) rewrites a `gamsconfig.yaml` so that
//! library references point at installed shared libraries instead of libtool
//! archives.

pub mod config;
pub mod error;
pub mod libtool;
pub mod manifest;
pub mod platform;
pub mod registry;
pub mod transaction;
pub mod validate;

pub use config::{load_config, ConfigError, GamsregConfig};
pub use error::{ExitCode, LibtoolError, ManifestError, RegistryError, ValidationError};
pub use libtool::LibtoolArchive;
pub use manifest::{ConfigPathResolver, ResolvedManifest};
pub use platform::{absolute_path, Cygpath, IdentityPaths, PathConverter, Platform};
pub use registry::{EntryHeader, PatchOutcome, RegistryPatch, SolverEntry};
pub use transaction::RegistryTransaction;

/// Line prefix that starts the defaults section of the registry file.
pub const SENTINEL: &str = "DEFAULTS";

/// Format revision stamp written into every new registry header.
pub const MAGIC_VERSION: &str = "0001020304";

/// Default dictionary type (5 = solver reads a dictionary).
pub const DEFAULT_DICT_TYPE: &str = "5";
