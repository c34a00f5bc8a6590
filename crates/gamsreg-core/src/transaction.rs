//! Backup-and-restore wrapper around registry rewrites.
//!
//! Beginning a transaction snapshots the live file twice: `<file>.orig` on the
//! very first run (never touched again) and `<file>.bak` on every run. The new
//! contents are written to a temporary sibling and renamed over the live file,
//! so readers see either the old or the new registry. Any failure copies
//! `.bak` back over the live file.
//!
//! A symlinked registry is written through: the rename lands on the link's
//! target, and the backups sit next to the path that was named.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::{PatchOutcome, RegistryPatch};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An in-progress rewrite of one registry file.
///
/// Dropping a transaction without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) restores the live file.
#[derive(Debug)]
pub struct RegistryTransaction {
    /// Resolved registry file; writes and restores go here.
    live: PathBuf,
    orig: PathBuf,
    bak: PathBuf,
    snapshot: String,
    created_orig: bool,
    finished: bool,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

impl RegistryTransaction {
    /// Take the `.orig` (first run only) and `.bak` snapshots of `live`.
    pub fn begin(path: &Path) -> RegistryResult<Self> {
        let live = fs::canonicalize(path).map_err(|e| RegistryError::io("resolve", path, e))?;
        let orig = sibling(path, "orig");
        let bak = sibling(path, "bak");

        let created_orig = !orig.exists();
        if created_orig {
            fs::copy(&live, &orig).map_err(|e| RegistryError::io("back up", &live, e))?;
            debug!(path = %orig.display(), "created first-run backup");
        }

        fs::copy(&live, &bak).map_err(|e| RegistryError::io("back up", &live, e))?;
        let snapshot =
            fs::read_to_string(&bak).map_err(|e| RegistryError::io("read", &bak, e))?;

        Ok(Self {
            live,
            orig,
            bak,
            snapshot,
            created_orig,
            finished: false,
        })
    }

    /// Registry contents as they were when the transaction began.
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn orig_path(&self) -> &Path {
        &self.orig
    }

    pub fn bak_path(&self) -> &Path {
        &self.bak
    }

    /// Whether this run created the `.orig` snapshot.
    pub fn created_orig(&self) -> bool {
        self.created_orig
    }

    /// Apply `patch` to the snapshot, committing on success and restoring
    /// the live file on failure.
    pub fn apply_patch(self, patch: &RegistryPatch) -> RegistryResult<PatchOutcome> {
        match patch.apply(&self.snapshot) {
            Ok(outcome) => {
                self.commit(&outcome.output)?;
                Ok(outcome)
            }
            Err(err) => {
                warn!(path = %self.live.display(), "restoring registry after error: {err}");
                self.rollback()?;
                Err(err)
            }
        }
    }

    /// Replace the live file with `contents`, keeping its permissions.
    pub fn commit(mut self, contents: &str) -> RegistryResult<()> {
        match self.write_live(contents) {
            Ok(()) => {
                self.finished = true;
                debug!(
                    path = %self.live.display(),
                    bytes = contents.len(),
                    "registry written"
                );
                Ok(())
            }
            Err(err) => {
                self.finished = true;
                self.restore()?;
                Err(err)
            }
        }
    }

    /// Copy `.bak` back over the live file.
    pub fn rollback(mut self) -> RegistryResult<()> {
        self.finished = true;
        self.restore()
    }

    fn write_live(&self, contents: &str) -> RegistryResult<()> {
        let dir = match self.live.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let permissions = fs::metadata(&self.live)
            .map_err(|e| RegistryError::io("inspect", &self.live, e))?
            .permissions();

        let mut tmp = tempfile::Builder::new()
            .prefix(".gamsreg-")
            .tempfile_in(&dir)
            .map_err(|e| RegistryError::io("create temporary file in", &dir, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .and_then(|()| tmp.as_file().set_permissions(permissions))
            .map_err(|e| RegistryError::io("write", tmp.path(), e))?;
        tmp.persist(&self.live)
            .map_err(|e| RegistryError::io("replace", &self.live, e.error))?;
        Ok(())
    }

    fn restore(&self) -> RegistryResult<()> {
        fs::copy(&self.bak, &self.live)
            .map(|_| ())
            .map_err(|e| RegistryError::io("restore", &self.live, e))
    }
}

impl Drop for RegistryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.restore() {
                warn!("{err}");
            }
        }
    }
}
