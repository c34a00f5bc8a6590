//! `gamsreg uninstall`: remove a solver entry from the registry.

use super::patch_registry;
use anyhow::{Context, Result};
use gamsreg_cli::cli::UninstallArgs;
use gamsreg_core::{validate, Platform, RegistryPatch};

/// Remove the solver's entry; a solver that is not registered is not an error.
pub fn handle(args: &UninstallArgs, platform: Platform) -> Result<()> {
    validate::writable_dir(&args.sysdir)?;
    let registry = validate::registry_file(&args.sysdir, platform)?;
    validate::solver_name(&args.solver_name)?;

    let patch = RegistryPatch::remove(&args.solver_name);
    let outcome = patch_registry(&registry, &patch, args.dry_run)?;
    if args.dry_run {
        return Ok(());
    }

    if outcome.removed > 0 {
        println!("Removing entry for {}", patch.key());
    } else {
        tracing::info!(solver = patch.key(), "no entry in {}", registry.display());
    }

    let Some(optdef) = &args.optdef else {
        return Ok(());
    };
    let Some(name) = optdef.file_name() else {
        return Ok(());
    };
    let installed = args.sysdir.join(name);
    if installed.is_file() {
        println!("Removing {}", installed.display());
        std::fs::remove_file(&installed)
            .with_context(|| format!("removing {}", installed.display()))?;
    }

    Ok(())
}
