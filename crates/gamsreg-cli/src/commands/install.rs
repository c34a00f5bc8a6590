//! `gamsreg install`: add a solver entry to the registry.

use super::patch_registry;
use anyhow::{Context, Result};
use gamsreg_cli::cli::InstallArgs;
use gamsreg_core::libtool::is_libtool_archive;
use gamsreg_core::{
    absolute_path, validate, GamsregConfig, LibtoolArchive, Platform, RegistryPatch, SolverEntry,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Install a solver entry and its options file.
pub fn handle(args: &InstallArgs, platform: Platform, config: &GamsregConfig) -> Result<()> {
    validate::writable_dir(&args.sysdir)?;
    let registry = validate::registry_file(&args.sysdir, platform)?;

    let library = absolute_path(&args.library)
        .with_context(|| format!("resolving {}", args.library.display()))?;
    validate::existing_file(&library)?;

    validate::solver_name(&args.solver_name)?;
    validate::solver_id(&args.solver_id)?;
    validate::model_types(&args.model_types)?;

    let dict_type = args
        .dict_type
        .as_deref()
        .unwrap_or(&config.install.dict_type);
    validate::dict_type(dict_type)?;

    let option_file = match &args.optdef {
        Some(optdef) => {
            validate::option_file(optdef)?;
            Some(file_name(optdef)?)
        }
        None => None,
    };

    let library = installed_library(&library, platform)?;
    info!(solver = %args.solver_name, library = %library.display(), "installing");

    let entry = SolverEntry::new(
        &args.solver_name,
        &args.solver_id,
        args.model_types.trim(),
        library,
        platform,
    )
    .with_dict_type(dict_type)
    .with_option_file(option_file.clone())
    .with_thread_safe(config.install.thread_safe);

    let outcome = patch_registry(&registry, &RegistryPatch::install(&entry), args.dry_run)?;
    if args.dry_run {
        return Ok(());
    }

    if outcome.removed > 0 {
        println!("Replacing previous section for solver {}", entry.key());
    }
    println!("Adding section for solver {}", entry.key());

    if let (Some(optdef), Some(name)) = (&args.optdef, option_file) {
        println!("Installing {}", optdef.display());
        let target = args.sysdir.join(name);
        std::fs::copy(optdef, &target)
            .with_context(|| format!("copying {} to {}", optdef.display(), target.display()))?;
    }

    Ok(())
}

/// Library GAMS should load; libtool archives are resolved to the library
/// they describe.
fn installed_library(library: &Path, platform: Platform) -> Result<PathBuf> {
    if !is_libtool_archive(library) {
        return Ok(library.to_path_buf());
    }
    let archive = LibtoolArchive::read(library)?;
    let converter = platform.path_converter();
    let installed =
        archive.installed_library(converter.as_ref(), platform.needs_path_conversion())?;
    Ok(installed)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}
