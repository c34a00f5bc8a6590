//! Command handlers.

pub mod install;
pub mod list;
pub mod resolve;
pub mod uninstall;

use anyhow::{Context, Result};
use gamsreg_cli::cli::{Cli, Commands};
use gamsreg_core::{GamsregConfig, PatchOutcome, RegistryPatch, RegistryTransaction};
use std::fs;
use std::path::Path;

/// Dispatch the parsed command line.
pub fn run(cli: &Cli, config: &GamsregConfig) -> Result<()> {
    match &cli.command {
        Commands::Install(args) => install::handle(args, cli.platform, config),
        Commands::Uninstall(args) => uninstall::handle(args, cli.platform),
        Commands::Resolve(args) => resolve::handle(args, cli.platform),
        Commands::List { sysdir } => list::handle(sysdir, cli.platform),
    }
}

/// Apply `patch` to the registry at `registry`.
///
/// With `dry_run` the patched text goes to stdout and nothing on disk
/// changes. Otherwise the rewrite runs inside a [`RegistryTransaction`].
pub(crate) fn patch_registry(
    registry: &Path,
    patch: &RegistryPatch,
    dry_run: bool,
) -> Result<PatchOutcome> {
    if dry_run {
        let text = fs::read_to_string(registry)
            .with_context(|| format!("reading {}", registry.display()))?;
        let outcome = patch.apply(&text)?;
        print!("{}", outcome.output);
        return Ok(outcome);
    }

    let tx = RegistryTransaction::begin(registry)?;
    if tx.created_orig() {
        println!("Creating backup {}", tx.orig_path().display());
    }
    println!("Creating backup {}", tx.bak_path().display());

    tx.apply_patch(patch).map_err(|err| {
        if err.is_transformation_error() {
            eprintln!("Restoring {}", registry.display());
        }
        err.into()
    })
}
