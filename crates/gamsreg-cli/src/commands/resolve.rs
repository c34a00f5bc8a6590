//! `gamsreg resolve`: rewrite a gamsconfig.yaml for an installation.

use anyhow::{Context, Result};
use gamsreg_cli::cli::ResolveArgs;
use gamsreg_core::{absolute_path, validate, ConfigPathResolver, Platform, ValidationError};

pub fn handle(args: &ResolveArgs, platform: Platform) -> Result<()> {
    if !args.manifest.exists() {
        return Err(ValidationError::MissingManifest(args.manifest.clone()).into());
    }
    let install_dir = absolute_path(&args.install_dir)
        .with_context(|| format!("resolving {}", args.install_dir.display()))?;
    validate::writable_dir(&install_dir)?;

    let resolver = ConfigPathResolver::new(platform);
    let (written, resolved) = resolver.resolve_file(&args.manifest, &install_dir)?;
    println!("Resolved {} library reference(s)", resolved.replaced);
    println!("Writing {}", written.display());
    Ok(())
}
