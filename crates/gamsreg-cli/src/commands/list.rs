//! `gamsreg list`: show the solver entries of a registry.

use anyhow::{Context, Result};
use gamsreg_core::registry::list_entries;
use gamsreg_core::{validate, Platform, ValidationError};
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;

pub fn handle(sysdir: &Path, platform: Platform) -> Result<()> {
    if !sysdir.is_dir() {
        return Err(ValidationError::NotADirectory(sysdir.to_path_buf()).into());
    }
    let registry = validate::registry_file(sysdir, platform)?;
    let text = std::fs::read_to_string(&registry)
        .with_context(|| format!("reading {}", registry.display()))?;

    let entries = list_entries(&text);
    if entries.is_empty() {
        println!("No solver entries in {}", registry.display());
        return Ok(());
    }

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "NAME\tDICT\tLINES\tMODEL TYPES")?;
    for entry in &entries {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            entry.key,
            entry.dict_type,
            entry.block_len(),
            entry.model_types.join(" ")
        )?;
    }
    writer.flush()?;
    Ok(())
}
