use super::{first_field_matches, line_content, line_ending, EntryHeader, SolverEntry};
use crate::error::RegistryError;
use crate::SENTINEL;
use tracing::debug;

/// Where the scanner is relative to the block being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    /// Inside a removed block; `remaining` lines still belong to it.
    SkippingBlock { remaining: usize },
    /// Just past a removed block; one blank separator line is dropped.
    AfterBlock,
}

impl ScanState {
    /// State after discarding one line of a block.
    fn consume(remaining: usize) -> Self {
        if remaining > 1 {
            ScanState::SkippingBlock {
                remaining: remaining - 1,
            }
        } else {
            ScanState::AfterBlock
        }
    }
}

/// Removes the block of one solver and optionally inserts a replacement
/// before the `DEFAULTS` section.
#[derive(Debug, Clone)]
pub struct RegistryPatch {
    key: String,
    insert: Option<Vec<String>>,
}

/// Result of applying a [`RegistryPatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Rewritten file contents.
    pub output: String,
    /// Number of blocks removed for the key.
    pub removed: usize,
    /// Whether the new block was written.
    pub inserted: bool,
}

impl RegistryPatch {
    /// Patch that only removes the block for `key`.
    pub fn remove(key: &str) -> Self {
        Self {
            key: key.to_uppercase(),
            insert: None,
        }
    }

    /// Patch that replaces any block for the entry's key with `entry`.
    pub fn install(entry: &SolverEntry) -> Self {
        Self {
            key: entry.key().to_string(),
            insert: Some(entry.lines()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rewrite `input` in one forward pass.
    pub fn apply(&self, input: &str) -> Result<PatchOutcome, RegistryError> {
        let mut output = String::with_capacity(input.len() + 256);
        let mut state = ScanState::Normal;
        let mut removed = 0;
        let mut inserted = false;

        for line in input.split_inclusive('\n') {
            let text = line_content(line);

            match state {
                ScanState::SkippingBlock { remaining } => {
                    state = ScanState::consume(remaining);
                    continue;
                }
                ScanState::AfterBlock => {
                    state = ScanState::Normal;
                    if text.trim().is_empty() {
                        continue;
                    }
                }
                ScanState::Normal => {}
            }

            if first_field_matches(text, &self.key) {
                let header = EntryHeader::parse(text)?;
                debug!(key = %self.key, lines = header.block_len(), "removing block");
                removed += 1;
                state = ScanState::SkippingBlock {
                    remaining: header.continuation_lines(),
                };
                continue;
            }

            if !inserted && text.starts_with(SENTINEL) {
                if let Some(body) = &self.insert {
                    let ending = line_ending(line);
                    for body_line in body {
                        output.push_str(body_line);
                        output.push_str(ending);
                    }
                    output.push_str(ending);
                    inserted = true;
                    debug!(key = %self.key, "inserted block before {SENTINEL}");
                }
            }

            output.push_str(line);
        }

        if self.insert.is_some() && !inserted {
            return Err(RegistryError::MissingSentinel {
                key: self.key.clone(),
                sentinel: SENTINEL,
            });
        }

        Ok(PatchOutcome {
            output,
            removed,
            inserted,
        })
    }
}

/// Headers of all solver blocks preceding the `DEFAULTS` section.
///
/// Blank lines and `*` comments between blocks are ignored, as are lines
/// that do not parse as a header.
pub fn list_entries(input: &str) -> Vec<EntryHeader> {
    let mut entries = Vec::new();
    let mut skip = 0usize;

    for line in input.lines() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        if line.starts_with(SENTINEL) {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        match EntryHeader::parse(line) {
            Ok(header) => {
                skip = header.continuation_lines();
                entries.push(header);
            }
            Err(err) => debug!("skipping line: {err}"),
        }
    }

    entries
}
