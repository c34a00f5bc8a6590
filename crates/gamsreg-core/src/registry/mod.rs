//! Solver registry file model and rewriting.
//!
//! A registry file is a sequence of solver blocks followed by a `DEFAULTS`
//! section. Every block starts with a header line:
//!
//! ```text
//! CONOPT 111 5 0001020304 1 0 2 NLP CNS DNLP
//! ^key       ^dict         field 6 ^
//! ```
//!
//! Field 6 counts the continuation lines beyond the first one that follows
//! the header, so a header carrying `2` owns three more lines. When a block
//! is removed, one blank line directly after it is dropped as well, whether
//! or not the block was written by an install.

mod entry;
mod patch;

pub use entry::{EntryHeader, SolverEntry};
pub use patch::{list_entries, PatchOutcome, RegistryPatch};

/// Text of a line without its terminator.
pub(crate) fn line_content(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Terminator to reuse when emitting lines next to `line`.
pub(crate) fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Whether the first whitespace-delimited field of `line` is `key`,
/// ignoring ASCII case.
pub(crate) fn first_field_matches(line: &str, key: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|field| field.eq_ignore_ascii_case(key))
}
