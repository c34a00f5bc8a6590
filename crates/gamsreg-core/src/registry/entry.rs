use super::line_content;
use crate::error::RegistryError;
use crate::platform::Platform;
use crate::{DEFAULT_DICT_TYPE, MAGIC_VERSION};
use std::path::PathBuf;

/// Parsed header line of a solver block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Solver name as written in the file.
    pub key: String,
    /// Dictionary type (field 2).
    pub dict_type: String,
    /// Value of field 6.
    pub extra_lines: usize,
    /// Model types the solver handles (fields 7 and later).
    pub model_types: Vec<String>,
}

impl EntryHeader {
    /// Parse a header line; fails unless field 6 holds a non-negative integer.
    pub fn parse(line: &str) -> Result<Self, RegistryError> {
        let text = line_content(line);
        let fields: Vec<&str> = text.split_whitespace().collect();

        if fields.len() < 7 {
            return Err(RegistryError::MalformedEntry {
                expected: "at least 7 entries",
                line: text.to_string(),
            });
        }

        let count = fields[6];
        let extra_lines = Some(count)
            .filter(|c| c.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.parse::<usize>().ok())
            .ok_or_else(|| RegistryError::MalformedEntry {
                expected: "integer at position 7",
                line: text.to_string(),
            })?;

        Ok(Self {
            key: fields[0].to_string(),
            dict_type: fields[2].to_string(),
            extra_lines,
            model_types: fields[7..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Number of lines following the header that belong to this block.
    pub fn continuation_lines(&self) -> usize {
        self.extra_lines + 1
    }

    /// Total number of lines in this block, header included.
    pub fn block_len(&self) -> usize {
        self.continuation_lines() + 1
    }
}

/// Registry record for a solver library loaded through the generic link.
#[derive(Debug, Clone)]
pub struct SolverEntry {
    pub name: String,
    pub solver_id: String,
    pub model_types: String,
    pub dict_type: String,
    /// Absolute path of the shared library GAMS loads.
    pub library: PathBuf,
    /// File name of the options definition file, if the solver has one.
    pub option_file: Option<String>,
    /// Whether the solver may be called from several threads.
    pub thread_safe: bool,
    pub platform: Platform,
}

impl SolverEntry {
    pub fn new(
        name: &str,
        solver_id: &str,
        model_types: &str,
        library: impl Into<PathBuf>,
        platform: Platform,
    ) -> Self {
        Self {
            name: name.to_uppercase(),
            solver_id: solver_id.to_string(),
            model_types: model_types.to_string(),
            dict_type: DEFAULT_DICT_TYPE.to_string(),
            library: library.into(),
            option_file: None,
            thread_safe: true,
            platform,
        }
    }

    pub fn with_dict_type(mut self, dict_type: impl Into<String>) -> Self {
        self.dict_type = dict_type.into();
        self
    }

    pub fn with_option_file(mut self, option_file: Option<String>) -> Self {
        self.option_file = option_file;
        self
    }

    pub fn with_thread_safe(mut self, thread_safe: bool) -> Self {
        self.thread_safe = thread_safe;
        self
    }

    /// Key the block is registered under.
    pub fn key(&self) -> &str {
        &self.name
    }

    /// The four lines of the block, without terminators.
    pub fn lines(&self) -> Vec<String> {
        let header = format!(
            "{} 111 {} {} 1 0 2 {}",
            self.name, self.dict_type, MAGIC_VERSION, self.model_types
        );

        let script = match &self.option_file {
            Some(def) => format!("{} {}", self.platform.generator_script(), def),
            None => self.platform.generator_script().to_string(),
        };

        let library = format!(
            "{} {} 1 {}",
            self.library.display(),
            self.solver_id,
            u8::from(self.thread_safe)
        );

        vec![
            header,
            script,
            self.platform.generator_executable().to_string(),
            library,
        ]
    }
}
