use std::path::{Path, PathBuf};

use super::constants::{DEFAULT_FFMPEG_BINARY, DEFAULT_STDERR_TAIL, FFMPEG_BINARY_ENV};

/// How the external ffmpeg binary is located and observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolConfig {
    binary: PathBuf,
    verbose: bool,
    stderr_tail: usize,
}

impl ToolConfig {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_FFMPEG_BINARY),
            verbose: false,
            stderr_tail: DEFAULT_STDERR_TAIL,
        }
    }

    /// Defaults, with the binary taken from `FRAMEPIPE_FFMPEG` when set.
    pub fn from_env() -> Self {
        let config = Self::new();
        match std::env::var_os(FFMPEG_BINARY_ENV) {
            Some(path) if !path.is_empty() => config.with_binary(path),
            _ => config,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Echo every diagnostic block and forwarded stderr line to our stderr.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_stderr_tail(mut self, lines: usize) -> Self {
        self.stderr_tail = lines.max(1);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn stderr_tail(&self) -> usize {
        self.stderr_tail
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::new()
    }
}
