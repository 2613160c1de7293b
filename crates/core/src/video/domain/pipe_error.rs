use std::io;
use std::process::ExitStatus;

use thiserror::Error;

use crate::diagnostics::domain::diagnostics_error::{DiagnosticsError, SelectionError};
use crate::layout::domain::layout_resolver::LayoutError;
use crate::vocabulary::domain::vocabulary::VocabularyError;

#[derive(Error, Debug)]
pub enum PipeError {
    #[error("failed to spawn '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}: not opened")]
    NotOpen(&'static str),

    #[error("child {0} was not captured")]
    MissingPipe(&'static str),

    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error("pipe i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("stream ended mid-frame: expected {expected} bytes, got {got}")]
    ShortFrame { expected: usize, got: usize },

    #[error("frame is {got} bytes but the stream expects {expected}")]
    FrameSize { expected: usize, got: usize },

    #[error("ffmpeg exited with {status}{}", tail_suffix(.stderr_tail))]
    ToolFailed {
        status: ExitStatus,
        stderr_tail: Vec<String>,
    },
}

fn tail_suffix(tail: &[String]) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(":\n{}", tail.join("\n"))
    }
}
