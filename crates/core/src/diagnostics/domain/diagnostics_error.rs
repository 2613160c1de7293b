use std::io;

use thiserror::Error;

use crate::shared::stream_id::StreamId;
use crate::vocabulary::domain::vocabulary::VocabularyError;

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// The line source ran out before the mapping was satisfied.
    /// Carries the most recent raw lines for the error report.
    #[error(
        "diagnostic output ended before every mapped output stream was declared; last lines:\n{}",
        .consumed.join("\n")
    )]
    IncompleteDiagnostics { consumed: Vec<String> },

    #[error("video stream line has no <width>x<height> field: {line:?}")]
    MissingGeometry { line: String },

    #[error("failed to read diagnostic output: {0}")]
    Read(#[source] io::Error),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("more than one {criterion} matches: {}", join_ids(.candidates))]
    AmbiguousStream {
        criterion: &'static str,
        candidates: Vec<StreamId>,
    },

    #[error("no {criterion} found")]
    NoCandidate { criterion: &'static str },

    #[error("stream #{stream} goes to a '{container}' pipe, raw frames need '-f rawvideo'")]
    NotRawVideo { stream: StreamId, container: String },
}

fn join_ids(ids: &[StreamId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}
