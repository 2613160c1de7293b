use std::collections::VecDeque;
use std::io;

use super::block_echo::{BlockEcho, NullBlockEcho};
use super::block_segmenter::next_block;
use super::diagnostics_error::DiagnosticsError;
use super::io_block::IoBlock;
use super::line_source::PushbackLines;
use super::parse_result::ParseResult;
use super::stream_mapping::StreamMapping;
use super::stream_record::StreamRecordParser;
use crate::shared::constants::DIAGNOSTIC_TAIL_LINES;
use crate::vocabulary::domain::vocabulary::{Vocabulary, VocabularyError};

/// Reads the diagnostic header of a run block by block until the stream
/// layout is known.
///
/// Stops as soon as the mapping is present and every output stream it
/// names has been declared, so the unbounded progress output that
/// follows is never read. Whatever the segmenter looked ahead at stays
/// pushed back on the source.
pub struct ProtocolDriver {
    parser: StreamRecordParser,
    echo: Box<dyn BlockEcho>,
}

impl ProtocolDriver {
    /// Loads both listings up front; a missing vocabulary is fatal.
    pub fn new(vocabulary: &dyn Vocabulary) -> Result<Self, VocabularyError> {
        Ok(Self {
            parser: StreamRecordParser::new(vocabulary)?,
            echo: Box::new(NullBlockEcho),
        })
    }

    pub fn with_echo(mut self, echo: Box<dyn BlockEcho>) -> Self {
        self.echo = echo;
        self
    }

    pub fn parse<I>(&mut self, source: &mut PushbackLines<I>) -> Result<ParseResult, DiagnosticsError>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut result = ParseResult::new();
        let mut recent: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES);

        while !result.is_complete() {
            let Some(block) = next_block(source).map_err(DiagnosticsError::Read)? else {
                return Err(DiagnosticsError::IncompleteDiagnostics {
                    consumed: recent.into(),
                });
            };
            self.echo.echo(&block);
            for line in block.lines() {
                if recent.len() == DIAGNOSTIC_TAIL_LINES {
                    recent.pop_front();
                }
                recent.push_back(line.clone());
            }

            if let Some(io) = IoBlock::parse(&block, &self.parser)? {
                log::debug!(
                    "{} #{} '{}': {} stream(s)",
                    io.direction,
                    io.index,
                    io.endpoint,
                    io.streams.len()
                );
                result.record_io(io);
            } else if let Some(mapping) = StreamMapping::parse(&block) {
                log::debug!("stream mapping with {} entries", mapping.len());
                result.record_mapping(mapping);
            } else {
                log::trace!("skipping block {:?}", block.header());
            }
        }
        Ok(result)
    }

    /// Parses a saved transcript.
    pub fn parse_text(&mut self, text: &str) -> Result<ParseResult, DiagnosticsError> {
        self.parse(&mut PushbackLines::from_reader(text.as_bytes()))
    }
}
