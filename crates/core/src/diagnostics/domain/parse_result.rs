use std::collections::BTreeMap;

use super::diagnostics_error::SelectionError;
use super::io_block::{Direction, IoBlock};
use super::stream_mapping::StreamMapping;
use super::stream_record::{StreamRecord, VideoStream};
use crate::shared::constants::RAWVIDEO_CONTAINER;
use crate::shared::stream_id::StreamId;

const PIPE_VIDEO: &str = "pipe video stream";

/// Everything learned from the diagnostic header of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseResult {
    inputs: BTreeMap<u32, IoBlock>,
    outputs: BTreeMap<u32, IoBlock>,
    mapping: Option<StreamMapping>,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated index keeps the block seen first.
    pub fn record_io(&mut self, io: IoBlock) {
        let blocks = match io.direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        };
        if blocks.contains_key(&io.index) {
            log::warn!("{} #{} declared twice, keeping the first", io.direction, io.index);
            return;
        }
        blocks.insert(io.index, io);
    }

    pub fn record_mapping(&mut self, mapping: StreamMapping) {
        if self.mapping.is_some() {
            log::warn!("second stream mapping block ignored");
            return;
        }
        self.mapping = Some(mapping);
    }

    pub fn inputs(&self) -> &BTreeMap<u32, IoBlock> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BTreeMap<u32, IoBlock> {
        &self.outputs
    }

    pub fn mapping(&self) -> Option<&StreamMapping> {
        self.mapping.as_ref()
    }

    pub fn input_stream(&self, id: StreamId) -> Option<&StreamRecord> {
        self.inputs.get(&id.io)?.stream(id)
    }

    pub fn output_stream(&self, id: StreamId) -> Option<&StreamRecord> {
        self.outputs.get(&id.io)?.stream(id)
    }

    fn declares_output(&self, id: StreamId) -> bool {
        self.outputs.values().any(|io| io.streams.contains_key(&id))
    }

    /// The mapping is known and every output stream it names has been
    /// declared by an output block.
    ///
    /// An empty mapping (every line was a filter-graph line) is complete
    /// once any output block has been seen.
    pub fn is_complete(&self) -> bool {
        let Some(mapping) = &self.mapping else {
            return false;
        };
        if mapping.is_empty() {
            return !self.outputs.is_empty();
        }
        mapping.output_ids().into_iter().all(|id| self.declares_output(id))
    }

    /// Video streams written to `pipe:` outputs, in stream id order.
    pub fn pipe_video_streams(&self) -> Vec<(StreamId, &VideoStream)> {
        self.outputs
            .values()
            .filter(|io| io.is_pipe())
            .flat_map(IoBlock::video_streams)
            .collect()
    }

    /// The single video stream going to a pipe.
    pub fn pipe_video_stream(&self) -> Result<(StreamId, &VideoStream), SelectionError> {
        let mut candidates = self.pipe_video_streams();
        match candidates.len() {
            0 => Err(SelectionError::NoCandidate {
                criterion: PIPE_VIDEO,
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(SelectionError::AmbiguousStream {
                criterion: PIPE_VIDEO,
                candidates: candidates.into_iter().map(|(id, _)| id).collect(),
            }),
        }
    }

    /// The pipe video stream, provided its output block writes bare
    /// frames. Any other muxer frames or compresses what reaches stdout.
    pub fn pipe_rawvideo_stream(&self) -> Result<(StreamId, &VideoStream), SelectionError> {
        let (id, video) = self.pipe_video_stream()?;
        let container = self
            .outputs
            .get(&id.io)
            .map_or("", |io| io.container.as_str());
        if container != RAWVIDEO_CONTAINER {
            return Err(SelectionError::NotRawVideo {
                stream: id,
                container: container.to_string(),
            });
        }
        Ok((id, video))
    }
}
