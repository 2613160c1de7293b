use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::block_segmenter::Block;
use super::diagnostics_error::DiagnosticsError;
use super::stream_record::{StreamRecord, StreamRecordParser, VideoStream};
use crate::shared::constants::PIPE_ENDPOINT;
use crate::shared::stream_id::StreamId;

static INPUT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Input #(?P<index>\d+), (?P<container>\S+), from '(?P<endpoint>.*)':\s*$")
        .expect("input header pattern is valid")
});

static OUTPUT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Output #(?P<index>\d+), (?P<container>\S+), to '(?P<endpoint>.*)':\s*$")
        .expect("output header pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "Input",
            Self::Output => "Output",
        })
    }
}

/// An `Input #n` or `Output #n` block and the streams declared in it.
#[derive(Clone, Debug, PartialEq)]
pub struct IoBlock {
    pub direction: Direction,
    pub index: u32,
    pub container: String,
    pub endpoint: String,
    pub streams: BTreeMap<StreamId, StreamRecord>,
}

impl IoBlock {
    /// `Ok(None)` when the header is not an input or output header.
    /// Body lines that are not stream lines are ignored.
    pub fn parse(block: &Block, parser: &StreamRecordParser) -> Result<Option<Self>, DiagnosticsError> {
        let header = block.header();
        let (direction, caps) = if let Some(caps) = INPUT_HEADER.captures(header) {
            (Direction::Input, caps)
        } else if let Some(caps) = OUTPUT_HEADER.captures(header) {
            (Direction::Output, caps)
        } else {
            return Ok(None);
        };
        let Ok(index) = caps["index"].parse::<u32>() else {
            log::debug!("io index out of range in {header:?}");
            return Ok(None);
        };

        let mut io = Self {
            direction,
            index,
            container: caps["container"].to_string(),
            endpoint: caps["endpoint"].to_string(),
            streams: BTreeMap::new(),
        };
        for line in block.body() {
            let Some(record) = parser.parse_line(line)? else {
                continue;
            };
            if io.streams.contains_key(&record.id) {
                log::warn!("{direction} #{index} declares stream #{} twice, keeping the first", record.id);
                continue;
            }
            io.streams.insert(record.id, record);
        }
        Ok(Some(io))
    }

    /// The endpoint is the process's own stdin/stdout.
    pub fn is_pipe(&self) -> bool {
        self.endpoint == PIPE_ENDPOINT
    }

    pub fn stream(&self, id: StreamId) -> Option<&StreamRecord> {
        self.streams.get(&id)
    }

    /// Lookup by the stream's position within this block, i.e. `#<index>:<n>`.
    pub fn stream_at(&self, n: u32) -> Option<&StreamRecord> {
        self.stream(StreamId::new(self.index, n))
    }

    pub fn video_streams(&self) -> impl Iterator<Item = (StreamId, &VideoStream)> {
        self.streams
            .values()
            .filter_map(|record| record.video().map(|video| (record.id, video)))
    }
}
