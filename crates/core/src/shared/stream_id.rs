use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identity of a stream as ffmpeg prints it: `<io index>:<stream index>`.
///
/// The io index refers to an input or an output depending on where the id
/// appears, so `0:0` on the input side and `0:0` on the output side are
/// different streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId {
    pub io: u32,
    pub stream: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid stream id {0:?}, expected <int>:<int>")]
pub struct StreamIdParseError(pub String);

impl StreamId {
    pub fn new(io: u32, stream: u32) -> Self {
        Self { io, stream }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.io, self.stream)
    }
}

impl FromStr for StreamId {
    type Err = StreamIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || StreamIdParseError(s.to_string());
        let (io, stream) = s.split_once(':').ok_or_else(err)?;
        Ok(Self {
            io: io.parse().map_err(|_| err())?,
            stream: stream.parse().map_err(|_| err())?,
        })
    }
}
