use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::block_segmenter::Block;
use crate::shared::stream_id::StreamId;

const MAPPING_HEADER: &str = "Stream mapping:";

static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+Stream #(?P<input>\d+:\d+).*?\s->\s+#(?P<output>\d+:\d+)(?:\s+\((?P<transition>.*)\))?\s*$",
    )
    .expect("mapping line pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecTransition {
    Copy,
    Transcode { from: String, to: String },
}

impl CodecTransition {
    /// `h264 (native) -> rawvideo (native)` or `copy`.
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "copy" {
            return Some(Self::Copy);
        }
        let (from, to) = text.split_once(" -> ")?;
        let name = |side: &str| side.split_whitespace().next().unwrap_or("").to_string();
        Some(Self::Transcode {
            from: name(from),
            to: name(to),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    pub input: StreamId,
    pub output: StreamId,
    pub transition: Option<CodecTransition>,
}

/// The `Stream mapping:` block: which input stream feeds which output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamMapping {
    entries: Vec<MappingEntry>,
}

impl StreamMapping {
    /// `None` unless the header ends in `Stream mapping:`.
    ///
    /// Body lines that do not look like `Stream #a:b -> #c:d` are
    /// skipped; prompts and filter-graph lines show up here.
    pub fn parse(block: &Block) -> Option<Self> {
        if !block.header().trim_end().ends_with(MAPPING_HEADER) {
            return None;
        }
        let entries = block
            .body()
            .iter()
            .filter_map(|line| {
                let Some(caps) = MAPPING_LINE.captures(line) else {
                    log::trace!("skipping mapping line {line:?}");
                    return None;
                };
                Some(MappingEntry {
                    input: caps["input"].parse().ok()?,
                    output: caps["output"].parse().ok()?,
                    transition: caps
                        .name("transition")
                        .and_then(|m| CodecTransition::parse(m.as_str())),
                })
            })
            .collect();
        Some(Self { entries })
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn pairs(&self) -> impl Iterator<Item = (StreamId, StreamId)> + '_ {
        self.entries.iter().map(|e| (e.input, e.output))
    }

    /// Every distinct output stream the mapping refers to.
    pub fn output_ids(&self) -> BTreeSet<StreamId> {
        self.entries.iter().map(|e| e.output).collect()
    }

    pub fn input_for(&self, output: StreamId) -> Option<StreamId> {
        self.entries.iter().find(|e| e.output == output).map(|e| e.input)
    }

    pub fn output_for(&self, input: StreamId) -> Option<StreamId> {
        self.entries.iter().find(|e| e.input == input).map(|e| e.output)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
