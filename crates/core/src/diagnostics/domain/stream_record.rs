use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::diagnostics_error::DiagnosticsError;
use crate::shared::stream_id::StreamId;
use crate::vocabulary::domain::listing::Listing;
use crate::vocabulary::domain::vocabulary::{Vocabulary, VocabularyError};

static STREAM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+Stream #(?P<id>\d+:\d+)(?:\[0x[0-9a-fA-F]+\])?(?:\((?P<lang>[^)]*)\))?: (?P<kind>\w+): (?P<info>.*)$",
    )
    .expect("stream line pattern is valid")
});

static GEOMETRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<width>\d+)x(?P<height>\d+)\b").expect("geometry pattern is valid")
});

static FRAME_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<value>\d+(?:\.\d+)?)(?P<kilo>k)? (?P<unit>fps|tbr)$")
        .expect("frame rate pattern is valid")
});

static SAMPLE_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<hz>\d+) Hz$").expect("sample rate pattern is valid"));

#[derive(Clone, Debug, PartialEq)]
pub struct VideoStream {
    pub codec: String,
    pub pixel_format: Option<String>,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioStream {
    pub codec: Option<String>,
    pub sample_rate: Option<u32>,
    pub channel_layout: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtherStream {
    pub type_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StreamKind {
    Video(VideoStream),
    Audio(AudioStream),
    Other(OtherStream),
}

/// One `Stream #<io>:<n>` line.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamRecord {
    pub id: StreamId,
    pub language: Option<String>,
    pub kind: StreamKind,
    /// The info tail split into top-level comma separated fields.
    pub fields: Vec<String>,
}

impl StreamRecord {
    pub fn video(&self) -> Option<&VideoStream> {
        match &self.kind {
            StreamKind::Video(video) => Some(video),
            _ => None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.video().is_some()
    }
}

/// Parses stream lines, telling codec and pixel-format names apart with
/// the tool's own listings.
#[derive(Clone, Debug)]
pub struct StreamRecordParser {
    codecs: Arc<Listing>,
    pixel_formats: Arc<Listing>,
}

impl StreamRecordParser {
    pub fn new(vocabulary: &dyn Vocabulary) -> Result<Self, VocabularyError> {
        Ok(Self::from_listings(
            vocabulary.codecs()?,
            vocabulary.pixel_formats()?,
        ))
    }

    pub fn from_listings(codecs: Arc<Listing>, pixel_formats: Arc<Listing>) -> Self {
        Self {
            codecs,
            pixel_formats,
        }
    }

    /// `Ok(None)` for lines that are not stream lines.
    ///
    /// A Video line without geometry is an error: it is the one field
    /// every diagnostic format prints.
    pub fn parse_line(&self, line: &str) -> Result<Option<StreamRecord>, DiagnosticsError> {
        let Some(caps) = STREAM_LINE.captures(line) else {
            return Ok(None);
        };
        let Ok(id) = caps["id"].parse::<StreamId>() else {
            log::debug!("stream id out of range in {line:?}");
            return Ok(None);
        };
        let fields = split_fields(&caps["info"]);
        let kind = match &caps["kind"] {
            "Video" => StreamKind::Video(self.video(&fields).ok_or_else(|| {
                DiagnosticsError::MissingGeometry {
                    line: line.to_string(),
                }
            })?),
            "Audio" => StreamKind::Audio(audio(&fields)),
            other => StreamKind::Other(OtherStream {
                type_name: other.to_string(),
            }),
        };
        Ok(Some(StreamRecord {
            id,
            language: caps.name("lang").map(|m| m.as_str().to_string()),
            kind,
            fields,
        }))
    }

    /// Fields are scanned once, left to right: codec, then pixel format,
    /// then geometry, each search starting after the previous hit. The
    /// codec is always the leading word of the first field.
    fn video(&self, fields: &[String]) -> Option<VideoStream> {
        let first = fields.first().map_or("", |f| leading_token(f));
        let mut pos = 0;
        if self.codecs.contains(first) {
            pos = 1;
        } else {
            log::debug!("codec {first:?} is not in the codec listing");
            if !first.is_empty() && !self.pixel_formats.contains(first) {
                pos = 1;
            }
        }
        let codec = first.to_string();

        let pixel_format = find_from(fields, pos, |f| {
            self.pixel_formats.contains(leading_token(f))
        })
        .map(|i| {
            pos = i + 1;
            leading_token(&fields[i]).to_string()
        });

        let (i, width, height) = fields
            .iter()
            .enumerate()
            .skip(pos)
            .find_map(|(i, f)| geometry(f).map(|(w, h)| (i, w, h)))?;
        let rates = &fields[i + 1..];

        Some(VideoStream {
            codec,
            pixel_format,
            width,
            height,
            frame_rate: frame_rate(rates, "fps").or_else(|| frame_rate(rates, "tbr")),
        })
    }
}

fn find_from(fields: &[String], pos: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    fields
        .iter()
        .enumerate()
        .skip(pos)
        .find(|(_, f)| pred(f))
        .map(|(i, _)| i)
}

/// `h264 (High)` -> `h264`, `yuv420p(progressive)` -> `yuv420p`.
fn leading_token(field: &str) -> &str {
    field
        .split(|c: char| c.is_whitespace() || c == '(' || c == '[')
        .next()
        .unwrap_or("")
}

fn geometry(field: &str) -> Option<(u32, u32)> {
    let caps = GEOMETRY.captures(field)?;
    let width: u32 = caps["width"].parse().ok()?;
    let height: u32 = caps["height"].parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

fn frame_rate(fields: &[String], unit: &str) -> Option<f64> {
    fields.iter().find_map(|f| {
        let caps = FRAME_RATE.captures(f)?;
        if &caps["unit"] != unit {
            return None;
        }
        let mut value: f64 = caps["value"].parse().ok()?;
        if caps.name("kilo").is_some() {
            value *= 1000.0;
        }
        (value > 0.0).then_some(value)
    })
}

fn audio(fields: &[String]) -> AudioStream {
    let codec = fields
        .first()
        .map(|f| leading_token(f))
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let rate_at = fields.iter().position(|f| SAMPLE_RATE.is_match(f));
    AudioStream {
        codec,
        sample_rate: rate_at
            .and_then(|i| SAMPLE_RATE.captures(&fields[i]))
            .and_then(|caps| caps["hz"].parse().ok()),
        channel_layout: rate_at.and_then(|i| fields.get(i + 1)).cloned(),
    }
}

/// Splits on commas that are not inside `()` or `[]`.
fn split_fields(info: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in info.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                fields.push(&info[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&info[start..]);
    fields
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
