use thiserror::Error;

use crate::diagnostics::domain::stream_record::VideoStream;
use crate::shared::stream_id::StreamId;
use crate::shared::video_stream_info::VideoStreamInfo;
use crate::vocabulary::domain::pixel_format::PixelFormatDescriptor;
use crate::vocabulary::domain::vocabulary::{Vocabulary, VocabularyError};

use super::frame_buffer_spec::{ElementWidth, FrameBufferSpec};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("unsupported pixel format '{name}': {reason}")]
    UnsupportedPixelFormat { name: String, reason: String },

    #[error("pixel format '{name}' is not in the tool's -pix_fmts listing")]
    UnknownPixelFormat { name: String },

    #[error("stream #{stream} declares no pixel format")]
    MissingPixelFormat { stream: StreamId },

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

/// The buffer shapes that are recognised by name alone.
enum FastPath {
    /// `(height, width, channels)`
    Interleaved(usize),
    /// `(channels, height, width)`
    Planar(usize),
    /// Luma plane followed by quarter-size chroma, as `(height * 3 / 2, width)`.
    Yuv420,
}

fn fast_path(name: &str) -> Option<FastPath> {
    Some(match name {
        "rgb24" | "bgr24" => FastPath::Interleaved(3),
        "rgba" | "bgra" | "argb" | "abgr" | "rgb0" | "bgr0" | "0rgb" | "0bgr" => FastPath::Interleaved(4),
        "yuyv422" | "uyvy422" | "yvyu422" => FastPath::Interleaved(2),
        "yuv444p" | "yuvj444p" | "gbrp" => FastPath::Planar(3),
        "yuva444p" | "gbrap" => FastPath::Planar(4),
        "yuv420p" | "yuvj420p" | "nv12" | "nv21" => FastPath::Yuv420,
        _ => return None,
    })
}

/// Shape and element width of one frame of `descriptor` at `width`x`height`.
///
/// Tries, in order: a named fast path, the per-component layout, a
/// sub-sampled plane stack, and finally an opaque byte buffer.
pub fn layout(descriptor: &PixelFormatDescriptor, width: u32, height: u32) -> Result<FrameBufferSpec, LayoutError> {
    let name = descriptor.name();
    let unsupported = |reason: &str| LayoutError::UnsupportedPixelFormat {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if width == 0 || height == 0 {
        return Err(unsupported("frame geometry is empty"));
    }
    if descriptor.components() == 0 || descriptor.bits_per_pixel() == 0 {
        let kind = if descriptor.is_hardware() { "hardware" } else { "bitstream" };
        return Err(unsupported(&format!("{kind} format without a memory layout")));
    }
    let (w, h) = (width as usize, height as usize);

    if let Some(path) = fast_path(name) {
        match path {
            FastPath::Interleaved(c) => return Ok(FrameBufferSpec::new(vec![h, w, c], ElementWidth::U8)),
            FastPath::Planar(c) => return Ok(FrameBufferSpec::new(vec![c, h, w], ElementWidth::U8)),
            FastPath::Yuv420 if h % 2 == 0 => {
                return Ok(FrameBufferSpec::new(vec![h * 3 / 2, w], ElementWidth::U8));
            }
            // Odd heights round the chroma planes; fall through to the generic paths.
            FastPath::Yuv420 => {}
        }
    }

    let structured = by_components(descriptor, w, h).or_else(|| subsampled(descriptor, w, h));
    if let Some(spec) = structured {
        return Ok(spec.with_endianness(descriptor.endianness()));
    }

    let bits = descriptor.bits_per_pixel() as usize * w * h;
    if bits % 8 != 0 {
        return Err(unsupported(&format!("{bits} bits per frame is not a whole number of bytes")));
    }
    log::debug!("{name} at {width}x{height} has no structured layout; using an opaque buffer");
    Ok(FrameBufferSpec::opaque(bits / 8))
}

/// Every component occupies its own element, either interleaved or one
/// plane each, or all components pack into one wider element.
fn by_components(descriptor: &PixelFormatDescriptor, w: usize, h: usize) -> Option<FrameBufferSpec> {
    let components = descriptor.components();
    let bpp = descriptor.bits_per_pixel();

    if let Some(depths) = descriptor.bit_depths() {
        if descriptor.uniform_depth().is_none() {
            // Unequal depths (rgb565, bayer) only fit a packed element.
            let total: u32 = depths.iter().sum();
            if total != bpp || bpp < 8 {
                return None;
            }
            return Some(FrameBufferSpec::new(vec![h, w], ElementWidth::for_bits(bpp)?));
        }
    }
    let depth = match descriptor.uniform_depth() {
        Some(depth) => depth,
        None if bpp % components == 0 => bpp / components,
        None => return None,
    };
    if depth * components != bpp {
        return None;
    }
    let c = components as usize;
    if depth >= 8 {
        let width = ElementWidth::for_bits(depth)?;
        let shape = if descriptor.is_planar() { vec![c, h, w] } else { vec![h, w, c] };
        return Some(FrameBufferSpec::new(shape, width));
    }
    if components > 1 && bpp >= 8 {
        return Some(FrameBufferSpec::new(vec![h, w], ElementWidth::for_bits(bpp)?));
    }
    None
}

/// Chroma planes smaller than luma: the frame's total element count is
/// arranged as rows of `width`, preferring the 4:2:0 row count.
fn subsampled(descriptor: &PixelFormatDescriptor, w: usize, h: usize) -> Option<FrameBufferSpec> {
    let depth = descriptor.uniform_depth()?;
    if depth < 8 {
        return None;
    }
    let bits = descriptor.bits_per_pixel() as usize * w * h;
    if bits % depth as usize != 0 {
        return None;
    }
    let elements = bits / depth as usize;
    let element_width = ElementWidth::for_bits(depth)?;

    if h % 2 == 0 && elements == h * 3 / 2 * w {
        return Some(FrameBufferSpec::new(vec![h * 3 / 2, w], element_width));
    }
    (elements % w == 0).then(|| FrameBufferSpec::new(vec![elements / w, w], element_width))
}

/// Looks up the stream's pixel format and attaches its frame layout.
pub fn resolve_stream(
    stream: StreamId,
    video: &VideoStream,
    vocabulary: &dyn Vocabulary,
) -> Result<VideoStreamInfo, LayoutError> {
    let name = video
        .pixel_format
        .as_deref()
        .ok_or(LayoutError::MissingPixelFormat { stream })?;
    let descriptor = vocabulary
        .pixel_format(name)?
        .ok_or_else(|| LayoutError::UnknownPixelFormat { name: name.to_string() })?;
    let frame_spec = layout(&descriptor, video.width, video.height)?;
    log::debug!("stream #{stream} {name} {}x{}: {frame_spec}", video.width, video.height);

    Ok(VideoStreamInfo {
        stream,
        codec: video.codec.clone(),
        pixel_format: name.to_string(),
        width: video.width,
        height: video.height,
        frame_rate: video.frame_rate,
        frame_spec,
    })
}
