//! Captured tool output shared by the unit tests.

use crate::vocabulary::infrastructure::static_vocabulary::StaticVocabulary;

pub const PIX_FMTS_LISTING: &str = "\
Pixel formats:
I.... = Supported Input  format for conversion
.O... = Supported Output format for conversion
..H.. = Hardware accelerated format
...P. = Paletted format
....B = Bitstream format
FLAGS NAME            NB_COMPONENTS BITS_PER_PIXEL BIT_DEPTHS
-----
IO... yuv420p                3             12      8-8-8
IO... yuyv422                3             16      8-8-8
IO... rgb24                  3             24      8-8-8
IO... bgr24                  3             24      8-8-8
IO... yuv422p                3             16      8-8-8
IO... yuv444p                3             24      8-8-8
IO... yuv410p                3              9      8-8-8
IO... gray                   1              8      8
IO..B monow                  1              1      1
IO.P. pal8                   1              8      8
IO... yuvj420p               3             12      8-8-8
IO... uyvy422                3             16      8-8-8
IO... nv12                   3             12      8-8-8
IO... nv21                   3             12      8-8-8
IO... argb                   4             32      8-8-8-8
IO... rgba                   4             32      8-8-8-8
IO... abgr                   4             32      8-8-8-8
IO... bgra                   4             32      8-8-8-8
IO... gray16le               1             16      16
IO... gray16be               1             16      16
IO... rgb565le               3             16      5-6-5
IO... rgb48le                3             48      16-16-16
IO... yuv420p10le            3             15      10-10-10
IO... yuv422p10le            3             20      10-10-10
IO... yuv444p16le            3             48      16-16-16
IO... gbrp                   3             24      8-8-8
IO... gbrp10le               3             30      10-10-10
IO... bgr0                   3             24      8-8-8
IO... yuva444p               4             32      8-8-8-8
IO... gbrap                  4             32      8-8-8-8
..H.. vaapi                  0              0      0
IO... p010le                 3             15      10-10-10
";

/// Older builds print no BIT_DEPTHS column.
pub const LEGACY_PIX_FMTS_LISTING: &str = "\
Pixel formats:
I.... = Supported Input  format for conversion
.O... = Supported Output format for conversion
..H.. = Hardware accelerated format
...P. = Paletted format
....B = Bitstream format
FLAGS NAME            NB_COMPONENTS BITS_PER_PIXEL
-----
IO... yuv420p                3            12
IO... bgr24                  3            24
IO... gray16le               1            16
IO... rgb565le               3            16
IO... yuv420p10le            3            15
IO... p010le                 3            15
IO... nv12                   3            12
IO... bgr0                   3            24
I.... bayer_rggb16le         3            16
IO... monow                  1             1
";

pub const CODECS_LISTING: &str = "\
Codecs:
 D..... = Decoding supported
 .E.... = Encoding supported
 ..V... = Video codec
 ..A... = Audio codec
 ..S... = Subtitle codec
 ..D... = Data codec
 ..T... = Attachment codec
 ...I.. = Intra frame-only codec
 ....L. = Lossy compression
 .....S = Lossless compression
 -------
 DEV.LS h264                 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (decoders: h264 h264_v4l2m2m ) (encoders: libx264 libx264rgb h264_vaapi )
 DEV.L. hevc                 H.265 / HEVC (High Efficiency Video Coding) (encoders: libx265 hevc_vaapi )
 DEVIL. mjpeg                Motion JPEG
 DEV.L. mpeg4                MPEG-4 part 2 (encoders: mpeg4 libxvid )
 DEVI.S rawvideo             raw video
 DEV.L. vp9                  Google VP9 (decoders: vp9 libvpx-vp9 ) (encoders: libvpx-vp9 )
 .EV..S wrapped_avframe      AVFrame to AVPacket passthrough
 DEA.L. aac                  AAC (Advanced Audio Coding) (decoders: aac aac_fixed )
 DEA.L. mp3                  MP3 (MPEG audio layer 3) (decoders: mp3float mp3 ) (encoders: libmp3lame )
 DEA.L. opus                 Opus (Opus Interactive Audio Codec) (decoders: opus libopus ) (encoders: opus libopus )
 DEA.L. vorbis               Vorbis (decoders: vorbis libvorbis ) (encoders: vorbis libvorbis )
 DES... ass                  ASS (Advanced SSA) subtitle (decoders: ssa ass ) (encoders: ssa ass )
";

pub fn vocabulary() -> StaticVocabulary {
    StaticVocabulary::from_text(CODECS_LISTING, PIX_FMTS_LISTING)
        .expect("fixture listings parse")
}

// --- Transcripts ---

pub const SIMPLE_PIPE: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 1280x540, 15 fps, 15 tbr
Output #0, rawvideo, to 'pipe:':
  Stream #0:0: Video: rawvideo, bgr24, 1280x540, 15 fps
Stream mapping:
  Stream #0:0 -> #0:0 (h264 -> rawvideo)
";

pub const METADATA_PIPE: &str = "\
Input #0, matroska,webm, from '/home/andy/Videos/asdf.mkv':
  Metadata:
    COMPATIBLE_BRANDS: isomiso2avc1mp41
    MAJOR_BRAND     : isom
    MINOR_VERSION   : 512
    ENCODER         : Lavf56.40.101
  Duration: 00:00:58.20, start: 0.000000, bitrate: 969 kb/s
    Stream #0:0(eng): Video: h264 (High), yuv420p, 1280x540 [SAR 1:1 DAR 64:27], 15 fps, 15 tbr, 1k tbn, 30 tbc (default)
    Metadata:
      LANGUAGE        : eng
      HANDLER_NAME    : VideoHandler
      ENCODER         : Lavc56.60.100 libx264
      DURATION        : 00:00:58.200000000
Output #0, rawvideo, to 'pipe:':
  Metadata:
    COMPATIBLE_BRANDS: isomiso2avc1mp41
    MAJOR_BRAND     : isom
    MINOR_VERSION   : 512
    encoder         : Lavf56.40.101
    Stream #0:0(eng): Video: rawvideo (BGR[24] / 0x18524742), bgr24, 1280x540 [SAR 1:1 DAR 64:27], q=2-31, 200 kb/s, 15 fps, 15 tbn, 15 tbc (default)
    Metadata:
      LANGUAGE        : eng
      HANDLER_NAME    : VideoHandler
      DURATION        : 00:00:58.200000000
      encoder         : Lavc56.60.100 rawvideo
Stream mapping:
  Stream #0:0 -> #0:0 (h264 (native) -> rawvideo (native))
";

/// The mapping arrives before the output block, after an overwrite prompt.
pub const PROMPT_BEFORE_OUTPUT: &str = "\
Input #0, matroska,webm, from '2020-11-08 11-10-12.mkv':
  Metadata:
    ENCODER         : Lavf58.29.100
  Duration: 00:00:06.30, start: 0.000000, bitrate: 2620 kb/s
    Stream #0:0: Video: h264 (High), yuv420p(progressive), 452x800, 30 fps, 30 tbr, 1k tbn, 60 tbc (default)
    Metadata:
      DURATION        : 00:00:06.300000000
    Stream #0:1: Audio: aac (LC), 44100 Hz, stereo, fltp (default)
    Metadata:
      title           : simple_aac
      DURATION        : 00:00:06.200000000
File 'nul' already exists. Overwrite? [y/N] y
Stream mapping:
  Stream #0:0 -> #0:0 (h264 (native) -> rawvideo (native))
Press [q] to stop, [?] for help
Output #0, rawvideo, to 'nul':
  Metadata:
    encoder         : Lavf58.44.100
    Stream #0:0: Video: rawvideo (BGR[24] / 0x18524742), bgr24, 452x800, q=2-31, 260352 kb/s, 30 fps, 30 tbn, 30 tbc (default)
    Metadata:
      DURATION        : 00:00:06.300000000
      encoder         : Lavc58.90.100 rawvideo
frame=  189 fps=0.0 q=-0.0 Lsize=  200222kB time=00:00:06.30 bitrate=260352.0kbits/s dup=1 drop=0 speed=33.6x
video:200222kB audio:0kB subtitle:0kB other streams:0kB global headers:0kB muxing overhead: 0.000000%
";

/// The overwrite prompt as written to stderr: no newline, so the output
/// header follows on the same line.
pub const INLINE_PROMPT: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 1280x540, 15 fps, 15 tbr
File 'pipe:' already exists. Overwrite? [y/N] Output #0, rawvideo, to 'pipe:':
  Stream #0:0: Video: rawvideo, bgr24, 1280x540, 15 fps
Stream mapping:
  Stream #0:0 -> #0:0 (h264 -> rawvideo)
";

/// The prompt refused because stdin is closed; the tool exits before
/// printing any output block.
pub const REFUSED_PROMPT: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 1280x540, 15 fps, 15 tbr
File 'out.mkv' already exists. Overwrite? [y/N] Not overwriting - exiting
";

pub const TWO_INPUTS_TWO_OUTPUTS: &str = "\
Input #0, matroska,webm, from 'hipsway.mkv':
  Metadata:
    ENCODER         : Lavf58.29.100
  Duration: 00:00:24.03, start: 0.000000, bitrate: 2626 kb/s
    Stream #0:0: Video: h264 (High), yuv420p(progressive), 500x850, 30 fps, 30 tbr, 1k tbn, 60 tbc (default)
    Metadata:
      DURATION        : 00:00:24.033000000
    Stream #0:1: Audio: aac (LC), 44100 Hz, stereo, fltp (default)
    Metadata:
      title           : simple_aac
      DURATION        : 00:00:23.917000000
Input #1, matroska,webm, from 'keyboard.mkv':
  Metadata:
    ENCODER         : Lavf58.29.100
  Duration: 00:00:25.83, start: 0.000000, bitrate: 2650 kb/s
    Stream #1:0: Video: h264 (High), yuv420p(progressive), 848x480, 30 fps, 30 tbr, 1k tbn, 60 tbc (default)
    Metadata:
      DURATION        : 00:00:25.833000000
    Stream #1:1: Audio: aac (LC), 44100 Hz, stereo, fltp (default)
    Metadata:
      title           : simple_aac
      DURATION        : 00:00:25.728000000
Stream mapping:
  Stream #0:0 -> #0:0 (h264 (native) -> h264 (libx264))
  Stream #1:1 -> #0:1 (aac (native) -> vorbis (libvorbis))
  Stream #0:1 -> #1:0 (aac (native) -> vorbis (libvorbis))
  Stream #1:0 -> #1:1 (h264 (native) -> h264 (libx264))
Press [q] to stop, [?] for help
[libx264 @ 000001e99d0950c0] using cpu capabilities: MMX2 SSE2Fast SSSE3 SSE4.2 AVX FMA3 BMI2 AVX2
[libx264 @ 000001e99d0950c0] profile High, level 3.1, 4:2:0, 8-bit
Output #0, matroska, to 'o1.mkv':
  Metadata:
    encoder         : Lavf58.44.100
    Stream #0:0: Video: h264 (libx264) (H264 / 0x34363248), yuv420p(progressive), 500x850, q=-1--1, 30 fps, 1k tbn, 30 tbc (default)
    Metadata:
      DURATION        : 00:00:24.033000000
      encoder         : Lavc58.90.100 libx264
    Side data:
      cpb: bitrate max/min/avg: 0/0/0 buffer size: 0 vbv_delay: N/A
    Stream #0:1: Audio: vorbis (libvorbis) (oV[0][0] / 0x566F), 44100 Hz, stereo, fltp (default)
    Metadata:
      title           : simple_aac
      DURATION        : 00:00:25.728000000
      encoder         : Lavc58.90.100 libvorbis
[libx264 @ 000001e99d09a080] using cpu capabilities: MMX2 SSE2Fast SSSE3 SSE4.2 AVX FMA3 BMI2 AVX2
[libx264 @ 000001e99d09a080] profile High, level 3.1, 4:2:0, 8-bit
Output #1, matroska, to 'o2.mkv':
  Metadata:
    encoder         : Lavf58.44.100
    Stream #1:0: Audio: vorbis (libvorbis) (oV[0][0] / 0x566F), 44100 Hz, stereo, fltp (default)
    Metadata:
      title           : simple_aac
      DURATION        : 00:00:23.917000000
      encoder         : Lavc58.90.100 libvorbis
    Stream #1:1: Video: h264 (libx264) (H264 / 0x34363248), yuv420p, 848x480, q=-1--1, 30 fps, 1k tbn, 30 tbc (default)
    Metadata:
      DURATION        : 00:00:25.833000000
      encoder         : Lavc58.90.100 libx264
    Side data:
      cpb: bitrate max/min/avg: 0/0/0 buffer size: 0 vbv_delay: N/A
";

/// CRLF line endings, a version banner, and progress lines rewritten with
/// a bare carriage return directly in front of the output header.
pub const CRLF_WITH_PROGRESS: &str = concat!(
    "ffmpeg version git-2020-06-04-7f81785 Copyright (c) 2000-2020 the FFmpeg developers\r\n",
    "  built with gcc 9.3.1 (GCC) 20200523\r\n",
    "  configuration: --enable-gpl --enable-version3 --enable-libx264\r\n",
    "  libavutil      56. 49.100 / 56. 49.100\r\n",
    "  libavcodec     58. 90.100 / 58. 90.100\r\n",
    "  libavformat    58. 44.100 / 58. 44.100\r\n",
    "Input #0, matroska,webm, from 'out.mkv':\r\n",
    "  Metadata:\r\n",
    "    ENCODER         : Lavf58.44.100\r\n",
    "  Duration: 00:00:05.00, start: 0.000000, bitrate: 4 kb/s\r\n",
    "    Stream #0:0: Video: h264 (High 4:4:4 Predictive), yuv444p(progressive), 500x500, 2 fps, 2 tbr, 1k tbn, 4 tbc (default)\r\n",
    "    Metadata:\r\n",
    "      ENCODER         : Lavc58.90.100 libx264\r\n",
    "      DURATION        : 00:00:05.000000000\r\n",
    "Stream mapping:\r\n",
    "  Stream #0:0 -> #0:0 (h264 (native) -> rawvideo (native))\r\n",
    "Press [q] to stop, [?] for help\r\n",
    "frame=    0 fps=0.0 q=0.0 size=       0kB time=-577014:32:22.77 bitrate=  -0.0kbits/s speed=N/A    \r",
    "frame=    0 fps=0.0 q=0.0 size=       0kB time=-577014:32:22.77 bitrate=  -0.0kbits/s speed=N/A    \r",
    "Output #0, rawvideo, to 'pipe:':\r\n",
    "  Metadata:\r\n",
    "    encoder         : Lavf58.44.100\r\n",
    "    Stream #0:0: Video: rawvideo (BGR[24] / 0x18524742), bgr24, 500x500, q=2-31, 12000 kb/s, 2 fps, 2 tbn, 2 tbc (default)\r\n",
    "    Metadata:\r\n",
    "      DURATION        : 00:00:05.000000000\r\n",
    "      encoder         : Lavc58.90.100 rawvideo\r\n",
);

pub const TWO_PIPE_VIDEOS: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 1280x540, 15 fps
  Stream #0:1: Video: h264, yuv420p, 640x270, 15 fps
Output #0, rawvideo, to 'pipe:':
  Stream #0:0: Video: rawvideo, bgr24, 1280x540, 15 fps
Output #1, rawvideo, to 'pipe:':
  Stream #1:0: Video: rawvideo, gray, 640x270, 15 fps
Stream mapping:
  Stream #0:0 -> #0:0 (h264 -> rawvideo)
  Stream #0:1 -> #1:0 (h264 -> rawvideo)
";

/// Motion JPEG muxed onto stdout: a pipe video stream, but not raw frames.
pub const MJPEG_PIPE: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 64x48, 15 fps, 15 tbr
Output #0, mpjpeg, to 'pipe:':
  Stream #0:0: Video: mjpeg, yuvj420p, 64x48, q=2-31, 200 kb/s, 15 fps
Stream mapping:
  Stream #0:0 -> #0:0 (h264 -> mjpeg)
";

/// Everything but the mapping block.
pub const MISSING_MAPPING: &str = "\
Input #0, matroska,webm, from 'a.mkv':
  Stream #0:0: Video: h264, yuv420p, 1280x540, 15 fps, 15 tbr
Output #0, rawvideo, to 'pipe:':
  Stream #0:0: Video: rawvideo, bgr24, 1280x540, 15 fps
";

/// Trailing encode progress, repeated without bound in termination tests.
pub const PROGRESS_LINE: &str =
    "frame=  120 fps= 60 q=-0.0 size=  466560kB time=00:00:08.00 bitrate=477757.4kbits/s speed=4.01x";
