use std::io::Write;

use super::block_segmenter::Block;

/// Observer for every block the protocol driver consumes.
///
/// Called before the block is classified, in the order blocks are read.
/// Implementations must not fail the parse.
pub trait BlockEcho: Send {
    fn echo(&mut self, block: &Block);
}

/// Discards every block.
pub struct NullBlockEcho;

impl BlockEcho for NullBlockEcho {
    fn echo(&mut self, _block: &Block) {}
}

/// Forwards blocks to the `log` facade at debug level.
pub struct LogBlockEcho;

impl BlockEcho for LogBlockEcho {
    fn echo(&mut self, block: &Block) {
        for line in block.lines() {
            log::debug!("{line}");
        }
    }
}

/// Writes blocks verbatim, one line per line, to any writer.
///
/// Write errors are ignored.
pub struct WriterBlockEcho<W> {
    writer: W,
}

impl<W: Write + Send> WriterBlockEcho<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterBlockEcho<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> BlockEcho for WriterBlockEcho<W> {
    fn echo(&mut self, block: &Block) {
        for line in block.lines() {
            let _ = writeln!(self.writer, "{line}");
        }
        let _ = self.writer.flush();
    }
}
