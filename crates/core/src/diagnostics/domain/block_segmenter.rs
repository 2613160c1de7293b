use std::io;

use super::line_source::PushbackLines;

/// A header line and the indented lines directly under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    fn new(header: String) -> Self {
        Self {
            lines: vec![header],
        }
    }

    pub fn header(&self) -> &str {
        &self.lines[0]
    }

    pub fn body(&self) -> &[String] {
        &self.lines[1..]
    }

    /// Header first, then the body.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}

/// Pulls the next block off `source`.
///
/// The header is whatever line comes next. The first non-indented line
/// after it is pushed back and ends the block. `Ok(None)` once the
/// source is exhausted.
pub fn next_block<I>(source: &mut PushbackLines<I>) -> io::Result<Option<Block>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let Some(header) = source.next_line()? else {
        return Ok(None);
    };
    let mut block = Block::new(header);
    while let Some(line) = source.next_line()? {
        if !is_indented(&line) {
            source.push(line);
            break;
        }
        block.lines.push(line);
    }
    Ok(Some(block))
}

/// Iterator over the blocks of a line source.
pub struct Blocks<'a, I> {
    source: &'a mut PushbackLines<I>,
}

impl<'a, I> Blocks<'a, I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(source: &'a mut PushbackLines<I>) -> Self {
        Self { source }
    }
}

impl<I> Iterator for Blocks<'_, I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        next_block(self.source).transpose()
    }
}
