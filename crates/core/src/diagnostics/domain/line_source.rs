use std::io::{self, BufRead};

/// Level tags ffmpeg prepends under `-loglevel level+<lvl>`.
const LEVEL_TAGS: &[&str] = &[
    "[info] ",
    "[verbose] ",
    "[warning] ",
    "[error] ",
    "[fatal] ",
    "[panic] ",
    "[debug] ",
    "[trace] ",
];

/// Ends an interactive prompt. ffmpeg prints no newline after it, so the
/// next diagnostic text would otherwise run into the prompt.
const PROMPT_END: &str = "[y/N] ";

/// Splits a diagnostic byte stream into lines.
///
/// Both `\r` and `\n` terminate a line. Progress output rewrites itself
/// with bare `\r`, so treating it as a terminator keeps an `Output #`
/// header that follows a progress line on its own line. Runs of
/// terminators (including `\r\n`) never produce empty lines. A `[y/N] `
/// prompt also ends a line.
pub struct DiagnosticLines<R> {
    reader: R,
    queued: Option<String>,
    done: bool,
}

impl<R: BufRead> DiagnosticLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            queued: None,
            done: false,
        }
    }

    fn read_segment(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut segment = Vec::new();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                self.done = true;
                return Ok((!segment.is_empty()).then_some(segment));
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    segment.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    if !segment.is_empty() {
                        return Ok(Some(segment));
                    }
                }
                None => {
                    let len = available.len();
                    segment.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for DiagnosticLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.queued.take() {
            return Some(Ok(line));
        }
        if self.done {
            return None;
        }
        match self.read_segment() {
            Ok(Some(bytes)) => {
                let line = strip_level_tag(&String::from_utf8_lossy(&bytes));
                Some(Ok(self.split_prompt(line)))
            }
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R> DiagnosticLines<R> {
    /// Returns the prompt part of `line` and queues whatever followed it.
    fn split_prompt(&mut self, mut line: String) -> String {
        let Some(pos) = line.find(PROMPT_END) else {
            return line;
        };
        let end = pos + PROMPT_END.len();
        let rest = &line[end..];
        if !rest.trim().is_empty() {
            self.queued = Some(strip_level_tag(rest));
            line.truncate(end - 1);
        }
        line
    }
}

fn strip_level_tag(line: &str) -> String {
    LEVEL_TAGS
        .iter()
        .find_map(|tag| line.strip_prefix(tag))
        .unwrap_or(line)
        .to_string()
}

/// Line iterator with stack-ordered pushback.
///
/// Pushed lines are returned before anything else, last pushed first.
pub struct PushbackLines<I> {
    pending: Vec<String>,
    inner: I,
}

impl<I> PushbackLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            pending: Vec::new(),
            inner,
        }
    }

    pub fn push(&mut self, line: String) {
        self.pending.push(line);
    }

    /// `Ok(None)` is the normal end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        self.next().transpose()
    }

    /// Pending pushed lines, in the order they would have been returned,
    /// and the untouched underlying iterator.
    pub fn into_parts(self) -> (Vec<String>, I) {
        let mut pending = self.pending;
        pending.reverse();
        (pending, self.inner)
    }
}

impl<R: BufRead> PushbackLines<DiagnosticLines<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(DiagnosticLines::new(reader))
    }
}

impl<I> Iterator for PushbackLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pending.pop() {
            Some(line) => Some(Ok(line)),
            None => self.inner.next(),
        }
    }
}
