use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::shared::constants::{STDOUT_CHANNEL_CAPACITY, STDOUT_CHUNK_BYTES};

type Chunk = io::Result<Vec<u8>>;

/// Moves the child's stdout onto a background thread.
///
/// ffmpeg may write frames before it has finished printing the stream
/// header. Until [`StdoutPump::start_streaming`] is called, chunks go to
/// an unbounded spill channel, so the tool never blocks on stdout while
/// stderr is being parsed. After that they go through a bounded channel
/// that applies backpressure. The reading side empties the spill first;
/// spilled chunks never wait on the pump thread.
pub(crate) struct StdoutPump {
    spill: Option<Receiver<Chunk>>,
    chunks: Receiver<Chunk>,
    streaming: Arc<AtomicBool>,
    current: Vec<u8>,
    offset: usize,
    done: bool,
}

impl StdoutPump {
    pub(crate) fn spawn<R: Read + Send + 'static>(reader: R) -> Self {
        let (spill_tx, spill_rx) = crossbeam_channel::unbounded();
        let (tx, rx) = crossbeam_channel::bounded(STDOUT_CHANNEL_CAPACITY);
        let streaming = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&streaming);
        std::thread::spawn(move || pump(reader, spill_tx, tx, flag));
        Self {
            spill: Some(spill_rx),
            chunks: rx,
            streaming,
            current: Vec::new(),
            offset: 0,
            done: false,
        }
    }

    pub(crate) fn start_streaming(&self) {
        self.streaming.store(true, Ordering::Release);
    }

    fn next_chunk(&mut self) -> Option<Chunk> {
        if let Some(spill) = &self.spill {
            // Disconnects once the pump has switched channels or stopped.
            if let Ok(chunk) = spill.recv() {
                return Some(chunk);
            }
            self.spill = None;
        }
        self.chunks.recv().ok()
    }
}

fn pump<R: Read>(mut reader: R, spill: Sender<Chunk>, tx: Sender<Chunk>, streaming: Arc<AtomicBool>) {
    let mut spill = Some(spill);
    let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
    loop {
        let chunk = match reader.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => Ok(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => Err(e),
        };
        let failed = chunk.is_err();
        if streaming.load(Ordering::Acquire) {
            spill = None;
        }
        let sent = match &spill {
            Some(spill) => spill.send(chunk).is_ok(),
            None => tx.send(chunk).is_ok(),
        };
        if failed || !sent {
            return;
        }
    }
}

impl Read for StdoutPump {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.offset == self.current.len() {
            if self.done {
                return Ok(0);
            }
            match self.next_chunk() {
                Some(Ok(chunk)) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Err(e);
                }
                // The pump hung up: end of stream.
                None => self.done = true,
            }
        }
        let n = buf.len().min(self.current.len() - self.offset);
        buf[..n].copy_from_slice(&self.current[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}
