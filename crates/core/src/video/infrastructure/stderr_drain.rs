use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Keeps reading the tool's stderr after the header so it never blocks,
/// remembering the last few lines for error reports.
pub(crate) struct StderrDrain {
    tail: Arc<Mutex<VecDeque<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl StderrDrain {
    /// `pending` are lines already read but not consumed; they come first.
    pub(crate) fn spawn<I>(pending: Vec<String>, rest: I, keep: usize, echo: bool) -> Self
    where
        I: Iterator<Item = io::Result<String>> + Send + 'static,
    {
        let keep = keep.max(1);
        let tail = Arc::new(Mutex::new(VecDeque::with_capacity(keep)));
        let shared = Arc::clone(&tail);
        let handle = std::thread::spawn(move || {
            let lines = pending.into_iter().map(Ok).chain(rest);
            for line in lines {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("stderr drain stopped: {e}");
                        break;
                    }
                };
                if echo {
                    eprintln!("{line}");
                } else {
                    log::trace!("{line}");
                }
                let mut tail = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if tail.len() == keep {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        });
        Self {
            tail,
            handle: Some(handle),
        }
    }

    /// Waits for stderr to close and returns the retained lines.
    pub(crate) fn finish(mut self) -> Vec<String> {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("stderr drain thread panicked");
            }
        }
        let tail = self.tail.lock().unwrap_or_else(PoisonError::into_inner);
        tail.iter().cloned().collect()
    }
}
