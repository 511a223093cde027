//! A bounded, single-consumer logger for a running job.
//!
//! Each job owns one [`JobLogger`]. Action threads call [`JobLogger::log`]
//! and return immediately; a single dedicated thread drains the channel and
//! appends to the job's log file, so concurrent actions never contend on
//! the file handle.

use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::mpsc::{sync_channel, SyncSender},
    thread::{self, JoinHandle},
};

const CHANNEL_CAPACITY: usize = 64;

enum Message {
    Line(String),
    Shutdown,
}

/// Handle to a running log-consumer thread for a single job.
///
/// Cloning is not supported; share a `&JobLogger` (or wrap it in an `Arc`)
/// across the action threads that need to log to the same job.
pub struct JobLogger {
    sender: SyncSender<Message>,
    handle: Option<JoinHandle<()>>,
}

impl JobLogger {
    /// Spawn the consumer thread, appending every logged line to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if `path` cannot be opened for
    /// appending.
    pub fn new(path: PathBuf) -> Result<Self, crate::Error> {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let (sender, receiver) = sync_channel::<Message>(CHANNEL_CAPACITY);

        let handle = thread::spawn(move || {
            while let Ok(message) = receiver.recv() {
                match message {
                    Message::Line(line) => {
                        let _ = writeln!(file, "{line}");
                    }
                    Message::Shutdown => break,
                }
            }
        });

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Enqueue a line to be written to the log file. Blocks only if the
    /// channel is at capacity, never waits for the write itself to land on
    /// disk.
    pub fn log(&self, line: impl Into<String>) {
        // The consumer thread only exits on `Shutdown`, sent from `Drop`,
        // so a disconnected receiver here would mean the logger is already
        // being torn down; dropping the message is correct in that case.
        let _ = self.sender.send(Message::Line(line.into()));
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_logged_lines_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.log");

        {
            let logger = JobLogger::new(path.clone()).unwrap();
            logger.log("first");
            logger.log("second");
        } // Drop flushes and joins the consumer thread.

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
