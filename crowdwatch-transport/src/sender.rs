use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::TransportError;

/// Delivers serialized messages somewhere, one per line.
pub trait Sender: Send {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Pushes out anything buffered.
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Writes messages to standard output.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(data)?;
        out.write_all(b"\n")?;
        out.flush()?; // Consumers read line by line as the run progresses
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends messages to a file through a buffer.
pub struct FileSender {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSender {
    /// Opens `path` for writing, truncating an existing file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sender for FileSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Drops everything; counts what it was given.
#[derive(Debug, Default)]
pub struct NullSender {
    sent: u64,
}

impl NullSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        self.sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_sender_writes_lines_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.log");

        let mut sender = FileSender::create(&path).unwrap();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        sender.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        assert_eq!(sender.path(), path.as_path());
    }

    #[test]
    fn file_sender_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.log");
        fs::write(&path, "stale\nstale\n").unwrap();

        let mut sender = FileSender::create(&path).unwrap();
        sender.send(b"fresh").unwrap();
        sender.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn file_sender_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frames.log");
        assert!(matches!(FileSender::create(&path), Err(TransportError::IoError(_))));
    }

    #[test]
    fn null_sender_counts() {
        let mut sender = NullSender::new();
        sender.send(b"a").unwrap();
        sender.send(b"b").unwrap();
        sender.flush().unwrap();
        assert_eq!(sender.sent(), 2);
    }
}
