use std::io::Write;
use std::path::Path;

/// Receives per-key events while a directory is being written.
pub trait ProgressSink {
    fn directory_resolved(&mut self, _path: &Path) {}

    fn key_started(&mut self, _key: &str) {}

    fn key_written(&mut self, key: &str, bytes: usize);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn key_written(&mut self, _key: &str, _bytes: usize) {}
}

/// Prints `Creating <key>...Done` lines to a writer.
pub struct WriterProgress<W: Write> {
    out: W,
}

impl<W: Write> WriterProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Progress output is best effort; a closed stdout must not fail the dump.
impl<W: Write> ProgressSink for WriterProgress<W> {
    fn directory_resolved(&mut self, path: &Path) {
        let _ = writeln!(self.out, "Using directory {}", path.display());
    }

    fn key_started(&mut self, key: &str) {
        let _ = write!(self.out, "Creating {key}...");
        let _ = self.out.flush();
    }

    fn key_written(&mut self, _key: &str, _bytes: usize) {
        let _ = writeln!(self.out, "Done");
    }
}

/// Keeps every written key and its size, in write order.
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub written: Vec<(String, usize)>,
}

impl ProgressSink for RecordingProgress {
    fn key_written(&mut self, key: &str, bytes: usize) {
        self.written.push((key.to_string(), bytes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_progress_matches_dump_format() {
        let mut sink = WriterProgress::new(Vec::new());
        sink.directory_resolved(Path::new("out"));
        sink.key_started("username");
        sink.key_written("username", 5);
        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert_eq!(text, "Using directory out\nCreating username...Done\n");
    }
}
