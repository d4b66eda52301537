use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::writer::MakeWriter;

/// Writes log lines to stdout and, when configured, to a log file.
#[derive(Clone)]
pub(crate) struct LogWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    pub(crate) fn new(path: Option<&PathBuf>) -> io::Result<Self> {
        let file = match path {
            Some(path) => Some(Arc::new(Mutex::new(File::create(path)?))),
            None => None,
        };
        Ok(Self { file })
    }
}

pub(crate) struct LogWriterGuard {
    file: Option<Arc<Mutex<File>>>,
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriterGuard {
            file: self.file.clone(),
        }
    }
}

fn poisoned<T>(_: T) -> io::Error {
    io::Error::other("log file lock poisoned")
}

impl Write for LogWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &self.file {
            file.lock().map_err(poisoned)?.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &self.file {
            file.lock().map_err(poisoned)?.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_are_copied_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("school-db.log");
        let writer = LogWriter::new(Some(&path)).unwrap();

        let mut guard = writer.make_writer();
        guard.write_all(b"fixtures loaded\n").unwrap();
        guard.flush().unwrap();
        writer.make_writer().write_all(b"walkthrough finished\n").unwrap();

        let logged = std::fs::read_to_string(&path).unwrap();
        assert_eq!(logged, "fixtures loaded\nwalkthrough finished\n");
    }

    #[test]
    fn console_only_writer_accepts_lines() {
        let writer = LogWriter::new(None).unwrap();
        let mut guard = writer.make_writer();
        assert_eq!(guard.write(b"config: {}\n").unwrap(), 11);
    }
}
