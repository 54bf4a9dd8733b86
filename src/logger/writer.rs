//! File writer for the logger

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;

/// Shared handle to the log file. Every event locks the file for the
/// duration of one formatted line.
#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl LogFileWriter {
    /// Opens (or creates) the configured file, creating parent directories.
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if !config.enabled {
            return Err(LoggerError::config("file output is disabled"));
        }

        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::LogFormat;
    use tempfile::TempDir;

    fn file_config(path: std::path::PathBuf, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Full,
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/cadence.log");

        let mut writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.write_all(b"line\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "line\n");
    }

    #[test]
    fn test_append_mode_keeps_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cadence.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.write_all(b"new\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_truncate_mode_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cadence.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut writer = LogFileWriter::new(&file_config(path.clone(), false)).unwrap();
        writer.write_all(b"new\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "new\n");
    }

    #[test]
    fn test_disabled_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = file_config(dir.path().join("cadence.log"), true);
        config.enabled = false;

        assert!(matches!(
            LogFileWriter::new(&config),
            Err(LoggerError::Config { .. })
        ));
    }
}
