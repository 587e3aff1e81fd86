use chrono::{DateTime, Local};
use log::{LevelFilter, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log files past this size are renamed aside before logging starts
pub const LOG_ROTATE_SIZE: u64 = 2_000_000;

enum Sink {
    Stderr,
    File(File),
}

/// Timestamped log lines on stderr or appended to a file
pub struct CliLogger {
    level: LevelFilter,
    sink: Mutex<Sink>,
}

impl CliLogger {
    pub fn stderr(level: LevelFilter) -> Self {
        Self {
            level,
            sink: Mutex::new(Sink::Stderr),
        }
    }

    /// Append to `path`, first moving it aside if it has grown past
    /// `rotate_size` bytes. Falls back to stderr if the file can't be opened.
    pub fn file(path: &Path, level: LevelFilter, rotate_size: u64) -> Self {
        if let Err(e) = rotate(path, rotate_size, Local::now()) {
            eprintln!("could not rotate {}: {e}", path.display());
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                level,
                sink: Mutex::new(Sink::File(file)),
            },
            Err(e) => {
                eprintln!("could not open log file {}: {e}", path.display());
                Self::stderr(level)
            }
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

/// `logs/pdfbook.log` -> `logs/pdfbook-2024-03-01+12-30-00.log`
pub fn rotated_name(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}-{}.log", now.format("%Y-%m-%d+%H-%M-%S")))
}

/// Rename `path` aside if it is larger than `rotate_size`; returns the new
/// name when it was moved
pub fn rotate(path: &Path, rotate_size: u64, now: DateTime<Local>) -> io::Result<Option<PathBuf>> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if size <= rotate_size {
        return Ok(None);
    }

    let old = rotated_name(path, now);
    let mut f = OpenOptions::new().append(true).open(path)?;
    writeln!(f, "CLOSING LOG at size {size}, renaming to {}", old.display())?;
    drop(f);
    fs::rename(path, &old)?;
    Ok(Some(old))
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {:<5} {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        );
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        // Nowhere left to report a failed log write
        let _ = match &mut *sink {
            Sink::Stderr => io::stderr().write_all(line.as_bytes()),
            Sink::File(file) => file.write_all(line.as_bytes()),
        };
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = match &mut *sink {
                Sink::Stderr => io::stderr().flush(),
                Sink::File(file) => file.flush(),
            };
        }
    }
}

/// `-v` count to level: warnings by default, then info, then debug
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rotated_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(
            rotated_name(Path::new("/var/log/pdfbook.log"), now),
            PathBuf::from("/var/log/pdfbook-2024-03-01+12-30-05.log")
        );
    }

    #[test]
    fn test_small_log_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("pdfbook.log");
        fs::write(&log, "short\n").unwrap();
        assert_eq!(rotate(&log, 100, Local::now()).unwrap(), None);
        assert!(log.exists());
        assert_eq!(rotate(&dir.path().join("missing.log"), 100, Local::now()).unwrap(), None);
    }

    #[test]
    fn test_large_log_is_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("pdfbook.log");
        fs::write(&log, "x".repeat(200)).unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();

        let old = rotate(&log, 100, now).unwrap().unwrap();
        assert!(!log.exists());
        assert_eq!(old, dir.path().join("pdfbook-2024-03-01+12-30-05.log"));
        let text = fs::read_to_string(&old).unwrap();
        assert!(text.starts_with(&"x".repeat(200)));
        assert!(text.ends_with(&format!("renaming to {}\n", old.display())));
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
