//! Process-wide logger setup for rawpick binaries.
//!
//! Lines look like `2026-10-19T08:00:00Z - INFO - Copied: IMG_0001.CR2` and go
//! to a log file, optionally mirrored to stderr. `RUST_LOG` overrides the level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Default log file, relative to the working directory.
pub const C_LOG_FILE_DEFAULT: &str = "file_copy.log";

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct SpecLogOptions {
    /// Append log lines here. `None` logs to stderr only.
    pub path_file_log: Option<PathBuf>,
    /// Minimum level when `RUST_LOG` is unset.
    pub level: LevelFilter,
    /// Also write every line to stderr when a file is configured.
    pub if_mirror_stderr: bool,
}

impl Default for SpecLogOptions {
    fn default() -> Self {
        Self {
            path_file_log: Some(PathBuf::from(C_LOG_FILE_DEFAULT)),
            level: LevelFilter::Info,
            if_mirror_stderr: false,
        }
    }
}

/// Writes every buffer to the log file and to stderr.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

fn open_log_file(path_file_log: &Path) -> io::Result<File> {
    if let Some(parent) = path_file_log.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path_file_log)
}

fn resolve_target(spec_log_options: &SpecLogOptions) -> Target {
    let Some(path_file_log) = &spec_log_options.path_file_log else {
        return Target::Stderr;
    };
    // Unwritable log location (read-only cwd, permissions): keep stderr.
    match open_log_file(path_file_log) {
        Ok(file) if spec_log_options.if_mirror_stderr => {
            Target::Pipe(Box::new(TeeWriter { file }))
        }
        Ok(file) => Target::Pipe(Box::new(file)),
        Err(e) => {
            eprintln!(
                "Failed to open log file {} ({e}); logging to stderr.",
                path_file_log.display()
            );
            Target::Stderr
        }
    }
}

/// Install the global logger. Returns `false` if one was already installed.
pub fn init_logger(spec_log_options: &SpecLogOptions) -> bool {
    Builder::new()
        .filter_level(spec_log_options.level)
        .parse_default_env()
        .target(resolve_target(spec_log_options))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{SpecLogOptions, init_logger, open_log_file};

    #[test]
    fn open_log_file_creates_parent_and_appends() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file_log = tmp.path().join("logs/nested/copy.log");

        {
            use std::io::Write;
            let mut file = open_log_file(&path_file_log).expect("open");
            writeln!(file, "first").expect("write");
        }
        {
            use std::io::Write;
            let mut file = open_log_file(&path_file_log).expect("reopen");
            writeln!(file, "second").expect("write");
        }

        let txt = std::fs::read_to_string(&path_file_log).expect("read");
        assert_eq!(txt, "first\nsecond\n");
    }

    #[test]
    fn init_logger_writes_formatted_lines_once() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file_log = tmp.path().join("copy.log");
        let spec_log_options = SpecLogOptions {
            path_file_log: Some(path_file_log.clone()),
            level: LevelFilter::Info,
            if_mirror_stderr: false,
        };

        assert!(init_logger(&spec_log_options));
        assert!(!init_logger(&spec_log_options));

        log::info!("Copied: IMG_0001.CR2");
        log::logger().flush();

        let txt = std::fs::read_to_string(&path_file_log).expect("read");
        assert!(
            txt.lines()
                .any(|line| line.ends_with(" - INFO - Copied: IMG_0001.CR2")),
            "unexpected log content: {txt:?}"
        );
    }
}
