use crate::shared::constants;
use lazy_static::lazy_static;
use std::any::Any;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Clone)]
struct LoggerPaths {
    error_path: PathBuf,
    debug_path: PathBuf,
}

lazy_static! {
    static ref LOGGER: Mutex<Option<LoggerPaths>> = Mutex::new(None);
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

fn start_file(path: &Path, title: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        let _ = writeln!(file, "=== {} Started: {} ===", title, chrono::Local::now());
    }
}

/// Starts fresh error/debug logs in the working directory and installs the panic hook.
pub fn init() {
    let dir = std::env::current_dir().unwrap_or_default();
    init_in(&dir);
}

/// Like [`init`], with the log files placed in `dir`.
pub fn init_in(dir: &Path) {
    let error_path = dir.join(constants::ERROR_LOG_FILE);
    let debug_path = dir.join(constants::DEBUG_LOG_FILE);

    start_file(&error_path, "Error Log");
    start_file(&debug_path, "Debug Log");

    let paths = LoggerPaths {
        error_path,
        debug_path,
    };
    *LOGGER.lock().unwrap_or_else(|p| p.into_inner()) = Some(paths.clone());

    panic::set_hook(Box::new(move |info| {
        let report = format!(
            "\nPANIC at {}: {}\nBacktrace:\n{:?}\n",
            info.location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string()),
            panic_message(info.payload()),
            Backtrace::capture()
        );
        append_line(&paths.error_path, &report);
        append_line(&paths.debug_path, &report);

        // The full-screen preview may have left raw mode on.
        let _ = crossterm::terminal::disable_raw_mode();
        eprintln!(
            "{} crashed. See {} for details.",
            constants::APP_NAME,
            paths.error_path.display()
        );
    }));
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

/// Appends a timestamped line. A no-op until [`init`] has run.
pub fn log(level: Level, msg: &str) {
    let guard = LOGGER.lock().unwrap_or_else(|p| p.into_inner());
    let Some(paths) = guard.as_ref() else {
        return;
    };

    let line = format!(
        "[{}][{}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        level.tag(),
        msg
    );
    append_line(&paths.debug_path, &line);
    if level == Level::Error {
        append_line(&paths.error_path, &line);
    }
}

pub fn info(msg: &str) {
    log(Level::Info, msg);
}

pub fn error(msg: &str) {
    log(Level::Error, msg);
}

pub fn debug(msg: &str) {
    log(Level::Debug, msg);
}
