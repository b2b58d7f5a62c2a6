use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

use crate::get_create_sab_contents_dir;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and every less verbose one:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages, e.g. missing image or audio assets
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages, including ignored duplicate tags
///
/// The level is read from the `LOG_LEVEL` environment variable and can be
/// changed at runtime with `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    /// Map a `-v` count onto a level, never below the Info default.
    ///
    /// `-v` keeps Info, `-vv` and above enable Debug.
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 | 1 => Level::Info,
            _ => Level::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

/// Rotates the log file, keeping only the last 5 old logs.
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !log_file.try_exists().unwrap_or(false) {
        return Ok(());
    }

    let modified = std::fs::metadata(log_file)?.modified()?;
    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    std::fs::rename(log_file, parent.join(format!("log.{}.txt", timestamp)))?;

    let mut old_logs: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("log.") && n.ends_with(".txt") && n != "log.txt")
        })
        .collect();

    // Timestamped names sort chronologically.
    old_logs.sort();

    if old_logs.len() > 5 {
        for file in &old_logs[0..old_logs.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

pub struct Logger {
    log_file: PathBuf,
    disable_log: bool,
    enable_print_log: AtomicBool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        let disable_log = env_flag("DISABLE_LOG");
        let enable_print_log = env_flag("ENABLE_PRINT_LOG");

        if disable_log {
            return Ok(Logger::detached(level, enable_print_log));
        }

        let data_dir = get_create_sab_contents_dir()
            .map_err(|e| format!("Failed to get app data dir: {}", e))?;
        let log_file = data_dir.join("log.txt");

        if let Err(e) = rotate_log_files(&log_file) {
            eprintln!("Failed to rotate log files: {}", e);
        }

        Ok(Logger {
            log_file,
            disable_log,
            enable_print_log: AtomicBool::new(enable_print_log),
            level: Arc::new(Mutex::new(level)),
        })
    }

    /// A logger that never touches the file system.
    fn detached(level: Level, enable_print_log: bool) -> Self {
        Logger {
            log_file: PathBuf::new(),
            disable_log: true,
            enable_print_log: AtomicBool::new(enable_print_log),
            level: Arc::new(Mutex::new(level)),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.disable_log {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        file.write_all(format!("[{}] {}\n", timestamp, message).as_bytes())?;

        Ok(())
    }

    fn enabled(&self, at: Level) -> bool {
        self.get_level() >= at
    }

    fn emit(&self, at: Level, msg: &str) {
        if !self.enabled(at) {
            return;
        }

        if self.print_log_enabled() {
            match at {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        let formatted = format!("{}: {}", at.as_str().to_uppercase(), msg);
        if let Err(e) = self.write_to_file(&formatted) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn debug(&self, msg: &str) {
        self.emit(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }

    pub fn print_log_enabled(&self) -> bool {
        self.enable_print_log.load(Ordering::Relaxed)
    }

    pub fn set_print_log(&self, enable: bool) {
        self.enable_print_log.store(enable, Ordering::Relaxed);
    }

    /// Current level, Info if the lock is poisoned.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    let logger = LOGGER.get_or_init(|| {
        let logger = match Logger::new() {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Failed to create logger: {}", e);
                Logger::detached(Level::Info, false)
            }
        };

        if logger.print_log_enabled() {
            ensure_tracing();
        }

        logger
    });

    f(logger)
}

fn ensure_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

/// Mirror log messages to stderr through tracing.
pub fn enable_print_log() {
    with_logger(|logger| logger.set_print_log(true));
    ensure_tracing();
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.info(msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

/// Set the log level. Setting a level enables it and every less verbose one.
pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Set the log level from a string. Returns false if the string is not a level.
pub fn set_log_level_str(level_str: &str) -> bool {
    match Level::from_str(level_str) {
        Some(level) => {
            set_log_level(level);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("WARN"), Some(Level::Warn));
        assert_eq!(Level::from_str(" debug "), Some(Level::Debug));
        assert_eq!(Level::from_str("loud"), None);
    }

    #[test]
    fn test_level_from_verbosity_never_quieter_than_default() {
        assert_eq!(Level::from_verbosity(0), Level::Info);
        assert_eq!(Level::from_verbosity(1), Level::Info);
        assert_eq!(Level::from_verbosity(2), Level::Debug);
        assert_eq!(Level::from_verbosity(9), Level::Debug);
        for v in 1..=4 {
            assert!(Level::from_verbosity(v) >= Level::Warn, "-v x{} hides warnings", v);
        }
    }

    #[test]
    fn test_print_log_can_be_enabled_at_runtime() {
        let logger = Logger::detached(Level::Info, false);
        assert!(!logger.print_log_enabled());
        logger.set_print_log(true);
        assert!(logger.print_log_enabled());
    }

    #[test]
    fn test_detached_logger_filters_by_level() {
        let logger = Logger::detached(Level::Warn, false);
        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Warn));
        assert!(!logger.enabled(Level::Info));
        logger.set_level(Level::Silent);
        assert!(!logger.enabled(Level::Error));
    }

    #[test]
    fn test_rotate_keeps_last_five() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..7 {
            std::fs::write(dir.path().join(format!("log.2020-01-0{}T00-00-00.txt", i + 1)), "x").unwrap();
        }
        let log_file = dir.path().join("log.txt");
        std::fs::write(&log_file, "current").unwrap();

        rotate_log_files(&log_file).unwrap();

        assert!(!log_file.exists());
        let count = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 5);
    }
}
