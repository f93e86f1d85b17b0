use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Backend for the `log` facade.
///
/// Lines go to stderr, except while the terminal UI owns the screen: then
/// they go to the log file if one was given and are dropped otherwise.
struct Logger {
    file: Mutex<Option<File>>,
    screen_taken: AtomicBool,
}

static LOGGER: Logger = Logger {
    file: Mutex::new(None),
    screen_taken: AtomicBool::new(false),
};

/// Map `-v` count and `--debug` to a level filter; warn by default.
pub fn level_for(verbose: u8, debug: bool) -> LevelFilter {
    if debug {
        return LevelFilter::Trace;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

pub fn init(level: LevelFilter, log_file: Option<&Path>) -> eyre::Result<()> {
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if let Ok(mut slot) = LOGGER.file.lock() {
            *slot = Some(file);
        }
    }
    // A second init (as in tests) keeps the first logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}

/// Tell the logger whether the terminal UI is drawing on the screen.
pub fn set_screen_taken(taken: bool) {
    LOGGER.screen_taken.store(taken, Ordering::Relaxed);
}

pub fn format_line(record: &Record) -> String {
    format!(
        "[{}] {}",
        record.level().as_str().to_ascii_lowercase(),
        record.args()
    )
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        if let Ok(mut slot) = self.file.lock() {
            if let Some(file) = slot.as_mut() {
                let _ = writeln!(file, "{line}");
                return;
            }
        }
        if !self.screen_taken.load(Ordering::Relaxed) {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut slot) = self.file.lock() {
            if let Some(file) = slot.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
