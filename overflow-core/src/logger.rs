//! Logging utilities.
//!
//! A page has no terminal to print to, so records are kept in a global queue
//! that the host can drain, for instance to forward them to the browser
//! console.

use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Saves all log records in a global deque.
pub struct OverflowLogger;

static LOGGER: OverflowLogger = OverflowLogger;

/// Maximum number of records kept before the oldest ones are dropped.
pub const DEFAULT_CAPACITY: usize = 1_000;

/// A log record.
pub struct Record {
    /// Log level used for this record
    pub level: log::Level,
    /// Time this message was logged
    pub time: time::OffsetDateTime,
    /// Message content
    pub message: String,
}

struct Queue {
    records: VecDeque<Record>,
    capacity: usize,
}

lazy_static! {
    static ref LOGS: Mutex<Queue> = Mutex::new(Queue {
        records: VecDeque::new(),
        capacity: DEFAULT_CAPACITY,
    });
}

/// Log a record in overflow's log queue.
pub fn log(record: &log::Record<'_>) {
    let mut logs = match LOGS.lock() {
        Ok(logs) => logs,
        Err(poisoned) => poisoned.into_inner(),
    };
    if logs.capacity == 0 {
        return;
    }
    while logs.records.len() >= logs.capacity {
        logs.records.pop_front();
    }
    logs.records.push_back(Record {
        level: record.level(),
        message: format!("{}", record.args()),
        time: time::OffsetDateTime::now_utc(),
    });
}

impl log::Log for OverflowLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        log(record);
    }

    fn flush(&self) {}
}

/// Initialize the Overflow logger.
///
/// Make sure this is the only logger your are using.
///
/// Returns an error if another logger was already installed.
pub fn init() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Changes how many records are kept.
pub fn set_capacity(capacity: usize) {
    let mut logs = match LOGS.lock() {
        Ok(logs) => logs,
        Err(poisoned) => poisoned.into_inner(),
    };
    logs.capacity = capacity;
    while logs.records.len() > capacity {
        logs.records.pop_front();
    }
}

/// Removes and returns every record, oldest first.
pub fn drain() -> Vec<Record> {
    let mut logs = match LOGS.lock() {
        Ok(logs) => logs,
        Err(poisoned) => poisoned.into_inner(),
    };
    logs.records.drain(..).collect()
}

/// Formats a record as `HH:MM:SS LEVEL message`.
pub fn format(record: &Record) -> String {
    let format = time::macros::format_description!("[hour]:[minute]:[second]");
    let time = record.time.format(format).unwrap_or_default();
    format!("{} {:<5} {}", time, record.level, record.message)
}
