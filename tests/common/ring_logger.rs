use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::Mutex;

// This is merely a limit to keep the log from being too crowded.
const RING_BUFFER_SIZE: usize = 60;

lazy_static::lazy_static! {
    static ref LOG_BUFFER: Mutex<VecDeque<String>> = Mutex::new(VecDeque::with_capacity(RING_BUFFER_SIZE));
}

struct RingLogger;

impl log::Log for RingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut buffer = LOG_BUFFER.lock().unwrap();
            if buffer.len() >= RING_BUFFER_SIZE {
                buffer.pop_front();
            }
            buffer.push_back(format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

/// Installs the ring logger. Only the first call in a test binary succeeds.
pub fn init_logger() -> Result<(), SetLoggerError> {
    log::set_logger(&RingLogger).map(|()| log::set_max_level(LevelFilter::Trace))
}

pub fn clear_log() {
    LOG_BUFFER.lock().unwrap().clear();
}

pub fn captured_lines() -> Vec<String> {
    LOG_BUFFER.lock().unwrap().iter().cloned().collect()
}

/// Prints the buffer, newest line last, for post-mortem on a failing test.
pub fn dump_log() {
    let buffer = LOG_BUFFER.lock().unwrap();
    if buffer.is_empty() {
        println!("Log buffer is empty.");
        return;
    }

    let len = buffer.len() as i32;
    println!("--- LAST {} LOG LINES ---", len);
    for (i, line) in buffer.iter().enumerate() {
        println!("{:>3}. {}", i as i32 - len + 1, line);
    }
}
