// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! `log` backend that writes records to a serial console.

use core::cell::RefCell;
use core::fmt::{self, Write};

use critical_section::Mutex;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Where log records end up, typically a UART.
pub type Sink = &'static mut (dyn Write + Send);

static SINK: Mutex<RefCell<Option<Sink>>> = Mutex::new(RefCell::new(None));
static LOGGER: SerialLogger = SerialLogger;

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        critical_section::with(|cs| {
            // A record raised by the sink itself is dropped.
            if let Ok(mut sink) = SINK.borrow(cs).try_borrow_mut() {
                if let Some(sink) = sink.as_mut() {
                    let _ = writeln!(sink, "[{}] {}", record.level(), record.args());
                }
            }
        });
    }

    fn flush(&self) {}
}

#[cfg(target_has_atomic = "ptr")]
fn install(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

// thumbv6m has no compare-and-swap, so only the racy setters exist there.
#[cfg(not(target_has_atomic = "ptr"))]
fn install(level: LevelFilter) -> Result<(), SetLoggerError> {
    critical_section::with(|_| unsafe {
        log::set_logger_racy(&LOGGER)?;
        log::set_max_level_racy(level);
        Ok(())
    })
}

/// Install the serial logger. Can only succeed once.
pub fn init(sink: Sink, level: LevelFilter) -> Result<(), SetLoggerError> {
    critical_section::with(|cs| {
        let mut slot = SINK.borrow_ref_mut(cs);
        if slot.is_none() {
            *slot = Some(sink);
        }
    });
    install(level)
}

/// `fmt::Write` adapter over a byte-at-a-time transmitter.
pub struct ByteSink<F: FnMut(u8)> {
    send: F,
}

impl<F: FnMut(u8)> ByteSink<F> {
    pub const fn new(send: F) -> Self {
        ByteSink { send }
    }
}

impl<F: FnMut(u8)> Write for ByteSink<F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // Serial terminals expect CRLF
            if byte == b'\n' {
                (self.send)(b'\r');
            }
            (self.send)(byte);
        }
        Ok(())
    }
}
