// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

use core::fmt;

use crate::codec::RegisterPair;
use crate::datetime::Field;

/// Longest piece of rejected input kept in a `TypeMismatch`.
pub const FOUND_CAPACITY: usize = 16;

/// RTC driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A calendar field was supplied as something other than an integer.
    TypeMismatch {
        field: Field,
        found: heapless::String<FOUND_CAPACITY>,
    },
    /// A calendar field lies outside its legal bounds. `month` is set for
    /// `day` errors, whose bounds depend on it.
    OutOfRange {
        field: Field,
        value: i32,
        min: i32,
        max: i32,
        month: Option<u8>,
    },
    /// The RTC_ACTIVE bit is clear.
    NotRunning,
    /// RTC_ACTIVE did not clear after the clock was disabled.
    StillRunning,
    /// The live registers hold values that are not a calendar date.
    Corrupt(RegisterPair),
    /// `start` was given a clk_rtc frequency the divider cannot express.
    InvalidClock(u32),
}

impl Error {
    pub(crate) fn type_mismatch(field: Field, text: &str) -> Error {
        let mut found = heapless::String::new();
        for c in text.chars() {
            if found.push(c).is_err() {
                break;
            }
        }
        Error::TypeMismatch { field, found }
    }

    /// The calendar field this error is about, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::TypeMismatch { field, .. } | Error::OutOfRange { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { field, found } => write!(
                f,
                "parameter '{}' received {:?}, expected an integer",
                field, found
            ),
            Error::OutOfRange {
                field,
                value,
                min,
                max,
                month,
            } => {
                write!(
                    f,
                    "parameter '{}' received value of {}, must be an integer from {} to {} inclusive",
                    field, value, min, max
                )?;
                if let Some(month) = month {
                    write!(f, " for month {}", month)?;
                }
                Ok(())
            }
            Error::NotRunning => f.write_str("RTC is not running"),
            Error::StillRunning => f.write_str("RTC did not stop after being disabled"),
            Error::Corrupt(pair) => write!(
                f,
                "RTC registers hold an invalid date/time (date {:#010x}, time {:#010x})",
                pair.date, pair.time
            ),
            Error::InvalidClock(hz) => write!(
                f,
                "clk_rtc frequency of {} Hz cannot be divided down to 1 Hz",
                hz
            ),
        }
    }
}
