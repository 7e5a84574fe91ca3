// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! Driver for the RP2040 on-chip real-time clock.
//!
//! The peripheral keeps a calendar in two packed 32-bit registers. This crate
//! validates calendar values before they reach hardware, computes the day of
//! the week itself, and performs the staged write/load sequence under a
//! caller-supplied critical section.

#![cfg_attr(not(test), no_std)]

pub mod calendar;
pub mod codec;
pub mod datetime;
pub mod delay;
pub mod error;
pub mod layout;
#[cfg(feature = "log-serial")]
pub mod logger;
pub mod mem;
pub mod rtc;
pub mod sync;

pub use calendar::{days_in_month, is_leap_year, weekday, Weekday};
pub use codec::RegisterPair;
pub use datetime::{validate, CalendarDateTime, Field};
pub use error::Error;
pub use mem::{MemoryRegion, RegisterAccess};
pub use rtc::RtcDriver;
pub use sync::{CriticalSection, InterruptFree};
