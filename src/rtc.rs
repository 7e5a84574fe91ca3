// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::codec::{self, RegisterPair};
use crate::datetime::CalendarDateTime;
use crate::delay::{wait_until, wait_while};
use crate::error::Error;
use crate::layout::{offset, Ctrl, CLKDIV_M1_MASK};
use crate::mem::RegisterAccess;
use crate::sync::CriticalSection;

const USECS_PER_SEC: u32 = 1_000_000;
// Register writes reach the counters after 2 clk_rtc periods plus the
// clk_sys crossing.
const SETTLE_TICKS: u32 = 3;
const START_TIMEOUT_MS: u32 = 10;

/// Driver for the RP2040 RTC.
///
/// The register block is a single piece of hardware: construct one driver at
/// startup and share it by reference. Every method takes `&self`; concurrent
/// `set_clock` calls are serialized by `L`.
pub struct RtcDriver<R, L> {
    regs: R,
    lock: L,
}

impl<R: RegisterAccess, L: CriticalSection> RtcDriver<R, L> {
    pub const fn new(regs: R, lock: L) -> Self {
        RtcDriver { regs, lock }
    }

    pub fn free(self) -> (R, L) {
        (self.regs, self.lock)
    }

    fn ctrl(&self) -> Ctrl {
        Ctrl::from_bits_retain(self.regs.read32(offset::CTRL))
    }

    pub fn is_running(&self) -> bool {
        self.ctrl().contains(Ctrl::RTC_ACTIVE)
    }

    /// Length of one clk_rtc period in microseconds.
    pub fn tick_period_us(&self) -> u32 {
        let divider = (self.regs.read32(offset::CLKDIV_M1) & CLKDIV_M1_MASK) + 1;
        USECS_PER_SEC / divider
    }

    /// Read the current date and time.
    pub fn read_clock(&self) -> Result<CalendarDateTime, Error> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }

        // RTC_0 must be read before RTC_1.
        let time = self.regs.read32(offset::RTC_0);
        let date = self.regs.read32(offset::RTC_1);

        codec::decode(RegisterPair { date, time }).map_err(|e| {
            warn!("RTC: {}", e);
            e
        })
    }

    /// Set the date and time. The weekday is computed from the date.
    ///
    /// Blocks for three RTC clock periods after the write so that a following
    /// `read_clock` sees the new value.
    #[allow(clippy::too_many_arguments)]
    pub fn set_clock<D: DelayNs>(
        &self,
        delay: &mut D,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<(), Error> {
        if !self.is_running() {
            warn!("RTC: not running, ignoring set_clock");
            return Err(Error::NotRunning);
        }

        let dt = CalendarDateTime::new(year, month, day, hour, minute, second)?;
        self.write(delay, &dt);
        Ok(())
    }

    /// Set the date and time from an already validated value.
    pub fn set_datetime<D: DelayNs>(
        &self,
        delay: &mut D,
        dt: &CalendarDateTime,
    ) -> Result<(), Error> {
        if !self.is_running() {
            warn!("RTC: not running, ignoring set_datetime");
            return Err(Error::NotRunning);
        }

        self.write(delay, dt);
        Ok(())
    }

    fn write<D: DelayNs>(&self, delay: &mut D, dt: &CalendarDateTime) {
        let tick_us = self.tick_period_us();
        let pair = codec::encode(dt);

        let token = self.lock.enter();
        self.regs.write32(offset::SETUP_0, pair.date);
        self.regs.write32(offset::SETUP_1, pair.time);
        self.regs
            .write32(offset::ATOMIC_SET + offset::CTRL, Ctrl::LOAD.bits());
        self.lock.exit(token);

        delay.delay_us(SETTLE_TICKS * tick_us);
        debug!("RTC: set to {} ({})", dt, dt.weekday());
    }

    /// Program the divider for a clk_rtc of `clk_rtc_hz` and start the clock.
    ///
    /// The divider may only change while the RTC is stopped, so a running
    /// clock is stopped first, and nothing is written if it will not stop. The counters keep whatever they held; follow
    /// with `set_clock`.
    pub fn start<D: DelayNs>(&self, delay: &mut D, clk_rtc_hz: u32) -> Result<(), Error> {
        if clk_rtc_hz == 0 || clk_rtc_hz - 1 > CLKDIV_M1_MASK {
            return Err(Error::InvalidClock(clk_rtc_hz));
        }

        if self.is_running() {
            self.stop(delay)?;
        }

        self.regs.write32(offset::CLKDIV_M1, clk_rtc_hz - 1);
        self.regs
            .write32(offset::ATOMIC_SET + offset::CTRL, Ctrl::RTC_ENABLE.bits());

        if !wait_until(delay, START_TIMEOUT_MS, || self.is_running()) {
            warn!("RTC: RTC_ACTIVE did not come up");
            return Err(Error::NotRunning);
        }

        debug!("RTC: started with clk_rtc {} Hz", clk_rtc_hz);
        Ok(())
    }

    /// Stop the clock and wait for RTC_ACTIVE to drop.
    ///
    /// Returns `Error::StillRunning` if it has not dropped within 10ms.
    pub fn stop<D: DelayNs>(&self, delay: &mut D) -> Result<(), Error> {
        self.regs
            .write32(offset::ATOMIC_CLEAR + offset::CTRL, Ctrl::RTC_ENABLE.bits());

        if wait_while(delay, START_TIMEOUT_MS, || self.is_running()) {
            warn!("RTC: RTC_ACTIVE did not drop");
            return Err(Error::StillRunning);
        }
        Ok(())
    }
}
