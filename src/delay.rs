// SPDX-License-Identifier: BSD-3-Clause
// Copyright (C) 2021 The RP2040 RTC Authors

use embedded_hal::delay::DelayNs;

const NSECS_PER_SEC: u64 = 1_000_000_000;

/// Busy-wait delay counted in core clock cycles.
pub struct BusyDelay {
    sys_clk_hz: u32,
}

impl BusyDelay {
    pub const fn new(sys_clk_hz: u32) -> BusyDelay {
        BusyDelay { sys_clk_hz }
    }

    // Rounded up so the wait is never shorter than asked for.
    fn cycles(&self, ns: u32) -> u32 {
        let cycles = (u64::from(ns) * u64::from(self.sys_clk_hz)).div_ceil(NSECS_PER_SEC);
        cycles.min(u64::from(u32::MAX)) as u32
    }
}

#[cfg(target_arch = "arm")]
#[inline]
fn spin(cycles: u32) {
    cortex_m::asm::delay(cycles);
}

// At least one cycle per iteration.
#[cfg(not(target_arch = "arm"))]
#[inline]
fn spin(cycles: u32) {
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        spin(self.cycles(ns));
    }
}

/// Poll `cond` every microsecond for up to `ms` milliseconds. Returns the
/// final value of `cond`.
pub fn wait_until<D, F>(delay: &mut D, ms: u32, mut cond: F) -> bool
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    let mut us = ms.saturating_mul(1000);
    while !cond() && us > 0 {
        delay.delay_us(1);
        us -= 1;
    }
    cond()
}

/// Poll while `cond` holds, for up to `ms` milliseconds. Returns the final
/// value of `cond`.
pub fn wait_while<D, F>(delay: &mut D, ms: u32, mut cond: F) -> bool
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    !wait_until(delay, ms, || !cond())
}
