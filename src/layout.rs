// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! RP2040 RTC register map.

pub mod map {
    pub mod rtc {
        pub const START: u64 = 0x4005_c000;
        // Covers the atomic set/clear aliases as well as the block itself.
        pub const SIZE: u64 = 0x4000;
    }
}

/// Register offsets from the start of the RTC block.
pub mod offset {
    /// Divider minus one for the 1 second counter
    pub const CLKDIV_M1: u64 = 0x00;
    /// Staged date word
    pub const SETUP_0: u64 = 0x04;
    /// Staged time and day-of-week word
    pub const SETUP_1: u64 = 0x08;
    /// Control and status
    pub const CTRL: u64 = 0x0c;
    /// Live date word
    pub const RTC_1: u64 = 0x18;
    /// Live time and day-of-week word. Read this before RTC_1.
    pub const RTC_0: u64 = 0x1c;

    /// Writes through this alias set the written bits.
    pub const ATOMIC_SET: u64 = 0x2000;
    /// Writes through this alias clear the written bits.
    pub const ATOMIC_CLEAR: u64 = 0x3000;
}

pub const CLKDIV_M1_MASK: u32 = 0xffff;

bitflags::bitflags! {
    /// CTRL register bits used by the driver.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Ctrl: u32 {
        const RTC_ENABLE = 1 << 0;
        const RTC_ACTIVE = 1 << 1;
        /// Transfer SETUP_0/SETUP_1 into the running counters. Self clearing.
        const LOAD = 1 << 4;
    }
}
