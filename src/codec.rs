// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! Packing of calendar values into the RTC's date and time words.
//!
//! The same layout is used by the staging registers (SETUP_0/SETUP_1) and the
//! live counters (RTC_1/RTC_0).

use tock_registers::{register_bitfields, LocalRegisterCopy};

use crate::datetime::CalendarDateTime;
use crate::error::Error;

register_bitfields![u32,
    DATE [
        YEAR OFFSET(12) NUMBITS(12) [],
        MONTH OFFSET(8) NUMBITS(4) [],
        DAY OFFSET(0) NUMBITS(5) []
    ],
    TIME [
        /// 0 is Sunday
        DOTW OFFSET(24) NUMBITS(3) [],
        HOUR OFFSET(16) NUMBITS(5) [],
        MIN OFFSET(8) NUMBITS(6) [],
        SEC OFFSET(0) NUMBITS(6) []
    ]
];

/// Raw contents of the date and time registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterPair {
    pub date: u32,
    pub time: u32,
}

/// Pack a date/time into register words. No validation is done here; every
/// `CalendarDateTime` already fits its fields.
pub fn encode(dt: &CalendarDateTime) -> RegisterPair {
    let mut date: LocalRegisterCopy<u32, DATE::Register> = LocalRegisterCopy::new(0);
    date.modify(
        DATE::YEAR.val(u32::from(dt.year()))
            + DATE::MONTH.val(u32::from(dt.month()))
            + DATE::DAY.val(u32::from(dt.day())),
    );

    let mut time: LocalRegisterCopy<u32, TIME::Register> = LocalRegisterCopy::new(0);
    time.modify(
        TIME::DOTW.val(u32::from(dt.weekday().number()))
            + TIME::HOUR.val(u32::from(dt.hour()))
            + TIME::MIN.val(u32::from(dt.minute()))
            + TIME::SEC.val(u32::from(dt.second())),
    );

    RegisterPair {
        date: date.get(),
        time: time.get(),
    }
}

/// Unpack register words. The weekday is the stored DOTW field.
///
/// Returns `Error::Corrupt` if the words do not hold a valid calendar value,
/// e.g. when the RTC was started without ever being set.
pub fn decode(pair: RegisterPair) -> Result<CalendarDateTime, Error> {
    let date: LocalRegisterCopy<u32, DATE::Register> = LocalRegisterCopy::new(pair.date);
    let time: LocalRegisterCopy<u32, TIME::Register> = LocalRegisterCopy::new(pair.time);

    CalendarDateTime::from_hardware(
        date.read(DATE::YEAR) as i32,
        date.read(DATE::MONTH) as i32,
        date.read(DATE::DAY) as i32,
        time.read(TIME::HOUR) as i32,
        time.read(TIME::MIN) as i32,
        time.read(TIME::SEC) as i32,
        time.read(TIME::DOTW) as u8,
    )
    .ok_or(Error::Corrupt(pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Weekday;

    #[test]
    fn test_encode_bit_layout() {
        let dt = CalendarDateTime::new(2020, 2, 29, 23, 59, 58).unwrap();
        let pair = encode(&dt);

        assert_eq!(pair.date, (2020 << 12) | (2 << 8) | 29);
        assert_eq!(pair.time, (6 << 24) | (23 << 16) | (59 << 8) | 58);
    }

    #[test]
    fn test_encode_extremes() {
        let dt = CalendarDateTime::new(4095, 12, 31, 23, 59, 59).unwrap();
        let pair = encode(&dt);
        assert_eq!(pair.date, 0x00ff_fc1f);
        assert_eq!(pair.date & !0x00ff_ff1f, 0);
        assert_eq!(pair.time & !0x071f_3f3f, 0);

        let dt = CalendarDateTime::new(0, 1, 1, 0, 0, 0).unwrap();
        let pair = encode(&dt);
        assert_eq!(pair.date, (1 << 8) | 1);
        assert_eq!(pair.time >> 24, u32::from(dt.weekday().number()));
    }

    #[test]
    fn test_decode_reads_stored_weekday() {
        // 2021-06-04 is a Friday, but the register says Tuesday.
        let pair = RegisterPair {
            date: (2021 << 12) | (6 << 8) | 4,
            time: (2 << 24) | (7 << 16) | (30 << 8) | 15,
        };
        let dt = decode(pair).unwrap();
        assert_eq!(dt.year(), 2021);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 4);
        assert_eq!(dt.hour(), 7);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 15);
        assert_eq!(dt.weekday(), Weekday::Tuesday);
    }

    #[test]
    fn test_decode_ignores_reserved_bits() {
        let dt = CalendarDateTime::new(1999, 12, 31, 23, 59, 59).unwrap();
        let pair = encode(&dt);
        let noisy = RegisterPair {
            date: pair.date | 0xff00_00e0,
            time: pair.time | 0xf8e0_c0c0,
        };
        assert_eq!(decode(noisy), Ok(dt));
    }

    #[test]
    fn test_decode_rejects_invalid_contents() {
        let zero = RegisterPair { date: 0, time: 0 };
        assert_eq!(decode(zero), Err(Error::Corrupt(zero)));

        let bad_dotw = RegisterPair {
            date: (2021 << 12) | (6 << 8) | 4,
            time: 7 << 24,
        };
        assert_eq!(decode(bad_dotw), Err(Error::Corrupt(bad_dotw)));

        let feb_30 = RegisterPair {
            date: (2020 << 12) | (2 << 8) | 30,
            time: 0,
        };
        assert_eq!(decode(feb_30), Err(Error::Corrupt(feb_30)));
    }

    #[test]
    fn test_round_trip_across_years() {
        for year in (0..4096).step_by(97) {
            for month in 1..=12 {
                let last = crate::calendar::days_in_month(year, month).unwrap() as i32;
                let dt = CalendarDateTime::new(year, month, last, 23, 59, 59).unwrap();
                assert_eq!(decode(encode(&dt)), Ok(dt));
            }
        }
    }
}
