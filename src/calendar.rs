// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! Gregorian calendar rules used by the driver: leap years, month lengths and
//! the day of the week.

use core::fmt;

// Day of each month that falls on the year's doomsday, for a common year.
const DOOMSDAYS: [i32; 12] = [3, 28, 14, 4, 9, 6, 11, 8, 5, 10, 7, 12];

/// Returns `true` if `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, or `None` if `month` is not 1..=12.
pub fn days_in_month(year: i32, month: i32) -> Option<u8> {
    match month {
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        1..=12 => Some(31),
        _ => None,
    }
}

/// Day of the week for a date, computed with the doomsday algorithm.
///
/// `month` and `day` must already be valid for `year`; the result is
/// meaningless otherwise.
pub fn weekday(year: i32, month: i32, day: i32) -> Weekday {
    let mut doomsdays = DOOMSDAYS;
    if is_leap_year(year) {
        doomsdays[0] = 4;
        doomsdays[1] = 29;
    }

    // Widened so any i32 input stays in range.
    let y = i64::from(year);
    let anchor = 2 + y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    let index = (month.clamp(1, 12) - 1) as usize;
    let n = (i64::from(day) - i64::from(doomsdays[index]) + anchor).rem_euclid(7);

    Weekday::from_number(n as u8)
}

/// Day of the week as stored in the RTC's DOTW field.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    // n is reduced mod 7 by every caller
    fn from_number(n: u8) -> Weekday {
        Self::ALL[(n % 7) as usize]
    }

    /// 0 for Sunday through 6 for Saturday.
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = u8;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if n < 7 {
            Ok(Self::from_number(n))
        } else {
            Err(n)
        }
    }
}

impl From<Weekday> for u8 {
    fn from(w: Weekday) -> u8 {
        w.number()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
