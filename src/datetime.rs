// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

use core::fmt;
use core::str::FromStr;

use crate::calendar::{days_in_month, weekday, Weekday};
use crate::error::Error;

/// Legal year range of the RTC's 12-bit year field.
pub const YEAR_MAX: i32 = 4095;

/// Calendar fields, in validation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }

    // Static bounds; Day's upper bound is refined per month.
    const fn bounds(self) -> (i32, i32) {
        match self {
            Field::Year => (0, YEAR_MAX),
            Field::Month => (1, 12),
            Field::Day => (1, 31),
            Field::Hour => (0, 23),
            Field::Minute | Field::Second => (0, 59),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check(field: Field, value: i32, min: i32, max: i32, month: Option<u8>) -> Result<(), Error> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            field,
            value,
            min,
            max,
            month,
        })
    }
}

/// Validate a date/time, stopping at the first bad field.
///
/// Fields are checked in the order year, month, day, hour, minute, second.
/// The legal range of `day` depends on `month` and, for February, on whether
/// `year` is a leap year.
pub fn validate(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
) -> Result<(), Error> {
    let (min, max) = Field::Year.bounds();
    check(Field::Year, year, min, max, None)?;

    let (min, max) = Field::Month.bounds();
    check(Field::Month, month, min, max, None)?;

    // month is 1..=12 here
    if let Some(last) = days_in_month(year, month) {
        check(Field::Day, day, 1, last as i32, Some(month as u8))?;
    }

    for (field, value) in [
        (Field::Hour, hour),
        (Field::Minute, minute),
        (Field::Second, second),
    ] {
        let (min, max) = field.bounds();
        check(field, value, min, max, None)?;
    }

    Ok(())
}

/// Parse the six calendar fields from text, then validate them.
///
/// Every field must be an integer before any range is looked at; the first
/// field that is not yields `Error::TypeMismatch`.
pub fn parse_fields(fields: [&str; 6]) -> Result<[i32; 6], Error> {
    let mut values = [0i32; 6];
    for ((value, text), field) in values.iter_mut().zip(fields).zip(Field::ALL) {
        *value = text
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::type_mismatch(field, text))?;
    }

    let [year, month, day, hour, minute, second] = values;
    validate(year, month, day, hour, minute, second)?;
    Ok(values)
}

/// A validated calendar date and time with its derived day of the week.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CalendarDateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    weekday: Weekday,
}

impl CalendarDateTime {
    /// Validate the fields and derive the weekday.
    pub fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<CalendarDateTime, Error> {
        validate(year, month, day, hour, minute, second)?;
        Ok(Self::assemble(
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday(year, month, day),
        ))
    }

    /// Build from values read back from the RTC. The weekday is taken as
    /// stored rather than recomputed.
    pub(crate) fn from_hardware(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        dotw: u8,
    ) -> Option<CalendarDateTime> {
        validate(year, month, day, hour, minute, second).ok()?;
        let weekday = Weekday::try_from(dotw).ok()?;
        Some(Self::assemble(
            year, month, day, hour, minute, second, weekday,
        ))
    }

    // Fields have been range checked, so the narrowing casts are lossless.
    fn assemble(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        weekday: Weekday,
    ) -> CalendarDateTime {
        CalendarDateTime {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            weekday,
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl fmt::Display for CalendarDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS`; a `T` may separate date and time.
impl FromStr for CalendarDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (date, time) = s
            .split_once(|c: char| c == ' ' || c == 'T')
            .unwrap_or((s, ""));

        // Missing pieces stay empty and fail the integer check.
        let mut fields = [""; 6];
        let mut date_parts = date.splitn(3, '-');
        let mut time_parts = time.splitn(3, ':');
        for (i, slot) in fields.iter_mut().enumerate() {
            let part = if i < 3 {
                date_parts.next()
            } else {
                time_parts.next()
            };
            *slot = part.unwrap_or("");
        }

        let [year, month, day, hour, minute, second] = parse_fields(fields)?;
        CalendarDateTime::new(year, month, day, hour, minute, second)
    }
}

#[cfg(feature = "chrono")]
impl From<CalendarDateTime> for chrono::NaiveDateTime {
    fn from(dt: CalendarDateTime) -> Self {
        // Every CalendarDateTime is a valid proleptic Gregorian date, so the
        // fallback is never taken.
        chrono::NaiveDate::from_ymd_opt(dt.year as i32, dt.month as u32, dt.day as u32)
            .and_then(|d| d.and_hms_opt(dt.hour as u32, dt.minute as u32, dt.second as u32))
            .unwrap_or(chrono::NaiveDateTime::MIN)
    }
}

#[cfg(feature = "chrono")]
impl TryFrom<chrono::NaiveDateTime> for CalendarDateTime {
    type Error = Error;

    fn try_from(dt: chrono::NaiveDateTime) -> Result<Self, Self::Error> {
        use chrono::{Datelike, Timelike};

        // Leap seconds show up as second 59 with nanoseconds past 1s.
        CalendarDateTime::new(
            dt.year(),
            dt.month() as i32,
            dt.day() as i32,
            dt.hour() as i32,
            dt.minute() as i32,
            dt.second() as i32,
        )
    }
}
