//! Publication dates.
//!
//! Posts only ever need UTC calendar dates with an optional time of day, so
//! this is a plain struct instead of a timezone library.
//!
//! Accepted inputs:
//!
//! - `2024-06-15`
//! - `2024-06-15T14:30:45Z`, optionally with fractional seconds
//! - `Jun 15 2024` or `Jun 15, 2024`

use anyhow::{Result, bail};
use serde::{Serialize, Serializer};
use std::fmt;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Indexed from Sunday.
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A UTC timestamp with second precision.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse a publication date. Returns `None` for unknown formats and for
    /// dates that do not exist on the calendar.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let parsed = Self::parse_iso(input).or_else(|| Self::parse_month_day_year(input))?;
        parsed.validate().is_ok().then_some(parsed)
    }

    fn parse_iso(input: &str) -> Option<Self> {
        let (date, time) = match input.split_once('T') {
            Some((date, time)) => (date, Some(time.strip_suffix('Z')?)),
            None => (input, None),
        };

        let [year, month, day] = digit_fields(date, '-', [4, 2, 2])?;
        let [hour, minute, second] = match time {
            None => [0; 3],
            Some(time) => {
                // Sub-second precision is dropped
                let clock = match time.split_once('.') {
                    Some((clock, fraction)) => {
                        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                            return None;
                        }
                        clock
                    }
                    None => time,
                };
                digit_fields(clock, ':', [2, 2, 2])?
            }
        };

        Some(Self::new(
            year,
            narrow(month)?,
            narrow(day)?,
            narrow(hour)?,
            narrow(minute)?,
            narrow(second)?,
        ))
    }

    fn parse_month_day_year(input: &str) -> Option<Self> {
        let [month, day, year] = {
            let mut words = input.split_whitespace();
            let fields = [words.next()?, words.next()?, words.next()?];
            if words.next().is_some() {
                return None;
            }
            fields
        };

        let month = MONTHS.iter().zip(1u8..).find_map(|(name, number)| {
            name.eq_ignore_ascii_case(month).then_some(number)
        })?;
        let day = day.strip_suffix(',').unwrap_or(day).parse().ok()?;
        let year = year.parse().ok()?;
        Some(Self::from_ymd(year, month, day))
    }

    /// Check that the date exists and the time of day is in range.
    pub fn validate(self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            bail!("month {} is out of range", self.month);
        }
        let last_day = days_in_month(self.year, self.month);
        if !(1..=last_day).contains(&self.day) {
            bail!(
                "day {} is out of range for {:04}-{:02}",
                self.day,
                self.year,
                self.month
            );
        }
        if self.hour > 23 || self.minute > 59 || self.second > 59 {
            bail!(
                "time {:02}:{:02}:{:02} is out of range",
                self.hour,
                self.minute,
                self.second
            );
        }
        Ok(())
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// The RSS `<pubDate>` form, e.g. `Sun, 01 Jan 2023 00:00:00 GMT`.
    pub fn to_rfc2822(self) -> String {
        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[self.weekday()],
            self.day,
            MONTHS[usize::from(self.month.clamp(1, 12) - 1)],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Day of the week, 0 = Sunday (Sakamoto's method).
    fn weekday(self) -> usize {
        const OFFSETS: [usize; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let year = usize::from(self.year).saturating_sub(usize::from(self.month < 3));
        let offset = OFFSETS[usize::from(self.month.clamp(1, 12) - 1)];
        (year + year / 4 - year / 100 + year / 400 + offset + usize::from(self.day)) % 7
    }

    fn is_midnight(self) -> bool {
        (self.hour, self.minute, self.second) == (0, 0, 0)
    }
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        1..=12 => 31,
        _ => 0,
    }
}

/// Split `input` on `sep` into exactly `N` all-digit fields of the given widths.
fn digit_fields<const N: usize>(input: &str, sep: char, widths: [usize; N]) -> Option<[u16; N]> {
    let mut parts = input.split(sep);
    let mut fields = [0u16; N];
    for (field, width) in fields.iter_mut().zip(widths) {
        let part = parts.next()?;
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *field = part.parse().ok()?;
    }
    parts.next().is_none().then_some(fields)
}

fn narrow(value: u16) -> Option<u8> {
    u8::try_from(value).ok()
}

/// Midnight prints as a bare `YYYY-MM-DD`.
impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_midnight() {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        } else {
            f.write_str(&self.to_rfc3339())
        }
    }
}

impl Serialize for DateTimeUtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
