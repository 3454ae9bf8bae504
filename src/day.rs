//! Calendar days and the clock that decides what "today" is.
//!
//! Habits are tracked per local calendar day. A [`Day`] is a plain date with
//! no time or zone attached and always serializes as `YYYY-MM-DD`.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    /// Build a day from year/month/day components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| Error::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        // chrono accepts unpadded fields; stored days must round-trip exactly
        if trimmed.len() != 10 {
            return Err(Error::InvalidDate(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(trimmed.to_string()))
    }

    /// The calendar day before this one.
    pub fn pred(&self) -> Day {
        self.0.pred_opt().map(Day).unwrap_or(*self)
    }

    /// The calendar day after this one.
    pub fn succ(&self) -> Day {
        self.0.succ_opt().map(Day).unwrap_or(*self)
    }

    /// Shift by a signed number of days, saturating at the calendar bounds.
    pub fn offset(&self, days: i64) -> Day {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Day)
            .unwrap_or(*self)
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is later).
    pub fn days_since(&self, earlier: Day) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Day::parse(s)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Day(date)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Day::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> Day;
}

/// Reads the local calendar day from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Day(Local::now().date_naive())
    }
}

/// A clock pinned to one day. Used by tests and the `--today` override.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Day);

impl FixedClock {
    pub fn advance(&mut self, days: i64) {
        self.0 = self.0.offset(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Day {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Day {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let day = Day::parse("2024-02-29").unwrap();
        assert_eq!(day.to_string(), "2024-02-29");
    }

    #[test]
    fn parse_rejects_loose_formats() {
        assert!(matches!(Day::parse("2024-2-9"), Err(Error::InvalidDate(_))));
        assert!(matches!(Day::parse("2024-02-30"), Err(Error::InvalidDate(_))));
        assert!(matches!(Day::parse("yesterday"), Err(Error::InvalidDate(_))));
        assert!(matches!(
            Day::parse("2024-01-01T00:00:00Z"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn stepping_crosses_month_and_year_boundaries() {
        let new_year = Day::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(new_year.pred().to_string(), "2024-12-31");
        assert_eq!(new_year.pred().succ(), new_year);

        let leap = Day::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(leap.pred().to_string(), "2024-02-29");
        assert_eq!(leap.offset(-29).to_string(), "2024-02-01");
    }

    #[test]
    fn days_since_is_signed() {
        let a = Day::from_ymd(2024, 1, 1).unwrap();
        let b = Day::from_ymd(2024, 1, 11).unwrap();
        assert_eq!(b.days_since(a), 10);
        assert_eq!(a.days_since(b), -10);
    }

    #[test]
    fn serde_uses_plain_date_strings() {
        let day = Day::from_ymd(2024, 7, 4).unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let back: Day = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
        assert!(serde_json::from_str::<Day>("\"07/04/2024\"").is_err());
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock(Day::from_ymd(2024, 12, 31).unwrap());
        clock.advance(1);
        assert_eq!(clock.today().to_string(), "2025-01-01");
    }
}
