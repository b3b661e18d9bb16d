use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{days_in_month, first_weekday};
use crate::{
    DATE_SEPARATOR, DAYS_PER_WEEK, Day, MAX_MONTH, MIN_DAY, MONTH_SHORT_NAMES, Month, ParseError,
    Week, YearMonthDay, parse_month, split_iso, today,
};

/// The month a page represents.
///
/// Always normalized: the month is in `1..=12` and any overflow has been
/// carried into the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Builds an anchor from any `(year, month)` pair, wrapping the month into
    /// `1..=12`: month 13 of 2023 is January 2024, month 0 is December 2022.
    pub fn normalize(year: i32, month: i32) -> Self {
        Self::from_month_index(i64::from(year) * i64::from(MAX_MONTH) + i64::from(month) - 1)
    }

    /// Creates an anchor from already-valid components.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the month is not in `1..=12`.
    pub fn new(year: i32, month: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year,
            month: Month::new(month)?,
        })
    }

    pub(crate) const fn from_parts(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month containing today's date.
    pub fn current() -> Self {
        today().year_month()
    }

    /// Months elapsed since January of year 0.
    pub(crate) const fn month_index(self) -> i64 {
        self.year as i64 * MAX_MONTH as i64 + self.month.get() as i64 - 1
    }

    fn from_month_index(index: i64) -> Self {
        // Years past i32 are out of range for the whole crate
        let year = index.div_euclid(i64::from(MAX_MONTH)) as i32;
        Self {
            year,
            month: Month::wrapping(index),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month.get()
    }

    pub const fn month_typed(self) -> Month {
        self.month
    }

    /// The anchor `n` months later (earlier for negative `n`).
    pub fn add_months(self, n: i64) -> Self {
        Self::from_month_index(self.month_index() + n)
    }

    /// Signed number of months from `self` to `other`.
    pub const fn months_until(self, other: Self) -> i64 {
        other.month_index() - self.month_index()
    }

    pub const fn days_in_month(self) -> u8 {
        days_in_month(self.year, self.month.get())
    }

    /// Weekday of the 1st of this month.
    pub const fn first_weekday(self) -> Week {
        first_weekday(self.year, self.month.get())
    }

    /// Grid column of the 1st of this month.
    pub const fn offset(self, start_with_monday: bool) -> usize {
        self.first_weekday().column(start_with_monday)
    }

    /// Week rows needed to show every day of the month.
    pub const fn row_count(self, start_with_monday: bool) -> usize {
        (self.offset(start_with_monday) + self.days_in_month() as usize).div_ceil(DAYS_PER_WEEK)
    }

    /// Day 1 of this month, tagged as belonging to it.
    pub fn first_day(self) -> YearMonthDay {
        YearMonthDay {
            year: self.year,
            month: self.month,
            day: Day::from_civil(MIN_DAY),
            focus: Some(true),
        }
    }

    pub fn contains(self, date: YearMonthDay) -> bool {
        date.year_month() == self
    }

    /// Three-letter English month label.
    pub const fn month_short_str(self) -> &'static str {
        MONTH_SHORT_NAMES[self.month.get() as usize]
    }
}

impl From<YearMonthDay> for YearMonth {
    fn from(date: YearMonthDay) -> Self {
        date.year_month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month.get())
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, parts) = split_iso(s)?;
        match parts.as_slice() {
            [month] => Ok(Self {
                year,
                month: parse_month(month)?,
            }),
            _ => Err(ParseError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM, found {}",
                s.trim()
            ))),
        }
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
