use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_ERA, DAYS_PER_WEEK, EPOCH_WEEKDAY, ERA_EPOCH_SHIFT,
    FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Wraps any month count into `1..=12`. Callers carry the year themselves.
    pub(crate) fn wrapping(value: i64) -> Self {
        // rem_euclid keeps the offset in 0..12
        let offset = value.rem_euclid(i64::from(MAX_MONTH)) as u8;
        Self(NonZeroU8::MIN.saturating_add(offset))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: i32, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            year,
            month,
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Day produced by `civil_from_days`, which never yields 0.
    pub(crate) const fn from_civil(value: u8) -> Self {
        match NonZeroU8::new(value) {
            Some(non_zero) => Self(non_zero),
            None => Self(NonZeroU8::MIN),
        }
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // No year/month context here, only the upper bound of any month
        if value < MIN_DAY || value > DAYS_IN_MONTH[1] {
            return Err(ParseError::InvalidDay {
                year: 0,
                month: 0,
                day: value,
            });
        }
        NonZeroU8::new(value)
            .map(Self)
            .ok_or(ParseError::InvalidDay {
                year: 0,
                month: 0,
                day: value,
            })
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day of the week. The ordinal is fixed (Sunday = 0 … Saturday = 6) no
/// matter which day a page starts its rows with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Week {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Week {
    /// All weekdays in ordinal order.
    pub const ALL: [Self; DAYS_PER_WEEK] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Stable ordinal, 0 = Sunday.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Weekday for any ordinal, wrapping modulo 7.
    pub const fn from_ordinal(ordinal: usize) -> Self {
        Self::ALL[ordinal % DAYS_PER_WEEK]
    }

    /// Three-letter English label.
    pub const fn short_str(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }

    /// Grid column this weekday occupies for the given week start.
    pub const fn column(self, start_with_monday: bool) -> usize {
        let ordinal = self as usize;
        if start_with_monday {
            (ordinal + DAYS_PER_WEEK - 1) % DAYS_PER_WEEK
        } else {
            ordinal
        }
    }

    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_str())
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Serial day number of a proleptic Gregorian date, 1970-01-01 being 0.
///
/// Years are shifted to start in March so the leap day is the last day of
/// the shifted year; eras are 400-year blocks of `DAYS_PER_ERA` days.
pub const fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let month = month as i64;
    let year = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - ERA_EPOCH_SHIFT
}

/// Inverse of [`days_from_civil`]: `(year, month, day)` for a serial day number.
pub const fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let shifted = days + ERA_EPOCH_SHIFT;
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + if month <= 2 { 1 } else { 0 };
    (year as i32, month as u8, day as u8)
}

/// Weekday of a serial day number.
pub const fn weekday_from_days(days: i64) -> Week {
    Week::from_ordinal((days + EPOCH_WEEKDAY).rem_euclid(DAYS_PER_WEEK as i64) as usize)
}

/// Weekday of the first day of `(year, month)`.
pub const fn first_weekday(year: i32, month: u8) -> Week {
    weekday_from_days(days_from_civil(year, month, MIN_DAY))
}
