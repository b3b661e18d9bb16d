//! Month-paged calendar grid model.
//!
//! A calendar is an unbounded sequence of pages, one per month. Every page is
//! a row-major grid of seven columns: an optional month banner row, an
//! optional weekday header row, then as many week rows as the month needs.
//!
//! ```
//! use paged_calendar::{CalendarConfig, CalendarController, YearMonthDay, cell_to_date};
//!
//! let config = CalendarConfig {
//!     initial_date: Some("2023-02-15".parse().unwrap()),
//!     ..CalendarConfig::default()
//! };
//! let mut controller = CalendarController::new(&config).unwrap();
//! let anchor = controller.current_anchor();
//! assert_eq!(anchor.to_string(), "2023-02");
//!
//! // February 2023 starts on a Wednesday, so index 3 is the 1st.
//! let first = cell_to_date(3, anchor, false);
//! assert_eq!(first, YearMonthDay::new(2023, 2, 1).unwrap());
//! assert_eq!(first.is_focus_year_month(), Some(true));
//!
//! controller.advance(1);
//! assert_eq!(controller.current_anchor().to_string(), "2023-03");
//! ```

mod config;
mod consts;
mod controller;
mod error;
mod grid;
mod layout;
mod render;
mod types;
mod year_month;

pub use config::{CalendarConfig, Orientation};
pub use consts::*;
pub use controller::{
    CalendarController, PageTurn, PageWindow, PagingState, Subscription, WindowPage,
};
pub use error::ConfigurationError;
pub use grid::{CalendarPage, CellSlot, cell_to_date, header_slot};
pub use layout::{HeaderSize, PageLayout, cell_extent};
pub use render::{PageRenderer, RenderedCell};
pub use types::{
    Day, Month, Week, civil_from_days, days_from_civil, days_in_month, first_weekday,
    is_leap_year,
};
pub use year_month::YearMonth;

use derive_more::Display;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A single calendar day, as shown in one cell of a page.
///
/// Besides the date itself it remembers whether it belongs to the month of
/// the page that produced it. Spillover days from the previous or next month
/// carry `Some(false)`; dates built directly carry `None`. The flag is not
/// part of equality, ordering or hashing.
#[derive(Debug, Clone, Copy)]
pub struct YearMonthDay {
    year: i32,
    month: Month,
    day: Day,
    focus: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl YearMonthDay {
    /// Creates a validated date.
    ///
    /// # Errors
    /// Returns `ParseError` if the month or day is out of range for the year.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        let month_typed = Month::new(month)?;
        let day_typed = Day::new(day, year, month)?;
        Ok(Self {
            year,
            month: month_typed,
            day: day_typed,
            focus: None,
        })
    }

    /// Date for a serial day number (1970-01-01 is day 0).
    pub fn from_days(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month: Month::wrapping(i64::from(month) - 1),
            day: Day::from_civil(day),
            focus: None,
        }
    }

    /// Serial day number, 1970-01-01 being 0.
    pub const fn to_days(self) -> i64 {
        days_from_civil(self.year, self.month.get(), self.day.get())
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month.get()
    }

    pub const fn day(self) -> u8 {
        self.day.get()
    }

    pub const fn month_typed(self) -> Month {
        self.month
    }

    pub const fn day_typed(self) -> Day {
        self.day
    }

    /// `Some(true)` when this date belongs to the anchor month of the page that
    /// produced it, `Some(false)` for spillover days, `None` otherwise.
    pub const fn is_focus_year_month(self) -> Option<bool> {
        self.focus
    }

    /// Tags the date with whether it falls inside `anchor`.
    pub fn with_focus(self, anchor: YearMonth) -> Self {
        Self {
            focus: Some(self.year_month() == anchor),
            ..self
        }
    }

    /// The month page this date lives on.
    pub const fn year_month(self) -> YearMonth {
        YearMonth::from_parts(self.year, self.month)
    }

    pub const fn weekday(self) -> Week {
        types::weekday_from_days(self.to_days())
    }

    /// Date `n` days later (or earlier for negative `n`). The focus flag is dropped.
    pub fn add_days(self, n: i64) -> Self {
        Self::from_days(self.to_days() + n)
    }

    pub fn is_today(self) -> bool {
        self == today()
    }

    /// Converts to a chrono date, if chrono can represent the year.
    pub fn to_naive_date(self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(
            self.year,
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )
    }

    fn parse_i32(s: &str) -> Result<i32, ParseError> {
        s.parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

/// Splits an ISO `[-]YYYY-MM[-DD]` string into its year and the remaining parts.
/// A leading `-` belongs to the year.
pub(crate) fn split_iso(s: &str) -> Result<(i32, Vec<&str>), ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let (negative, body) = match trimmed.strip_prefix(DATE_SEPARATOR) {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let mut parts = body.split(DATE_SEPARATOR).map(str::trim);
    let year_str = parts.next().unwrap_or_default();
    if year_str.is_empty() || year_str.starts_with('+') {
        return Err(ParseError::InvalidFormat(trimmed.to_owned()));
    }
    let year = YearMonthDay::parse_i32(year_str)?;
    let year = if negative { -year } else { year };
    Ok((year, parts.collect()))
}

pub(crate) fn parse_month(s: &str) -> Result<Month, ParseError> {
    Month::new(YearMonthDay::parse_u8(s)?)
}

impl FromStr for YearMonthDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, parts) = split_iso(s)?;
        match parts.as_slice() {
            [month, day] => {
                let month = parse_month(month)?;
                let day = Self::parse_u8(day)?;
                Self::new(year, month.get(), day)
            }
            _ => Err(ParseError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {}",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for YearMonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year,
            self.month.get(),
            self.day.get()
        )
    }
}

impl PartialEq for YearMonthDay {
    fn eq(&self, other: &Self) -> bool {
        (self.year, self.month, self.day) == (other.year, other.month, other.day)
    }
}

impl Eq for YearMonthDay {}

impl Hash for YearMonthDay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.year, self.month, self.day).hash(state);
    }
}

impl PartialOrd for YearMonthDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YearMonthDay {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl From<chrono::NaiveDate> for YearMonthDay {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        // chrono dates are always valid Gregorian dates
        Self::from_days(days_from_civil(
            date.year(),
            date.month() as u8,
            date.day() as u8,
        ))
    }
}

impl serde::Serialize for YearMonthDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for YearMonthDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Today's date on the local clock.
pub fn today() -> YearMonthDay {
    chrono::Local::now().date_naive().into()
}
