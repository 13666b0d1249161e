use chrono::Datelike;
use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DATE_SEPARATOR, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;
use std::str::FromStr;

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// The calendar year before this one, `None` for year 1
    pub fn previous(self) -> Option<Self> {
        self.get().checked_sub(1).and_then(|y| Self::new(y).ok())
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

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

/// The current date at month precision, as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}", "year.get()", "month.get()")]
pub struct Today {
    pub year: Year,
    pub month: Month,
}

impl Today {
    /// Creates from already validated parts
    pub const fn new(year: Year, month: Month) -> Self {
        Self { year, month }
    }

    /// Creates from raw parts
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` or `ParseError::InvalidMonth`.
    pub fn from_parts(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self::new(Year::new(year)?, Month::new(month)?))
    }

    /// Drops the day from a calendar date
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` for dates outside `1..=MAX_YEAR`.
    pub fn from_date(date: chrono::NaiveDate) -> Result<Self, ParseError> {
        let year = u16::try_from(date.year()).map_err(|_| {
            ParseError::InvalidFormat(format!("year out of range: {}", date.year()))
        })?;
        let month = u8::try_from(date.month()).map_err(|_| {
            ParseError::InvalidFormat(format!("month out of range: {}", date.month()))
        })?;
        Self::from_parts(year, month)
    }

    /// Reads the local wall clock
    ///
    /// # Errors
    /// Returns `ParseError` if the clock reports a year outside `1..=MAX_YEAR`.
    pub fn now() -> Result<Self, ParseError> {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// The calendar year before `self.year`, `None` for year 1
    pub fn previous_year(&self) -> Option<Year> {
        self.year.previous()
    }
}

impl FromStr for Today {
    type Err = ParseError;

    /// Accepts `YYYY-MM` or `YYYY-MM-DD`; the day is validated and discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [y, m] => Self::from_parts(parse_u16(y)?, parse_u8(m)?),
            [y, m, d] => {
                let year = parse_u16(y)?;
                let month = parse_u8(m)?;
                let today = Self::from_parts(year, month)?;
                let day = parse_u8(d)?;
                if day < MIN_DAY || day > days_in_month(year, month) {
                    return Err(ParseError::InvalidDay { year, month, day });
                }
                Ok(today)
            }
            _ => Err(ParseError::InvalidFormat(format!(
                "expected YYYY-MM or YYYY-MM-DD, found {trimmed}"
            ))),
        }
    }
}

pub(crate) fn parse_u16(s: &str) -> Result<u16, ParseError> {
    s.parse::<u16>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

fn parse_u8(s: &str) -> Result<u8, ParseError> {
    s.parse::<u8>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

// Helper functions

pub(crate) const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// `month` must already be validated; callers go through [`Month::new`].
pub(crate) const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
