mod consts;
mod prelude;
mod range;
mod types;

pub use consts::*;
pub use range::{RangeError, RangeIter, YearMonthRange};
pub use types::{Month, Year};

use crate::prelude::*;
use chrono::{Datelike, Local, NaiveDate};
use std::str::FromStr;
use types::days_in_month;

/// A calendar year-month pair with no day component.
///
/// Represents any month between 0001-01 and 9999-12 in the proleptic
/// Gregorian calendar. Values are immutable and validated on construction,
/// so every observable `YearMonth` holds a month in `1..=12` and a year in
/// `1..=MAX_YEAR`.
///
/// The canonical textual form is `YYYY-MM` (zero-padded), used both by
/// `Display` and as the only format accepted by `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}", "year.get()", "month.get()")]
pub struct YearMonth {
    year: Year,
    month: Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid YearMonth string format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i64),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
}

impl std::error::Error for ParseError {}

impl YearMonth {
    /// Creates a new `YearMonth` from raw year and month numbers.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` or `ParseError::InvalidMonth` if a
    /// component is out of range.
    pub fn new(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year: Year::new(year)?,
            month: Month::new(month)?,
        })
    }

    /// Creates a new `YearMonth` from already validated components.
    pub const fn from_parts(year: Year, month: Month) -> Self {
        Self { year, month }
    }

    /// Returns the year component (as u16 for convenience)
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component (as u8 for convenience)
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> Year {
        self.year
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// The ISO 8601 representation of the year and month (`YYYY-MM`).
    pub fn iso8601(&self) -> String {
        self.to_string()
    }

    /// Returns the current year and month, read from the system's local
    /// calendar date.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` only if the host clock reports a
    /// date outside years `1..=MAX_YEAR`.
    pub fn current() -> Result<Self, ParseError> {
        Self::try_from(Local::now().date_naive())
    }

    /// The number of days in the month, accounting for leap years.
    pub const fn numdays(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    /// Returns the following month; December rolls over to January of the
    /// next year.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` when rolling over past `MAX_YEAR`.
    pub fn next(&self) -> Result<Self, ParseError> {
        if self.month.get() == DECEMBER {
            Self::new(self.year.get() + 1, JANUARY)
        } else {
            Self::new(self.year.get(), self.month.get() + 1)
        }
    }

    /// Returns the preceding month; January rolls back to December of the
    /// previous year.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` when rolling back below year 1.
    pub fn prev(&self) -> Result<Self, ParseError> {
        if self.month.get() == JANUARY {
            Self::new(self.year.get() - 1, DECEMBER)
        } else {
            Self::new(self.year.get(), self.month.get() - 1)
        }
    }

    /// Returns the `YearMonth` that is `months` whole months away from this
    /// one; positive deltas move forward, negative backward, zero is the
    /// identity.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the resulting year falls outside
    /// `1..=MAX_YEAR`.
    pub fn add_months(&self, months: i32) -> Result<Self, ParseError> {
        self.shifted(i64::from(months))
    }

    /// Returns the `YearMonth` that is `months` whole months before this one.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the resulting year falls outside
    /// `1..=MAX_YEAR`.
    pub fn sub_months(&self, months: i32) -> Result<Self, ParseError> {
        self.shifted(-i64::from(months))
    }

    // 0-indexed month arithmetic; Euclidean division keeps the month offset
    // in 0..12 even for negative totals.
    fn shifted(&self, months: i64) -> Result<Self, ParseError> {
        let total = i64::from(self.month.get()) - 1 + months;
        let year = i64::from(self.year.get()) + total.div_euclid(MONTHS_PER_YEAR);
        let month = (total.rem_euclid(MONTHS_PER_YEAR) + 1) as u8;
        let year = u16::try_from(year).map_err(|_| ParseError::InvalidYear(year))?;
        Self::new(year, month)
    }

    /// Checks whether a calendar date falls inside this month: true iff its
    /// year and month components match (the day is ignored).
    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        i32::from(self.year.get()) == date.year() && u32::from(self.month.get()) == date.month()
    }

    /// Returns the first and last calendar day of the month.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let year = i32::from(self.year.get());
        let month = u32::from(self.month.get());
        let first = NaiveDate::from_ymd_opt(year, month, u32::from(MIN_DAY));
        let last = NaiveDate::from_ymd_opt(year, month, u32::from(self.numdays()));
        match (first, last) {
            (Some(first), Some(last)) => (first, last),
            // a validated year-month is always representable as a chrono date
            _ => unreachable!(),
        }
    }

    /// Returns the inclusive range walking from `start` to `end`, one month
    /// at a time. Direction is detected from the endpoint order.
    pub const fn range(start: Self, end: Self) -> YearMonthRange {
        YearMonthRange::new(start, end)
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_str, month_str) = s
            .split_once(DATE_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_owned()))?;

        // Exactly 4 digits, a hyphen, 2 digits; no surrounding characters
        let well_formed = year_str.len() == YEAR_DIGITS
            && month_str.len() == MONTH_DIGITS
            && year_str.bytes().all(|b| b.is_ascii_digit())
            && month_str.bytes().all(|b| b.is_ascii_digit());

        if !well_formed {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }

        let year = year_str
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))?;
        let month = month_str
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))?;

        Self::new(year, month)
    }
}

impl TryFrom<NaiveDate> for YearMonth {
    type Error = ParseError;

    /// Truncates a calendar date to its year-month.
    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let year = u16::try_from(date.year())
            .map_err(|_| ParseError::InvalidYear(i64::from(date.year())))?;
        // chrono months are always 1..=12
        Self::new(year, date.month() as u8)
    }
}

impl TryFrom<(u16, u8)> for YearMonth {
    type Error = ParseError;

    fn try_from(value: (u16, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl From<YearMonth> for (u16, u8) {
    fn from(ym: YearMonth) -> Self {
        (ym.year(), ym.month())
    }
}

impl serde::Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
