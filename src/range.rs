use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::consts::MONTHS_PER_YEAR;
use crate::{ParseError, RANGE_SEPARATOR, YearMonth, prelude::*};

/// An inclusive range between two year-months.
///
/// Direction is detected from the endpoint order: `start <= end` walks
/// forward, `start > end` walks backward. Both endpoints are always yielded,
/// so equal endpoints produce a single-element walk. The range itself is a
/// plain value; each call to `iter` produces an independent cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct YearMonthRange {
    start: YearMonth,
    end:   YearMonth,
}

/// Error type for year-month range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Error parsing a range endpoint.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl YearMonthRange {
    /// Creates a new range. A `start` greater than `end` yields a descending
    /// range rather than an error.
    pub const fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    /// Returns the first endpoint of the walk
    pub const fn start(&self) -> YearMonth {
        self.start
    }

    /// Returns the last endpoint of the walk
    pub const fn end(&self) -> YearMonth {
        self.end
    }

    /// Returns both endpoints as a tuple
    pub const fn endpoints(&self) -> (YearMonth, YearMonth) {
        (self.start, self.end)
    }

    /// True when the walk steps backward in time
    pub fn is_descending(&self) -> bool {
        self.start > self.end
    }

    // Endpoints in ascending order, whatever direction the range runs in.
    fn normalized(&self) -> (YearMonth, YearMonth) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Checks if the range covers a given year-month, regardless of the
    /// walk direction.
    pub fn contains(&self, value: &YearMonth) -> bool {
        let (lower, upper) = self.normalized();
        lower <= *value && *value <= upper
    }

    /// Checks if this range covers any month in common with another range
    pub fn overlaps(&self, other: &Self) -> bool {
        let (self_lower, self_upper) = self.normalized();
        let (other_lower, other_upper) = other.normalized();
        self_lower <= other_upper && other_lower <= self_upper
    }

    /// Checks if every month of this range is covered by another range
    pub fn is_within(&self, other: &Self) -> bool {
        let (self_lower, self_upper) = self.normalized();
        let (other_lower, other_upper) = other.normalized();
        other_lower <= self_lower && self_upper <= other_upper
    }

    /// Number of months the walk yields, endpoints included
    pub fn months(&self) -> usize {
        let (lower, upper) = self.normalized();
        (month_index(&upper) - month_index(&lower)).unsigned_abs() as usize + 1
    }

    /// Returns a fresh cursor over the range. Cursors are single-pass and
    /// independent of each other.
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            next: Some(self.start),
            end: self.end,
            descending: self.is_descending(),
        }
    }
}

// Position of a month on the continuous month axis, for distance math.
const fn month_index(value: &YearMonth) -> i64 {
    value.year() as i64 * MONTHS_PER_YEAR + value.month() as i64 - 1
}

/// Lazy cursor over a [`YearMonthRange`], stepping one month per call in the
/// range's fixed direction.
#[derive(Debug, Clone)]
pub struct RangeIter {
    next: Option<YearMonth>,
    end: YearMonth,
    descending: bool,
}

impl Iterator for RangeIter {
    type Item = YearMonth;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current == self.end {
            None
        } else if self.descending {
            current.prev().ok()
        } else {
            current.next().ok()
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => (month_index(&self.end) - month_index(&next)).unsigned_abs() as usize + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RangeIter {}

impl std::iter::FusedIterator for RangeIter {}

impl IntoIterator for YearMonthRange {
    type Item = YearMonth;
    type IntoIter = RangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &YearMonthRange {
    type Item = YearMonth;
    type IntoIter = RangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for YearMonthRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator_count = s.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = s.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!(
                        "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                    ))
                })?;

                let start = start_str.parse::<YearMonth>()?;
                let end = end_str.parse::<YearMonth>()?;

                Ok(Self::new(start, end))
            }
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for YearMonthRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YearMonthRange {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare first endpoints, then last
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl Serialize for YearMonthRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonthRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
