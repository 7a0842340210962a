//! Date range parsing and validation for picture queries.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

/// Calendar date format accepted on input and sent upstream.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a pair of raw date boundaries was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("`start_date` should be in the format YYYY-MM-DD")]
    InvalidStartFormat,

    #[error("`end_date` cannot be used without `start_date`")]
    EndWithoutStart,

    #[error("`end_date` should be in the format YYYY-MM-DD")]
    InvalidEndFormat,

    #[error("`start_date` and `end_date` cannot be future dates")]
    FutureDate,

    #[error("`start_date` must be before `end_date`")]
    StartAfterEnd,
}

/// Which body shape the upstream API answers with for a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// No explicit bounds: a single object for today.
    Single,
    /// At least one explicit bound: an array of objects.
    Series,
}

/// A validated pair of optional date boundaries.
///
/// `None` means the caller did not supply the bound. That is kept distinct
/// from an explicit "today" because it decides which body shape upstream
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Range with both bounds unset ("today's picture").
    pub fn today() -> Self {
        Self::default()
    }

    /// Validate raw query values against the current UTC date.
    ///
    /// Empty strings are treated as unset bounds.
    pub fn validate(start_raw: &str, end_raw: &str) -> Result<Self, RangeError> {
        Self::validate_at(start_raw, end_raw, Utc::now().date_naive())
    }

    /// Validate raw query values against an explicit `today`.
    ///
    /// Rules are checked in order and the first failure is returned.
    pub fn validate_at(
        start_raw: &str,
        end_raw: &str,
        today: NaiveDate,
    ) -> Result<Self, RangeError> {
        let start = if start_raw.is_empty() {
            None
        } else {
            Some(parse_date(start_raw).ok_or(RangeError::InvalidStartFormat)?)
        };

        let end = if end_raw.is_empty() {
            None
        } else {
            if start.is_none() {
                return Err(RangeError::EndWithoutStart);
            }
            Some(parse_date(end_raw).ok_or(RangeError::InvalidEndFormat)?)
        };

        let effective_start = start.unwrap_or(today);
        let effective_end = end.unwrap_or(today);

        if effective_start > today || effective_end > today {
            return Err(RangeError::FutureDate);
        }

        if effective_end < effective_start {
            return Err(RangeError::StartAfterEnd);
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// True when neither bound was supplied.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn shape(&self) -> ResponseShape {
        if self.is_unbounded() {
            ResponseShape::Single
        } else {
            ResponseShape::Series
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date. Unpadded fields and signs are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let well_formed = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
