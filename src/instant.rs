//! An exact point on the UTC timeline.

use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::CalendricalResult;

/// Seconds since the Unix epoch plus a sub-second nanosecond component.
///
/// The nanosecond component always counts forward from the whole
/// second, so instants order by `(epoch_seconds, nanosecond)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_seconds: i64,
    nanosecond: u32,
}

impl Instant {
    /// Creates an instant, validating the nanosecond component.
    pub fn try_new(epoch_seconds: i64, nanosecond: u32) -> CalendricalResult<Self> {
        if !ChronoField::NanoOfSecond
            .valid_range()
            .contains(i64::from(nanosecond))
        {
            return Err(CalendricalError::out_of_range(
                ChronoField::NanoOfSecond,
                i64::from(nanosecond),
            ));
        }
        Ok(Self {
            epoch_seconds,
            nanosecond,
        })
    }

    /// Seconds since the Unix epoch, ignoring the nanosecond component.
    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    /// Nanosecond within the second, `0..=999_999_999`.
    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }
}
