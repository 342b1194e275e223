//! Calendar-space date and time records.

use crate::calendar::CalendarId;
use crate::era::Era;
use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::CalendricalResult;

/// A time of day with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

impl TimeOfDay {
    /// Splits a second-of-day value into clock components.
    pub(crate) fn from_second_of_day(second_of_day: i64, nanosecond: u32) -> CalendricalResult<Self> {
        if !ChronoField::SecondOfDay.valid_range().contains(second_of_day) {
            return Err(CalendricalError::out_of_range(
                ChronoField::SecondOfDay,
                second_of_day,
            ));
        }
        Ok(Self {
            hour: (second_of_day / 3_600) as u8,
            minute: (second_of_day / 60 % 60) as u8,
            second: (second_of_day % 60) as u8,
            nanosecond,
        })
    }

    /// Seconds from midnight.
    pub fn second_of_day(&self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// An era-scoped date in some calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub calendar: CalendarId,
    pub era: Era,
    pub year_of_era: i64,
    pub month: u8,
    pub day: u8,
}

/// A date plus time of day, with no offset or zone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDateTime {
    pub date: CalendarDate,
    pub time: TimeOfDay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_second_of_day() {
        let time = TimeOfDay::from_second_of_day(12 * 3_600 + 30 * 60 + 40, 987).unwrap();
        assert_eq!((time.hour, time.minute, time.second), (12, 30, 40));
        assert_eq!(time.nanosecond, 987);
        assert_eq!(time.second_of_day(), 45_040);
    }

    #[test]
    fn rejects_second_of_day_overflow() {
        assert!(TimeOfDay::from_second_of_day(86_400, 0).is_err());
        assert!(TimeOfDay::from_second_of_day(-1, 0).is_err());
        assert!(TimeOfDay::from_second_of_day(86_399, 0).is_ok());
    }
}
