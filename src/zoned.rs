//! An instant paired with the offset and zone it was resolved in.

use crate::calendar::Chronology;
use crate::datetime::{CalendarDate, LocalDateTime, TimeOfDay};
use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::instant::Instant;
use crate::timezone::{TimeZone, UtcOffsetSeconds};
use crate::{CalendricalResult, SECONDS_PER_DAY};

/// A fully resolved date-time: an exact instant, the UTC offset in
/// effect, and the zone it came from when one was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    instant: Instant,
    offset: UtcOffsetSeconds,
    zone: Option<TimeZone>,
}

impl ZonedDateTime {
    pub(crate) fn new(instant: Instant, offset: UtcOffsetSeconds, zone: Option<TimeZone>) -> Self {
        Self {
            instant,
            offset,
            zone,
        }
    }

    /// The exact instant on the UTC timeline.
    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    /// The UTC offset in effect at the instant.
    pub fn offset(&self) -> UtcOffsetSeconds {
        self.offset
    }

    /// The region zone, when the value was resolved against one.
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }

    /// Projects the instant into calendar space through the offset.
    pub fn to_local_datetime<C: Chronology>(
        &self,
        chronology: &C,
    ) -> CalendricalResult<LocalDateTime> {
        let local_seconds = self
            .instant
            .epoch_seconds()
            .checked_add(self.offset.seconds())
            .ok_or_else(|| {
                CalendricalError::out_of_range(
                    ChronoField::InstantSeconds,
                    self.instant.epoch_seconds(),
                )
            })?;
        let epoch_day = local_seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (era, year_of_era, month, day) = chronology.date_from_epoch_day(epoch_day)?;
        Ok(LocalDateTime {
            date: CalendarDate {
                calendar: chronology.id(),
                era,
                year_of_era,
                month,
                day,
            },
            time: TimeOfDay::from_second_of_day(second_of_day, self.instant.nanosecond())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::IsoChronology;

    #[test]
    fn projects_through_offset() {
        // 1970-01-01T00:00:02Z at +02:30 is 02:30:02 local.
        let instant = Instant::try_new(2, 5).unwrap();
        let zoned = ZonedDateTime::new(instant, UtcOffsetSeconds::new(9_000), None);
        let local = zoned.to_local_datetime(&IsoChronology).unwrap();
        assert_eq!(local.date.year_of_era, 1970);
        assert_eq!((local.date.month, local.date.day), (1, 1));
        assert_eq!((local.time.hour, local.time.minute, local.time.second), (2, 30, 2));
        assert_eq!(local.time.nanosecond, 5);
    }

    #[test]
    fn saturated_instant_rejects_offset_shift() {
        let instant = Instant::try_new(i64::MAX, 0).unwrap();
        let zoned = ZonedDateTime::new(instant, UtcOffsetSeconds::new(3_600), None);
        assert!(zoned.to_local_datetime(&IsoChronology).is_err());
    }

    #[test]
    fn negative_offset_crosses_midnight() {
        let instant = Instant::try_new(2, 0).unwrap();
        let zoned = ZonedDateTime::new(instant, UtcOffsetSeconds::new(-3_600), None);
        let local = zoned.to_local_datetime(&IsoChronology).unwrap();
        assert_eq!(local.date.year_of_era, 1969);
        assert_eq!((local.date.month, local.date.day), (12, 31));
        assert_eq!(local.time.hour, 23);
    }
}
