//! Resolution of field bags into concrete temporal shapes.
//!
//! The [`Resolver`] combines a [`Chronology`] and a [`TimeZoneProvider`]
//! and turns a [`ParsedFields`] bag into an [`Instant`],
//! [`LocalDateTime`], or [`ZonedDateTime`]. It holds no state of its
//! own, so one resolver can serve any number of bags.

use crate::calendar::Chronology;
use crate::datetime::{CalendarDate, LocalDateTime, TimeOfDay};
use crate::era::Era;
use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::instant::Instant;
use crate::parsed::ParsedFields;
use crate::provider::{LocalTimeRecord, TimeZoneProvider};
use crate::timezone::{TimeZone, UtcOffsetSeconds};
use crate::zoned::ZonedDateTime;
use crate::{CalendricalResult, SECONDS_PER_DAY};

use alloc::string::ToString;

/// Resolves field bags against an injected chronology and zone
/// provider.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a, C, P> {
    chronology: &'a C,
    provider: &'a P,
}

/// Zone information recovered from a bag, in channel priority order.
#[derive(Debug, Clone, Copy)]
enum ResolvedZone<'b> {
    None,
    /// A bare offset with no region attached.
    Fixed(UtcOffsetSeconds),
    /// A region identifier with no explicit offset.
    Region(&'b str),
    /// Both supplied. The offset is kept and validated against the
    /// region, never silently repaired.
    Strict {
        offset: UtcOffsetSeconds,
        region: &'b str,
    },
}

impl<'a, C: Chronology, P: TimeZoneProvider> Resolver<'a, C, P> {
    pub fn new(chronology: &'a C, provider: &'a P) -> Self {
        Self {
            chronology,
            provider,
        }
    }

    /// Resolves the bag to an exact point on the UTC timeline.
    ///
    /// A stored `InstantSeconds` needs no zone. Calendar date and time
    /// fields describe a wall clock reading, which needs the bag's zone
    /// or offset to pin down an instant.
    pub fn resolve_instant(&self, bag: &ParsedFields) -> CalendricalResult<Instant> {
        let nanosecond = nano_component(bag);
        if let Some(epoch_seconds) = bag.stored(ChronoField::InstantSeconds) {
            #[cfg(feature = "log")]
            log::trace!("resolving instant from epoch seconds {epoch_seconds}");
            return Instant::try_new(epoch_seconds, nanosecond);
        }
        let local_seconds = self.local_seconds(bag)?;
        let (epoch_seconds, _) = self.instant_for_local(bag, local_seconds)?;
        Instant::try_new(epoch_seconds, nanosecond)
    }

    /// Resolves the bag to a calendar date plus time of day.
    ///
    /// Date and time fields resolve directly. An instant-only bag must
    /// carry an offset or zone to place the day boundary.
    pub fn resolve_local_datetime(&self, bag: &ParsedFields) -> CalendricalResult<LocalDateTime> {
        let nanosecond = nano_component(bag);
        let local_seconds = if let Some(epoch_seconds) = bag.stored(ChronoField::InstantSeconds) {
            let offset = match self.resolve_zone(bag)? {
                ResolvedZone::Fixed(offset) | ResolvedZone::Strict { offset, .. } => offset,
                ResolvedZone::Region(region) => self
                    .provider
                    .offset_for_epoch_seconds(region, epoch_seconds)?,
                ResolvedZone::None => return Err(CalendricalError::missing_zone()),
            };
            epoch_seconds
                .checked_add(offset.seconds())
                .ok_or_else(|| {
                    CalendricalError::out_of_range(ChronoField::InstantSeconds, epoch_seconds)
                })?
        } else {
            self.local_seconds(bag)?
        };
        self.local_datetime_from_seconds(local_seconds, nanosecond)
    }

    /// Resolves the bag to an instant paired with its offset and zone.
    pub fn resolve_zoned_datetime(&self, bag: &ParsedFields) -> CalendricalResult<ZonedDateTime> {
        let nanosecond = nano_component(bag);
        let zone = self.resolve_zone(bag)?;
        let (epoch_seconds, offset) =
            if let Some(epoch_seconds) = bag.stored(ChronoField::InstantSeconds) {
                let offset = match zone {
                    ResolvedZone::Fixed(offset) => offset,
                    ResolvedZone::Region(region) => self
                        .provider
                        .offset_for_epoch_seconds(region, epoch_seconds)?,
                    ResolvedZone::Strict { offset, region } => {
                        self.validate_pair(region, epoch_seconds, offset)?;
                        offset
                    }
                    ResolvedZone::None => return Err(CalendricalError::missing_zone()),
                };
                (epoch_seconds, offset)
            } else {
                let local_seconds = self.local_seconds(bag)?;
                self.instant_for_local(bag, local_seconds)?
            };
        let instant = Instant::try_new(epoch_seconds, nanosecond)?;
        let region = match zone {
            ResolvedZone::Region(region) | ResolvedZone::Strict { region, .. } => {
                Some(TimeZone::IanaIdentifier(region.to_string()))
            }
            _ => None,
        };
        Ok(ZonedDateTime::new(instant, offset, region))
    }

    /// Zone determination: explicit zone channel first, then the offset
    /// channel, then a stored `OffsetSeconds` field.
    fn resolve_zone<'b>(&self, bag: &'b ParsedFields) -> CalendricalResult<ResolvedZone<'b>> {
        let region = match bag.zone() {
            Some(TimeZone::IanaIdentifier(id)) => {
                if !self.provider.check_identifier(id) {
                    return Err(
                        CalendricalError::range().with_message("Unknown time zone identifier")
                    );
                }
                Some(id.as_str())
            }
            _ => None,
        };
        let offset = bag.known_offset();
        Ok(match (region, offset) {
            (Some(region), Some(offset)) => ResolvedZone::Strict { offset, region },
            (Some(region), None) => ResolvedZone::Region(region),
            (None, Some(offset)) => ResolvedZone::Fixed(offset),
            (None, None) => ResolvedZone::None,
        })
    }

    /// Assembles calendar date and time fields into seconds on the
    /// local timeline.
    fn local_seconds(&self, bag: &ParsedFields) -> CalendricalResult<i64> {
        let epoch_day = self.epoch_day_component(bag)?;
        let second_of_day = second_of_day_component(bag);
        epoch_day
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| secs.checked_add(second_of_day))
            .ok_or_else(|| CalendricalError::out_of_range(ChronoField::EpochDay, epoch_day))
    }

    fn epoch_day_component(&self, bag: &ParsedFields) -> CalendricalResult<i64> {
        if let Some(epoch_day) = bag.stored(ChronoField::EpochDay) {
            return Ok(epoch_day);
        }
        let month = bag.stored(ChronoField::MonthOfYear).ok_or_else(|| {
            CalendricalError::insufficient_fields()
                .with_message("No month-of-year or epoch-day field to resolve a date from")
        })?;
        let day = bag.stored(ChronoField::DayOfMonth).ok_or_else(|| {
            CalendricalError::insufficient_fields()
                .with_message("No day-of-month field to resolve a date from")
        })?;
        let proleptic_year = if let Some(year) = bag.stored(ChronoField::Year) {
            year
        } else {
            let year_of_era = bag.stored(ChronoField::YearOfEra).ok_or_else(|| {
                CalendricalError::insufficient_fields()
                    .with_message("No year or year-of-era field to resolve a date from")
            })?;
            // A year-of-era with no era names the current era.
            let era_value = bag.stored(ChronoField::Era).unwrap_or(1);
            let era = Era::of(self.chronology.id(), era_value)?;
            self.chronology.proleptic_year(era, year_of_era)?
        };
        self.chronology
            .epoch_day_for(proleptic_year, month as u8, day as u8)
    }

    /// Pins a wall clock reading to the UTC timeline using the bag's
    /// zone. Ambiguous readings take the earlier instant; skipped
    /// readings shift forward through the gap.
    fn instant_for_local(
        &self,
        bag: &ParsedFields,
        local_seconds: i64,
    ) -> CalendricalResult<(i64, UtcOffsetSeconds)> {
        match self.resolve_zone(bag)? {
            ResolvedZone::Fixed(offset) => Ok((local_seconds - offset.seconds(), offset)),
            ResolvedZone::Region(region) => {
                let record = self.provider.local_time_record(region, local_seconds)?;
                let offset = match record {
                    LocalTimeRecord::Single(offset) => offset,
                    LocalTimeRecord::Ambiguous { earlier, .. } => earlier,
                    LocalTimeRecord::Gap { before, .. } => before,
                };
                #[cfg(feature = "log")]
                log::trace!(
                    "local reading {local_seconds} in {region} resolved with offset {offset}"
                );
                Ok((local_seconds - offset.seconds(), offset))
            }
            ResolvedZone::Strict { offset, region } => {
                let record = self.provider.local_time_record(region, local_seconds)?;
                if !record.permits(offset) {
                    return Err(CalendricalError::invalid_offset());
                }
                Ok((local_seconds - offset.seconds(), offset))
            }
            ResolvedZone::None => Err(CalendricalError::missing_zone()),
        }
    }

    /// Strict pairing check for an exact instant: the supplied offset
    /// must be attributable to the region at the wall clock reading the
    /// pair projects to. Both sides of a DST fallback pass.
    fn validate_pair(
        &self,
        region: &str,
        epoch_seconds: i64,
        offset: UtcOffsetSeconds,
    ) -> CalendricalResult<()> {
        let local_seconds = epoch_seconds
            .checked_add(offset.seconds())
            .ok_or_else(|| {
                CalendricalError::out_of_range(ChronoField::InstantSeconds, epoch_seconds)
            })?;
        let record = self.provider.local_time_record(region, local_seconds)?;
        if record.permits(offset) {
            Ok(())
        } else {
            Err(CalendricalError::invalid_offset())
        }
    }

    fn local_datetime_from_seconds(
        &self,
        local_seconds: i64,
        nanosecond: u32,
    ) -> CalendricalResult<LocalDateTime> {
        let epoch_day = local_seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (era, year_of_era, month, day) = self.chronology.date_from_epoch_day(epoch_day)?;
        Ok(LocalDateTime {
            date: CalendarDate {
                calendar: self.chronology.id(),
                era,
                year_of_era,
                month,
                day,
            },
            time: TimeOfDay::from_second_of_day(second_of_day, nanosecond)?,
        })
    }
}

/// Fractional seconds, by the field layer's own rule: the finest
/// stored fraction scaled up, else zero. Values are range checked on
/// insertion, so the scaled results stay within a second.
fn nano_component(bag: &ParsedFields) -> u32 {
    crate::fields::fraction_nanos(bag).unwrap_or(0) as u32
}

/// Time of day in seconds. Absent smaller units default to zero, so a
/// bare date resolves to midnight.
fn second_of_day_component(bag: &ParsedFields) -> i64 {
    if let Some(second_of_day) = bag
        .stored(ChronoField::SecondOfDay)
        .or_else(|| ChronoField::SecondOfDay.derive_from(bag))
    {
        return second_of_day;
    }
    if let Some(minute_of_day) = bag.stored(ChronoField::MinuteOfDay) {
        return minute_of_day * 60 + bag.stored(ChronoField::SecondOfMinute).unwrap_or(0);
    }
    let hour = bag.stored(ChronoField::HourOfDay).unwrap_or(0);
    let minute = bag.stored(ChronoField::MinuteOfHour).unwrap_or(0);
    let second = bag.stored(ChronoField::SecondOfMinute).unwrap_or(0);
    hour * 3_600 + minute * 60 + second
}
