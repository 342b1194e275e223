//! Calendar systems and the [`Chronology`] capability trait.
//!
//! A [`Chronology`] converts between era-scoped calendar dates and
//! epoch days. The resolver stays calendar-agnostic by routing every
//! date computation through this trait.

use crate::era::{Era, COPTIC_ERAS, ISO_ERAS};
use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::utils;
use crate::CalendricalResult;

/// Supported calendar identifiers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarId {
    /// The proleptic Gregorian calendar with ISO 8601 week and era
    /// conventions.
    Iso8601,
    /// The Coptic calendar: twelve 30-day months plus a 5 or 6 day
    /// epagomenal thirteenth month.
    Coptic,
}

impl CalendarId {
    /// Lowercase identifier string for this calendar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Coptic => "coptic",
        }
    }

    /// The eras of this calendar, ordered by stored era value.
    pub fn eras(&self) -> &'static [Era] {
        match self {
            Self::Iso8601 => ISO_ERAS,
            Self::Coptic => COPTIC_ERAS,
        }
    }
}

/// Capability trait for calendar arithmetic.
///
/// All methods take proleptic years, i.e. years on a single continuous
/// axis where the year-of-era of the second era counts up from 1 and
/// the first era counts down from 0. [`Chronology::proleptic_year`]
/// performs that mapping.
pub trait Chronology {
    /// The identifier of this calendar.
    fn id(&self) -> CalendarId;

    /// Maps an era plus year-of-era to a proleptic year.
    fn proleptic_year(&self, era: Era, year_of_era: i64) -> CalendricalResult<i64>;

    /// Returns the epoch day for a date in this calendar, validating
    /// the month and day-of-month against the calendar's shape.
    fn epoch_day_for(&self, proleptic_year: i64, month: u8, day: u8) -> CalendricalResult<i64>;

    /// Splits an epoch day into `(era, year_of_era, month, day)` in
    /// this calendar.
    fn date_from_epoch_day(&self, epoch_day: i64) -> CalendricalResult<(Era, i64, u8, u8)>;
}

/// The ISO 8601 chronology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoChronology;

impl Chronology for IsoChronology {
    fn id(&self) -> CalendarId {
        CalendarId::Iso8601
    }

    fn proleptic_year(&self, era: Era, year_of_era: i64) -> CalendricalResult<i64> {
        if era.calendar() != CalendarId::Iso8601 {
            return Err(CalendricalError::invalid_era(i64::from(era.value())));
        }
        // CE maps directly; BCE year n is proleptic year 1 - n.
        Ok(match era.value() {
            1 => year_of_era,
            _ => 1 - year_of_era,
        })
    }

    fn epoch_day_for(&self, proleptic_year: i64, month: u8, day: u8) -> CalendricalResult<i64> {
        if !(1..=12).contains(&month) {
            return Err(CalendricalError::out_of_range(
                ChronoField::MonthOfYear,
                i64::from(month),
            ));
        }
        let year = i32::try_from(proleptic_year)
            .map_err(|_| CalendricalError::out_of_range(ChronoField::Year, proleptic_year))?;
        if day < 1 || day > utils::iso_days_in_month(year, month)? {
            return Err(CalendricalError::out_of_range(
                ChronoField::DayOfMonth,
                i64::from(day),
            ));
        }
        Ok(utils::iso_epoch_days(
            proleptic_year,
            i64::from(month),
            i64::from(day),
        ))
    }

    fn date_from_epoch_day(&self, epoch_day: i64) -> CalendricalResult<(Era, i64, u8, u8)> {
        if !ChronoField::EpochDay.valid_range().contains(epoch_day) {
            return Err(CalendricalError::out_of_range(
                ChronoField::EpochDay,
                epoch_day,
            ));
        }
        let (year, month, day) = utils::iso_date_from_epoch_days(epoch_day);
        let (era, year_of_era) = if year >= 1 {
            (ISO_ERAS[1], year)
        } else {
            (ISO_ERAS[0], 1 - year)
        };
        Ok((era, year_of_era, month, day))
    }
}

/// Days between the Coptic epoch (0001-01-01 AM, i.e. ISO 0284-08-29)
/// and the Unix epoch.
const COPTIC_EPOCH_OFFSET: i64 = 615_558;

/// The Coptic chronology.
///
/// Every year has twelve 30-day months followed by an epagomenal month
/// of 5 days, or 6 in a leap year. Leap years are those whose
/// proleptic year is congruent to 3 modulo 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopticChronology;

impl CopticChronology {
    fn is_leap_year(proleptic_year: i64) -> bool {
        proleptic_year.rem_euclid(4) == 3
    }

    fn days_in_month(proleptic_year: i64, month: u8) -> u8 {
        match month {
            13 if Self::is_leap_year(proleptic_year) => 6,
            13 => 5,
            _ => 30,
        }
    }
}

impl Chronology for CopticChronology {
    fn id(&self) -> CalendarId {
        CalendarId::Coptic
    }

    fn proleptic_year(&self, era: Era, year_of_era: i64) -> CalendricalResult<i64> {
        if era.calendar() != CalendarId::Coptic {
            return Err(CalendricalError::invalid_era(i64::from(era.value())));
        }
        // AM maps directly; BAM year n is proleptic year 1 - n.
        Ok(match era.value() {
            1 => year_of_era,
            _ => 1 - year_of_era,
        })
    }

    fn epoch_day_for(&self, proleptic_year: i64, month: u8, day: u8) -> CalendricalResult<i64> {
        if !(1..=13).contains(&month) {
            return Err(CalendricalError::out_of_range(
                ChronoField::MonthOfYear,
                i64::from(month),
            ));
        }
        if day < 1 || day > Self::days_in_month(proleptic_year, month) {
            return Err(CalendricalError::out_of_range(
                ChronoField::DayOfMonth,
                i64::from(day),
            ));
        }
        let epoch_day = (proleptic_year - 1) * 365
            + proleptic_year.div_euclid(4)
            + 30 * i64::from(month - 1)
            + i64::from(day - 1)
            - COPTIC_EPOCH_OFFSET;
        if !ChronoField::EpochDay.valid_range().contains(epoch_day) {
            return Err(CalendricalError::out_of_range(
                ChronoField::EpochDay,
                epoch_day,
            ));
        }
        Ok(epoch_day)
    }

    fn date_from_epoch_day(&self, epoch_day: i64) -> CalendricalResult<(Era, i64, u8, u8)> {
        if !ChronoField::EpochDay.valid_range().contains(epoch_day) {
            return Err(CalendricalError::out_of_range(
                ChronoField::EpochDay,
                epoch_day,
            ));
        }
        let coptic_day = epoch_day + COPTIC_EPOCH_OFFSET;
        let proleptic_year = (4 * coptic_day + 1463).div_euclid(1461);
        let start_of_year =
            (proleptic_year - 1) * 365 + proleptic_year.div_euclid(4);
        let doy = coptic_day - start_of_year;
        let month = (doy / 30 + 1).min(13) as u8;
        let day = (doy - 30 * i64::from(month - 1) + 1) as u8;
        let (era, year_of_era) = if proleptic_year >= 1 {
            (COPTIC_ERAS[1], proleptic_year)
        } else {
            (COPTIC_ERAS[0], 1 - proleptic_year)
        };
        Ok((era, year_of_era, month, day))
    }
}
