//! The temporal field catalog and its derivation rules.
//!
//! Each [`ChronoField`] carries a static valid range and, where one
//! exists, a derivation: a pure computation producing the field's value
//! from other fields already stored in a [`ParsedFields`] bag. The
//! derivation dependencies are declared as data
//! ([`ChronoField::derivation_sources`]) so the graph can be checked for
//! cycles once rather than trusted by convention.
//!
//! Derivation never errors: an underivable field is simply absent, and
//! it is the resolver's job to decide whether that absence is fatal for
//! a requested output shape.

use crate::parsed::ParsedFields;
use crate::SECONDS_PER_DAY;

/// An inclusive range of legal values for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub min: i64,
    pub max: i64,
}

impl FieldRange {
    const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns whether `value` lies within this range.
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A named, range-bounded temporal quantity.
///
/// Fields are either primitive (directly parsed into a bag) or derived
/// (computable from combinations of primitives). The variants cover the
/// set needed to resolve instants, local date-times, and zoned
/// date-times from parsed field bags.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChronoField {
    /// The era within a calendar system; always 0 or 1 for the shipped
    /// calendars.
    Era,
    /// The year within the era, starting at 1.
    YearOfEra,
    /// The proleptic year, negative before year 1.
    Year,
    /// The month of the year. The static maximum of 13 accommodates the
    /// Coptic epagomenal month; each chronology enforces its own
    /// tighter bound at resolution time.
    MonthOfYear,
    /// The day of the month. Chronologies enforce per-month maxima.
    DayOfMonth,
    /// Days since 1970-01-01, calendar-system independent.
    EpochDay,
    HourOfDay,
    MinuteOfHour,
    SecondOfMinute,
    /// The minute of the day, `hour * 60 + minute`.
    MinuteOfDay,
    SecondOfDay,
    NanoOfSecond,
    MicroOfSecond,
    MilliOfSecond,
    /// Seconds since 1970-01-01T00:00:00Z.
    InstantSeconds,
    /// A zone offset in seconds east of the reference meridian.
    OffsetSeconds,
}

/// Every field, for registry walks and tests.
pub const ALL_FIELDS: &[ChronoField] = &[
    ChronoField::Era,
    ChronoField::YearOfEra,
    ChronoField::Year,
    ChronoField::MonthOfYear,
    ChronoField::DayOfMonth,
    ChronoField::EpochDay,
    ChronoField::HourOfDay,
    ChronoField::MinuteOfHour,
    ChronoField::SecondOfMinute,
    ChronoField::MinuteOfDay,
    ChronoField::SecondOfDay,
    ChronoField::NanoOfSecond,
    ChronoField::MicroOfSecond,
    ChronoField::MilliOfSecond,
    ChronoField::InstantSeconds,
    ChronoField::OffsetSeconds,
];

impl ChronoField {
    /// Returns the field's display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Era => "era",
            Self::YearOfEra => "year-of-era",
            Self::Year => "year",
            Self::MonthOfYear => "month-of-year",
            Self::DayOfMonth => "day-of-month",
            Self::EpochDay => "epoch-day",
            Self::HourOfDay => "hour-of-day",
            Self::MinuteOfHour => "minute-of-hour",
            Self::SecondOfMinute => "second-of-minute",
            Self::MinuteOfDay => "minute-of-day",
            Self::SecondOfDay => "second-of-day",
            Self::NanoOfSecond => "nano-of-second",
            Self::MicroOfSecond => "micro-of-second",
            Self::MilliOfSecond => "milli-of-second",
            Self::InstantSeconds => "instant-seconds",
            Self::OffsetSeconds => "offset-seconds",
        }
    }

    /// Returns the field's static valid range.
    ///
    /// Ranges are calendar-system independent; calendar-dependent
    /// validity (month 13, day-of-month maxima) is enforced by the
    /// chronology during resolution.
    pub fn valid_range(self) -> FieldRange {
        match self {
            Self::Era => FieldRange::new(0, 1),
            Self::YearOfEra => FieldRange::new(1, 999_999_999),
            Self::Year => FieldRange::new(-999_999_999, 999_999_999),
            Self::MonthOfYear => FieldRange::new(1, 13),
            Self::DayOfMonth => FieldRange::new(1, 31),
            Self::EpochDay => FieldRange::new(-100_000_000, 100_000_000),
            Self::HourOfDay => FieldRange::new(0, 23),
            Self::MinuteOfHour => FieldRange::new(0, 59),
            Self::SecondOfMinute => FieldRange::new(0, 59),
            Self::MinuteOfDay => FieldRange::new(0, 1_439),
            Self::SecondOfDay => FieldRange::new(0, 86_399),
            Self::NanoOfSecond => FieldRange::new(0, 999_999_999),
            Self::MicroOfSecond => FieldRange::new(0, 999_999),
            Self::MilliOfSecond => FieldRange::new(0, 999),
            Self::InstantSeconds => FieldRange::new(i64::MIN, i64::MAX),
            Self::OffsetSeconds => FieldRange::new(-64_800, 64_800),
        }
    }

    /// Returns the fields this field may derive its value from.
    ///
    /// This is the explicit dependency data of the derivation graph.
    /// The graph must stay acyclic; [`verify_derivation_graph`] walks it.
    pub fn derivation_sources(self) -> &'static [ChronoField] {
        match self {
            // The fraction fields are views of one nanosecond value:
            // the finest stored fraction wins, and a parsed seconds
            // value with no fraction at all has zero nanos. They
            // consult each other's stored entries only, so the walk
            // treats the three as a single node.
            Self::NanoOfSecond => &[
                ChronoField::MicroOfSecond,
                ChronoField::MilliOfSecond,
                ChronoField::InstantSeconds,
                ChronoField::SecondOfDay,
                ChronoField::SecondOfMinute,
            ],
            Self::MicroOfSecond => &[
                ChronoField::NanoOfSecond,
                ChronoField::MilliOfSecond,
                ChronoField::InstantSeconds,
                ChronoField::SecondOfDay,
                ChronoField::SecondOfMinute,
            ],
            Self::MilliOfSecond => &[
                ChronoField::NanoOfSecond,
                ChronoField::MicroOfSecond,
                ChronoField::InstantSeconds,
                ChronoField::SecondOfDay,
                ChronoField::SecondOfMinute,
            ],
            Self::SecondOfDay => &[
                ChronoField::HourOfDay,
                ChronoField::MinuteOfHour,
                ChronoField::SecondOfMinute,
                ChronoField::InstantSeconds,
                ChronoField::OffsetSeconds,
            ],
            Self::MinuteOfDay => &[
                ChronoField::HourOfDay,
                ChronoField::MinuteOfHour,
                ChronoField::SecondOfDay,
            ],
            Self::EpochDay => &[ChronoField::InstantSeconds, ChronoField::OffsetSeconds],
            _ => &[],
        }
    }

    /// Attempts to derive this field's value from the bag's stored
    /// entries.
    ///
    /// Where a field supports multiple derivation paths, the
    /// least-derived path is tried first: stored source fields win over
    /// sources that are themselves derived.
    pub(crate) fn derive_from(self, bag: &ParsedFields) -> Option<i64> {
        let derived = match self {
            Self::NanoOfSecond => fraction_nanos(bag),
            Self::MicroOfSecond => fraction_nanos(bag).map(|nano| nano / 1_000),
            Self::MilliOfSecond => fraction_nanos(bag).map(|nano| nano / 1_000_000),
            Self::SecondOfDay => second_of_day(bag),
            Self::MinuteOfDay => minute_of_day(bag),
            Self::EpochDay => {
                let secs = bag.stored(Self::InstantSeconds)?;
                let offset = bag.known_offset()?;
                secs.checked_add(offset.seconds())
                    .map(|local| local.div_euclid(SECONDS_PER_DAY))
            }
            _ => None,
        };
        // A derivation never produces a value outside the declared
        // range; instants near i64::MAX would overflow the epoch-day
        // range, so such results are treated as underivable.
        derived.filter(|v| self.valid_range().contains(*v))
    }

    /// Returns whether the field is stored in, or derivable from, the
    /// provided bag.
    pub fn is_supported_by(self, bag: &ParsedFields) -> bool {
        bag.stored(self).is_some() || self.derive_from(bag).is_some()
    }
}

/// The nanosecond value the bag's stored fraction fields describe: the
/// finest stored fraction scaled up, else zero when a whole-seconds
/// field fixes the fraction as absent. Consults stored entries only.
pub(crate) fn fraction_nanos(bag: &ParsedFields) -> Option<i64> {
    if let Some(nanos) = bag.stored(ChronoField::NanoOfSecond) {
        return Some(nanos);
    }
    if let Some(micros) = bag.stored(ChronoField::MicroOfSecond) {
        return Some(micros * 1_000);
    }
    if let Some(millis) = bag.stored(ChronoField::MilliOfSecond) {
        return Some(millis * 1_000_000);
    }
    let has_seconds = bag.stored(ChronoField::InstantSeconds).is_some()
        || bag.stored(ChronoField::SecondOfDay).is_some()
        || bag.stored(ChronoField::SecondOfMinute).is_some();
    has_seconds.then_some(0)
}

fn second_of_day(bag: &ParsedFields) -> Option<i64> {
    if let (Some(hour), Some(minute), Some(second)) = (
        bag.stored(ChronoField::HourOfDay),
        bag.stored(ChronoField::MinuteOfHour),
        bag.stored(ChronoField::SecondOfMinute),
    ) {
        return Some(hour * 3_600 + minute * 60 + second);
    }
    // An instant alone cannot place a day boundary; it needs an offset.
    let secs = bag.stored(ChronoField::InstantSeconds)?;
    let offset = bag.known_offset()?;
    secs.checked_add(offset.seconds())
        .map(|local| local.rem_euclid(SECONDS_PER_DAY))
}

fn minute_of_day(bag: &ParsedFields) -> Option<i64> {
    if let (Some(hour), Some(minute)) = (
        bag.stored(ChronoField::HourOfDay),
        bag.stored(ChronoField::MinuteOfHour),
    ) {
        return Some(hour * 60 + minute);
    }
    bag.stored(ChronoField::SecondOfDay)
        .or_else(|| ChronoField::SecondOfDay.derive_from(bag))
        .map(|sod| sod / 60)
}

/// Walks the declared derivation graph and returns the first field found
/// on a cycle, if any.
///
/// The three fraction fields consult each other's stored entries only
/// and never recurse, so they collapse to a single node for the walk;
/// any other cycle would mean unbounded derivation depth. The graph is
/// static data, so one walk validates the whole registry.
pub fn verify_derivation_graph() -> Result<(), ChronoField> {
    fn node(field: ChronoField) -> ChronoField {
        match field {
            ChronoField::MicroOfSecond | ChronoField::MilliOfSecond => ChronoField::NanoOfSecond,
            other => other,
        }
    }

    fn visit(field: ChronoField, path: &mut alloc::vec::Vec<ChronoField>) -> Result<(), ChronoField> {
        if path.contains(&node(field)) {
            return Err(field);
        }
        path.push(node(field));
        for &source in field.derivation_sources() {
            if node(source) != node(field) {
                visit(source, path)?;
            }
        }
        path.pop();
        Ok(())
    }

    let mut path = alloc::vec::Vec::new();
    for &field in ALL_FIELDS {
        visit(field, &mut path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone::UtcOffsetSeconds;

    #[test]
    fn derivation_graph_is_acyclic() {
        assert_eq!(verify_derivation_graph(), Ok(()));
    }

    #[test]
    fn fractional_fields_default_to_zero_from_seconds() {
        // A bag with only instant-seconds supports the fractional
        // fields, all derived as zero.
        let bag = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 86_402)
            .unwrap();
        assert!(ChronoField::NanoOfSecond.is_supported_by(&bag));
        assert!(ChronoField::MicroOfSecond.is_supported_by(&bag));
        assert!(ChronoField::MilliOfSecond.is_supported_by(&bag));
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 0);
        assert_eq!(bag.get(ChronoField::MicroOfSecond).unwrap(), 0);
        assert_eq!(bag.get(ChronoField::MilliOfSecond).unwrap(), 0);

        // Same for second-of-day and second-of-minute.
        let bag = ParsedFields::new()
            .with(ChronoField::SecondOfDay, 864)
            .unwrap();
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 0);

        let bag = ParsedFields::new()
            .with(ChronoField::SecondOfMinute, 32)
            .unwrap();
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 0);
        assert_eq!(bag.get(ChronoField::MilliOfSecond).unwrap(), 0);
    }

    #[test]
    fn stored_fractions_feed_the_nanosecond() {
        // A directly parsed coarse fraction beats the zero default.
        let bag = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 86_402)
            .unwrap()
            .with(ChronoField::MilliOfSecond, 123)
            .unwrap();
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 123_000_000);
        assert_eq!(bag.get(ChronoField::MicroOfSecond).unwrap(), 123_000);

        let bag = ParsedFields::new()
            .with(ChronoField::MicroOfSecond, 123_456)
            .unwrap();
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 123_456_000);
        assert_eq!(bag.get(ChronoField::MilliOfSecond).unwrap(), 123);

        // The finest stored fraction wins over coarser ones.
        let bag = ParsedFields::new()
            .with(ChronoField::NanoOfSecond, 987_654_321)
            .unwrap()
            .with(ChronoField::MilliOfSecond, 123)
            .unwrap();
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 987_654_321);
    }

    #[test]
    fn micro_and_milli_truncate_toward_zero() {
        let bag = ParsedFields::new()
            .with(ChronoField::SecondOfDay, 864)
            .unwrap()
            .with(ChronoField::NanoOfSecond, 123_456_789)
            .unwrap();
        assert_eq!(bag.get(ChronoField::MicroOfSecond).unwrap(), 123_456);
        assert_eq!(bag.get(ChronoField::MilliOfSecond).unwrap(), 123);
    }

    #[test]
    fn second_of_day_from_time_fields() {
        let bag = ParsedFields::new()
            .with(ChronoField::HourOfDay, 1)
            .unwrap()
            .with(ChronoField::MinuteOfHour, 2)
            .unwrap()
            .with(ChronoField::SecondOfMinute, 3)
            .unwrap();
        assert_eq!(bag.get(ChronoField::SecondOfDay).unwrap(), 3_723);
        assert_eq!(bag.get(ChronoField::MinuteOfDay).unwrap(), 62);
    }

    #[test]
    fn second_of_day_from_instant_needs_offset() {
        let bag = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 86_402)
            .unwrap();
        assert!(!ChronoField::SecondOfDay.is_supported_by(&bag));
        assert!(!ChronoField::EpochDay.is_supported_by(&bag));

        let bag = bag.with_offset(UtcOffsetSeconds::default());
        assert_eq!(bag.get(ChronoField::SecondOfDay).unwrap(), 2);
        assert_eq!(bag.get(ChronoField::EpochDay).unwrap(), 1);
    }

    #[test]
    fn second_of_day_honours_negative_instants() {
        // -1 second before the epoch, UTC: 23:59:59 on the previous day.
        let bag = ParsedFields::new()
            .with(ChronoField::InstantSeconds, -1)
            .unwrap()
            .with_offset(UtcOffsetSeconds::default());
        assert_eq!(bag.get(ChronoField::SecondOfDay).unwrap(), 86_399);
        assert_eq!(bag.get(ChronoField::EpochDay).unwrap(), -1);
    }

    #[test]
    fn minute_of_day_prefers_stored_hour_and_minute() {
        let bag = ParsedFields::new()
            .with(ChronoField::HourOfDay, 23)
            .unwrap()
            .with(ChronoField::MinuteOfHour, 59)
            .unwrap();
        assert_eq!(bag.get(ChronoField::MinuteOfDay).unwrap(), 1_439);

        let bag = ParsedFields::new()
            .with(ChronoField::SecondOfDay, 7_260)
            .unwrap();
        assert_eq!(bag.get(ChronoField::MinuteOfDay).unwrap(), 121);
    }

    #[test]
    fn ranges_reject_out_of_bounds() {
        assert!(ChronoField::SecondOfMinute.valid_range().contains(59));
        assert!(!ChronoField::SecondOfMinute.valid_range().contains(60));
        assert!(!ChronoField::NanoOfSecond.valid_range().contains(-1));
        assert!(ChronoField::OffsetSeconds.valid_range().contains(9_000));
    }
}
