//! Era singletons and their per-calendar registries.
//!
//! An era's integer value is an explicit stored field, never inferred
//! from declaration order: relying on positional ordering is a latent
//! correctness hazard if the two ever diverge, so lookup matches on the
//! stored value and `value()` returns it unchanged.

use tinystr::{tinystr, TinyAsciiStr};

use crate::calendar::CalendarId;
use crate::error::CalendricalError;
use crate::CalendricalResult;

/// A named, ordinal-valued epoch marker within a calendar system.
///
/// Eras are immutable process-wide singletons; obtain them through
/// [`Era::of`] or [`CalendarId::eras`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Era {
    calendar: CalendarId,
    value: u8,
    name: TinyAsciiStr<8>,
}

impl Era {
    const fn new(calendar: CalendarId, value: u8, name: TinyAsciiStr<8>) -> Self {
        Self {
            calendar,
            value,
            name,
        }
    }

    /// Looks up the era of `calendar` with the given numeric value,
    /// failing with `InvalidEra` when no era carries that value.
    pub fn of(calendar: CalendarId, value: i64) -> CalendricalResult<Self> {
        calendar
            .eras()
            .iter()
            .find(|era| i64::from(era.value) == value)
            .copied()
            .ok_or_else(|| CalendricalError::invalid_era(value))
    }

    /// Returns the numeric value this era was registered with.
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Returns the era's abbreviated name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the calendar system this era belongs to.
    pub const fn calendar(self) -> CalendarId {
        self.calendar
    }
}

/// Before Common Era / Common Era, proleptic ISO.
pub(crate) const ISO_ERAS: &[Era] = &[
    Era::new(CalendarId::Iso8601, 0, tinystr!(8, "BCE")),
    Era::new(CalendarId::Iso8601, 1, tinystr!(8, "CE")),
];

/// Before the Era of the Martyrs / Era of the Martyrs.
pub(crate) const COPTIC_ERAS: &[Era] = &[
    Era::new(CalendarId::Coptic, 0, tinystr!(8, "BAM")),
    Era::new(CalendarId::Coptic, 1, tinystr!(8, "AM")),
];
