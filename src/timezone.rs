//! Zone offsets and time zone identifiers.

use alloc::string::String;
use core::fmt;
use core::iter::Peekable;
use core::str::{Chars, FromStr};

use crate::error::CalendricalError;
use crate::provider::TimeZoneProvider;
use crate::CalendricalResult;

/// A zone offset in seconds east of the reference meridian.
///
/// `+02:30` is 9 000 seconds; offsets west of the meridian are negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffsetSeconds(i64);

impl UtcOffsetSeconds {
    /// Wraps a seconds-east value.
    pub const fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Builds an offset from whole hours and minutes, both carrying the
    /// sign of the offset.
    pub const fn from_hours_minutes(hours: i64, minutes: i64) -> Self {
        Self(hours * 3_600 + minutes * 60)
    }

    /// Returns the offset in seconds east.
    pub const fn seconds(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UtcOffsetSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        let (hour, rem) = (abs / 3_600, abs % 3_600);
        write!(f, "{sign}{hour:02}:{:02}", rem / 60)?;
        if rem % 60 != 0 {
            write!(f, ":{:02}", rem % 60)?;
        }
        Ok(())
    }
}

impl FromStr for UtcOffsetSeconds {
    type Err = CalendricalError;

    /// Parses `Z`, `±hh`, `±hh:mm`, `±hhmm`, or `±hh:mm:ss`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Z" {
            return Ok(Self(0));
        }
        let mut chars = s.chars().peekable();
        if !chars.peek().is_some_and(is_ascii_sign) {
            return Err(
                CalendricalError::range().with_message("Offset string must begin with a sign")
            );
        }
        let offset = parse_offset(&mut chars)?;
        if chars.peek().is_some() {
            return Err(
                CalendricalError::range().with_message("Trailing input after offset string")
            );
        }
        Ok(offset)
    }
}

/// A resolved time zone: either an IANA region identifier or a fixed
/// offset with no regional rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeZone {
    IanaIdentifier(String),
    Offset(UtcOffsetSeconds),
}

impl TimeZone {
    /// Parses a `TimeZone` from a provided `&str`, validating region
    /// identifiers against the provider.
    pub fn try_from_str_with_provider(
        source: &str,
        provider: &impl TimeZoneProvider,
    ) -> CalendricalResult<Self> {
        if source == "Z" {
            return Ok(TimeZone::Offset(UtcOffsetSeconds::default()));
        }
        let mut cursor = source.chars().peekable();
        if cursor.peek().is_some_and(is_ascii_sign) {
            return parse_offset(&mut cursor).map(TimeZone::Offset);
        } else if provider.check_identifier(source) {
            return Ok(TimeZone::IanaIdentifier(source.into()));
        }
        Err(CalendricalError::range().with_message("Valid time zone was not provided."))
    }

    /// Returns the zone's identifier: the region name, or the formatted
    /// offset for fixed-offset zones.
    pub fn identifier(&self) -> String {
        use alloc::string::ToString;
        match self {
            TimeZone::IanaIdentifier(id) => id.clone(),
            TimeZone::Offset(offset) => offset.to_string(),
        }
    }
}

pub(crate) fn parse_offset(chars: &mut Peekable<Chars<'_>>) -> CalendricalResult<UtcOffsetSeconds> {
    let sign = chars.next().map_or(1, |c| if c == '+' { 1 } else { -1 });
    let hours = parse_digit_pair(chars)?;

    let sep = chars.peek().is_some_and(|ch| *ch == ':');
    if sep {
        let _ = chars.next();
    }
    let minutes = match chars.peek().map(char::is_ascii_digit) {
        Some(true) => parse_digit_pair(chars)?,
        Some(false) => return Err(non_ascii_digit()),
        None => 0,
    };

    let sep = chars.peek().is_some_and(|ch| *ch == ':');
    if sep {
        let _ = chars.next();
    }
    let seconds = match chars.peek().map(char::is_ascii_digit) {
        Some(true) => parse_digit_pair(chars)?,
        Some(false) => return Err(non_ascii_digit()),
        None => 0,
    };

    if !(0..=59).contains(&minutes) || !(0..=59).contains(&seconds) || hours > 18 {
        return Err(CalendricalError::range().with_message("Offset is outside the legal range"));
    }
    Ok(UtcOffsetSeconds::new(
        sign * (hours * 3_600 + minutes * 60 + seconds),
    ))
}

fn parse_digit_pair(chars: &mut Peekable<Chars<'_>>) -> CalendricalResult<i64> {
    let mut value = 0i64;
    for _ in 0..2 {
        let Some(ch) = chars.next() else {
            return Err(abrupt_end());
        };
        let Some(digit) = ch.to_digit(10) else {
            return Err(non_ascii_digit());
        };
        value = value * 10 + i64::from(digit);
    }
    Ok(value)
}

pub(crate) fn abrupt_end() -> CalendricalError {
    CalendricalError::range().with_message("Abrupt end while parsing offset string")
}

pub(crate) fn non_ascii_digit() -> CalendricalError {
    CalendricalError::range().with_message("Non ascii digit found while parsing offset string")
}

pub(crate) fn is_ascii_sign(ch: &char) -> bool {
    *ch == '+' || *ch == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PosixTzProvider;
    use alloc::string::ToString;

    #[test]
    fn offset_from_and_to_string() {
        for src in ["+09:30", "-09:30", "+02:30", "-12:30"] {
            let offset = UtcOffsetSeconds::from_str(src).unwrap();
            assert_eq!(offset.to_string(), src);
        }
        assert_eq!(UtcOffsetSeconds::from_str("Z").unwrap().seconds(), 0);
        assert_eq!(UtcOffsetSeconds::from_str("+02").unwrap().seconds(), 7_200);
        assert_eq!(UtcOffsetSeconds::from_str("+0230").unwrap().seconds(), 9_000);
        assert_eq!(
            UtcOffsetSeconds::from_str("-01:30:30").unwrap().seconds(),
            -5_430
        );
    }

    #[test]
    fn malformed_offsets_rejected() {
        for bad in ["+2", "+02:3", "02:30", "+02:cd", "+19:00", "+02:61"] {
            assert!(UtcOffsetSeconds::from_str(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn zone_from_str() {
        let provider = PosixTzProvider;
        let zone = TimeZone::try_from_str_with_provider("Europe/Paris", &provider).unwrap();
        assert_eq!(zone.identifier(), "Europe/Paris");

        let zone = TimeZone::try_from_str_with_provider("+02:30", &provider).unwrap();
        assert_eq!(zone, TimeZone::Offset(UtcOffsetSeconds::new(9_000)));

        assert!(TimeZone::try_from_str_with_provider("Mars/Olympus", &provider).is_err());
    }
}
