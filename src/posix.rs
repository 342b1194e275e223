//! POSIX time zone strings.
//!
//! A POSIX TZ string such as `"CET-1CEST,M3.5.0,M10.5.0/3"` describes a
//! zone's standard offset plus an optional pair of daylight saving
//! transition rules. [`PosixTimeZone::parse`] reads the string form and
//! [`PosixTimeZone::offset_for_epoch_seconds`] evaluates the rules for
//! a point on the UTC timeline.

use crate::error::CalendricalError;
use crate::timezone::{abrupt_end, is_ascii_sign, non_ascii_digit, UtcOffsetSeconds};
use crate::utils;
use crate::{CalendricalResult, SECONDS_PER_DAY};

use core::iter::Peekable;
use core::str::Chars;

use num_traits::Euclid;
use tinystr::TinyAsciiStr;

/// A transition date within a rule year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixDate {
    /// `Jn`: day of year 1..=365, February 29 never counted.
    JulianNoLeap(u16),
    /// `n`: zero-based day of year 0..=365, February 29 counted.
    JulianLeap(u16),
    /// `Mm.w.d`: day `d` (0 = Sunday) of week `w` (5 = last) of month `m`.
    MonthWeekDay(u8, u8, u8),
}

impl PosixDate {
    /// Epoch day on which this rule fires in `year`.
    fn epoch_day_for_year(&self, year: i64) -> CalendricalResult<i64> {
        let start_of_year = utils::iso_epoch_days(year, 1, 1);
        Ok(match *self {
            Self::JulianNoLeap(n) => {
                let mut doy = i64::from(n) - 1;
                if doy >= 59 && utils::is_iso_leap_year(year as i32) {
                    doy += 1;
                }
                start_of_year + doy
            }
            Self::JulianLeap(n) => start_of_year + i64::from(n),
            Self::MonthWeekDay(month, week, weekday) => {
                let first = start_of_year + utils::iso_day_of_year_for_month(year as i32, month);
                let first_dow = utils::day_of_week(first);
                let offset_to_weekday = i64::from(weekday)
                    .wrapping_sub(i64::from(first_dow))
                    .rem_euclid(7);
                let mut day = offset_to_weekday + 7 * (i64::from(week) - 1);
                let days_in_month = i64::from(utils::iso_days_in_month(year as i32, month)?);
                while day >= days_in_month {
                    day -= 7;
                }
                first + day
            }
        })
    }
}

/// A transition rule: a date plus a wall clock time of day in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixDateTime {
    pub date: PosixDate,
    /// Wall clock seconds from local midnight. Defaults to 02:00:00.
    pub time: i64,
}

impl PosixDateTime {
    /// Epoch seconds at which this rule fires in `year`, given the
    /// offset in effect before the transition. The rule time is wall
    /// clock, so the prior offset converts it to the UTC timeline.
    fn transition_epoch(&self, year: i64, offset_before: i64) -> CalendricalResult<i64> {
        Ok(self.date.epoch_day_for_year(year)? * SECONDS_PER_DAY + self.time - offset_before)
    }
}

/// The daylight saving half of a TZ string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixTransition {
    pub abbr: TinyAsciiStr<8>,
    /// Daylight offset, seconds east of Greenwich.
    pub offset: i64,
    pub start: PosixDateTime,
    pub end: PosixDateTime,
}

/// A parsed POSIX time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixTimeZone {
    pub abbr: TinyAsciiStr<8>,
    /// Standard offset, seconds east of Greenwich.
    pub offset: i64,
    pub transition: Option<PosixTransition>,
}

impl PosixTimeZone {
    /// Parses a TZ string such as `"EST5EDT,M3.2.0,M11.1.0"`.
    pub fn parse(source: &str) -> CalendricalResult<Self> {
        let mut chars = source.chars().peekable();
        let abbr = parse_abbreviation(&mut chars)?;
        // TZ offsets are seconds west of Greenwich; negate for east.
        let offset = -parse_posix_offset(&mut chars)?;
        if chars.peek().is_none() {
            return Ok(Self {
                abbr,
                offset,
                transition: None,
            });
        }
        let dst_abbr = parse_abbreviation(&mut chars)?;
        let dst_offset = match chars.peek() {
            Some(',') | None => offset + 3_600,
            _ => -parse_posix_offset(&mut chars)?,
        };
        expect_char(&mut chars, ',')?;
        let start = parse_rule(&mut chars)?;
        expect_char(&mut chars, ',')?;
        let end = parse_rule(&mut chars)?;
        if chars.next().is_some() {
            return Err(CalendricalError::range()
                .with_message("Unexpected trailing input in POSIX tz string"));
        }
        Ok(Self {
            abbr,
            offset,
            transition: Some(PosixTransition {
                abbr: dst_abbr,
                offset: dst_offset,
                start,
                end,
            }),
        })
    }

    /// The offsets this zone can ever observe, standard first.
    pub(crate) fn possible_offsets(&self) -> (i64, Option<i64>) {
        (self.offset, self.transition.map(|t| t.offset))
    }

    /// UTC offset in effect at a point on the UTC timeline.
    pub fn offset_for_epoch_seconds(&self, epoch_seconds: i64) -> CalendricalResult<UtcOffsetSeconds> {
        let Some(transition) = &self.transition else {
            return Ok(UtcOffsetSeconds::new(self.offset));
        };
        let (epoch_day, _) = epoch_seconds.div_rem_euclid(&SECONDS_PER_DAY);
        let (year, _, _) = utils::iso_date_from_epoch_days(epoch_day);
        let dst_start = transition.start.transition_epoch(year, self.offset)?;
        let dst_end = transition.end.transition_epoch(year, transition.offset)?;
        // Northern hemisphere rules run STD -> DST -> STD within the
        // year; southern hemisphere rules invert that.
        let in_dst = if dst_start <= dst_end {
            (dst_start..dst_end).contains(&epoch_seconds)
        } else {
            !(dst_end..dst_start).contains(&epoch_seconds)
        };
        Ok(if in_dst {
            UtcOffsetSeconds::new(transition.offset)
        } else {
            UtcOffsetSeconds::new(self.offset)
        })
    }
}

fn expect_char(chars: &mut Peekable<Chars<'_>>, expected: char) -> CalendricalResult<()> {
    match chars.next() {
        Some(c) if c == expected => Ok(()),
        Some(_) => Err(CalendricalError::range()
            .with_message("Unexpected character in POSIX tz string")),
        None => Err(abrupt_end()),
    }
}

fn parse_abbreviation(chars: &mut Peekable<Chars<'_>>) -> CalendricalResult<TinyAsciiStr<8>> {
    let mut buf = [0u8; 8];
    let mut len = 0;
    let bracketed = chars.next_if_eq(&'<').is_some();
    loop {
        let Some(&ch) = chars.peek() else { break };
        let accepted = if bracketed {
            ch != '>'
        } else {
            ch.is_ascii_alphabetic()
        };
        if !accepted {
            break;
        }
        if len == buf.len() {
            return Err(
                CalendricalError::range().with_message("Time zone abbreviation too long")
            );
        }
        if !ch.is_ascii() {
            return Err(CalendricalError::range()
                .with_message("Time zone abbreviation must be ASCII"));
        }
        buf[len] = ch as u8;
        len += 1;
        chars.next();
    }
    if bracketed && chars.next() != Some('>') {
        return Err(abrupt_end());
    }
    if len < 3 {
        return Err(CalendricalError::range()
            .with_message("Time zone abbreviation must be at least three characters"));
    }
    TinyAsciiStr::try_from_utf8(&buf[..len])
        .map_err(|_| CalendricalError::range().with_message("Invalid time zone abbreviation"))
}

/// Parses `[+|-]hh[:mm[:ss]]` as signed seconds. Used for both the
/// offset part (where the sign means west) and rule `/time` suffixes.
fn parse_posix_offset(chars: &mut Peekable<Chars<'_>>) -> CalendricalResult<i64> {
    let negative = match chars.peek() {
        Some(ch) if is_ascii_sign(ch) => chars.next() == Some('-'),
        _ => false,
    };
    let hours = parse_number(chars, 167)?;
    let mut seconds = hours * 3_600;
    if chars.next_if_eq(&':').is_some() {
        seconds += parse_number(chars, 59)? * 60;
        if chars.next_if_eq(&':').is_some() {
            seconds += parse_number(chars, 59)?;
        }
    }
    Ok(if negative { -seconds } else { seconds })
}

fn parse_number(chars: &mut Peekable<Chars<'_>>, max: i64) -> CalendricalResult<i64> {
    let mut value: i64 = 0;
    let mut digits = 0;
    while let Some(&ch) = chars.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        value = value * 10 + i64::from(ch as u8 - b'0');
        digits += 1;
        chars.next();
        if digits > 3 {
            break;
        }
    }
    if digits == 0 {
        return Err(non_ascii_digit());
    }
    if value > max {
        return Err(CalendricalError::range().with_message("Number out of range in tz string"));
    }
    Ok(value)
}

fn parse_rule(chars: &mut Peekable<Chars<'_>>) -> CalendricalResult<PosixDateTime> {
    let date = match chars.peek() {
        Some('M') => {
            chars.next();
            let month = parse_number(chars, 12)?;
            expect_char(chars, '.')?;
            let week = parse_number(chars, 5)?;
            expect_char(chars, '.')?;
            let weekday = parse_number(chars, 6)?;
            if month == 0 || week == 0 {
                return Err(
                    CalendricalError::range().with_message("Invalid Mm.w.d rule in tz string")
                );
            }
            PosixDate::MonthWeekDay(month as u8, week as u8, weekday as u8)
        }
        Some('J') => {
            chars.next();
            let day = parse_number(chars, 365)?;
            if day == 0 {
                return Err(
                    CalendricalError::range().with_message("Invalid Julian day in tz string")
                );
            }
            PosixDate::JulianNoLeap(day as u16)
        }
        Some(_) => PosixDate::JulianLeap(parse_number(chars, 365)? as u16),
        None => return Err(abrupt_end()),
    };
    let time = if chars.next_if_eq(&'/').is_some() {
        parse_posix_offset(chars)?
    } else {
        7_200
    };
    Ok(PosixDateTime { date, time })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_zone() {
        let zone = PosixTimeZone::parse("UTC0").unwrap();
        assert_eq!(zone.abbr.as_str(), "UTC");
        assert_eq!(zone.offset, 0);
        assert!(zone.transition.is_none());
    }

    #[test]
    fn parses_paris() {
        let zone = PosixTimeZone::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        assert_eq!(zone.abbr.as_str(), "CET");
        assert_eq!(zone.offset, 3_600);
        let transition = zone.transition.unwrap();
        assert_eq!(transition.abbr.as_str(), "CEST");
        assert_eq!(transition.offset, 7_200);
        assert_eq!(transition.start.date, PosixDate::MonthWeekDay(3, 5, 0));
        assert_eq!(transition.start.time, 7_200);
        assert_eq!(transition.end.date, PosixDate::MonthWeekDay(10, 5, 0));
        assert_eq!(transition.end.time, 10_800);
    }

    #[test]
    fn parses_bracketed_numeric_abbreviation() {
        let zone = PosixTimeZone::parse("<-03>3").unwrap();
        assert_eq!(zone.abbr.as_str(), "-03");
        assert_eq!(zone.offset, -10_800);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(PosixTimeZone::parse("").is_err());
        assert!(PosixTimeZone::parse("CE").is_err());
        assert!(PosixTimeZone::parse("CET-1CEST").is_err());
        assert!(PosixTimeZone::parse("CET-1CEST,M3.5.0").is_err());
        assert!(PosixTimeZone::parse("CET-1CEST,M3.5.0,M10.5.0/3junk").is_err());
    }

    #[test]
    fn paris_autumn_transition() {
        // Paris falls back 2016-10-30T01:00Z. Epoch day 17104.
        let zone = PosixTimeZone::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        let transition = 17_104 * 86_400 + 3_600;
        assert_eq!(
            zone.offset_for_epoch_seconds(transition - 1).unwrap().seconds(),
            7_200
        );
        assert_eq!(zone.offset_for_epoch_seconds(transition).unwrap().seconds(), 3_600);
        // 2016-10-30T00:30Z is still summer time.
        assert_eq!(
            zone.offset_for_epoch_seconds(1_477_787_400).unwrap().seconds(),
            7_200
        );
    }

    #[test]
    fn new_york_spring_transition() {
        // New York springs forward 2016-03-13T07:00Z (02:00 EST).
        let zone = PosixTimeZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        let epoch_day = utils::iso_epoch_days(2016, 3, 13);
        let transition = epoch_day * 86_400 + 7 * 3_600;
        assert_eq!(
            zone.offset_for_epoch_seconds(transition - 1).unwrap().seconds(),
            -18_000
        );
        assert_eq!(
            zone.offset_for_epoch_seconds(transition).unwrap().seconds(),
            -14_400
        );
    }

    #[test]
    fn southern_hemisphere_rules() {
        // Sydney: DST from the first Sunday of October to the first
        // Sunday of April.
        let zone = PosixTimeZone::parse("AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
        let july = utils::iso_epoch_days(2016, 7, 1) * 86_400;
        let january = utils::iso_epoch_days(2016, 1, 15) * 86_400;
        let december = utils::iso_epoch_days(2016, 12, 15) * 86_400;
        assert_eq!(zone.offset_for_epoch_seconds(july).unwrap().seconds(), 36_000);
        assert_eq!(zone.offset_for_epoch_seconds(january).unwrap().seconds(), 39_600);
        assert_eq!(zone.offset_for_epoch_seconds(december).unwrap().seconds(), 39_600);
    }

    #[test]
    fn julian_rules_skip_leap_day() {
        // J60 is always March 1; zero-based 60 counts February 29.
        assert_eq!(
            PosixDate::JulianNoLeap(60).epoch_day_for_year(2016).unwrap(),
            utils::iso_epoch_days(2016, 3, 1)
        );
        assert_eq!(
            PosixDate::JulianLeap(60).epoch_day_for_year(2016).unwrap(),
            utils::iso_epoch_days(2016, 3, 1)
        );
        assert_eq!(
            PosixDate::JulianLeap(60).epoch_day_for_year(2015).unwrap(),
            utils::iso_epoch_days(2015, 3, 2)
        );
    }

    #[test]
    fn last_weekday_of_month() {
        // Last Sunday of October 2016 is the 30th.
        assert_eq!(
            PosixDate::MonthWeekDay(10, 5, 0).epoch_day_for_year(2016).unwrap(),
            utils::iso_epoch_days(2016, 10, 30)
        );
        // Second Sunday of March 2016 is the 13th.
        assert_eq!(
            PosixDate::MonthWeekDay(3, 2, 0).epoch_day_for_year(2016).unwrap(),
            utils::iso_epoch_days(2016, 3, 13)
        );
    }
}
