//! Utility date equations shared by the chronologies and the POSIX
//! rule evaluator.

use crate::error::CalendricalError;
use crate::CalendricalResult;

/// Returns whether `year` is a leap year in the proleptic Gregorian
/// calendar.
pub(crate) fn is_iso_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// `ISODaysInMonth ( year, month )`
///
/// Callers validate the month first; a value outside 1..=12 is an
/// internal invariant breach.
pub(crate) fn iso_days_in_month(year: i32, month: u8) -> CalendricalResult<u8> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_iso_leap_year(year) => Ok(29),
        2 => Ok(28),
        _ => Err(CalendricalError::assert().with_message("month outside 1..=12")),
    }
}

/// Days from the start of the year to the first of `month` (1-based),
/// zero-based.
pub(crate) fn iso_day_of_year_for_month(year: i32, month: u8) -> i64 {
    const DAYS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let mut days = DAYS[usize::from(month - 1)];
    if month > 2 && is_iso_leap_year(year) {
        days += 1;
    }
    days
}

/// Returns the epoch day (days since 1970-01-01) for a proleptic
/// Gregorian date. The month/day pair must already be valid.
///
/// Euclidean affine rendition of the civil-from-days family of
/// equations; exact over the supported year range.
pub(crate) fn iso_epoch_days(year: i64, month: i64, day: i64) -> i64 {
    let y = year - i64::from(month <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9).rem_euclid(12);
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`iso_epoch_days`]: splits an epoch day into a proleptic
/// Gregorian `(year, month, day)`.
pub(crate) fn iso_date_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let z = epoch_days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    (y + i64::from(month <= 2), month as u8, day as u8)
}

/// Day of week for an epoch day, 0 = Sunday. 1970-01-01 is a Thursday.
pub(crate) fn day_of_week(epoch_days: i64) -> u8 {
    (epoch_days + 4).rem_euclid(7) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trips() {
        let cases = [
            (1970, 1, 1, 0),
            (1970, 1, 2, 1),
            (1969, 12, 31, -1),
            (2000, 3, 1, 11_017),
            (2014, 6, 30, 16_251),
            (2016, 10, 30, 17_104),
            (284, 8, 29, -615_558),
            (0, 1, 1, -719_528),
            (-1, 12, 31, -719_529),
        ];
        for (year, month, day, expected) in cases {
            assert_eq!(
                iso_epoch_days(year, month, day),
                expected,
                "{year}-{month}-{day}"
            );
            assert_eq!(
                iso_date_from_epoch_days(expected),
                (year, month as u8, day as u8),
                "epoch day {expected}"
            );
        }
    }

    #[test]
    fn leap_years() {
        assert!(is_iso_leap_year(2000));
        assert!(is_iso_leap_year(2016));
        assert!(is_iso_leap_year(284));
        assert!(!is_iso_leap_year(1900));
        assert!(!is_iso_leap_year(2014));
        assert_eq!(iso_days_in_month(2020, 2).unwrap(), 29);
        assert_eq!(iso_days_in_month(2021, 2).unwrap(), 28);
    }

    #[test]
    fn month_lengths() {
        let lengths = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (month, expected) in (1..=12).zip(lengths) {
            assert_eq!(iso_days_in_month(2021, month).unwrap(), expected);
        }
    }

    #[test]
    fn weekday_anchors() {
        // 1970-01-01 was a Thursday; 2016-10-30 a Sunday.
        assert_eq!(day_of_week(0), 4);
        assert_eq!(day_of_week(17_104), 0);
    }
}
