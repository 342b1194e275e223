//! Time zone providers.
//!
//! The resolver never evaluates zone rules itself. Everything it needs
//! from a region identifier goes through the [`TimeZoneProvider`]
//! trait, so an application can supply a full TZif-backed database.
//! [`PosixTzProvider`] is the built in implementation, backed by a
//! small table of POSIX TZ strings.

use crate::error::CalendricalError;
use crate::posix::PosixTimeZone;
use crate::timezone::UtcOffsetSeconds;
use crate::CalendricalResult;

/// The offsets a wall clock reading can map to within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimeRecord {
    /// The reading occurs exactly once.
    Single(UtcOffsetSeconds),
    /// The reading occurs twice, around a backward transition.
    Ambiguous {
        earlier: UtcOffsetSeconds,
        later: UtcOffsetSeconds,
    },
    /// The reading is skipped by a forward transition.
    Gap {
        before: UtcOffsetSeconds,
        after: UtcOffsetSeconds,
    },
}

impl LocalTimeRecord {
    /// Returns whether `offset` is attributable to the reading.
    pub fn permits(&self, offset: UtcOffsetSeconds) -> bool {
        match self {
            Self::Single(single) => *single == offset,
            Self::Ambiguous { earlier, later } => *earlier == offset || *later == offset,
            Self::Gap { .. } => false,
        }
    }
}

/// Capability trait for evaluating time zone rules.
///
/// Implementations must be pure with respect to their inputs so that a
/// shared reference can be used from multiple threads.
pub trait TimeZoneProvider {
    /// Returns whether `identifier` names a zone this provider knows.
    fn check_identifier(&self, identifier: &str) -> bool;

    /// UTC offset in effect at a point on the UTC timeline.
    fn offset_for_epoch_seconds(
        &self,
        identifier: &str,
        epoch_seconds: i64,
    ) -> CalendricalResult<UtcOffsetSeconds>;

    /// Classifies a wall clock reading, given as seconds on the local
    /// timeline, against the zone's transitions.
    fn local_time_record(
        &self,
        identifier: &str,
        local_seconds: i64,
    ) -> CalendricalResult<LocalTimeRecord>;
}

/// Built in provider over a fixed table of POSIX TZ strings.
///
/// The table covers the zones the test suites exercise; real
/// applications plug in a provider backed by the IANA database.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixTzProvider;

/// Identifier table, sorted by identifier for binary search.
const TZ_TABLE: &[(&str, &str)] = &[
    ("America/New_York", "EST5EDT,M3.2.0,M11.1.0"),
    ("Australia/Sydney", "AEST-10AEDT,M10.1.0,M4.1.0/3"),
    ("Europe/London", "GMT0BST,M3.5.0/1,M10.5.0"),
    ("Europe/Paris", "CET-1CEST,M3.5.0,M10.5.0/3"),
    ("UTC", "UTC0"),
];

impl PosixTzProvider {
    fn lookup(&self, identifier: &str) -> CalendricalResult<PosixTimeZone> {
        let index = TZ_TABLE
            .binary_search_by_key(&identifier, |(id, _)| id)
            .map_err(|_| {
                CalendricalError::range().with_message("Unknown time zone identifier")
            })?;
        PosixTimeZone::parse(TZ_TABLE[index].1)
    }
}

impl TimeZoneProvider for PosixTzProvider {
    fn check_identifier(&self, identifier: &str) -> bool {
        TZ_TABLE
            .binary_search_by_key(&identifier, |(id, _)| id)
            .is_ok()
    }

    fn offset_for_epoch_seconds(
        &self,
        identifier: &str,
        epoch_seconds: i64,
    ) -> CalendricalResult<UtcOffsetSeconds> {
        self.lookup(identifier)?
            .offset_for_epoch_seconds(epoch_seconds)
    }

    fn local_time_record(
        &self,
        identifier: &str,
        local_seconds: i64,
    ) -> CalendricalResult<LocalTimeRecord> {
        let zone = self.lookup(identifier)?;
        let (std, dst) = zone.possible_offsets();
        let Some(dst) = dst else {
            return Ok(LocalTimeRecord::Single(UtcOffsetSeconds::new(std)));
        };

        // A wall clock reading is attributable to an offset exactly
        // when re-evaluating the zone at the implied instant yields
        // that same offset.
        let mut candidates: [Option<i64>; 2] = [None, None];
        let mut count = 0;
        for offset in [std, dst] {
            let instant = local_seconds - offset;
            if zone.offset_for_epoch_seconds(instant)?.seconds() == offset {
                candidates[count] = Some(offset);
                count += 1;
            }
        }
        match (candidates[0], candidates[1]) {
            (Some(offset), None) => Ok(LocalTimeRecord::Single(UtcOffsetSeconds::new(offset))),
            (Some(a), Some(b)) => {
                // Both sides claim the reading. The earlier instant is
                // the one implied by the larger offset.
                let (earlier, later) = if a > b { (a, b) } else { (b, a) };
                Ok(LocalTimeRecord::Ambiguous {
                    earlier: UtcOffsetSeconds::new(earlier),
                    later: UtcOffsetSeconds::new(later),
                })
            }
            _ => {
                // Skipped reading. The offset before the gap is the
                // smaller one for a spring-forward transition.
                let (before, after) = if std < dst { (std, dst) } else { (dst, std) };
                Ok(LocalTimeRecord::Gap {
                    before: UtcOffsetSeconds::new(before),
                    after: UtcOffsetSeconds::new(after),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn table_is_sorted() {
        assert!(TZ_TABLE.windows(2).all(|w| w[0].0 < w[1].0));
        for (id, tz) in TZ_TABLE {
            assert!(PosixTimeZone::parse(tz).is_ok(), "{id}");
        }
    }

    #[test]
    fn identifier_checks() {
        let provider = PosixTzProvider;
        assert!(provider.check_identifier("Europe/Paris"));
        assert!(!provider.check_identifier("Europe/Nowhere"));
        assert!(provider
            .offset_for_epoch_seconds("Europe/Nowhere", 0)
            .is_err());
    }

    #[test]
    fn paris_ambiguous_reading() {
        // 2016-10-30T02:30 local occurs twice in Paris.
        let provider = PosixTzProvider;
        let local = utils::iso_epoch_days(2016, 10, 30) * 86_400 + 2 * 3_600 + 1_800;
        let record = provider.local_time_record("Europe/Paris", local).unwrap();
        assert_eq!(
            record,
            LocalTimeRecord::Ambiguous {
                earlier: UtcOffsetSeconds::new(7_200),
                later: UtcOffsetSeconds::new(3_600),
            }
        );
    }

    #[test]
    fn paris_skipped_reading() {
        // 2016-03-27T02:30 local does not exist in Paris.
        let provider = PosixTzProvider;
        let local = utils::iso_epoch_days(2016, 3, 27) * 86_400 + 2 * 3_600 + 1_800;
        let record = provider.local_time_record("Europe/Paris", local).unwrap();
        assert_eq!(
            record,
            LocalTimeRecord::Gap {
                before: UtcOffsetSeconds::new(3_600),
                after: UtcOffsetSeconds::new(7_200),
            }
        );
    }

    #[test]
    fn ordinary_reading_is_single() {
        let provider = PosixTzProvider;
        let local = utils::iso_epoch_days(2016, 6, 30) * 86_400 + 12 * 3_600;
        let record = provider.local_time_record("Europe/Paris", local).unwrap();
        assert_eq!(record, LocalTimeRecord::Single(UtcOffsetSeconds::new(7_200)));
        let record = provider.local_time_record("UTC", local).unwrap();
        assert_eq!(record, LocalTimeRecord::Single(UtcOffsetSeconds::new(0)));
    }
}
