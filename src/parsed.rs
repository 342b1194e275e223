//! The parsed field bag handed from a parser to the resolver.

use alloc::collections::BTreeMap;

use crate::error::CalendricalError;
use crate::fields::ChronoField;
use crate::timezone::{TimeZone, UtcOffsetSeconds};
use crate::CalendricalResult;

/// An immutable mapping from [`ChronoField`] to a raw parsed value,
/// with optional zone offset and zone identifier side channels.
///
/// Bags are built once by a parser and never mutated after handoff;
/// the `with*` methods consume and return the bag by value. Every
/// stored value is range-checked at insertion, so the resolver can
/// trust stored entries without re-validating them.
///
/// Equality, ordering, and hashing are structural over the *stored*
/// entries and side channels; derived values never participate.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParsedFields {
    entries: BTreeMap<ChronoField, i64>,
    offset: Option<UtcOffsetSeconds>,
    zone: Option<TimeZone>,
}

impl ParsedFields {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `field`, rejecting values outside the field's
    /// static range with an `OutOfRange` error.
    pub fn with(mut self, field: ChronoField, value: i64) -> CalendricalResult<Self> {
        if !field.valid_range().contains(value) {
            return Err(CalendricalError::out_of_range(field, value));
        }
        self.entries.insert(field, value);
        Ok(self)
    }

    /// Attaches an explicitly resolved zone offset.
    #[must_use]
    pub fn with_offset(mut self, offset: UtcOffsetSeconds) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attaches an explicitly resolved zone.
    #[must_use]
    pub fn with_zone(mut self, zone: TimeZone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Returns the directly-stored value for `field`, if any.
    pub fn stored(&self, field: ChronoField) -> Option<i64> {
        self.entries.get(&field).copied()
    }

    /// Returns the explicit offset side channel, if present.
    pub fn offset(&self) -> Option<UtcOffsetSeconds> {
        self.offset
    }

    /// Returns the explicit zone side channel, if present.
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }

    /// Returns whether `field` is stored in or derivable from this bag.
    pub fn is_supported(&self, field: ChronoField) -> bool {
        field.is_supported_by(self)
    }

    /// Returns the stored value for `field`, else the derived value,
    /// else a `NotSupported` error.
    pub fn get(&self, field: ChronoField) -> CalendricalResult<i64> {
        self.stored(field)
            .or_else(|| field.derive_from(self))
            .ok_or_else(|| CalendricalError::not_supported(field))
    }

    /// The offset known to the bag without consulting a zone provider:
    /// the explicit offset channel, a fixed-offset zone channel, or a
    /// stored `OffsetSeconds` field, in that precedence order.
    pub(crate) fn known_offset(&self) -> Option<UtcOffsetSeconds> {
        if let Some(offset) = self.offset {
            return Some(offset);
        }
        if let Some(TimeZone::Offset(offset)) = &self.zone {
            return Some(*offset);
        }
        self.stored(ChronoField::OffsetSeconds)
            .map(UtcOffsetSeconds::new)
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the bag stores no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn stored_values_round_trip() {
        let bag = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 86_402)
            .unwrap()
            .with(ChronoField::NanoOfSecond, 123_456_789)
            .unwrap();
        assert_eq!(bag.get(ChronoField::InstantSeconds).unwrap(), 86_402);
        assert_eq!(bag.get(ChronoField::NanoOfSecond).unwrap(), 123_456_789);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn out_of_range_rejected_at_insertion() {
        let err = ParsedFields::new()
            .with(ChronoField::SecondOfMinute, 60)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let err = ParsedFields::new()
            .with(ChronoField::NanoOfSecond, -5)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn unsupported_field_is_a_typed_error() {
        let bag = ParsedFields::new()
            .with(ChronoField::HourOfDay, 12)
            .unwrap();
        let err = bag.get(ChronoField::EpochDay).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn equality_is_structural_over_stored_entries() {
        let a = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 1)
            .unwrap();
        let b = ParsedFields::new()
            .with(ChronoField::InstantSeconds, 1)
            .unwrap();
        assert_eq!(a, b);

        // Side channels participate in equality.
        let c = b.clone().with_offset(UtcOffsetSeconds::new(3_600));
        assert_ne!(a, c);

        // Derived support does not; a bag storing the derivable value
        // differs from one deriving it.
        let d = a
            .clone()
            .with(ChronoField::NanoOfSecond, 0)
            .unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn known_offset_precedence() {
        let bag = ParsedFields::new()
            .with(ChronoField::OffsetSeconds, 3_600)
            .unwrap();
        assert_eq!(bag.known_offset(), Some(UtcOffsetSeconds::new(3_600)));

        // The explicit channel wins over the stored field.
        let bag = bag.with_offset(UtcOffsetSeconds::new(7_200));
        assert_eq!(bag.known_offset(), Some(UtcOffsetSeconds::new(7_200)));
    }
}
