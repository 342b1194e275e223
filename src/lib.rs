//! The `calendrical` crate resolves bags of partially-known temporal
//! fields into concrete calendrical values.
//!
//! A parser (not part of this crate) reads text against a pattern and
//! produces a [`ParsedFields`] bag: a mapping from [`ChronoField`] to a
//! raw integer value, optionally accompanied by an explicit UTC offset
//! or a time zone identifier. The [`Resolver`] then materializes one of
//! three shapes from the bag, or fails with a typed error:
//!
//! - [`Instant`]: epoch seconds plus nanosecond-of-second,
//! - [`LocalDateTime`]: a calendar date and wall-clock time, no zone,
//! - [`ZonedDateTime`]: an instant paired with a resolved zone.
//!
//! ```rust
//! use calendrical::{
//!     calendar::IsoChronology, fields::ChronoField, parsed::ParsedFields,
//!     provider::PosixTzProvider, resolver::Resolver,
//! };
//!
//! let fields = ParsedFields::new()
//!     .with(ChronoField::InstantSeconds, 86_402)
//!     .unwrap()
//!     .with(ChronoField::NanoOfSecond, 123_456_789)
//!     .unwrap();
//!
//! let resolver = Resolver::new(&IsoChronology, &PosixTzProvider);
//! let instant = resolver.resolve_instant(&fields).unwrap();
//! assert_eq!(instant.epoch_seconds(), 86_402);
//! assert_eq!(instant.nanosecond(), 123_456_789);
//! ```
//!
//! Fields may be *derived* as well as stored: a bag holding only
//! `InstantSeconds` still supports `NanoOfSecond` (defaulted to zero),
//! `MicroOfSecond`, and `MilliOfSecond`. The derivation rules form an
//! explicit acyclic graph declared in [`fields`].
//!
//! Calendar systems are injected through the [`calendar::Chronology`]
//! trait; the crate ships the proleptic ISO calendar and the Coptic
//! calendar (Era of the Martyrs). Time zone data is injected through
//! [`provider::TimeZoneProvider`]; the built-in [`provider::PosixTzProvider`]
//! evaluates POSIX TZ rule strings for a small set of common regions.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

extern crate alloc;

pub mod calendar;
pub mod error;
pub mod fields;
pub mod parsed;
pub mod posix;
pub mod provider;
pub mod resolver;
pub mod timezone;

mod datetime;
mod era;
mod instant;
mod utils;
mod zoned;

#[doc(inline)]
pub use error::CalendricalError;

/// The `calendrical` result type.
pub type CalendricalResult<T> = Result<T, CalendricalError>;

pub use calendar::CalendarId;
pub use datetime::{CalendarDate, LocalDateTime, TimeOfDay};
pub use era::Era;
pub use fields::ChronoField;
pub use instant::Instant;
pub use parsed::ParsedFields;
pub use resolver::Resolver;
pub use timezone::{TimeZone, UtcOffsetSeconds};
pub use zoned::ZonedDateTime;

/// Seconds per day constant: 86,400.
pub const SECONDS_PER_DAY: i64 = 86_400;
/// Nanoseconds per second constant: 1e9.
pub const NS_PER_SECOND: i64 = 1_000_000_000;
