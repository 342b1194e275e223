//! The error type for field resolution failures.
//!
//! Every failure in this crate is local, synchronous, and non-retryable:
//! it reflects bad or incomplete input, never a transient condition.
//! [`CalendricalError`] carries an [`ErrorKind`] that callers can match
//! on plus a human-readable message naming the field or value at fault.

use alloc::borrow::Cow;
use alloc::format;
use core::fmt;

use crate::fields::ChronoField;

/// The kind of a [`CalendricalError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was rejected at bag-construction time; always a defect in
    /// the parser handing the bag over.
    OutOfRange,
    /// An era lookup used an integer outside the calendar's era values.
    InvalidEra,
    /// A queried field is neither stored nor derivable from the bag.
    NotSupported,
    /// A zone-requiring shape was requested without any resolvable zone
    /// information.
    MissingZone,
    /// Neither an instant nor a complete date+time combination is
    /// derivable from the bag.
    InsufficientFields,
    /// An explicit offset and a region id do not form a legal pairing at
    /// the resolved instant.
    InvalidOffset,
    /// General range/validation failure: malformed offset strings,
    /// chronology limits, malformed POSIX rule strings.
    Range,
    /// An internal invariant was breached; panics in debug builds and
    /// surfaces as an error at runtime.
    Assert,
}

impl ErrorKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "OutOfRange",
            Self::InvalidEra => "InvalidEra",
            Self::NotSupported => "NotSupported",
            Self::MissingZone => "MissingZone",
            Self::InsufficientFields => "InsufficientFields",
            Self::InvalidOffset => "InvalidOffset",
            Self::Range => "Range",
            Self::Assert => "Assert",
        }
    }
}

/// The error returned by field, bag, and resolver operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendricalError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl CalendricalError {
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates an `OutOfRange` error naming the rejected field and value.
    pub fn out_of_range(field: ChronoField, value: i64) -> Self {
        let range = field.valid_range();
        Self::new(ErrorKind::OutOfRange).with_message(format!(
            "value {value} for {} is outside the valid range {}..={}",
            field.name(),
            range.min,
            range.max,
        ))
    }

    /// Creates an `InvalidEra` error for a bad era value.
    pub fn invalid_era(value: i64) -> Self {
        Self::new(ErrorKind::InvalidEra).with_message(format!("invalid era value: {value}"))
    }

    /// Creates a `NotSupported` error naming the unsupported field.
    pub fn not_supported(field: ChronoField) -> Self {
        Self::new(ErrorKind::NotSupported)
            .with_message(format!("field {} is not supported by this bag", field.name()))
    }

    /// Creates a `MissingZone` error.
    pub fn missing_zone() -> Self {
        Self::new(ErrorKind::MissingZone)
            .with_message("no zone or offset information is resolvable from the bag")
    }

    /// Creates an `InsufficientFields` error.
    pub fn insufficient_fields() -> Self {
        Self::new(ErrorKind::InsufficientFields)
            .with_message("neither an instant nor a complete date-time is derivable")
    }

    /// Creates an `InvalidOffset` error for a failed strict pairing.
    pub fn invalid_offset() -> Self {
        Self::new(ErrorKind::InvalidOffset)
    }

    /// Creates a general range error.
    pub fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Creates an assertion error. Assertion errors denote an internal
    /// invariant breach and are debug-asserted before construction.
    pub fn assert() -> Self {
        debug_assert!(false);
        Self::new(ErrorKind::Assert)
    }

    /// Attaches or replaces the message of this error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for CalendricalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_str())?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for CalendricalError {}
