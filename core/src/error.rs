//! Error types for the value kernel.

use std::fmt;

use crate::value::Value;

/// Result type for value-kernel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of value-kernel failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value lacks an optional capability (Counted, Indexed, ...)
    CapabilityMissing,
    /// A 2-element pair was required
    ExpectedPair,
    /// Malformed integer literal
    ExpectedInteger,
    /// Malformed float literal
    ExpectedFloat,
    /// Malformed ratio literal
    ExpectedRatio,
    /// Byte vector element outside 0-255
    ByteOutOfRange,
    /// Exact division (or modulo) by zero
    DivisionByZero,
    /// A promise was resolved more than once
    AlreadyDelivered,
    /// Write to a channel whose writer or reader side has gone away
    ChannelClosed,
    /// Slice bounds outside of a sequence
    IndexOutOfRange,
    /// A user-level error value, re-raised to every observer
    Raised,
}

impl ErrorKind {
    /// Stable name of the failure kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::CapabilityMissing => "CapabilityMissing",
            ErrorKind::ExpectedPair => "ExpectedPair",
            ErrorKind::ExpectedInteger => "ExpectedInteger",
            ErrorKind::ExpectedFloat => "ExpectedFloat",
            ErrorKind::ExpectedRatio => "ExpectedRatio",
            ErrorKind::ByteOutOfRange => "ByteOutOfRange",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::AlreadyDelivered => "AlreadyDelivered",
            ErrorKind::ChannelClosed => "ChannelClosed",
            ErrorKind::IndexOutOfRange => "IndexOutOfRange",
            ErrorKind::Raised => "Raised",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value-kernel failure with enough context to reproduce it.
#[derive(Debug, Clone)]
pub struct Error {
    /// The category of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Printed form of the offending value (if any)
    pub value: Option<String>,
    raised: Option<Box<Value>>,
}

impl Error {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            value: None,
            raised: None,
        }
    }

    /// Attach the printed form of the offending text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.value = Some(text.into());
        self
    }

    /// Attach the printed form of the offending value.
    pub fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.to_quoted_string());
        self
    }

    /// `method` needs `capability`, which `value` does not implement.
    pub fn capability_missing(capability: &str, method: &str, value: &Value) -> Self {
        Self::new(
            ErrorKind::CapabilityMissing,
            format!(
                "{method}: {} does not implement {capability}",
                value.type_of().name()
            ),
        )
        .with_value(value)
    }

    pub fn expected_pair(value: &Value) -> Self {
        Self::new(ErrorKind::ExpectedPair, "expected a 2-element pair").with_value(value)
    }

    pub fn expected_integer(text: &str) -> Self {
        Self::new(ErrorKind::ExpectedInteger, "expected integer").with_text(text)
    }

    pub fn expected_float(text: &str) -> Self {
        Self::new(ErrorKind::ExpectedFloat, "expected float").with_text(text)
    }

    pub fn expected_ratio(text: &str) -> Self {
        Self::new(ErrorKind::ExpectedRatio, "expected ratio").with_text(text)
    }

    pub fn byte_out_of_range(value: &Value) -> Self {
        Self::new(ErrorKind::ByteOutOfRange, "expected byte in range 0-255").with_value(value)
    }

    /// `dividend` was divided by an exact zero.
    pub fn division_by_zero(dividend: impl fmt::Display) -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero")
            .with_text(format!("{dividend} / 0"))
    }

    pub fn already_delivered() -> Self {
        Self::new(ErrorKind::AlreadyDelivered, "promise already delivered")
    }

    pub fn channel_closed() -> Self {
        Self::new(ErrorKind::ChannelClosed, "channel is closed")
    }

    pub fn index_out_of_range(start: usize, end: usize, count: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("slice {start}..{end} out of range for length {count}"),
        )
    }

    /// Wrap a user-level error value so it can be re-raised unchanged.
    pub fn raised(value: Value) -> Self {
        let mut err = Self::new(ErrorKind::Raised, "error raised").with_value(&value);
        err.raised = Some(Box::new(value));
        err
    }

    /// The user-level value carried by a `Raised` error.
    pub fn raised_value(&self) -> Option<&Value> {
        self.raised.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref value) = self.value {
            write!(f, ": {value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<Error> for String {
    fn from(err: Error) -> String {
        err.to_string()
    }
}
