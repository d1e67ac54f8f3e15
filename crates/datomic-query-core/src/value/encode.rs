use crate::value::{ComplexValue, RuleUsage, Value};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::{fmt, time::SystemTime};

///
/// IntoInstant
///
/// Inputs accepted by [`instant`]. Date-times are rendered as UTC ISO-8601
/// with millisecond precision; strings pass through untouched.
///

pub trait IntoInstant {
    fn into_instant(self) -> String;
}

impl<Tz: TimeZone> IntoInstant for DateTime<Tz> {
    fn into_instant(self) -> String {
        self.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl IntoInstant for SystemTime {
    fn into_instant(self) -> String {
        DateTime::<Utc>::from(self).into_instant()
    }
}

impl IntoInstant for &str {
    fn into_instant(self) -> String {
        self.to_string()
    }
}

impl IntoInstant for String {
    fn into_instant(self) -> String {
        self
    }
}

// ------------------------------------------------------------------
// Encoders
// ------------------------------------------------------------------

/// Tag a uuid string. The value is not checked.
#[must_use]
pub fn uuid(value: impl Into<String>) -> ComplexValue {
    ComplexValue::Uuid(value.into())
}

#[must_use]
pub fn keyword(value: impl Into<String>) -> ComplexValue {
    ComplexValue::Keyword(value.into())
}

#[must_use]
pub fn symbol(value: impl Into<String>) -> ComplexValue {
    ComplexValue::Symbol(value.into())
}

/// Tag an arbitrary-precision integer using its decimal rendering.
#[must_use]
pub fn bigint(value: impl fmt::Display) -> ComplexValue {
    ComplexValue::Bigint(value.to_string())
}

/// Tag an arbitrary-precision decimal using its string rendering.
#[must_use]
pub fn bigdec(value: impl fmt::Display) -> ComplexValue {
    ComplexValue::Bigdec(value.to_string())
}

/// Tag a point in time, e.g. `2020-01-01T00:00:00.000Z`.
#[must_use]
pub fn instant(value: impl IntoInstant) -> ComplexValue {
    ComplexValue::Instant(value.into_instant())
}

#[must_use]
pub fn uri(value: impl Into<String>) -> ComplexValue {
    ComplexValue::Uri(value.into())
}

/// Tag a byte sequence as lowercase, zero-padded hex pairs.
#[must_use]
pub fn bytes(value: impl AsRef<[u8]>) -> ComplexValue {
    ComplexValue::Bytes(hex::encode(value))
}

/// Build a rule usage: `{"type": "rule", "value": [name, ...args]}`.
#[must_use]
pub fn rule<I, T>(name: impl Into<String>, args: I) -> RuleUsage
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    RuleUsage::new(name, args)
}
