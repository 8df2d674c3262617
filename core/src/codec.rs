//! Tolerant decoding of JSON scalar leaves.
//!
//! # Design
//! The upstream sends most scalars as JSON strings (`"true"`, `"12.5"`,
//! `"1700000000"`), but not consistently. Every kind therefore trims one
//! layer of surrounding double quotes before parsing, so the bare token
//! and its quoted form decode identically. The typed wrappers below
//! implement `Deserialize` on top of [`decode`] and can be used directly as
//! fields of response structs.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::FormatError;

/// Layout of [`ScalarKind::PatternTimestamp`] tokens, e.g.
/// `2023-11-14 22:13:20.123456+00`.
pub const PATTERN_TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Float64,
    Int,
    UnixSecondsTimestamp,
    PatternTimestamp,
    RawString,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Float64 => "float64",
            ScalarKind::Int => "int",
            ScalarKind::UnixSecondsTimestamp => "unix timestamp",
            ScalarKind::PatternTimestamp => "timestamp",
            ScalarKind::RawString => "raw string",
        };
        f.write_str(name)
    }
}

/// A decoded scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Float64(f64),
    Int(i64),
    UnixSecondsTimestamp(DateTime<Utc>),
    PatternTimestamp(DateTime<FixedOffset>),
    RawString(String),
}

/// Strip surrounding whitespace and at most one pair of double quotes.
pub fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Decode one raw JSON token as `kind`.
pub fn decode(raw: &str, kind: ScalarKind) -> Result<Scalar, FormatError> {
    let text = unquote(raw);
    let fail = || FormatError {
        kind,
        raw: raw.to_string(),
    };

    match kind {
        ScalarKind::Bool => parse_bool(text).map(Scalar::Bool).ok_or_else(fail),
        ScalarKind::Float64 => text.parse().map(Scalar::Float64).map_err(|_| fail()),
        ScalarKind::Int => text.parse().map(Scalar::Int).map_err(|_| fail()),
        ScalarKind::UnixSecondsTimestamp => text
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(Scalar::UnixSecondsTimestamp)
            .ok_or_else(fail),
        ScalarKind::PatternTimestamp => DateTime::parse_from_str(text, PATTERN_TIMESTAMP_LAYOUT)
            .map(Scalar::PatternTimestamp)
            .map_err(|_| fail()),
        ScalarKind::RawString => Ok(Scalar::RawString(text.to_string())),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Collects any scalar token (native or string) as text.
struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON scalar or a string holding one")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}

fn deserialize_scalar<'de, D: Deserializer<'de>>(
    deserializer: D,
    kind: ScalarKind,
) -> Result<Scalar, D::Error> {
    let token = deserializer.deserialize_any(TokenVisitor)?;
    decode(&token, kind).map_err(de::Error::custom)
}

macro_rules! tolerant_scalar {
    ($(#[$meta:meta])* $name:ident($inner:ty), $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> $inner {
                value.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match deserialize_scalar(deserializer, ScalarKind::$kind)? {
                    Scalar::$kind(v) => Ok($name(v)),
                    other => Err(de::Error::custom(format!("unexpected scalar {other:?}"))),
                }
            }
        }
    };
}

tolerant_scalar!(
    /// Boolean sent as `true`, `"true"`, `"1"`, …
    JsonBool(bool),
    Bool
);
tolerant_scalar!(
    /// Float sent bare or quoted.
    JsonFloat(f64),
    Float64
);
tolerant_scalar!(
    /// Integer sent bare or quoted.
    JsonInt(i64),
    Int
);

/// Instant sent as Unix seconds, bare or quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTime(pub DateTime<Utc>);

impl UnixTime {
    pub fn get(self) -> DateTime<Utc> {
        self.0
    }
}

impl<'de> Deserialize<'de> for UnixTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match deserialize_scalar(deserializer, ScalarKind::UnixSecondsTimestamp)? {
            Scalar::UnixSecondsTimestamp(t) => Ok(UnixTime(t)),
            other => Err(de::Error::custom(format!("unexpected scalar {other:?}"))),
        }
    }
}

/// Instant sent in [`PATTERN_TIMESTAMP_LAYOUT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternTime(pub DateTime<FixedOffset>);

impl PatternTime {
    pub fn get(self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl<'de> Deserialize<'de> for PatternTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match deserialize_scalar(deserializer, ScalarKind::PatternTimestamp)? {
            Scalar::PatternTimestamp(t) => Ok(PatternTime(t)),
            other => Err(de::Error::custom(format!("unexpected scalar {other:?}"))),
        }
    }
}

/// Any JSON value kept as text for deferred decoding. Strings keep their
/// inner text; objects, arrays and numbers keep their JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawString(pub String);

impl RawString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the captured text as JSON into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(RawString(match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }))
    }
}
