//! Typed field values and the per-type mapping declaration.
//!
//! # Design
//! [`WireValue`] is the only thing the encoder, resolver and validation
//! gate need to know about a field: whether it is zero and how it formats.
//! [`Mapped`] exposes a type's fields by name, in declaration order, next
//! to its [`FieldTable`]. The [`mapped!`](crate::mapped) macro writes both
//! impls from a field list so a request type is declared in one place.

use chrono::{DateTime, Utc};

use crate::error::{ApiError, FieldViolation};
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::form::EncodedForm;
use crate::merge::MergeContext;

/// A field value the mapping layer can encode, validate and backfill.
pub trait WireValue {
    /// Zero values are elided when optional and rejected when required.
    fn is_zero(&self) -> bool;

    /// Formatted wire strings: one for scalars, one per element for slices,
    /// none for nested values.
    fn wire_values(&self) -> Vec<String>;

    /// Own encoding of a nested value, flattened into the parent form.
    fn encode_nested(
        &self,
        _channel: Channel,
        _version: SchemaVersion,
    ) -> Option<Result<EncodedForm, ApiError>> {
        None
    }

    fn nested_violations(&self, _path: &str) -> Result<Vec<FieldViolation>, ApiError> {
        Ok(Vec::new())
    }

    /// Backfill a nested value from `baseline` with its own table.
    fn merge_nested(
        &mut self,
        _baseline: &Self,
        _channel: Channel,
        _version: SchemaVersion,
    ) -> Result<(), ApiError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// A request type with a [`FieldTable`]. Implement with [`mapped!`](crate::mapped).
pub trait Mapped: Sized {
    /// The type's table, built on first use. A malformed declaration is
    /// reported as [`ApiError::Tag`] on every call.
    fn field_table() -> Result<&'static FieldTable, ApiError>;

    /// `(field name, value)` pairs in declaration order.
    fn wire_fields(&self) -> Vec<(&'static str, &dyn WireValue)>;

    /// Apply `ctx` to every field, pairing it with the same field of `baseline`.
    fn backfill(&mut self, baseline: &Self, ctx: &MergeContext) -> Result<(), ApiError>;
}

impl WireValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn wire_values(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl WireValue for bool {
    fn is_zero(&self) -> bool {
        !*self
    }

    fn wire_values(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

/// Two decimals. Rounds the exact binary value; exact ties go to even.
pub fn format_float(value: f64) -> String {
    format!("{value:.2}")
}

impl WireValue for f64 {
    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn wire_values(&self) -> Vec<String> {
        vec![format_float(*self)]
    }
}

macro_rules! integer_wire_value {
    ($($ty:ty),*) => {
        $(
            impl WireValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn wire_values(&self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }
        )*
    };
}

integer_wire_value!(u8, u16, u32, u64, i32, i64);

/// Times go on the wire as Unix seconds.
impl WireValue for DateTime<Utc> {
    fn is_zero(&self) -> bool {
        false
    }

    fn wire_values(&self) -> Vec<String> {
        vec![self.timestamp().to_string()]
    }
}

/// `None` is zero; `Some` is always sent, so `Some(false)` encodes `"false"`.
impl<T: WireValue + Clone> WireValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn wire_values(&self) -> Vec<String> {
        self.as_ref().map(WireValue::wire_values).unwrap_or_default()
    }

    fn encode_nested(
        &self,
        channel: Channel,
        version: SchemaVersion,
    ) -> Option<Result<EncodedForm, ApiError>> {
        self.as_ref()?.encode_nested(channel, version)
    }

    fn nested_violations(&self, path: &str) -> Result<Vec<FieldViolation>, ApiError> {
        match self {
            Some(value) => value.nested_violations(path),
            None => Ok(Vec::new()),
        }
    }

    /// `None` takes the whole baseline; `Some` is merged field by field.
    fn merge_nested(
        &mut self,
        baseline: &Self,
        channel: Channel,
        version: SchemaVersion,
    ) -> Result<(), ApiError> {
        let Some(base) = baseline else {
            return Ok(());
        };
        match self {
            Some(value) => value.merge_nested(base, channel, version),
            None => {
                *self = Some(base.clone());
                Ok(())
            }
        }
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn wire_values(&self) -> Vec<String> {
        self.iter().flat_map(WireValue::wire_values).collect()
    }
}

/// Implement [`Mapped`] and a nested [`WireValue`] for a struct.
///
/// ```ignore
/// mapped!(NameServers { order_id, ns }, || FieldTable::builder()
///     .scalar("order_id").on(Channel::MODIFY, "order-id")
///     .slice("ns").on(Channel::MODIFY, "ns")
///     .build());
/// ```
#[macro_export]
macro_rules! mapped {
    ($ty:ident { $($field:ident),* $(,)? }, $table:expr) => {
        impl $crate::wire::Mapped for $ty {
            fn field_table() -> ::std::result::Result<
                &'static $crate::field::FieldTable,
                $crate::error::ApiError,
            > {
                static TABLE: ::std::sync::LazyLock<
                    ::std::result::Result<$crate::field::FieldTable, $crate::field::TagError>,
                > = ::std::sync::LazyLock::new(|| {
                    let build: fn() -> ::std::result::Result<
                        $crate::field::FieldTable,
                        $crate::field::TagError,
                    > = $table;
                    build()
                });
                match &*TABLE {
                    Ok(table) => Ok(table),
                    Err(err) => Err($crate::error::ApiError::Tag(err.clone())),
                }
            }

            fn wire_fields(&self) -> ::std::vec::Vec<(&'static str, &dyn $crate::wire::WireValue)> {
                vec![$((stringify!($field), &self.$field as &dyn $crate::wire::WireValue)),*]
            }

            #[allow(unused_variables)]
            fn backfill(
                &mut self,
                baseline: &Self,
                ctx: &$crate::merge::MergeContext,
            ) -> ::std::result::Result<(), $crate::error::ApiError> {
                $(ctx.merge_field(stringify!($field), &mut self.$field, &baseline.$field)?;)*
                Ok(())
            }
        }

        impl $crate::wire::WireValue for $ty {
            fn is_zero(&self) -> bool {
                $crate::wire::Mapped::wire_fields(self)
                    .iter()
                    .all(|(_, value)| value.is_zero())
            }

            fn wire_values(&self) -> ::std::vec::Vec<String> {
                ::std::vec::Vec::new()
            }

            fn encode_nested(
                &self,
                channel: $crate::field::Channel,
                version: $crate::field::SchemaVersion,
            ) -> Option<::std::result::Result<$crate::form::EncodedForm, $crate::error::ApiError>> {
                Some($crate::encode::encode_versioned(self, channel, version))
            }

            fn nested_violations(
                &self,
                path: &str,
            ) -> ::std::result::Result<
                ::std::vec::Vec<$crate::error::FieldViolation>,
                $crate::error::ApiError,
            > {
                $crate::validate::violations(self, path)
            }

            fn merge_nested(
                &mut self,
                baseline: &Self,
                channel: $crate::field::Channel,
                version: $crate::field::SchemaVersion,
            ) -> ::std::result::Result<(), $crate::error::ApiError> {
                $crate::merge::resolve_in_place(self, baseline, channel, version)
            }
        }
    };
}

/// Declare a closed set of wire strings as an enum that encodes and
/// deserializes as those strings. Attributes pass through, so a
/// `#[derive(Default)]` on the enum and `#[default]` on a variant work.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!("unknown {} {:?}", stringify!($name), other)),
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }

        impl $crate::wire::WireValue for $name {
            fn is_zero(&self) -> bool {
                false
            }

            fn wire_values(&self) -> ::std::vec::Vec<String> {
                vec![self.as_str().to_string()]
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    wire_enum! {
        enum Color {
            Red => "red",
            DarkBlue => "dark blue",
        }
    }

    wire_enum! {
        #[derive(Default)]
        enum Shade {
            Light => "light",
            #[default]
            Dark => "dark",
        }
    }

    #[test]
    fn float_uses_two_decimals() {
        assert_eq!(format_float(12.3), "12.30");
        assert_eq!(format_float(7.0), "7.00");
        assert_eq!(format_float(-0.5), "-0.50");
    }

    #[test]
    fn float_rounding_boundaries() {
        // 12.345 is stored as 12.34500000000000063…, 2.675 as 2.67499999999999982…
        assert_eq!(format_float(12.345), "12.35");
        assert_eq!(format_float(12.344), "12.34");
        assert_eq!(format_float(2.675), "2.67");
        // exact binary ties round to even
        assert_eq!(format_float(0.125), "0.12");
        assert_eq!(format_float(0.375), "0.38");
    }

    #[test]
    fn zero_values() {
        assert!(String::new().is_zero());
        assert!(!"x".to_string().is_zero());
        assert!(false.is_zero());
        assert!(0u16.is_zero());
        assert!(0.0f64.is_zero());
        assert!(Vec::<String>::new().is_zero());
        assert!(None::<bool>.is_zero());
        assert!(!Some(false).is_zero());
    }

    #[test]
    fn option_sends_explicit_false() {
        assert_eq!(Some(false).wire_values(), ["false"]);
        assert!(None::<bool>.wire_values().is_empty());
    }

    #[test]
    fn time_encodes_unix_seconds() {
        let t = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(t.wire_values(), ["1700000000"]);
    }

    #[test]
    fn slice_keeps_element_order() {
        let v = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(v.wire_values(), ["c", "a", "b"]);
    }

    #[test]
    fn wire_enum_round_trips_through_strings() {
        assert_eq!(Color::DarkBlue.wire_values(), ["dark blue"]);
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        assert!("Red".parse::<Color>().is_err());
        let c: Color = serde_json::from_str("\"dark blue\"").unwrap();
        assert_eq!(c, Color::DarkBlue);
        assert_eq!(Color::ALL.len(), 2);
    }

    #[test]
    fn wire_enum_default_variant() {
        assert_eq!(Shade::default(), Shade::Dark);
        assert_eq!(Shade::default().wire_values(), ["dark"]);
        assert_eq!(Shade::ALL, [Shade::Light, Shade::Dark]);
    }
}
