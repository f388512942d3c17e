//! The DataTables server-side request model.
//!
//! DataTables submits paging counters and flags as strings when the request
//! travels form-encoded, and as numbers/booleans when it travels as JSON.
//! [`LooseInt`] and [`WireBool`] absorb both shapes so the rest of the crate
//! works with plain integers and booleans. Members this crate does not use
//! (`columns[i].name`, `search.regex`) are ignored during deserialization.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// An integer that tolerates the wire's loose formats.
///
/// Accepted inputs and their values:
/// - numbers: truncated toward zero (`3.9` reads as 3)
/// - strings: longest leading integer prefix after optional whitespace and
///   sign (`"12x"` reads as 12, `"abc"` as 0)
/// - booleans: 1 or 0
/// - null: 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LooseInt(pub i64);

impl LooseInt {
    /// The coerced value.
    pub fn value(self) -> i64 {
        self.0
    }

    /// Coerce a string the way the wire does: skip leading whitespace, take
    /// an optional sign and the longest run of digits, ignore the rest.
    /// Out-of-range magnitudes clamp to the i64 bounds.
    pub fn parse_loose(s: &str) -> i64 {
        let mut chars = s.trim_start().chars().peekable();
        let mut negative = false;
        match chars.peek() {
            Some('+') => {
                chars.next();
            }
            Some('-') => {
                negative = true;
                chars.next();
            }
            _ => {}
        }

        let mut magnitude: i128 = 0;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            magnitude = magnitude * 10 + d as i128;
            if magnitude > i64::MAX as i128 + 1 {
                magnitude = i64::MAX as i128 + 1;
            }
        }

        let signed = if negative { -magnitude } else { magnitude };
        signed.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl From<i64> for LooseInt {
    fn from(value: i64) -> Self {
        LooseInt(value)
    }
}

impl<'de> Deserialize<'de> for LooseInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LooseIntVisitor;

        impl<'de> Visitor<'de> for LooseIntVisitor {
            type Value = LooseInt;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an integer, a numeric string, a boolean, or null")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LooseInt, E> {
                Ok(LooseInt(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LooseInt, E> {
                Ok(LooseInt(i64::try_from(v).unwrap_or(i64::MAX)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<LooseInt, E> {
                Ok(LooseInt(v.trunc() as i64))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<LooseInt, E> {
                Ok(LooseInt(if v { 1 } else { 0 }))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LooseInt, E> {
                Ok(LooseInt(LooseInt::parse_loose(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<LooseInt, E> {
                Ok(LooseInt(0))
            }

            fn visit_none<E: de::Error>(self) -> Result<LooseInt, E> {
                Ok(LooseInt(0))
            }

            fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<LooseInt, D2::Error> {
                d.deserialize_any(LooseIntVisitor)
            }
        }

        deserializer.deserialize_any(LooseIntVisitor)
    }
}

/// A flag that is true only for JSON `true` or the string `"true"`.
///
/// Every other input (`"false"`, `"1"`, numbers, null) reads as false, which
/// is exactly what the form-encoded wire's string comparison admits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireBool(pub bool);

impl WireBool {
    /// The coerced value.
    pub fn value(self) -> bool {
        self.0
    }
}

impl From<bool> for WireBool {
    fn from(value: bool) -> Self {
        WireBool(value)
    }
}

impl<'de> Deserialize<'de> for WireBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WireBoolVisitor;

        impl<'de> Visitor<'de> for WireBoolVisitor {
            type Value = WireBool;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a boolean or the string \"true\"")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<WireBool, E> {
                Ok(WireBool(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<WireBool, E> {
                Ok(WireBool(v == "true"))
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<WireBool, E> {
                Ok(WireBool(false))
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<WireBool, E> {
                Ok(WireBool(false))
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<WireBool, E> {
                Ok(WireBool(false))
            }

            fn visit_unit<E: de::Error>(self) -> Result<WireBool, E> {
                Ok(WireBool(false))
            }

            fn visit_none<E: de::Error>(self) -> Result<WireBool, E> {
                Ok(WireBool(false))
            }

            fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<WireBool, D2::Error> {
                d.deserialize_any(WireBoolVisitor)
            }
        }

        deserializer.deserialize_any(WireBoolVisitor)
    }
}

/// A search box value. The `regex` member DataTables sends alongside is
/// ignored; filtering is always a plain substring match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTerm {
    /// The raw text typed into the search box.
    #[serde(default)]
    pub value: String,
}

impl SearchTerm {
    /// Whether this search carries any text.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }
}

/// One entry of the request's `order` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortOrder {
    /// Index into the request's `columns` array.
    #[serde(default)]
    pub column: LooseInt,
    /// Requested direction. Anything other than exactly `"desc"` sorts
    /// ascending.
    #[serde(default)]
    pub dir: String,
}

impl SortOrder {
    /// True when this entry asks for a descending sort.
    pub fn is_descending(&self) -> bool {
        self.dir == "desc"
    }
}

/// Read a field key that may arrive as a string or, for array-sourced
/// tables, as a column number. Numbers keep their decimal rendering so the
/// descriptor map can be keyed with `"0"`, `"1"`, ...
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct LooseStringVisitor;

    impl<'de> Visitor<'de> for LooseStringVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LooseStringVisitor)
}

/// One entry of the request's `columns` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestColumn {
    /// The client-side field key, DataTables' `data` member. Resolved against
    /// the configured column descriptors.
    #[serde(rename = "data", default, deserialize_with = "loose_string")]
    pub field: String,
    /// Whether this column participates in filtering.
    #[serde(default)]
    pub searchable: WireBool,
    /// Whether this column may be sorted on.
    #[serde(default)]
    pub orderable: WireBool,
    /// This column's own search box.
    #[serde(default)]
    pub search: SearchTerm,
}

/// A full DataTables server-side processing request.
///
/// Unknown members are ignored. Missing members take their loose zero
/// values rather than failing, the same tolerance the form-encoded wire
/// gets from reading absent keys as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRequest {
    /// The client's draw counter, echoed back in the response.
    #[serde(default)]
    pub draw: LooseInt,
    /// First row to return. Paging only applies when this member is present.
    #[serde(default)]
    pub start: Option<LooseInt>,
    /// Page size. `-1` means "all rows"; a missing value reads as 0.
    #[serde(default)]
    pub length: Option<LooseInt>,
    /// Sort entries in precedence order.
    #[serde(default)]
    pub order: Vec<SortOrder>,
    /// The client's column descriptions.
    #[serde(default)]
    pub columns: Vec<RequestColumn>,
    /// The global search box.
    #[serde(default)]
    pub search: SearchTerm,
}
