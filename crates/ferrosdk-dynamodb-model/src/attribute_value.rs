//! DynamoDB `AttributeValue` type with custom serialization.
//!
//! `AttributeValue` is a tagged union where exactly one variant is present.
//! The JSON wire format uses single-key objects like `{"S": "hello"}`.
//!
//! Map attributes keep their insertion order so that a value read from the
//! wire serializes back out in the same order.

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AttributeValueError;

/// Ordered attribute map, the payload of the `M` variant and the shape of a
/// whole item on the wire.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// DynamoDB attribute value.
///
/// Represented as a tagged union where exactly one variant is present.
/// Numbers are always string-encoded to preserve arbitrary precision.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value (string-encoded for arbitrary precision).
    N(String),
    /// Binary value (base64-encoded in JSON).
    B(Bytes),
    /// String Set.
    Ss(Vec<String>),
    /// Number Set (string-encoded).
    Ns(Vec<String>),
    /// Binary Set (base64-encoded in JSON).
    Bs(Vec<Bytes>),
    /// Boolean value.
    Bool(bool),
    /// Null value.
    Null(bool),
    /// List of attribute values.
    L(Vec<AttributeValue>),
    /// Map of attribute values, in insertion order.
    M(AttributeMap),
}

/// Discriminant of an [`AttributeValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeValueType {
    /// `S`
    S,
    /// `N`
    N,
    /// `B`
    B,
    /// `SS`
    Ss,
    /// `NS`
    Ns,
    /// `BS`
    Bs,
    /// `BOOL`
    Bool,
    /// `NULL`
    Null,
    /// `L`
    L,
    /// `M`
    M,
}

impl AttributeValueType {
    /// Returns the wire tag for this type (e.g., "S", "NS", "BOOL").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
            Self::Ss => "SS",
            Self::Ns => "NS",
            Self::Bs => "BS",
            Self::Bool => "BOOL",
            Self::Null => "NULL",
            Self::L => "L",
            Self::M => "M",
        }
    }

    /// Returns the set type holding elements of this scalar type, if any.
    #[must_use]
    pub fn set_of(&self) -> Option<Self> {
        match self {
            Self::S => Some(Self::Ss),
            Self::N => Some(Self::Ns),
            Self::B => Some(Self::Bs),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttributeValue {
    // -- Factories --

    /// Creates a `NULL` value.
    #[must_use]
    pub fn from_null() -> Self {
        Self::Null(true)
    }

    /// Creates a `BOOL` value.
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        Self::Bool(value)
    }

    /// Creates an `S` value.
    #[must_use]
    pub fn from_s(value: impl Into<String>) -> Self {
        Self::S(value.into())
    }

    /// Creates an `N` value from its decimal text.
    #[must_use]
    pub fn from_n(value: impl Into<String>) -> Self {
        Self::N(value.into())
    }

    /// Creates a `B` value.
    #[must_use]
    pub fn from_b(value: impl Into<Bytes>) -> Self {
        Self::B(value.into())
    }

    /// Creates an `SS` value, keeping the given order.
    #[must_use]
    pub fn from_ss<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ss(values.into_iter().map(Into::into).collect())
    }

    /// Creates an `NS` value, keeping the given order.
    #[must_use]
    pub fn from_ns<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ns(values.into_iter().map(Into::into).collect())
    }

    /// Creates a `BS` value, keeping the given order.
    #[must_use]
    pub fn from_bs<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self::Bs(values.into_iter().map(Into::into).collect())
    }

    /// Creates an `L` value.
    #[must_use]
    pub fn from_l(values: impl IntoIterator<Item = AttributeValue>) -> Self {
        Self::L(values.into_iter().collect())
    }

    /// Creates an `M` value, keeping the iteration order of `entries`.
    #[must_use]
    pub fn from_m<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: Into<String>,
    {
        Self::M(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    // -- Predicates --

    /// Returns `true` if this is a string value.
    #[must_use]
    pub fn is_s(&self) -> bool {
        matches!(self, Self::S(_))
    }

    /// Returns `true` if this is a number value.
    #[must_use]
    pub fn is_n(&self) -> bool {
        matches!(self, Self::N(_))
    }

    /// Returns `true` if this is a binary value.
    #[must_use]
    pub fn is_b(&self) -> bool {
        matches!(self, Self::B(_))
    }

    /// Returns `true` if this is a string set.
    #[must_use]
    pub fn is_ss(&self) -> bool {
        matches!(self, Self::Ss(_))
    }

    /// Returns `true` if this is a number set.
    #[must_use]
    pub fn is_ns(&self) -> bool {
        matches!(self, Self::Ns(_))
    }

    /// Returns `true` if this is a binary set.
    #[must_use]
    pub fn is_bs(&self) -> bool {
        matches!(self, Self::Bs(_))
    }

    /// Returns `true` if this is a boolean value.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns `true` if this is a null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(true))
    }

    /// Returns `true` if this is a list value.
    #[must_use]
    pub fn is_l(&self) -> bool {
        matches!(self, Self::L(_))
    }

    /// Returns `true` if this is a map value.
    #[must_use]
    pub fn is_m(&self) -> bool {
        matches!(self, Self::M(_))
    }

    // -- Accessors --

    /// Returns the string value of an `S` variant.
    pub fn as_s(&self) -> Result<&str, AttributeValueError> {
        match self {
            Self::S(s) => Ok(s),
            _ => Err(self.mismatch(AttributeValueType::S)),
        }
    }

    /// Returns the number text of an `N` variant.
    pub fn as_n(&self) -> Result<&str, AttributeValueError> {
        match self {
            Self::N(n) => Ok(n),
            _ => Err(self.mismatch(AttributeValueType::N)),
        }
    }

    /// Returns the bytes of a `B` variant.
    pub fn as_b(&self) -> Result<&Bytes, AttributeValueError> {
        match self {
            Self::B(b) => Ok(b),
            _ => Err(self.mismatch(AttributeValueType::B)),
        }
    }

    /// Returns the members of an `SS` variant.
    pub fn as_ss(&self) -> Result<&[String], AttributeValueError> {
        match self {
            Self::Ss(v) => Ok(v),
            _ => Err(self.mismatch(AttributeValueType::Ss)),
        }
    }

    /// Returns the members of an `NS` variant.
    pub fn as_ns(&self) -> Result<&[String], AttributeValueError> {
        match self {
            Self::Ns(v) => Ok(v),
            _ => Err(self.mismatch(AttributeValueType::Ns)),
        }
    }

    /// Returns the members of a `BS` variant.
    pub fn as_bs(&self) -> Result<&[Bytes], AttributeValueError> {
        match self {
            Self::Bs(v) => Ok(v),
            _ => Err(self.mismatch(AttributeValueType::Bs)),
        }
    }

    /// Returns the boolean of a `BOOL` variant.
    pub fn as_bool(&self) -> Result<bool, AttributeValueError> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(AttributeValueType::Bool)),
        }
    }

    /// Returns the null flag of a `NULL` variant.
    pub fn as_null(&self) -> Result<bool, AttributeValueError> {
        match self {
            Self::Null(b) => Ok(*b),
            _ => Err(self.mismatch(AttributeValueType::Null)),
        }
    }

    /// Returns the elements of an `L` variant.
    pub fn as_l(&self) -> Result<&[AttributeValue], AttributeValueError> {
        match self {
            Self::L(l) => Ok(l),
            _ => Err(self.mismatch(AttributeValueType::L)),
        }
    }

    /// Returns the entries of an `M` variant.
    pub fn as_m(&self) -> Result<&AttributeMap, AttributeValueError> {
        match self {
            Self::M(m) => Ok(m),
            _ => Err(self.mismatch(AttributeValueType::M)),
        }
    }

    /// Returns the type of the populated variant.
    #[must_use]
    pub fn value_type(&self) -> AttributeValueType {
        match self {
            Self::S(_) => AttributeValueType::S,
            Self::N(_) => AttributeValueType::N,
            Self::B(_) => AttributeValueType::B,
            Self::Ss(_) => AttributeValueType::Ss,
            Self::Ns(_) => AttributeValueType::Ns,
            Self::Bs(_) => AttributeValueType::Bs,
            Self::Bool(_) => AttributeValueType::Bool,
            Self::Null(_) => AttributeValueType::Null,
            Self::L(_) => AttributeValueType::L,
            Self::M(_) => AttributeValueType::M,
        }
    }

    /// Returns the DynamoDB type descriptor string (e.g., "S", "N", "BOOL").
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        self.value_type().as_str()
    }

    fn mismatch(&self, expected: AttributeValueType) -> AttributeValueError {
        AttributeValueError::TypeMismatch {
            expected,
            actual: self.value_type(),
        }
    }
}

impl Eq for AttributeValue {}

impl std::hash::Hash for AttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::S(s) => s.hash(state),
            Self::N(n) => n.hash(state),
            Self::B(b) => b.hash(state),
            Self::Bool(b) | Self::Null(b) => b.hash(state),
            Self::Ss(v) | Self::Ns(v) => v.hash(state),
            Self::Bs(v) => {
                for b in v {
                    b.hash(state);
                }
            }
            Self::L(v) => v.hash(state),
            Self::M(m) => {
                // `IndexMap` equality ignores order, so the hash must too.
                let mut pairs: Vec<_> = m.iter().collect();
                pairs.sort_by_key(|(k, _)| *k);
                for (k, v) in pairs {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => write!(f, "{{NS: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
            Self::Bool(b) => write!(f, "{{BOOL: {b}}}"),
            Self::Null(b) => write!(f, "{{NULL: {b}}}"),
            Self::L(v) => write!(f, "{{L: {} items}}", v.len()),
            Self::M(m) => write!(f, "{{M: {} keys}}", m.len()),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_owned())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for AttributeValue {
    fn from(value: Bytes) -> Self {
        Self::B(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::L(value)
    }
}

impl From<AttributeMap> for AttributeValue {
    fn from(value: AttributeMap) -> Self {
        Self::M(value)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::S(s) => map.serialize_entry("S", s)?,
            Self::N(n) => map.serialize_entry("N", n)?,
            Self::B(b) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(b);
                map.serialize_entry("B", &encoded)?;
            }
            Self::Ss(v) => map.serialize_entry("SS", v)?,
            Self::Ns(v) => map.serialize_entry("NS", v)?,
            Self::Bs(v) => {
                let encoded: Vec<String> = v
                    .iter()
                    .map(|b| base64::engine::general_purpose::STANDARD.encode(b))
                    .collect();
                map.serialize_entry("BS", &encoded)?;
            }
            Self::Bool(b) => map.serialize_entry("BOOL", b)?,
            Self::Null(b) => map.serialize_entry("NULL", b)?,
            Self::L(list) => map.serialize_entry("L", list)?,
            Self::M(m) => map.serialize_entry("M", m)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a DynamoDB AttributeValue object with exactly one type key")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        use base64::Engine;

        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::custom(
                "AttributeValue must have exactly one key",
            ));
        };

        let value = match key.as_str() {
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "B" => {
                let encoded: String = map.next_value()?;
                let decoded = base64::engine::general_purpose::STANDARD
                    .decode(&encoded)
                    .map_err(de::Error::custom)?;
                AttributeValue::B(Bytes::from(decoded))
            }
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => {
                let encoded: Vec<String> = map.next_value()?;
                let decoded: Result<Vec<Bytes>, _> = encoded
                    .iter()
                    .map(|e| {
                        base64::engine::general_purpose::STANDARD
                            .decode(e)
                            .map(Bytes::from)
                    })
                    .collect();
                AttributeValue::Bs(decoded.map_err(de::Error::custom)?)
            }
            "BOOL" => AttributeValue::Bool(map.next_value()?),
            "NULL" => AttributeValue::Null(map.next_value()?),
            "L" => AttributeValue::L(map.next_value()?),
            "M" => AttributeValue::M(map.next_value()?),
            other => {
                return Err(de::Error::unknown_field(
                    other,
                    &["S", "N", "B", "SS", "NS", "BS", "BOOL", "NULL", "L", "M"],
                ));
            }
        };

        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom(
                "AttributeValue must have exactly one key",
            ));
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_string_value() {
        let val = AttributeValue::from_s("hello");
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"S":"hello"}"#);
    }

    #[test]
    fn test_should_serialize_number_value() {
        let val = AttributeValue::from_n("42");
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"N":"42"}"#);
    }

    #[test]
    fn test_should_serialize_null_value() {
        let val = AttributeValue::from_null();
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"NULL":true}"#);
    }

    #[test]
    fn test_should_serialize_list_value() {
        let val =
            AttributeValue::from_l([AttributeValue::from_s("a"), AttributeValue::from_n("1")]);
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"L":[{"S":"a"},{"N":"1"}]}"#);
    }

    #[test]
    fn test_should_keep_map_insertion_order_on_the_wire() {
        let val = AttributeValue::from_m([
            ("zeta", AttributeValue::from_n("1")),
            ("alpha", AttributeValue::from_n("2")),
        ]);
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"M":{"zeta":{"N":"1"},"alpha":{"N":"2"}}}"#);

        let back: AttributeValue = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = back.as_m().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_should_roundtrip_binary_set() {
        let val = AttributeValue::from_bs([Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, r#"{"BS":["YQ==","Yg=="]}"#);
        let deserialized: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(val, deserialized);
    }

    #[test]
    fn test_should_deserialize_number_set() {
        let json = r#"{"NS":["1","2","3"]}"#;
        let val: AttributeValue = serde_json::from_str(json).unwrap();
        assert_eq!(val.as_ns().unwrap(), ["1", "2", "3"]);
    }

    #[test]
    fn test_should_reject_multiple_type_keys() {
        let json = r#"{"S":"a","N":"1"}"#;
        assert!(serde_json::from_str::<AttributeValue>(json).is_err());
    }

    #[test]
    fn test_should_reject_unknown_type_key() {
        let json = r#"{"X":"a"}"#;
        assert!(serde_json::from_str::<AttributeValue>(json).is_err());
    }

    #[test]
    fn test_should_fail_accessor_on_wrong_variant() {
        let val = AttributeValue::from_n("10");
        let err = val.as_s().unwrap_err();
        assert_eq!(
            err,
            AttributeValueError::TypeMismatch {
                expected: AttributeValueType::S,
                actual: AttributeValueType::N,
            }
        );
        assert_eq!(val.as_n().unwrap(), "10");
    }

    #[test]
    fn test_should_report_predicates_for_each_variant() {
        assert!(AttributeValue::from_null().is_null());
        assert!(!AttributeValue::Null(false).is_null());
        assert!(AttributeValue::from_bool(false).is_bool());
        assert!(AttributeValue::from_ss(["a"]).is_ss());
        assert!(AttributeValue::from_ns(["1"]).is_ns());
        assert!(AttributeValue::from_b(Bytes::from_static(b"x")).is_b());
        assert!(AttributeValue::from_l([]).is_l());
        assert!(AttributeValue::from_m(Vec::<(String, AttributeValue)>::new()).is_m());
    }

    #[test]
    fn test_should_map_scalar_types_to_set_types() {
        assert_eq!(AttributeValueType::S.set_of(), Some(AttributeValueType::Ss));
        assert_eq!(AttributeValueType::N.set_of(), Some(AttributeValueType::Ns));
        assert_eq!(AttributeValueType::B.set_of(), Some(AttributeValueType::Bs));
        assert_eq!(AttributeValueType::M.set_of(), None);
    }

    #[test]
    fn test_should_nest_lists_and_maps() {
        let inner =
            AttributeValue::from_m([("k", AttributeValue::from_l([AttributeValue::from_null()]))]);
        let outer = AttributeValue::from_l([inner.clone(), inner]);
        let json = serde_json::to_string(&outer).unwrap();
        let back: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(outer, back);
    }
}
