//! Key schema types.
//!
//! These follow the DynamoDB JSON wire format with `PascalCase` field names and
//! `SCREAMING_SNAKE_CASE` enum values.

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValueType;

/// Key type within a key schema element.
///
/// `Hash` denotes the partition key; `Range` denotes the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Partition key.
    #[serde(rename = "HASH")]
    Hash,
    /// Sort key.
    #[serde(rename = "RANGE")]
    Range,
}

impl KeyType {
    /// Returns the DynamoDB wire-format string representation of this key type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Range => "RANGE",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar attribute types allowed for key attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarAttributeType {
    /// String type.
    S,
    /// Number type.
    N,
    /// Binary type.
    B,
}

impl ScalarAttributeType {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }

    /// Returns the scalar type matching an attribute value type, if it has one.
    #[must_use]
    pub fn from_value_type(value_type: AttributeValueType) -> Option<Self> {
        match value_type {
            AttributeValueType::S => Some(Self::S),
            AttributeValueType::N => Some(Self::N),
            AttributeValueType::B => Some(Self::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScalarAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An element of the key schema for a table or index.
///
/// Specifies an attribute name and whether it serves as a `HASH` (partition)
/// or `RANGE` (sort) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The name of the key attribute.
    pub attribute_name: String,
    /// The role of the attribute in the key schema (`HASH` or `RANGE`).
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// Creates a key schema element.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type,
        }
    }
}

/// An attribute definition specifying the attribute name and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// The name of the attribute.
    pub attribute_name: String,
    /// The scalar data type of the attribute (`S`, `N`, or `B`).
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Creates an attribute definition.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            attribute_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_key_schema_element() {
        let element = KeySchemaElement::new("pk", KeyType::Hash);
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"AttributeName":"pk","KeyType":"HASH"}"#);
    }

    #[test]
    fn test_should_serialize_attribute_definition() {
        let def = AttributeDefinition::new("sk", ScalarAttributeType::N);
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(json, r#"{"AttributeName":"sk","AttributeType":"N"}"#);
        let back: AttributeDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_should_map_value_types_to_scalar_types() {
        assert_eq!(
            ScalarAttributeType::from_value_type(AttributeValueType::B),
            Some(ScalarAttributeType::B)
        );
        assert_eq!(ScalarAttributeType::from_value_type(AttributeValueType::L), None);
    }
}
