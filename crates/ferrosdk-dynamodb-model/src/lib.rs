//! DynamoDB model types for ferrosdk.
//!
//! This crate holds the wire-level value union shared by every DynamoDB
//! component and the handful of key schema types that table metadata needs.
//! Everything here is hand-written: DynamoDB's JSON protocol makes serde
//! derives trivial, and `AttributeValue` needs a custom single-key encoding.

pub mod attribute_value;
pub mod error;
pub mod types;

pub use attribute_value::{AttributeMap, AttributeValue, AttributeValueType};
pub use error::AttributeValueError;
pub use types::{AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType};
