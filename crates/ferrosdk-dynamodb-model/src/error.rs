//! Errors raised when inspecting attribute values.

use crate::attribute_value::AttributeValueType;

/// Error returned by the typed accessors of [`AttributeValue`](crate::AttributeValue).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeValueError {
    /// The accessor asked for a variant other than the populated one.
    #[error("expected attribute value of type {expected}, found {actual}")]
    TypeMismatch {
        /// The variant the caller asked for.
        expected: AttributeValueType,
        /// The variant actually populated.
        actual: AttributeValueType,
    },
}
