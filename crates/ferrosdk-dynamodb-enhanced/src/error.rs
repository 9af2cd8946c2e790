//! Error types for documents and attribute conversion.

use ferrosdk_dynamodb_model::{AttributeValueError, AttributeValueType};

/// Failure of a single converter call.
///
/// A converter reports [`Mismatch`](Self::Mismatch) when the attribute value
/// holds a variant it cannot read at all, and [`Invalid`](Self::Invalid) when
/// the variant is right but its content is malformed. Document getters turn
/// the former into an absent value and surface the latter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The attribute value variant is not readable as the target type.
    #[error("cannot convert attribute value of type {actual} to {target}")]
    Mismatch {
        /// Name of the target type.
        target: &'static str,
        /// The variant that was found.
        actual: AttributeValueType,
    },

    /// The attribute value has the right variant but malformed content.
    #[error("invalid value for {target}: {message}")]
    Invalid {
        /// Name of the target type.
        target: &'static str,
        /// What was wrong with the content.
        message: String,
    },
}

impl ConversionError {
    /// Creates a [`ConversionError::Mismatch`].
    #[must_use]
    pub fn mismatch(target: &'static str, actual: AttributeValueType) -> Self {
        Self::Mismatch { target, actual }
    }

    /// Creates a [`ConversionError::Invalid`].
    #[must_use]
    pub fn invalid(target: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            target,
            message: message.into(),
        }
    }

    /// Returns `true` for a variant mismatch.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

/// Document and converter chain error type.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No provider in the chain supplies a converter for the type.
    #[error(
        "Converter not found for {0}. Please add an AttributeConverterProvider for this type. \
         If it is a default type, add the DefaultAttributeConverterProvider to the builder."
    )]
    ConverterNotFound(String),

    /// A provider answered with a converter for a different native type.
    #[error("converter supplied for {0} does not convert to that type")]
    ConverterTypeMismatch(String),

    /// The attribute name is empty or blank.
    #[error("{0}")]
    InvalidAttributeName(String),

    /// An attribute value could not be converted.
    #[error("failed to convert attribute '{attribute}': {source}")]
    Conversion {
        /// The attribute being read or written.
        attribute: String,
        /// The converter failure.
        #[source]
        source: ConversionError,
    },

    /// The input is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is well-formed but cannot become a document.
    #[error("invalid JSON document: {0}")]
    InvalidJson(String),

    /// An attribute value accessor was used on the wrong variant.
    #[error(transparent)]
    TypeMismatch(#[from] AttributeValueError),

    /// The operation is not supported by this schema.
    #[error("{0}")]
    UnsupportedOperation(String),

    /// The table metadata declares no primary partition key.
    #[error(
        "Attempt to execute an operation that requires a primary index without defining any \
         primary key attributes in the table metadata."
    )]
    MissingPrimaryPartitionKey,
}

/// Convenience result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
