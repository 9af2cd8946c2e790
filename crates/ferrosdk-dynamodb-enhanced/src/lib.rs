//! Schema-less DynamoDB documents for ferrosdk.
//!
//! The crate layers a typed API over the raw
//! [`AttributeValue`](ferrosdk_dynamodb_model::AttributeValue) union:
//!
//! - [`EnhancedType`] describes a native type and is the converter lookup key.
//! - [`ConverterChain`] resolves converters from an ordered list of
//!   [`AttributeConverterProvider`]s, first match wins.
//! - [`Document`] is an immutable, insertion-ordered attribute map with
//!   type-directed getters, a builder and a JSON projection.
//! - [`DocumentTableSchema`] adapts documents to the storage layer's
//!   [`TableSchema`] contract.
//!
//! ```
//! use ferrosdk_dynamodb_enhanced::Document;
//!
//! let doc = Document::builder()
//!     .put_string("name", "widget")
//!     .add("count", 3)
//!     .build()
//!     .unwrap();
//! assert_eq!(doc.to_json().unwrap(), r#"{"name":"widget","count":3}"#);
//! assert_eq!(doc.get_string("missing").unwrap(), None);
//! ```

pub mod converter;
pub mod document;
pub mod enhanced_type;
pub mod error;
pub mod number;
pub mod table_schema;

pub use converter::{
    AttributeConverter, AttributeConverterProvider, ConverterChain,
    DefaultAttributeConverterProvider, ErasedConverter,
};
pub use document::{Document, DocumentBuilder};
pub use enhanced_type::{EnhancedType, InferEnhancedType, TypeDescriptor, TypeToken};
pub use error::{ConversionError, DocumentError, DocumentResult};
pub use number::SdkNumber;
pub use table_schema::{
    DocumentTableSchema, DocumentTableSchemaBuilder, KeyAttribute, TableMetadata, TableSchema,
    PRIMARY_INDEX_NAME,
};
