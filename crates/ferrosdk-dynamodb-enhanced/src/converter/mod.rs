//! Attribute converters and the provider chain that resolves them.
//!
//! A converter maps one native type to and from an [`AttributeValue`].
//! Providers answer "do you have a converter for this descriptor?" and the
//! [`ConverterChain`] asks them in order, first match wins.

pub mod chain;
pub mod collection;
pub mod primitive;
pub mod provider;
pub mod temporal;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ferrosdk_dynamodb_model::{AttributeValue, AttributeValueType};

pub use self::chain::ConverterChain;
pub use self::provider::DefaultAttributeConverterProvider;
use crate::enhanced_type::TypeDescriptor;
use crate::error::ConversionError;

/// Bidirectional mapping between a native type and an [`AttributeValue`].
///
/// Converters are stateless and shared behind `Arc` across documents.
pub trait AttributeConverter<T>: Send + Sync {
    /// Converts a native value into its attribute value.
    fn transform_from(&self, input: &T) -> Result<AttributeValue, ConversionError>;

    /// Reads a native value out of an attribute value.
    fn transform_to(&self, input: &AttributeValue) -> Result<T, ConversionError>;

    /// Descriptor of the native type this converter handles.
    fn enhanced_type(&self) -> TypeDescriptor;

    /// The variant [`transform_from`](Self::transform_from) produces.
    fn attribute_value_type(&self) -> AttributeValueType;
}

/// A converter with its native type erased, as returned by providers.
#[derive(Clone)]
pub enum ErasedConverter {
    /// Holds an `Arc<dyn AttributeConverter<T>>` for some `T`.
    Typed(Arc<dyn Any + Send + Sync>),
    /// The descriptor is a container; build its converter from the
    /// converters of its parameters.
    Composite,
}

impl ErasedConverter {
    /// Erases a shared converter.
    #[must_use]
    pub fn of<T: 'static>(converter: Arc<dyn AttributeConverter<T>>) -> Self {
        Self::Typed(Arc::new(converter))
    }

    /// Erases a converter value.
    #[must_use]
    pub fn new<T: 'static, C: AttributeConverter<T> + 'static>(converter: C) -> Self {
        let converter: Arc<dyn AttributeConverter<T>> = Arc::new(converter);
        Self::of(converter)
    }

    /// Marker answer for container descriptors.
    #[must_use]
    pub fn composite() -> Self {
        Self::Composite
    }

    /// Recovers the typed converter, if this holds one for `T`.
    #[must_use]
    pub fn downcast<T: 'static>(&self) -> Option<Arc<dyn AttributeConverter<T>>> {
        match self {
            Self::Typed(any) => any.downcast_ref::<Arc<dyn AttributeConverter<T>>>().cloned(),
            Self::Composite => None,
        }
    }
}

impl fmt::Debug for ErasedConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(_) => f.write_str("ErasedConverter::Typed"),
            Self::Composite => f.write_str("ErasedConverter::Composite"),
        }
    }
}

/// Source of converters, consulted in chain order.
pub trait AttributeConverterProvider: Send + Sync + fmt::Debug {
    /// Returns a converter for `descriptor`, or `None` to defer to the next
    /// provider.
    fn converter_for(&self, descriptor: &TypeDescriptor) -> Option<ErasedConverter>;
}

/// Mismatch error for a converter that cannot read `value`'s variant.
pub(crate) fn mismatch(target: &'static str, value: &AttributeValue) -> ConversionError {
    ConversionError::mismatch(target, value.value_type())
}
