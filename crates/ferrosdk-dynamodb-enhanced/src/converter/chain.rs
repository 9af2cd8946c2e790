//! Ordered, immutable converter provider chain.

use std::sync::Arc;

use tracing::trace;

use super::{
    AttributeConverter, AttributeConverterProvider, DefaultAttributeConverterProvider,
    ErasedConverter,
};
use crate::enhanced_type::EnhancedType;
use crate::error::{DocumentError, DocumentResult};

/// Ordered sequence of converter providers.
///
/// Cloning is cheap; the provider list is shared and never mutated.
#[derive(Debug, Clone)]
pub struct ConverterChain {
    providers: Arc<[Arc<dyn AttributeConverterProvider>]>,
}

impl ConverterChain {
    /// Creates a chain that consults `providers` in order.
    #[must_use]
    pub fn new(providers: impl IntoIterator<Item = Arc<dyn AttributeConverterProvider>>) -> Self {
        Self {
            providers: providers.into_iter().collect(),
        }
    }

    /// A chain holding only the shared default provider.
    #[must_use]
    pub fn default_chain() -> Self {
        Self::new([DefaultAttributeConverterProvider::create()])
    }

    /// The providers, in consultation order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn AttributeConverterProvider>] {
        &self.providers
    }

    /// Number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if the chain has no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolves the converter for `ty`.
    ///
    /// Providers are consulted in order and the first answer wins. A
    /// [`Composite`](ErasedConverter::Composite) answer builds the container
    /// converter by resolving each parameter through this same chain; if `ty`
    /// carries no composer the answer is skipped.
    pub fn resolve<T: 'static>(
        &self,
        ty: &EnhancedType<T>,
    ) -> DocumentResult<Arc<dyn AttributeConverter<T>>> {
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.converter_for(ty.descriptor()) {
                None => {}
                Some(ErasedConverter::Composite) => {
                    if let Some(compose) = ty.composer() {
                        trace!(provider = index, ty = %ty, "composing container converter");
                        return compose(self);
                    }
                }
                Some(erased) => {
                    trace!(provider = index, ty = %ty, "resolved converter");
                    return erased
                        .downcast::<T>()
                        .ok_or_else(|| DocumentError::ConverterTypeMismatch(ty.to_string()));
                }
            }
        }
        Err(DocumentError::ConverterNotFound(ty.to_string()))
    }
}
