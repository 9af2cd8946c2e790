//! Staging area for new documents.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use bytes::Bytes;
use ferrosdk_dynamodb_model::{AttributeMap, AttributeValue};
use indexmap::IndexMap;

use super::{Document, PendingValue, json};
use crate::converter::{AttributeConverterProvider, ConverterChain};
use crate::enhanced_type::{EnhancedType, InferEnhancedType};
use crate::error::{DocumentError, DocumentResult};
use crate::number::SdkNumber;

const INVALID_NAME_MESSAGE: &str = "Attribute name must not be null or empty.";

/// Builder for [`Document`].
///
/// Every method consumes and returns the builder. The first invalid input
/// (blank attribute name, malformed JSON) is remembered and returned by
/// [`build`](Self::build); later calls are still applied.
#[derive(Default)]
pub struct DocumentBuilder {
    attributes: IndexMap<String, PendingValue>,
    providers: Vec<Arc<dyn AttributeConverterProvider>>,
    error: Option<DocumentError>,
}

impl DocumentBuilder {
    pub(super) fn seeded(
        attributes: IndexMap<String, PendingValue>,
        providers: Vec<Arc<dyn AttributeConverterProvider>>,
    ) -> Self {
        Self {
            attributes,
            providers,
            error: None,
        }
    }

    fn fail(&mut self, error: DocumentError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn insert(mut self, key: impl Into<String>, value: PendingValue) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            self.fail(DocumentError::InvalidAttributeName(INVALID_NAME_MESSAGE.to_owned()));
        } else {
            self.attributes.insert(key, value);
        }
        self
    }

    fn ready(self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.insert(key, PendingValue::Ready(value))
    }

    /// Stores `value` as `ty`; conversion happens against the final chain
    /// when the attribute is first read.
    #[must_use]
    pub fn put<T: Send + Sync + 'static>(
        self,
        key: impl Into<String>,
        value: T,
        ty: &EnhancedType<T>,
    ) -> Self {
        let key = key.into();
        let attribute = key.clone();
        let ty = ty.clone();
        let encode = move |chain: &ConverterChain| {
            let converter = chain.resolve(&ty)?;
            converter
                .transform_from(&value)
                .map_err(|source| DocumentError::Conversion {
                    attribute: attribute.clone(),
                    source,
                })
        };
        self.insert(key, PendingValue::Deferred(Arc::new(encode)))
    }

    /// Stores `value` with its type inferred from `T`.
    #[must_use]
    pub fn add<T: InferEnhancedType>(self, key: impl Into<String>, value: T) -> Self {
        self.put(key, value, &T::enhanced_type())
    }

    /// Stores an `S`.
    #[must_use]
    pub fn put_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ready(key, AttributeValue::S(value.into()))
    }

    /// Stores an `N`.
    #[must_use]
    pub fn put_number(self, key: impl Into<String>, value: impl Into<SdkNumber>) -> Self {
        self.ready(key, AttributeValue::N(value.into().into_string()))
    }

    /// Stores a `B`.
    #[must_use]
    pub fn put_bytes(self, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.ready(key, AttributeValue::B(value.into()))
    }

    /// Stores a `BOOL`.
    #[must_use]
    pub fn put_boolean(self, key: impl Into<String>, value: bool) -> Self {
        self.ready(key, AttributeValue::Bool(value))
    }

    /// Stores `NULL`.
    #[must_use]
    pub fn put_null(self, key: impl Into<String>) -> Self {
        self.ready(key, AttributeValue::Null(true))
    }

    /// Stores an `SS`, keeping iteration order.
    #[must_use]
    pub fn put_string_set<I, S>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ready(key, AttributeValue::from_ss(values))
    }

    /// Stores an `NS`, keeping iteration order.
    #[must_use]
    pub fn put_number_set<I, N>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<SdkNumber>,
    {
        let numbers = values.into_iter().map(|n| n.into().into_string());
        self.ready(key, AttributeValue::from_ns(numbers))
    }

    /// Stores a `BS`, keeping iteration order.
    #[must_use]
    pub fn put_bytes_set<I, B>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.ready(key, AttributeValue::from_bs(values))
    }

    /// Stores a list of `T`.
    #[must_use]
    pub fn put_list<T: Send + Sync + 'static>(
        self,
        key: impl Into<String>,
        values: Vec<T>,
        element: &EnhancedType<T>,
    ) -> Self {
        self.put(key, values, &EnhancedType::list_of(element.clone()))
    }

    /// Stores a map from `K` to `V`.
    #[must_use]
    pub fn put_map<K, V>(
        self,
        key: impl Into<String>,
        values: IndexMap<K, V>,
        key_type: &EnhancedType<K>,
        value_type: &EnhancedType<V>,
    ) -> Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.put(
            key,
            values,
            &EnhancedType::map_of(key_type.clone(), value_type.clone()),
        )
    }

    /// Stores any JSON value, parsed with the document JSON mapping.
    #[must_use]
    pub fn put_json(mut self, key: impl Into<String>, json: &str) -> Self {
        match json::parse_value(json) {
            Ok(value) => self.ready(key, value),
            Err(e) => {
                self.fail(e);
                self
            }
        }
    }

    /// Nests another document as an `M`.
    #[must_use]
    pub fn put_document(self, key: impl Into<String>, document: Document) -> Self {
        let encode =
            move |_: &ConverterChain| document.to_attribute_value_map().map(AttributeValue::M);
        self.insert(key, PendingValue::Deferred(Arc::new(encode)))
    }

    /// Stores a raw attribute value.
    #[must_use]
    pub fn put_attribute_value(self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.ready(key, value)
    }

    /// Removes `key` if present.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        if key.trim().is_empty() {
            self.fail(DocumentError::InvalidAttributeName(INVALID_NAME_MESSAGE.to_owned()));
        } else {
            self.attributes.shift_remove(key);
        }
        self
    }

    /// Replaces every attribute with the members of a JSON object.
    #[must_use]
    pub fn json(mut self, json: &str) -> Self {
        self.attributes.clear();
        match json::parse_object(json) {
            Ok(map) => self.attribute_value_map(map),
            Err(e) => {
                self.fail(e);
                self
            }
        }
    }

    /// Replaces every attribute with `map`.
    #[must_use]
    pub fn attribute_value_map(mut self, map: AttributeMap) -> Self {
        self.attributes = map
            .into_iter()
            .map(|(k, v)| (k, PendingValue::Ready(v)))
            .collect();
        self
    }

    /// Replaces the converter chain.
    #[must_use]
    pub fn attribute_converter_providers(
        mut self,
        providers: impl IntoIterator<Item = Arc<dyn AttributeConverterProvider>>,
    ) -> Self {
        self.providers = providers.into_iter().collect();
        self
    }

    /// Appends a provider to the converter chain.
    #[must_use]
    pub fn add_attribute_converter_provider(
        mut self,
        provider: Arc<dyn AttributeConverterProvider>,
    ) -> Self {
        self.providers.push(provider);
        self
    }

    /// Freezes the builder into a document.
    ///
    /// An empty provider list falls back to the default chain.
    pub fn build(self) -> DocumentResult<Document> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let chain = if self.providers.is_empty() {
            ConverterChain::default_chain()
        } else {
            ConverterChain::new(self.providers)
        };
        Ok(Document::from_parts(self.attributes, chain))
    }
}

impl fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("providers", &self.providers)
            .field("error", &self.error)
            .finish()
    }
}
