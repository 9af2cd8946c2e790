//! Immutable, ordered, schema-less documents.
//!
//! A [`Document`] maps attribute names to [`AttributeValue`]s in insertion
//! order and carries the [`ConverterChain`] used by its typed getters. Values
//! put through a typed builder method are kept in native form and converted
//! on first access against the document's final chain, so a document can be
//! built even when the chain lacks a converter for one of its values; only
//! reading that attribute fails.

mod builder;
pub mod json;

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use bigdecimal::BigDecimal;
use bytes::Bytes;
use ferrosdk_dynamodb_model::{AttributeMap, AttributeValue};
use indexmap::{IndexMap, IndexSet};

pub use self::builder::DocumentBuilder;
use crate::converter::ConverterChain;
use crate::enhanced_type::EnhancedType;
use crate::error::{ConversionError, DocumentError, DocumentResult};
use crate::number::SdkNumber;

/// Converts a natively stored value against the chain it ends up in.
pub(crate) type Encoder =
    Arc<dyn Fn(&ConverterChain) -> DocumentResult<AttributeValue> + Send + Sync>;

/// Stored attribute before it becomes part of a document.
#[derive(Clone)]
pub(crate) enum PendingValue {
    Ready(AttributeValue),
    Deferred(Encoder),
}

enum AttributeSlot {
    Ready(AttributeValue),
    Deferred {
        encode: Encoder,
        cache: OnceLock<AttributeValue>,
    },
}

impl AttributeSlot {
    fn new(value: PendingValue) -> Self {
        match value {
            PendingValue::Ready(v) => Self::Ready(v),
            PendingValue::Deferred(encode) => Self::Deferred {
                encode,
                cache: OnceLock::new(),
            },
        }
    }

    fn pending(&self) -> PendingValue {
        match self {
            Self::Ready(v) => PendingValue::Ready(v.clone()),
            Self::Deferred { encode, .. } => PendingValue::Deferred(encode.clone()),
        }
    }

    /// Materializes the value. Only successful conversions are cached.
    fn resolve(&self, chain: &ConverterChain) -> DocumentResult<&AttributeValue> {
        match self {
            Self::Ready(v) => Ok(v),
            Self::Deferred { encode, cache } => {
                if let Some(v) = cache.get() {
                    return Ok(v);
                }
                let value = encode(chain)?;
                Ok(cache.get_or_init(|| value))
            }
        }
    }

    /// Materializes the value against a chain other than the document's
    /// own, leaving the cache untouched.
    fn resolve_with(&self, chain: &ConverterChain) -> DocumentResult<AttributeValue> {
        match self {
            Self::Ready(v) => Ok(v.clone()),
            Self::Deferred { encode, .. } => encode(chain),
        }
    }
}

struct DocumentInner {
    attributes: IndexMap<String, AttributeSlot>,
    chain: ConverterChain,
}

/// An immutable document. Cloning is cheap.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub(crate) fn from_parts(
        attributes: IndexMap<String, PendingValue>,
        chain: ConverterChain,
    ) -> Self {
        let attributes = attributes
            .into_iter()
            .map(|(k, v)| (k, AttributeSlot::new(v)))
            .collect();
        Self {
            inner: Arc::new(DocumentInner { attributes, chain }),
        }
    }

    /// Seeds a builder with this document's attributes and converter chain.
    #[must_use]
    pub fn to_builder(&self) -> DocumentBuilder {
        let attributes = self
            .inner
            .attributes
            .iter()
            .map(|(k, slot)| (k.clone(), slot.pending()))
            .collect();
        DocumentBuilder::seeded(attributes, self.inner.chain.providers().to_vec())
    }

    /// Parses a JSON object. `None` yields `Ok(None)`.
    pub fn from_json<'a>(input: impl Into<Option<&'a str>>) -> DocumentResult<Option<Self>> {
        input
            .into()
            .map(|text| Ok(Self::from_attribute_value_map(json::parse_object(text)?)))
            .transpose()
    }

    /// Builds a document from a JSON object map. `None` yields `Ok(None)`.
    pub fn from_map(
        map: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> DocumentResult<Option<Self>> {
        Ok(map.map(|m| Self::from_attribute_value_map(json::from_json_object(&m))))
    }

    /// Wraps an attribute map with the default converter chain.
    #[must_use]
    pub fn from_attribute_value_map(map: AttributeMap) -> Self {
        Self::with_chain(map, ConverterChain::default_chain())
    }

    pub(crate) fn with_chain(map: AttributeMap, chain: ConverterChain) -> Self {
        let attributes = map
            .into_iter()
            .map(|(k, v)| (k, PendingValue::Ready(v)))
            .collect();
        Self::from_parts(attributes, chain)
    }

    /// The converter chain used by typed getters.
    #[must_use]
    pub fn converter_chain(&self) -> &ConverterChain {
        &self.inner.chain
    }

    /// Reads `key` as `T`.
    ///
    /// Returns `Ok(None)` when the key is absent, holds `NULL`, or holds a
    /// variant the converter cannot read. Fails when no converter for `T`
    /// resolves or the content is malformed.
    pub fn get<T: 'static>(&self, key: &str, ty: &EnhancedType<T>) -> DocumentResult<Option<T>> {
        let Some(slot) = self.inner.attributes.get(key) else {
            return Ok(None);
        };
        let value = slot.resolve(&self.inner.chain)?;
        if matches!(value, AttributeValue::Null(_)) {
            return Ok(None);
        }
        let converter = self.inner.chain.resolve(ty)?;
        match converter.transform_to(value) {
            Ok(v) => Ok(Some(v)),
            Err(ConversionError::Mismatch { .. }) => Ok(None),
            Err(source) => Err(DocumentError::Conversion {
                attribute: key.to_owned(),
                source,
            }),
        }
    }

    /// Reads an `S` attribute.
    pub fn get_string(&self, key: &str) -> DocumentResult<Option<String>> {
        self.get(key, &EnhancedType::of())
    }

    /// Reads a number with its exact text.
    pub fn get_number(&self, key: &str) -> DocumentResult<Option<SdkNumber>> {
        self.get(key, &EnhancedType::of())
    }

    /// Reads a number as a [`BigDecimal`].
    pub fn get_big_decimal(&self, key: &str) -> DocumentResult<Option<BigDecimal>> {
        self.get(key, &EnhancedType::of())
    }

    /// Reads a `B` attribute.
    pub fn get_bytes(&self, key: &str) -> DocumentResult<Option<Bytes>> {
        self.get(key, &EnhancedType::of())
    }

    /// Reads a boolean.
    pub fn get_boolean(&self, key: &str) -> DocumentResult<Option<bool>> {
        self.get(key, &EnhancedType::of())
    }

    /// Reads an `SS` attribute. Lists, including JSON arrays, yield `None`.
    pub fn get_string_set(&self, key: &str) -> DocumentResult<Option<IndexSet<String>>> {
        self.get(key, &EnhancedType::set_of(EnhancedType::of()))
    }

    /// Reads an `NS` attribute.
    pub fn get_number_set(&self, key: &str) -> DocumentResult<Option<IndexSet<SdkNumber>>> {
        self.get(key, &EnhancedType::set_of(EnhancedType::of()))
    }

    /// Reads a `BS` attribute.
    pub fn get_bytes_set(&self, key: &str) -> DocumentResult<Option<IndexSet<Bytes>>> {
        self.get(key, &EnhancedType::set_of(EnhancedType::of()))
    }

    /// Reads a list whose elements are `T`.
    pub fn get_list<T: Send + Sync + 'static>(
        &self,
        key: &str,
        element: &EnhancedType<T>,
    ) -> DocumentResult<Option<Vec<T>>> {
        self.get(key, &EnhancedType::list_of(element.clone()))
    }

    /// Reads a map from `K` to `V`.
    pub fn get_map<K, V>(
        &self,
        key: &str,
        key_type: &EnhancedType<K>,
        value_type: &EnhancedType<V>,
    ) -> DocumentResult<Option<IndexMap<K, V>>>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.get(
            key,
            &EnhancedType::map_of(key_type.clone(), value_type.clone()),
        )
    }

    /// Reads an `M` attribute as a nested document sharing this converter
    /// chain.
    pub fn get_map_as_document(&self, key: &str) -> DocumentResult<Option<Self>> {
        match self.attribute_value(key)? {
            Some(AttributeValue::M(map)) => {
                Ok(Some(Self::with_chain(map, self.inner.chain.clone())))
            }
            _ => Ok(None),
        }
    }

    /// Renders one attribute as JSON text. Absent keys yield `None`.
    pub fn get_json(&self, key: &str) -> DocumentResult<Option<String>> {
        self.attribute_value(key)?
            .map(|v| serde_json::to_string(&json::to_json_value(&v)).map_err(DocumentError::from))
            .transpose()
    }

    /// The raw attribute value stored under `key`.
    pub fn attribute_value(&self, key: &str) -> DocumentResult<Option<AttributeValue>> {
        self.inner
            .attributes
            .get(key)
            .map(|slot| slot.resolve(&self.inner.chain).cloned())
            .transpose()
    }

    /// Returns `true` if `key` is present and holds `NULL`.
    ///
    /// Typed values are materialized to answer; one that cannot be converted
    /// is not null.
    #[must_use]
    pub fn is_null(&self, key: &str) -> bool {
        self.inner.attributes.get(key).is_some_and(|slot| {
            slot.resolve(&self.inner.chain)
                .is_ok_and(|v| matches!(v, AttributeValue::Null(_)))
        })
    }

    /// Returns `true` if `key` is present, whatever it holds.
    #[must_use]
    pub fn is_present(&self, key: &str) -> bool {
        self.inner.attributes.contains_key(key)
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.inner.attributes.keys().map(String::as_str)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.attributes.len()
    }

    /// Returns `true` if the document has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.attributes.is_empty()
    }

    /// All attributes as an ordered attribute map.
    pub fn to_attribute_value_map(&self) -> DocumentResult<AttributeMap> {
        self.inner
            .attributes
            .iter()
            .map(|(k, slot)| Ok((k.clone(), slot.resolve(&self.inner.chain)?.clone())))
            .collect()
    }

    /// The document's chain with `front` consulted first.
    fn chain_behind(&self, front: &ConverterChain) -> ConverterChain {
        ConverterChain::new(
            front
                .providers()
                .iter()
                .chain(self.inner.chain.providers())
                .cloned(),
        )
    }

    /// Like [`Self::to_attribute_value_map`], resolving typed values with
    /// `front` ahead of the document's chain.
    pub(crate) fn to_attribute_value_map_with(
        &self,
        front: &ConverterChain,
    ) -> DocumentResult<AttributeMap> {
        let chain = self.chain_behind(front);
        self.inner
            .attributes
            .iter()
            .map(|(k, slot)| Ok((k.clone(), slot.resolve_with(&chain)?)))
            .collect()
    }

    /// Like [`Self::attribute_value`], resolving with `front` first.
    pub(crate) fn attribute_value_with(
        &self,
        key: &str,
        front: &ConverterChain,
    ) -> DocumentResult<Option<AttributeValue>> {
        self.inner
            .attributes
            .get(key)
            .map(|slot| slot.resolve_with(&self.chain_behind(front)))
            .transpose()
    }

    /// Compact JSON with keys in document order.
    pub fn to_json(&self) -> DocumentResult<String> {
        let object = json::to_json_object(&self.to_attribute_value_map()?);
        Ok(serde_json::to_string(&object)?)
    }

    /// Indented JSON with keys in document order.
    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        let object = json::to_json_object(&self.to_attribute_value_map()?);
        Ok(serde_json::to_string_pretty(&object)?)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_attribute_value_map(), other.to_attribute_value_map()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, slot) in &self.inner.attributes {
            match slot {
                AttributeSlot::Ready(v) => map.entry(k, v),
                AttributeSlot::Deferred { cache, .. } => match cache.get() {
                    Some(v) => map.entry(k, v),
                    None => map.entry(k, &format_args!("<unconverted>")),
                },
            };
        }
        map.finish()
    }
}
