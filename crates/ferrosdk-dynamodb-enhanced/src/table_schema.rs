//! Item schema contract and its document implementation.
//!
//! The storage layer talks to items through [`TableSchema`]: it maps items to
//! attribute maps and back, and exposes the table's key metadata.
//! [`DocumentTableSchema`] implements it with [`Document`] as the item type.

use std::sync::Arc;

use ferrosdk_dynamodb_model::{
    AttributeDefinition, AttributeMap, AttributeValue, KeySchemaElement, KeyType,
    ScalarAttributeType,
};
use indexmap::IndexMap;

use crate::converter::{AttributeConverterProvider, ConverterChain, ErasedConverter};
use crate::document::Document;
use crate::enhanced_type::TypeDescriptor;
use crate::error::{DocumentError, DocumentResult};

/// Name under which the table's primary index is registered.
pub const PRIMARY_INDEX_NAME: &str = "$PRIMARY_INDEX";

/// Mapping between items of type `T` and DynamoDB attribute maps.
pub trait TableSchema<T>: Send + Sync {
    /// Builds an item from an attribute map.
    fn map_to_item(&self, attributes: AttributeMap) -> DocumentResult<T>;

    /// Converts an item into an attribute map, optionally dropping `NULL`s.
    fn item_to_map(&self, item: &T, ignore_nulls: bool) -> DocumentResult<AttributeMap>;

    /// Converts only the named attributes that the item holds.
    fn item_to_map_for(&self, item: &T, attributes: &[&str]) -> DocumentResult<AttributeMap>;

    /// Reads a single attribute of the item.
    fn attribute_value(&self, item: &T, attribute_name: &str)
    -> DocumentResult<Option<AttributeValue>>;

    /// Descriptor of the item type.
    fn item_type(&self) -> TypeDescriptor;

    /// Key metadata of the table.
    fn table_metadata(&self) -> &TableMetadata;

    /// Names of the attributes the schema knows about.
    fn attribute_names(&self) -> Vec<String>;

    /// Returns `true` if items cannot be instantiated from this schema.
    fn is_abstract(&self) -> bool;

    /// Per-attribute converter.
    fn converter_for_attribute(&self, attribute_name: &str) -> DocumentResult<ErasedConverter>;
}

/// Partition and sort key of one index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMetadata {
    partition_key: Option<String>,
    sort_key: Option<String>,
}

impl IndexMetadata {
    /// The partition key attribute, if declared.
    #[must_use]
    pub fn partition_key(&self) -> Option<&str> {
        self.partition_key.as_deref()
    }

    /// The sort key attribute, if declared.
    #[must_use]
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }
}

/// A key attribute and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    /// Attribute name.
    pub name: String,
    /// Scalar type of the attribute.
    pub attribute_type: ScalarAttributeType,
}

/// Key metadata of a table: indices and the types of their key attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableMetadata {
    indices: IndexMap<String, IndexMetadata>,
    key_attributes: IndexMap<String, ScalarAttributeType>,
}

impl TableMetadata {
    /// Partition key of the primary index.
    pub fn primary_partition_key(&self) -> DocumentResult<&str> {
        self.index_partition_key(PRIMARY_INDEX_NAME)
            .ok_or(DocumentError::MissingPrimaryPartitionKey)
    }

    /// Sort key of the primary index, if any.
    #[must_use]
    pub fn primary_sort_key(&self) -> Option<&str> {
        self.index_sort_key(PRIMARY_INDEX_NAME)
    }

    /// Partition key of `index`, if declared.
    #[must_use]
    pub fn index_partition_key(&self, index: &str) -> Option<&str> {
        self.indices.get(index).and_then(IndexMetadata::partition_key)
    }

    /// Sort key of `index`, if declared.
    #[must_use]
    pub fn index_sort_key(&self, index: &str) -> Option<&str> {
        self.indices.get(index).and_then(IndexMetadata::sort_key)
    }

    /// Index names in declaration order.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    /// Every key attribute across all indices, in declaration order.
    #[must_use]
    pub fn key_attributes(&self) -> Vec<KeyAttribute> {
        self.key_attributes
            .iter()
            .map(|(name, ty)| KeyAttribute {
                name: name.clone(),
                attribute_type: *ty,
            })
            .collect()
    }

    /// Scalar type of a key attribute.
    #[must_use]
    pub fn scalar_attribute_type(&self, attribute_name: &str) -> Option<ScalarAttributeType> {
        self.key_attributes.get(attribute_name).copied()
    }

    /// Key schema of the primary index: `HASH` then optional `RANGE`.
    pub fn primary_key_schema(&self) -> DocumentResult<Vec<KeySchemaElement>> {
        let mut schema = vec![KeySchemaElement::new(
            self.primary_partition_key()?,
            KeyType::Hash,
        )];
        if let Some(sort) = self.primary_sort_key() {
            schema.push(KeySchemaElement::new(sort, KeyType::Range));
        }
        Ok(schema)
    }

    /// Attribute definitions for every key attribute.
    #[must_use]
    pub fn attribute_definitions(&self) -> Vec<AttributeDefinition> {
        self.key_attributes
            .iter()
            .map(|(name, ty)| AttributeDefinition::new(name.clone(), *ty))
            .collect()
    }

    fn add_key(
        &mut self,
        index: &str,
        attribute: String,
        ty: ScalarAttributeType,
        key_type: KeyType,
    ) {
        let entry = self.indices.entry(index.to_owned()).or_default();
        match key_type {
            KeyType::Hash => entry.partition_key = Some(attribute.clone()),
            KeyType::Range => entry.sort_key = Some(attribute.clone()),
        }
        self.key_attributes.insert(attribute, ty);
    }
}

/// [`TableSchema`] over [`Document`] items.
///
/// Works at whole-document granularity; per-attribute converters are not
/// available.
#[derive(Debug, Clone)]
pub struct DocumentTableSchema {
    metadata: TableMetadata,
    chain: ConverterChain,
    // Only explicitly attached providers take precedence over an item's own.
    attached: Option<ConverterChain>,
}

impl DocumentTableSchema {
    /// Starts a schema builder.
    #[must_use]
    pub fn builder() -> DocumentTableSchemaBuilder {
        DocumentTableSchemaBuilder::default()
    }

    /// The converter chain attached to items read through this schema.
    #[must_use]
    pub fn converter_chain(&self) -> &ConverterChain {
        &self.chain
    }
}

impl TableSchema<Document> for DocumentTableSchema {
    fn map_to_item(&self, attributes: AttributeMap) -> DocumentResult<Document> {
        Document::builder()
            .attribute_value_map(attributes)
            .attribute_converter_providers(self.chain.providers().iter().cloned())
            .build()
    }

    fn item_to_map(&self, item: &Document, ignore_nulls: bool) -> DocumentResult<AttributeMap> {
        let mut map = match &self.attached {
            Some(chain) => item.to_attribute_value_map_with(chain)?,
            None => item.to_attribute_value_map()?,
        };
        if ignore_nulls {
            map.retain(|_, v| !matches!(v, AttributeValue::Null(_)));
        }
        Ok(map)
    }

    fn item_to_map_for(
        &self,
        item: &Document,
        attributes: &[&str],
    ) -> DocumentResult<AttributeMap> {
        let mut map = AttributeMap::with_capacity(attributes.len());
        for name in attributes {
            if let Some(value) = self.attribute_value(item, name)? {
                map.insert((*name).to_owned(), value);
            }
        }
        Ok(map)
    }

    fn attribute_value(
        &self,
        item: &Document,
        attribute_name: &str,
    ) -> DocumentResult<Option<AttributeValue>> {
        match &self.attached {
            Some(chain) => item.attribute_value_with(attribute_name, chain),
            None => item.attribute_value(attribute_name),
        }
    }

    fn item_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Document>()
    }

    fn table_metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn attribute_names(&self) -> Vec<String> {
        self.metadata
            .key_attributes
            .keys()
            .cloned()
            .collect()
    }

    fn is_abstract(&self) -> bool {
        false
    }

    fn converter_for_attribute(&self, _attribute_name: &str) -> DocumentResult<ErasedConverter> {
        Err(DocumentError::UnsupportedOperation(
            "ConverterForAttribute not supported for DocumentTableSchema".to_owned(),
        ))
    }
}

/// Builder for [`DocumentTableSchema`].
#[derive(Debug, Default)]
pub struct DocumentTableSchemaBuilder {
    metadata: TableMetadata,
    providers: Vec<Arc<dyn AttributeConverterProvider>>,
}

impl DocumentTableSchemaBuilder {
    /// Declares the partition key of `index`. Use [`PRIMARY_INDEX_NAME`] for
    /// the table key.
    #[must_use]
    pub fn add_index_partition_key(
        mut self,
        index: &str,
        attribute: impl Into<String>,
        ty: ScalarAttributeType,
    ) -> Self {
        self.metadata.add_key(index, attribute.into(), ty, KeyType::Hash);
        self
    }

    /// Declares the sort key of `index`.
    #[must_use]
    pub fn add_index_sort_key(
        mut self,
        index: &str,
        attribute: impl Into<String>,
        ty: ScalarAttributeType,
    ) -> Self {
        self.metadata.add_key(index, attribute.into(), ty, KeyType::Range);
        self
    }

    /// Replaces the converter chain. An empty chain means the default one.
    ///
    /// Attached providers are also consulted, ahead of the item's own, when
    /// items are converted to attribute maps.
    #[must_use]
    pub fn attribute_converter_providers(
        mut self,
        providers: impl IntoIterator<Item = Arc<dyn AttributeConverterProvider>>,
    ) -> Self {
        self.providers = providers.into_iter().collect();
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> DocumentTableSchema {
        let attached =
            (!self.providers.is_empty()).then(|| ConverterChain::new(self.providers));
        DocumentTableSchema {
            metadata: self.metadata,
            chain: attached.clone().unwrap_or_else(ConverterChain::default_chain),
            attached,
        }
    }
}
