//! In-memory key-value table driven by a [`DocumentTableSchema`].
//!
//! Items are stored as attribute maps keyed by the wire encoding of their
//! primary key, the same shape a DynamoDB backend would persist.

use dashmap::DashMap;
use ferrosdk_dynamodb_enhanced::{
    Document, DocumentError, DocumentTableSchema, PRIMARY_INDEX_NAME, TableSchema,
};
use ferrosdk_dynamodb_model::{AttributeMap, AttributeValue};

/// Errors returned by [`InMemoryTable`].
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The item lacks a key attribute.
    #[error("One or more parameter values were invalid: Missing the key {0} in the item")]
    MissingKey(String),

    /// The key attribute has the wrong type.
    #[error("One or more parameter values were invalid: Type mismatch for key {0}")]
    KeyTypeMismatch(String),

    /// Document conversion failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Key encoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A single table of documents.
#[derive(Debug)]
pub struct InMemoryTable {
    schema: DocumentTableSchema,
    items: DashMap<String, AttributeMap>,
}

impl InMemoryTable {
    /// An empty table described by `schema`.
    #[must_use]
    pub fn new(schema: DocumentTableSchema) -> Self {
        Self {
            schema,
            items: DashMap::new(),
        }
    }

    /// The table schema.
    #[must_use]
    pub fn schema(&self) -> &DocumentTableSchema {
        &self.schema
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stores `item`, replacing any item with the same key. `NULL`
    /// attributes are not persisted.
    pub fn put_item(&self, item: &Document) -> Result<(), TableError> {
        let map = self.schema.item_to_map(item, true)?;
        let key = self.storage_key(&map)?;
        self.items.insert(key, map);
        Ok(())
    }

    /// Reads the item whose key attributes equal those in `key`.
    pub fn get_item(&self, key: &Document) -> Result<Option<Document>, TableError> {
        let key_map = self.schema.item_to_map(key, true)?;
        let storage_key = self.storage_key(&key_map)?;
        let Some(stored) = self.items.get(&storage_key).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(Some(self.schema.map_to_item(stored)?))
    }

    /// Reads only the listed attributes of every item whose key matches.
    pub fn project(
        &self,
        key: &Document,
        attributes: &[&str],
    ) -> Result<Option<AttributeMap>, TableError> {
        self.get_item(key)?
            .map(|item| self.schema.item_to_map_for(&item, attributes))
            .transpose()
            .map_err(TableError::from)
    }

    fn storage_key(&self, map: &AttributeMap) -> Result<String, TableError> {
        let metadata = self.schema.table_metadata();
        let partition = metadata.primary_partition_key()?;
        let mut key = AttributeMap::new();
        for name in std::iter::once(partition).chain(metadata.primary_sort_key()) {
            let value = map
                .get(name)
                .ok_or_else(|| TableError::MissingKey(name.to_owned()))?;
            let expected = metadata
                .scalar_attribute_type(name)
                .map(|ty| ty.as_str());
            if expected != Some(value.value_type().as_str()) {
                return Err(TableError::KeyTypeMismatch(name.to_owned()));
            }
            key.insert(name.to_owned(), value.clone());
        }
        Ok(serde_json::to_string(&AttributeValue::M(key))?)
    }
}

/// Schema with a string partition key `pk` and a numeric sort key `sk`.
#[must_use]
pub fn composite_schema() -> DocumentTableSchema {
    use ferrosdk_dynamodb_model::ScalarAttributeType;

    DocumentTableSchema::builder()
        .add_index_partition_key(PRIMARY_INDEX_NAME, "pk", ScalarAttributeType::S)
        .add_index_sort_key(PRIMARY_INDEX_NAME, "sk", ScalarAttributeType::N)
        .build()
}
