//! Container converters, composed from the converters of their parameters.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use ferrosdk_dynamodb_model::{AttributeValue, AttributeValueType};
use indexmap::{IndexMap, IndexSet};

use super::{AttributeConverter, mismatch};
use crate::enhanced_type::{TypeDescriptor, TypeToken};
use crate::error::ConversionError;

/// `Vec<E>` ↔ `L`.
///
/// Also reads `SS`, `NS` and `BS`, element by element.
pub struct ListConverter<E> {
    element: Arc<dyn AttributeConverter<E>>,
}

impl<E> fmt::Debug for ListConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConverter")
            .field("element", &self.element.enhanced_type())
            .finish()
    }
}

impl<E> ListConverter<E> {
    /// Creates a list converter over `element`.
    #[must_use]
    pub fn new(element: Arc<dyn AttributeConverter<E>>) -> Self {
        Self { element }
    }
}

impl<E> AttributeConverter<Vec<E>> for ListConverter<E> {
    fn transform_from(&self, input: &Vec<E>) -> Result<AttributeValue, ConversionError> {
        input
            .iter()
            .map(|item| self.element.transform_from(item))
            .collect::<Result<Vec<_>, _>>()
            .map(AttributeValue::L)
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<Vec<E>, ConversionError> {
        match input {
            AttributeValue::L(items) => items
                .iter()
                .map(|item| self.element.transform_to(item))
                .collect(),
            AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_) => {
                set_members(input).map(|m| self.element.transform_to(&m)).collect()
            }
            other => Err(mismatch("List", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::container(TypeToken::List, vec![self.element.enhanced_type()])
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::L
    }
}

/// `IndexSet<E>` ↔ `SS`, `NS` or `BS`.
///
/// The set variant follows the element converter's attribute value type, so
/// an empty set still gets the right variant. A list is never read as a set.
pub struct SetConverter<E> {
    element: Arc<dyn AttributeConverter<E>>,
}

impl<E> fmt::Debug for SetConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetConverter")
            .field("element", &self.element.enhanced_type())
            .finish()
    }
}

impl<E> SetConverter<E> {
    /// Creates a set converter over `element`.
    #[must_use]
    pub fn new(element: Arc<dyn AttributeConverter<E>>) -> Self {
        Self { element }
    }
}

impl<E: Eq + Hash> AttributeConverter<IndexSet<E>> for SetConverter<E> {
    fn transform_from(&self, input: &IndexSet<E>) -> Result<AttributeValue, ConversionError> {
        let element_type = self.element.attribute_value_type();
        let converted = input.iter().map(|item| self.element.transform_from(item));
        match element_type {
            AttributeValueType::S => converted
                .map(|v| match v? {
                    AttributeValue::S(s) => Ok(s),
                    other => Err(set_member_error(element_type, &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(AttributeValue::Ss),
            AttributeValueType::N => converted
                .map(|v| match v? {
                    AttributeValue::N(n) => Ok(n),
                    other => Err(set_member_error(element_type, &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(AttributeValue::Ns),
            AttributeValueType::B => converted
                .map(|v| match v? {
                    AttributeValue::B(b) => Ok(b),
                    other => Err(set_member_error(element_type, &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(AttributeValue::Bs),
            other => Err(ConversionError::invalid(
                "Set",
                format!("sets of {other} values are not supported"),
            )),
        }
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<IndexSet<E>, ConversionError> {
        match input {
            AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_) => {
                set_members(input).map(|m| self.element.transform_to(&m)).collect()
            }
            other => Err(mismatch("Set", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::container(TypeToken::Set, vec![self.element.enhanced_type()])
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        self.element
            .attribute_value_type()
            .set_of()
            .unwrap_or(AttributeValueType::Ss)
    }
}

/// `IndexMap<K, V>` ↔ `M`.
///
/// Keys pass through the key converter as `S` values, so any key type whose
/// converter reads strings works (`String`, integers, `Uuid`, dates).
pub struct MapConverter<K, V> {
    key: Arc<dyn AttributeConverter<K>>,
    value: Arc<dyn AttributeConverter<V>>,
}

impl<K, V> fmt::Debug for MapConverter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapConverter")
            .field("key", &self.key.enhanced_type())
            .field("value", &self.value.enhanced_type())
            .finish()
    }
}

impl<K, V> MapConverter<K, V> {
    /// Creates a map converter.
    #[must_use]
    pub fn new(key: Arc<dyn AttributeConverter<K>>, value: Arc<dyn AttributeConverter<V>>) -> Self {
        Self { key, value }
    }
}

impl<K: Eq + Hash, V> AttributeConverter<IndexMap<K, V>> for MapConverter<K, V> {
    fn transform_from(&self, input: &IndexMap<K, V>) -> Result<AttributeValue, ConversionError> {
        let mut map = IndexMap::with_capacity(input.len());
        for (k, v) in input {
            let name = match self.key.transform_from(k)? {
                AttributeValue::S(s) | AttributeValue::N(s) => s,
                other => {
                    return Err(ConversionError::invalid(
                        "Map",
                        format!("map keys must convert to S or N, found {}", other.value_type()),
                    ));
                }
            };
            map.insert(name, self.value.transform_from(v)?);
        }
        Ok(AttributeValue::M(map))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<IndexMap<K, V>, ConversionError> {
        let AttributeValue::M(entries) = input else {
            return Err(mismatch("Map", input));
        };
        entries
            .iter()
            .map(|(k, v)| {
                let key = self.key.transform_to(&AttributeValue::S(k.clone()))?;
                Ok((key, self.value.transform_to(v)?))
            })
            .collect()
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::container(
            TypeToken::Map,
            vec![self.key.enhanced_type(), self.value.enhanced_type()],
        )
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }
}

/// `Option<E>` ↔ `NULL` or the inner value.
pub struct OptionalConverter<E> {
    inner: Arc<dyn AttributeConverter<E>>,
}

impl<E> fmt::Debug for OptionalConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalConverter")
            .field("inner", &self.inner.enhanced_type())
            .finish()
    }
}

impl<E> OptionalConverter<E> {
    /// Creates an optional converter over `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn AttributeConverter<E>>) -> Self {
        Self { inner }
    }
}

impl<E> AttributeConverter<Option<E>> for OptionalConverter<E> {
    fn transform_from(&self, input: &Option<E>) -> Result<AttributeValue, ConversionError> {
        match input {
            Some(value) => self.inner.transform_from(value),
            None => Ok(AttributeValue::Null(true)),
        }
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<Option<E>, ConversionError> {
        match input {
            AttributeValue::Null(_) => Ok(None),
            other => self.inner.transform_to(other).map(Some),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::container(TypeToken::Optional, vec![self.inner.enhanced_type()])
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        self.inner.attribute_value_type()
    }
}

/// Members of a set variant as scalar attribute values.
fn set_members(input: &AttributeValue) -> Box<dyn Iterator<Item = AttributeValue> + '_> {
    match input {
        AttributeValue::Ss(v) => Box::new(v.iter().cloned().map(AttributeValue::S)),
        AttributeValue::Ns(v) => Box::new(v.iter().cloned().map(AttributeValue::N)),
        AttributeValue::Bs(v) => Box::new(v.iter().cloned().map(AttributeValue::B)),
        _ => Box::new(std::iter::empty()),
    }
}

fn set_member_error(expected: AttributeValueType, found: &AttributeValue) -> ConversionError {
    ConversionError::invalid(
        "Set",
        format!(
            "element converter declared {expected} but produced {}",
            found.value_type()
        ),
    )
}
