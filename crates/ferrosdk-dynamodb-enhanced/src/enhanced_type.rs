//! Reified type descriptors used as converter lookup keys.
//!
//! A [`TypeDescriptor`] is the untyped lookup key: a base token plus its
//! parameter descriptors. [`EnhancedType<T>`] wraps a descriptor with the
//! native type it stands for and, for container kinds, the recipe that builds
//! the container converter out of its parameters' converters.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ferrosdk_dynamodb_model::AttributeValue;
use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::converter::chain::ConverterChain;
use crate::converter::collection::{ListConverter, MapConverter, OptionalConverter, SetConverter};
use crate::converter::AttributeConverter;
use crate::document::Document;
use crate::error::DocumentResult;
use crate::number::SdkNumber;

/// Base kind of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeToken {
    /// A concrete native type.
    Class {
        /// Identity of the native type.
        id: TypeId,
        /// Readable name of the native type.
        name: &'static str,
    },
    /// Ordered list, one parameter.
    List,
    /// Set, one parameter.
    Set,
    /// Map, key and value parameters.
    Map,
    /// Optional value, one parameter.
    Optional,
}

/// Untyped type descriptor: a token plus zero or more parameter descriptors.
///
/// Two descriptors are equal iff their tokens and all parameters match
/// recursively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    token: TypeToken,
    parameters: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor of a concrete native type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            token: TypeToken::Class {
                id: TypeId::of::<T>(),
                name: type_name::<T>(),
            },
            parameters: Vec::new(),
        }
    }

    /// Descriptor of a container kind with the given parameters.
    #[must_use]
    pub fn container(token: TypeToken, parameters: Vec<TypeDescriptor>) -> Self {
        Self { token, parameters }
    }

    /// The base token.
    #[must_use]
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// The parameter descriptors, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }

    /// Returns `true` if this describes exactly the native type `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        matches!(self.token, TypeToken::Class { id, .. } if id == TypeId::of::<T>())
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.token {
            TypeToken::Class { name, .. } => return f.write_str(name),
            TypeToken::List => "List",
            TypeToken::Set => "Set",
            TypeToken::Map => "Map",
            TypeToken::Optional => "Optional",
        };
        write!(f, "{kind}<")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.render(f)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnhancedType(")?;
        self.render(f)?;
        f.write_str(")")
    }
}

type Composer<T> =
    Arc<dyn Fn(&ConverterChain) -> DocumentResult<Arc<dyn AttributeConverter<T>>> + Send + Sync>;

/// Typed descriptor for the native type `T`.
///
/// Container types built through [`list_of`](EnhancedType::list_of),
/// [`set_of`](EnhancedType::set_of), [`map_of`](EnhancedType::map_of) and
/// [`optional_of`](EnhancedType::optional_of) carry a composer, which the
/// converter chain invokes when a provider answers
/// [`ErasedConverter::Composite`](crate::converter::ErasedConverter::Composite).
pub struct EnhancedType<T> {
    descriptor: TypeDescriptor,
    composer: Option<Composer<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> EnhancedType<T> {
    /// Descriptor of the concrete type `T`.
    #[must_use]
    pub fn of() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            composer: None,
            _marker: PhantomData,
        }
    }
}

impl<T> EnhancedType<T> {
    /// The untyped lookup key.
    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub(crate) fn composer(&self) -> Option<&Composer<T>> {
        self.composer.as_ref()
    }

    fn composed(descriptor: TypeDescriptor, composer: Composer<T>) -> Self {
        Self {
            descriptor,
            composer: Some(composer),
            _marker: PhantomData,
        }
    }
}

impl<E: Send + Sync + 'static> EnhancedType<Vec<E>> {
    /// Ordered list of `element`.
    #[must_use]
    pub fn list_of(element: EnhancedType<E>) -> Self {
        let descriptor =
            TypeDescriptor::container(TypeToken::List, vec![element.descriptor.clone()]);
        let composer: Composer<Vec<E>> = Arc::new(move |chain| {
            let converter = chain.resolve(&element)?;
            Ok(Arc::new(ListConverter::new(converter)) as Arc<dyn AttributeConverter<Vec<E>>>)
        });
        Self::composed(descriptor, composer)
    }
}

impl<E: Eq + Hash + Send + Sync + 'static> EnhancedType<IndexSet<E>> {
    /// Set of `element`, stored as `SS`, `NS` or `BS`.
    #[must_use]
    pub fn set_of(element: EnhancedType<E>) -> Self {
        let descriptor =
            TypeDescriptor::container(TypeToken::Set, vec![element.descriptor.clone()]);
        let composer: Composer<IndexSet<E>> = Arc::new(move |chain| {
            let converter = chain.resolve(&element)?;
            Ok(Arc::new(SetConverter::new(converter)) as Arc<dyn AttributeConverter<IndexSet<E>>>)
        });
        Self::composed(descriptor, composer)
    }
}

impl<K, V> EnhancedType<IndexMap<K, V>>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Map from `key` to `value`; keys are stored as attribute names.
    #[must_use]
    pub fn map_of(key: EnhancedType<K>, value: EnhancedType<V>) -> Self {
        let descriptor = TypeDescriptor::container(
            TypeToken::Map,
            vec![key.descriptor.clone(), value.descriptor.clone()],
        );
        let composer: Composer<IndexMap<K, V>> = Arc::new(move |chain| {
            let key_converter = chain.resolve(&key)?;
            let value_converter = chain.resolve(&value)?;
            Ok(Arc::new(MapConverter::new(key_converter, value_converter))
                as Arc<dyn AttributeConverter<IndexMap<K, V>>>)
        });
        Self::composed(descriptor, composer)
    }
}

impl<E: Send + Sync + 'static> EnhancedType<Option<E>> {
    /// Optional `inner`, stored as `NULL` when absent.
    #[must_use]
    pub fn optional_of(inner: EnhancedType<E>) -> Self {
        let descriptor =
            TypeDescriptor::container(TypeToken::Optional, vec![inner.descriptor.clone()]);
        let composer: Composer<Option<E>> = Arc::new(move |chain| {
            let converter = chain.resolve(&inner)?;
            Ok(Arc::new(OptionalConverter::new(converter))
                as Arc<dyn AttributeConverter<Option<E>>>)
        });
        Self::composed(descriptor, composer)
    }
}

impl<T> Clone for EnhancedType<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            composer: self.composer.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for EnhancedType<T> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor
    }
}

impl<T> Eq for EnhancedType<T> {}

impl<T> fmt::Debug for EnhancedType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhancedType")
            .field("descriptor", &self.descriptor)
            .field("composed", &self.composer.is_some())
            .finish()
    }
}

impl<T> fmt::Display for EnhancedType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.descriptor, f)
    }
}

/// Native types whose [`EnhancedType`] can be inferred from the static type.
///
/// Used by [`DocumentBuilder::add`](crate::document::DocumentBuilder::add).
/// Custom types opt in with an empty impl:
///
/// ```
/// use ferrosdk_dynamodb_enhanced::InferEnhancedType;
///
/// struct Custom;
/// impl InferEnhancedType for Custom {}
/// ```
pub trait InferEnhancedType: Sized + Send + Sync + 'static {
    /// The descriptor of `Self`.
    #[must_use]
    fn enhanced_type() -> EnhancedType<Self> {
        EnhancedType::of()
    }
}

macro_rules! infer_concrete {
    ($($ty:ty),* $(,)?) => {
        $(impl InferEnhancedType for $ty {})*
    };
}

infer_concrete!(
    String,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    SdkNumber,
    BigDecimal,
    Bytes,
    Uuid,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
    AttributeValue,
    Document,
);

impl<E: InferEnhancedType> InferEnhancedType for Vec<E> {
    fn enhanced_type() -> EnhancedType<Self> {
        EnhancedType::list_of(E::enhanced_type())
    }
}

impl<E: InferEnhancedType + Eq + Hash> InferEnhancedType for IndexSet<E> {
    fn enhanced_type() -> EnhancedType<Self> {
        EnhancedType::set_of(E::enhanced_type())
    }
}

impl<K, V> InferEnhancedType for IndexMap<K, V>
where
    K: InferEnhancedType + Eq + Hash,
    V: InferEnhancedType,
{
    fn enhanced_type() -> EnhancedType<Self> {
        EnhancedType::map_of(K::enhanced_type(), V::enhanced_type())
    }
}

impl<E: InferEnhancedType> InferEnhancedType for Option<E> {
    fn enhanced_type() -> EnhancedType<Self> {
        EnhancedType::optional_of(E::enhanced_type())
    }
}
