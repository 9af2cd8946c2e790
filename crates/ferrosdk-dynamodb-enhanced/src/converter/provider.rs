//! The built-in converter provider.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use bigdecimal::BigDecimal;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ferrosdk_dynamodb_model::AttributeValue;
use uuid::Uuid;

use super::primitive::{
    AttributeValueConverter, BigDecimalConverter, BooleanConverter, BytesConverter,
    DocumentConverter, F32Converter, F64Converter, I8Converter, I16Converter, I32Converter,
    I64Converter, JsonValueConverter, SdkNumberConverter, StringConverter, U8Converter,
    U16Converter, U32Converter, U64Converter, UuidConverter,
};
use super::temporal::{NaiveDateConverter, NaiveDateTimeConverter, UtcDateTimeConverter};
use super::{AttributeConverter, AttributeConverterProvider, ErasedConverter};
use crate::document::Document;
use crate::enhanced_type::{TypeDescriptor, TypeToken};
use crate::number::SdkNumber;

static SHARED: LazyLock<Arc<DefaultAttributeConverterProvider>> =
    LazyLock::new(|| Arc::new(DefaultAttributeConverterProvider::new()));

/// Converters for the standard scalar types plus composition for `List`,
/// `Set`, `Map` and `Optional`.
#[derive(Debug)]
pub struct DefaultAttributeConverterProvider {
    converters: HashMap<TypeId, ErasedConverter>,
}

impl DefaultAttributeConverterProvider {
    /// Builds a fresh provider. Prefer [`create`](Self::create), which shares
    /// one instance.
    #[must_use]
    pub fn new() -> Self {
        let mut provider = Self {
            converters: HashMap::new(),
        };
        provider.register::<String, _>(StringConverter);
        provider.register::<bool, _>(BooleanConverter);
        provider.register::<i8, _>(I8Converter);
        provider.register::<i16, _>(I16Converter);
        provider.register::<i32, _>(I32Converter);
        provider.register::<i64, _>(I64Converter);
        provider.register::<u8, _>(U8Converter);
        provider.register::<u16, _>(U16Converter);
        provider.register::<u32, _>(U32Converter);
        provider.register::<u64, _>(U64Converter);
        provider.register::<f32, _>(F32Converter);
        provider.register::<f64, _>(F64Converter);
        provider.register::<SdkNumber, _>(SdkNumberConverter);
        provider.register::<BigDecimal, _>(BigDecimalConverter);
        provider.register::<Bytes, _>(BytesConverter);
        provider.register::<Uuid, _>(UuidConverter);
        provider.register::<NaiveDate, _>(NaiveDateConverter);
        provider.register::<NaiveDateTime, _>(NaiveDateTimeConverter);
        provider.register::<DateTime<Utc>, _>(UtcDateTimeConverter);
        provider.register::<serde_json::Value, _>(JsonValueConverter);
        provider.register::<AttributeValue, _>(AttributeValueConverter);
        provider.register::<Document, _>(DocumentConverter);
        provider
    }

    /// The shared default provider.
    #[must_use]
    pub fn create() -> Arc<dyn AttributeConverterProvider> {
        SHARED.clone()
    }

    fn register<T: 'static, C: AttributeConverter<T> + 'static>(&mut self, converter: C) {
        self.converters
            .insert(TypeId::of::<T>(), ErasedConverter::new::<T, C>(converter));
    }
}

impl Default for DefaultAttributeConverterProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeConverterProvider for DefaultAttributeConverterProvider {
    fn converter_for(&self, descriptor: &TypeDescriptor) -> Option<ErasedConverter> {
        match descriptor.token() {
            TypeToken::Class { id, .. } => self.converters.get(&id).cloned(),
            TypeToken::List | TypeToken::Set | TypeToken::Map | TypeToken::Optional => {
                Some(ErasedConverter::composite())
            }
        }
    }
}
