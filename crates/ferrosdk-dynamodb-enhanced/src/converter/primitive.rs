//! Converters for scalar native types.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use bytes::Bytes;
use ferrosdk_dynamodb_model::{AttributeValue, AttributeValueType};
use uuid::Uuid;

use super::{AttributeConverter, mismatch};
use crate::document::Document;
use crate::document::json::{from_json_value, to_json_value};
use crate::enhanced_type::TypeDescriptor;
use crate::error::ConversionError;
use crate::number::SdkNumber;

/// `String` ↔ `S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl AttributeConverter<String> for StringConverter {
    fn transform_from(&self, input: &String) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::S(input.clone()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<String, ConversionError> {
        match input {
            AttributeValue::S(s) => Ok(s.clone()),
            other => Err(mismatch("String", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<String>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }
}

/// `bool` ↔ `BOOL`.
///
/// Also reads `S` holding `"true"`/`"false"` and `N` holding `1`/`0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl AttributeConverter<bool> for BooleanConverter {
    fn transform_from(&self, input: &bool) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::Bool(*input))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<bool, ConversionError> {
        match input {
            AttributeValue::Bool(b) => Ok(*b),
            AttributeValue::S(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(ConversionError::invalid(
                    "bool",
                    format!("expected \"true\" or \"false\", found \"{other}\""),
                )),
            },
            AttributeValue::N(n) => match n.as_str() {
                "1" => Ok(true),
                "0" => Ok(false),
                other => Err(ConversionError::invalid(
                    "bool",
                    format!("expected 1 or 0, found {other}"),
                )),
            },
            other => Err(mismatch("bool", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<bool>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::Bool
    }
}

/// Numeric text of an `N`, or of an `S` holding a number.
fn number_text<'a>(
    target: &'static str,
    input: &'a AttributeValue,
) -> Result<&'a str, ConversionError> {
    match input {
        AttributeValue::N(text) | AttributeValue::S(text) => Ok(text),
        other => Err(mismatch(target, other)),
    }
}

macro_rules! integer_converter {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($ty), "` ↔ `N`.")]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl AttributeConverter<$ty> for $name {
                fn transform_from(&self, input: &$ty) -> Result<AttributeValue, ConversionError> {
                    Ok(AttributeValue::N(input.to_string()))
                }

                fn transform_to(&self, input: &AttributeValue) -> Result<$ty, ConversionError> {
                    let text = number_text(stringify!($ty), input)?;
                    text.parse::<$ty>().map_err(|e| {
                        ConversionError::invalid(stringify!($ty), format!("{text}: {e}"))
                    })
                }

                fn enhanced_type(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>()
                }

                fn attribute_value_type(&self) -> AttributeValueType {
                    AttributeValueType::N
                }
            }
        )*
    };
}

integer_converter!(
    I8Converter => i8,
    I16Converter => i16,
    I32Converter => i32,
    I64Converter => i64,
    U8Converter => u8,
    U16Converter => u16,
    U32Converter => u32,
    U64Converter => u64,
);

macro_rules! float_converter {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($ty), "` ↔ `N`. Non-finite values are rejected.")]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl AttributeConverter<$ty> for $name {
                fn transform_from(&self, input: &$ty) -> Result<AttributeValue, ConversionError> {
                    if !input.is_finite() {
                        return Err(ConversionError::invalid(
                            stringify!($ty),
                            format!("{input} is not supported by the default converters"),
                        ));
                    }
                    Ok(AttributeValue::N(input.to_string()))
                }

                fn transform_to(&self, input: &AttributeValue) -> Result<$ty, ConversionError> {
                    let text = number_text(stringify!($ty), input)?;
                    match text.parse::<$ty>() {
                        Ok(value) if value.is_finite() => Ok(value),
                        Ok(_) => Err(ConversionError::invalid(
                            stringify!($ty),
                            format!("{text} is not a finite number"),
                        )),
                        Err(e) => Err(ConversionError::invalid(
                            stringify!($ty),
                            format!("{text}: {e}"),
                        )),
                    }
                }

                fn enhanced_type(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>()
                }

                fn attribute_value_type(&self) -> AttributeValueType {
                    AttributeValueType::N
                }
            }
        )*
    };
}

float_converter!(F32Converter => f32, F64Converter => f64);

/// [`SdkNumber`] ↔ `N`, preserving the exact text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkNumberConverter;

impl AttributeConverter<SdkNumber> for SdkNumberConverter {
    fn transform_from(&self, input: &SdkNumber) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::N(input.as_str().to_owned()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<SdkNumber, ConversionError> {
        let text = number_text("SdkNumber", input)?;
        text.parse()
            .map_err(|e| ConversionError::invalid("SdkNumber", format!("{text}: {e}")))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<SdkNumber>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::N
    }
}

/// [`BigDecimal`] ↔ `N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigDecimalConverter;

impl AttributeConverter<BigDecimal> for BigDecimalConverter {
    fn transform_from(&self, input: &BigDecimal) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::N(input.to_string()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<BigDecimal, ConversionError> {
        let text = number_text("BigDecimal", input)?;
        BigDecimal::from_str(text)
            .map_err(|e| ConversionError::invalid("BigDecimal", format!("{text}: {e}")))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<BigDecimal>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::N
    }
}

/// [`Bytes`] ↔ `B`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesConverter;

impl AttributeConverter<Bytes> for BytesConverter {
    fn transform_from(&self, input: &Bytes) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::B(input.clone()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<Bytes, ConversionError> {
        match input {
            AttributeValue::B(b) => Ok(b.clone()),
            other => Err(mismatch("Bytes", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Bytes>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::B
    }
}

/// [`Uuid`] ↔ `S` in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl AttributeConverter<Uuid> for UuidConverter {
    fn transform_from(&self, input: &Uuid) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::S(input.hyphenated().to_string()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<Uuid, ConversionError> {
        match input {
            AttributeValue::S(s) => {
                Uuid::parse_str(s).map_err(|e| ConversionError::invalid("Uuid", e.to_string()))
            }
            other => Err(mismatch("Uuid", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Uuid>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }
}

/// Identity converter for raw [`AttributeValue`]s.
///
/// Reports `NULL` as its attribute value type; the variant actually produced
/// is whatever the input holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeValueConverter;

impl AttributeConverter<AttributeValue> for AttributeValueConverter {
    fn transform_from(&self, input: &AttributeValue) -> Result<AttributeValue, ConversionError> {
        Ok(input.clone())
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<AttributeValue, ConversionError> {
        Ok(input.clone())
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<AttributeValue>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::Null
    }
}

/// `serde_json::Value` ↔ attribute value, using the document JSON mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueConverter;

impl AttributeConverter<serde_json::Value> for JsonValueConverter {
    fn transform_from(&self, input: &serde_json::Value) -> Result<AttributeValue, ConversionError> {
        Ok(from_json_value(input))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<serde_json::Value, ConversionError> {
        Ok(to_json_value(input))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<serde_json::Value>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }
}

/// Nested [`Document`] ↔ `M`.
///
/// Documents read back carry the default converter chain; use
/// [`Document::get_map_as_document`] to keep the parent's chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentConverter;

impl AttributeConverter<Document> for DocumentConverter {
    fn transform_from(&self, input: &Document) -> Result<AttributeValue, ConversionError> {
        input
            .to_attribute_value_map()
            .map(AttributeValue::M)
            .map_err(|e| ConversionError::invalid("Document", e.to_string()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<Document, ConversionError> {
        match input {
            AttributeValue::M(map) => Ok(Document::from_attribute_value_map(map.clone())),
            other => Err(mismatch("Document", other)),
        }
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Document>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }
}
