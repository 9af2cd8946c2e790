//! Date and time converters. All of them store ISO-8601 text in `S`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use ferrosdk_dynamodb_model::{AttributeValue, AttributeValueType};

use super::{AttributeConverter, mismatch};
use crate::enhanced_type::TypeDescriptor;
use crate::error::ConversionError;

fn string_text<'a>(
    target: &'static str,
    input: &'a AttributeValue,
) -> Result<&'a str, ConversionError> {
    match input {
        AttributeValue::S(s) => Ok(s),
        other => Err(mismatch(target, other)),
    }
}

/// [`NaiveDate`] ↔ `S` as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateConverter;

impl AttributeConverter<NaiveDate> for NaiveDateConverter {
    fn transform_from(&self, input: &NaiveDate) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::S(input.format("%Y-%m-%d").to_string()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<NaiveDate, ConversionError> {
        let text = string_text("NaiveDate", input)?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| ConversionError::invalid("NaiveDate", format!("{text}: {e}")))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<NaiveDate>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }
}

/// [`NaiveDateTime`] ↔ `S` as `YYYY-MM-DDTHH:MM:SS[.fff]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateTimeConverter;

impl AttributeConverter<NaiveDateTime> for NaiveDateTimeConverter {
    fn transform_from(&self, input: &NaiveDateTime) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::S(input.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<NaiveDateTime, ConversionError> {
        let text = string_text("NaiveDateTime", input)?;
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| ConversionError::invalid("NaiveDateTime", format!("{text}: {e}")))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<NaiveDateTime>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }
}

/// `DateTime<Utc>` ↔ `S` as RFC 3339 with a `Z` suffix.
///
/// Offsets other than `Z` are accepted on read and normalized to UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcDateTimeConverter;

impl AttributeConverter<DateTime<Utc>> for UtcDateTimeConverter {
    fn transform_from(&self, input: &DateTime<Utc>) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::S(
            input.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ))
    }

    fn transform_to(&self, input: &AttributeValue) -> Result<DateTime<Utc>, ConversionError> {
        let text = string_text("DateTime<Utc>", input)?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ConversionError::invalid("DateTime<Utc>", format!("{text}: {e}")))
    }

    fn enhanced_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<DateTime<Utc>>()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }
}
