//! Arbitrary-precision number kept as its decimal text.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};

/// A validated decimal number that remembers its exact textual form.
///
/// DynamoDB numbers travel as strings. `SdkNumber` keeps that text untouched
/// so that `"10"` stays `10` and `"1.50"` stays `1.50` on the way back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdkNumber(String);

impl SdkNumber {
    /// The exact decimal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The value as a [`BigDecimal`].
    #[must_use]
    pub fn to_big_decimal(&self) -> BigDecimal {
        // Validated on construction.
        BigDecimal::from_str(&self.0).unwrap_or_default()
    }

    /// The value as `i64`, if it is an integer in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// The value as `f64`, possibly losing precision.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl FromStr for SdkNumber {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s)?;
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for SdkNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BigDecimal> for SdkNumber {
    fn from(value: BigDecimal) -> Self {
        Self(value.to_string())
    }
}

impl From<&BigDecimal> for SdkNumber {
    fn from(value: &BigDecimal) -> Self {
        Self(value.to_string())
    }
}

macro_rules! sdk_number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SdkNumber {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

sdk_number_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);
