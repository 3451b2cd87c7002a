//! The amount of money moved by a cash flow record.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// The reasons an amount can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Enter a number.")]
    Invalid,

    #[error("Ensure this value is greater than or equal to 0.01.")]
    TooSmall,

    #[error("Ensure that there are no more than {} digits in total.", Amount::MAX_DIGITS)]
    TooManyDigits,

    #[error("Ensure that there are no more than {} decimal places.", Amount::DECIMAL_PLACES)]
    TooManyDecimalPlaces,

    #[error(
        "Ensure that there are no more than {} digits before the decimal point.",
        Amount::MAX_DIGITS - Amount::DECIMAL_PLACES
    )]
    TooManyWholeDigits,
}

/// A positive amount of money with at most two decimal places and at most ten
/// digits, e.g. "12345678.90".
///
/// Amounts are stored in the database as a whole number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const MAX_DIGITS: u32 = 10;
    pub const DECIMAL_PLACES: u32 = 2;

    /// Validate `value` as an amount.
    ///
    /// Insignificant trailing zeros are ignored, so "1.500" is accepted as 1.50.
    ///
    /// # Errors
    /// Returns an [AmountError] describing the first rule `value` breaks.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let value = value.normalize();
        let decimal_places = value.scale();
        let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
        // A value like 0.05 has fewer mantissa digits than decimal places.
        let digits = digits.max(decimal_places);
        let whole_digits = digits - decimal_places;

        if digits > Self::MAX_DIGITS {
            return Err(AmountError::TooManyDigits);
        }

        if decimal_places > Self::DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimalPlaces);
        }

        if whole_digits > Self::MAX_DIGITS - Self::DECIMAL_PLACES {
            return Err(AmountError::TooManyWholeDigits);
        }

        if value < Decimal::new(1, Self::DECIMAL_PLACES) {
            return Err(AmountError::TooSmall);
        }

        Ok(Self(value))
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::DECIMAL_PLACES))
    }

    pub fn cents(&self) -> i64 {
        let mut cents = self.0;
        cents.rescale(Self::DECIMAL_PLACES);

        cents.mantissa() as i64
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| AmountError::Invalid)?;

        Self::new(value)
    }
}

/// Formats the amount with exactly two decimal places, e.g. "12.30".
impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut value = self.0;
        value.rescale(Self::DECIMAL_PLACES);

        write!(f, "{value}")
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount::from_cents)
    }
}
