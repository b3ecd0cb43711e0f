//! Currencies and their stored-amount convention.
//!
//! Prices are stored as integers whose unit depends on the currency: USD
//! amounts are cents, local-currency (Kip) amounts are whole units. The
//! conversion factor lives only in [`Currency::minor_units_per_major`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Lao Kip, stored in whole units.
    #[default]
    #[serde(rename = "Kip", alias = "Local", alias = "LAK")]
    Local,
    /// US dollars, stored in cents.
    #[serde(rename = "USD", alias = "Usd")]
    Usd,
}

impl Currency {
    /// Stored integer units per major currency unit.
    pub const fn minor_units_per_major(self) -> i64 {
        match self {
            Currency::Local => 1,
            Currency::Usd => 100,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Currency::Local => "Kip",
            Currency::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount in a currency's stored units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Build from whole major units (dollars, kip).
    pub fn from_major(units: i64, currency: Currency) -> Result<Self, CoreError> {
        units
            .checked_mul(currency.minor_units_per_major())
            .map(|amount| Self { amount, currency })
            .ok_or_else(|| CoreError::Validation(format!("Amount {units} {currency} is too large")))
    }

    /// Whole major units, truncating any fractional part.
    pub fn major_units(&self) -> i64 {
        self.amount / self.currency.minor_units_per_major()
    }

    pub fn checked_mul(&self, factor: i64) -> Result<Self, CoreError> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Self { amount, currency: self.currency })
            .ok_or_else(|| CoreError::Validation("Price overflows the supported range".into()))
    }
}
