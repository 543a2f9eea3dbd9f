//! Money domain model
//!
//! Amounts are stored as whole minor units (`i64`). Decimal input is scaled
//! by `10^decimal_places` and rounded half away from zero; `1.005 USD`
//! becomes `101` cents and `-1.005 USD` becomes `-101`.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value as JsonValue};

use super::currency::Currency;
use super::result::{Error, Result};

/// An exact monetary amount in a currency's smallest unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Build from a decimal quantity, e.g. `100.50` USD -> `10050`
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Self> {
        currency.validate()?;
        let amount = scale_to_minor_units(value, currency.decimal_places())?;
        Ok(Self { amount, currency })
    }

    /// Build from a legacy float quantity
    ///
    /// The float goes through its shortest decimal text first, so `0.1`
    /// is treated as exactly `0.1` rather than its binary expansion.
    pub fn from_f64(value: f64, currency: Currency) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::validation("money amount must be finite"));
        }
        let decimal = parse_decimal_text(&value.to_string())
            .ok_or_else(|| Error::validation(format!("money amount out of range: {value}")))?;
        Self::from_decimal(decimal, currency)
    }

    /// Build directly from minor units
    pub fn from_integer(amount: i64, currency: Currency) -> Result<Self> {
        currency.validate()?;
        Ok(Self { amount, currency })
    }

    pub fn zero(currency: Currency) -> Result<Self> {
        Self::from_integer(0, currency)
    }

    /// Minor-unit amount
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Display value as a float; never feed this back into arithmetic
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.currency.decimal_places() as i32)
    }

    /// Exact decimal value
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.amount, self.currency.decimal_places())
    }

    pub fn add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| overflow("add"))?;
        Ok(self.with_amount(amount))
    }

    pub fn subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| overflow("subtract"))?;
        Ok(self.with_amount(amount))
    }

    pub fn multiply(&self, factor: i64) -> Result<Money> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| overflow("multiply"))?;
        Ok(self.with_amount(amount))
    }

    pub fn negate(&self) -> Result<Money> {
        let amount = self.amount.checked_neg().ok_or_else(|| overflow("negate"))?;
        Ok(self.with_amount(amount))
    }

    /// Sum same-currency values; an empty input yields zero
    pub fn sum<'a>(currency: Currency, values: impl IntoIterator<Item = &'a Money>) -> Result<Money> {
        values
            .into_iter()
            .try_fold(Money::zero(currency)?, |total, value| total.add(value))
    }

    /// Order two amounts of the same currency
    pub fn compare(&self, other: &Money) -> Result<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn format(&self) -> String {
        self.currency.format(self.amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    pub fn validate(&self) -> Result<()> {
        self.currency.validate()
    }

    /// Decode a wire payload, reporting failures as [`Error::Decode`]
    pub fn from_json_value(value: JsonValue) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::decode(format!(
                "money payload must be an object, got {value}"
            )));
        }
        let wire: MoneyWire = serde_json::from_value(value)
            .map_err(|e| Error::decode(format!("malformed money payload: {e}")))?;
        wire.into_money()
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency.code() != other.currency.code() {
            return Err(Error::mismatch(self.currency.code(), other.currency.code()));
        }
        Ok(())
    }

    fn with_amount(&self, amount: i64) -> Money {
        Money {
            amount,
            currency: self.currency.clone(),
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

fn overflow(operation: &str) -> Error {
    Error::validation(format!("money amount overflow in {operation}"))
}

fn scale_to_minor_units(value: Decimal, decimal_places: u32) -> Result<i64> {
    let out_of_range = || Error::validation(format!("money amount out of range: {value}"));
    let factor = Decimal::from(10u64.pow(decimal_places));
    value
        .checked_mul(factor)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(out_of_range)
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

// ============================================================================
// Wire format
// ============================================================================

/// Embedded currency object on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurrencyFields {
    code: String,
    symbol: String,
    name: String,
    decimal_places: u32,
}

impl From<&Currency> for CurrencyFields {
    fn from(currency: &Currency) -> Self {
        Self {
            code: currency.code().to_string(),
            symbol: currency.symbol().to_string(),
            name: currency.name().to_string(),
            decimal_places: currency.decimal_places(),
        }
    }
}

/// Accept both the full object and a bare code
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireCurrency {
    Code(String),
    Fields(CurrencyFields),
}

#[derive(Debug, Serialize)]
struct MoneyOut {
    amount: i64,
    decimal: f64,
    currency: CurrencyFields,
}

#[derive(Debug, Deserialize)]
struct MoneyWire {
    amount: Option<JsonValue>,
    // Derived display field; the integer amount always wins
    #[serde(default, rename = "decimal")]
    _decimal: Option<JsonValue>,
    currency: Option<WireCurrency>,
}

impl MoneyWire {
    fn into_money(self) -> Result<Money> {
        let currency = match self.currency {
            Some(WireCurrency::Code(code)) => Currency::from_code(&code)
                .map_err(|e| Error::decode(format!("invalid currency: {e}")))?,
            Some(WireCurrency::Fields(fields)) => Currency::new(
                fields.code,
                fields.symbol,
                fields.name,
                fields.decimal_places,
            )
            .map_err(|e| Error::decode(format!("invalid currency: {e}")))?,
            None => return Err(Error::decode("missing field `currency`")),
        };

        let number = match self.amount {
            Some(JsonValue::Number(number)) => number,
            Some(other) => {
                return Err(Error::decode(format!(
                    "amount must be a number, got {other}"
                )))
            }
            None => return Err(Error::decode("missing field `amount`")),
        };

        let amount = decode_amount(&number, currency.decimal_places())?;
        Ok(Money { amount, currency })
    }
}

/// Integer literals are minor units; anything else is a legacy decimal
fn decode_amount(number: &Number, decimal_places: u32) -> Result<i64> {
    if let Some(minor_units) = number.as_i64() {
        return Ok(minor_units);
    }
    if number.is_u64() {
        return Err(Error::decode(format!("amount out of range: {number}")));
    }
    let legacy = parse_decimal_text(&number.to_string())
        .ok_or_else(|| Error::decode(format!("amount out of range: {number}")))?;
    scale_to_minor_units(legacy, decimal_places)
        .map_err(|_| Error::decode(format!("amount out of range: {number}")))
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MoneyOut {
            amount: self.amount,
            decimal: self.to_decimal(),
            currency: CurrencyFields::from(&self.currency),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde would otherwise fill the struct from a positional sequence
        let value = JsonValue::deserialize(deserializer)?;
        Money::from_json_value(value).map_err(D::Error::custom)
    }
}
