//! Coercion of loosely-typed request bodies into [`BillInput`]
//!
//! Every known key is optional. Present values must be JSON numbers,
//! booleans (`true` is 1, `false` is 0) or strings holding a decimal number.
//! Values must be finite; anything else aborts the parse with an
//! [`InputError`] naming the offending field. Unknown keys are ignored.

use serde_json::{Map, Value};
use thiserror::Error;

use super::models::BillInput;

/// Input coercion failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("Request body must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Field '{field}' must be a number, found {found}")]
    NotANumber { field: &'static str, found: String },

    #[error("Field '{field}' is out of range: the result is not a finite number")]
    NonFiniteResult { field: &'static str },
}

/// Named numeric fields accepted by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillField {
    BillingDays,
    MeterRentalDaily,
    FixedMonthlyFee,
    ContractedPowerP1,
    PowerPriceDailyP1,
    ContractedPowerP2,
    PowerPriceDailyP2,
    ConsumptionPunta,
    PricePunta,
    ConsumptionLlano,
    PriceLlano,
    ConsumptionValle,
    PriceValle,
    SocialBonoDiscountRate,
    SocialBonoFinancingRate,
    ElectricityTaxRate,
    VatRate,
}

impl BillField {
    pub const ALL: [BillField; 17] = [
        BillField::BillingDays,
        BillField::MeterRentalDaily,
        BillField::FixedMonthlyFee,
        BillField::ContractedPowerP1,
        BillField::PowerPriceDailyP1,
        BillField::ContractedPowerP2,
        BillField::PowerPriceDailyP2,
        BillField::ConsumptionPunta,
        BillField::PricePunta,
        BillField::ConsumptionLlano,
        BillField::PriceLlano,
        BillField::ConsumptionValle,
        BillField::PriceValle,
        BillField::SocialBonoDiscountRate,
        BillField::SocialBonoFinancingRate,
        BillField::ElectricityTaxRate,
        BillField::VatRate,
    ];

    /// JSON key of the field in request bodies
    pub fn key(self) -> &'static str {
        match self {
            BillField::BillingDays => "billingDays",
            BillField::MeterRentalDaily => "meterRentalDaily",
            BillField::FixedMonthlyFee => "fixedMonthlyFee",
            BillField::ContractedPowerP1 => "contractedPowerP1",
            BillField::PowerPriceDailyP1 => "powerPriceDailyP1",
            BillField::ContractedPowerP2 => "contractedPowerP2",
            BillField::PowerPriceDailyP2 => "powerPriceDailyP2",
            BillField::ConsumptionPunta => "consumptionPunta",
            BillField::PricePunta => "pricePunta",
            BillField::ConsumptionLlano => "consumptionLlano",
            BillField::PriceLlano => "priceLlano",
            BillField::ConsumptionValle => "consumptionValle",
            BillField::PriceValle => "priceValle",
            BillField::SocialBonoDiscountRate => "socialBonoDiscountRate",
            BillField::SocialBonoFinancingRate => "socialBonoFinancingRate",
            BillField::ElectricityTaxRate => "electricityTaxRate",
            BillField::VatRate => "vatRate",
        }
    }
}

/// Builder for [`BillInput`]; unset fields keep their defaults
#[derive(Debug, Clone, Default)]
pub struct BillInputBuilder {
    input: BillInput,
}

impl BillInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: BillField, value: f64) -> Self {
        *self.slot(field) = value;
        self
    }

    pub fn build(self) -> BillInput {
        self.input
    }

    fn slot(&mut self, field: BillField) -> &mut f64 {
        let input = &mut self.input;
        match field {
            BillField::BillingDays => &mut input.billing_days,
            BillField::MeterRentalDaily => &mut input.meter_rental_daily,
            BillField::FixedMonthlyFee => &mut input.fixed_monthly_fee,
            BillField::ContractedPowerP1 => &mut input.contracted_power_p1,
            BillField::PowerPriceDailyP1 => &mut input.power_price_daily_p1,
            BillField::ContractedPowerP2 => &mut input.contracted_power_p2,
            BillField::PowerPriceDailyP2 => &mut input.power_price_daily_p2,
            BillField::ConsumptionPunta => &mut input.consumption_punta,
            BillField::PricePunta => &mut input.price_punta,
            BillField::ConsumptionLlano => &mut input.consumption_llano,
            BillField::PriceLlano => &mut input.price_llano,
            BillField::ConsumptionValle => &mut input.consumption_valle,
            BillField::PriceValle => &mut input.price_valle,
            BillField::SocialBonoDiscountRate => &mut input.social_bono_discount_rate,
            BillField::SocialBonoFinancingRate => &mut input.social_bono_financing_rate,
            BillField::ElectricityTaxRate => &mut input.electricity_tax_rate,
            BillField::VatRate => &mut input.vat_rate,
        }
    }
}

impl BillInput {
    pub fn builder() -> BillInputBuilder {
        BillInputBuilder::new()
    }
}

/// Parse a raw request body
pub fn parse_bill_input(body: &[u8]) -> Result<BillInput, InputError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| InputError::MalformedJson(e.to_string()))?;
    bill_input_from_value(&value)
}

/// Coerce an already-decoded JSON value
pub fn bill_input_from_value(value: &Value) -> Result<BillInput, InputError> {
    let object = value
        .as_object()
        .ok_or_else(|| InputError::NotAnObject(json_type_name(value)))?;

    bill_input_from_object(object)
}

fn bill_input_from_object(object: &Map<String, Value>) -> Result<BillInput, InputError> {
    let mut builder = BillInput::builder();

    for field in BillField::ALL {
        if let Some(raw) = object.get(field.key()) {
            builder = builder.set(field, coerce_number(field, raw)?);
        }
    }

    Ok(builder.build())
}

fn coerce_number(field: BillField, raw: &Value) -> Result<f64, InputError> {
    let not_a_number = |found: String| InputError::NotANumber {
        field: field.key(),
        found,
    };

    let value = match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| not_a_number(format!("number {}", n)))?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| not_a_number(format!("string {:?}", s)))?,
        other => return Err(not_a_number(json_type_name(other).to_string())),
    };

    if !value.is_finite() {
        return Err(not_a_number(format!("non-finite value {}", raw)));
    }
    Ok(value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
