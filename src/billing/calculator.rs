use super::input::InputError;
use super::models::{BillInput, BillResult};

/// Average month length used to prorate the monthly fixed fee
pub const MONTH_DAYS: f64 = 30.42;

/// Compute an itemized bill
///
/// Pure and total: every finite or non-finite input produces a result.
/// Operations are grouped exactly as written below; reordering the sums
/// changes the low bits of the floating-point output.
pub fn calculate(input: &BillInput) -> BillResult {
    let days = input.billing_days;

    // Fixed charges
    let power_term_p1 = input.contracted_power_p1 * input.power_price_daily_p1 * days;
    let power_term_p2 = input.contracted_power_p2 * input.power_price_daily_p2 * days;
    let power_term = power_term_p1 + power_term_p2;

    let meter_rental_term = input.meter_rental_daily * days;
    let prorated_fixed_fee = input.fixed_monthly_fee * (days / MONTH_DAYS);
    let fixed_charges = power_term + meter_rental_term + prorated_fixed_fee;

    // Energy
    let cost_punta = input.consumption_punta * input.price_punta;
    let cost_llano = input.consumption_llano * input.price_llano;
    let cost_valle = input.consumption_valle * input.price_valle;
    let energy_term = cost_punta + cost_llano + cost_valle;

    let total_consumption =
        input.consumption_punta + input.consumption_llano + input.consumption_valle;

    // Social subsidy: financing is a per-unit price, discount is a percentage
    let social_bono_financing_cost = total_consumption * input.social_bono_financing_rate;
    let base_for_discount = fixed_charges + energy_term;
    let social_bono_discount = base_for_discount * (input.social_bono_discount_rate / 100.0);

    // Taxes
    let base_imponible =
        (fixed_charges + energy_term + social_bono_financing_cost) - social_bono_discount;
    let electricity_tax = base_imponible * (input.electricity_tax_rate / 100.0);
    let subtotal_tax_base = base_imponible + electricity_tax;
    let vat = subtotal_tax_base * (input.vat_rate / 100.0);
    let total_bill = subtotal_tax_base + vat;

    BillResult {
        total_bill,
        billing_days: days,
        total_consumption,
        power_term_p1,
        power_term_p2,
        power_term,
        meter_rental_term,
        prorated_fixed_fee,
        fixed_charges,
        cost_punta,
        cost_llano,
        cost_valle,
        energy_term,
        social_bono_financing_cost,
        social_bono_discount,
        base_imponible,
        electricity_tax,
        subtotal_tax_base,
        vat,
    }
}

/// [`calculate`], rejecting inputs whose line items overflow to infinity or NaN
pub fn calculate_checked(input: &BillInput) -> Result<BillResult, InputError> {
    let result = calculate(input);
    match result.non_finite_field() {
        Some(field) => Err(InputError::NonFiniteResult { field }),
        None => Ok(result),
    }
}
