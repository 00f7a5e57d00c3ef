use serde::Serialize;

/// Default billing period length when the caller omits `billingDays`
pub const DEFAULT_BILLING_DAYS: f64 = 30.0;

/// Fully populated tariff and consumption parameters for one bill
///
/// Percentage rates (`social_bono_discount_rate`, `electricity_tax_rate`,
/// `vat_rate`) are stored as given, e.g. `21.0` for 21%. The financing rate
/// is an absolute price per unit of consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInput {
    pub billing_days: f64,
    pub meter_rental_daily: f64,
    pub fixed_monthly_fee: f64,

    pub contracted_power_p1: f64,
    pub power_price_daily_p1: f64,
    pub contracted_power_p2: f64,
    pub power_price_daily_p2: f64,

    pub consumption_punta: f64,
    pub price_punta: f64,
    pub consumption_llano: f64,
    pub price_llano: f64,
    pub consumption_valle: f64,
    pub price_valle: f64,

    pub social_bono_discount_rate: f64,
    pub social_bono_financing_rate: f64,
    pub electricity_tax_rate: f64,
    pub vat_rate: f64,
}

impl Default for BillInput {
    fn default() -> Self {
        Self {
            billing_days: DEFAULT_BILLING_DAYS,
            meter_rental_daily: 0.0,
            fixed_monthly_fee: 0.0,
            contracted_power_p1: 0.0,
            power_price_daily_p1: 0.0,
            contracted_power_p2: 0.0,
            power_price_daily_p2: 0.0,
            consumption_punta: 0.0,
            price_punta: 0.0,
            consumption_llano: 0.0,
            price_llano: 0.0,
            consumption_valle: 0.0,
            price_valle: 0.0,
            social_bono_discount_rate: 0.0,
            social_bono_financing_rate: 0.0,
            electricity_tax_rate: 0.0,
            vat_rate: 0.0,
        }
    }
}

/// Itemized bill produced by [`crate::billing::calculate`]
///
/// Field order matches the JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResult {
    pub total_bill: f64,
    pub billing_days: f64,
    pub total_consumption: f64,
    pub power_term_p1: f64,
    pub power_term_p2: f64,
    pub power_term: f64,
    pub meter_rental_term: f64,
    pub prorated_fixed_fee: f64,
    pub fixed_charges: f64,
    pub cost_punta: f64,
    pub cost_llano: f64,
    pub cost_valle: f64,
    pub energy_term: f64,
    pub social_bono_financing_cost: f64,
    pub social_bono_discount: f64,
    pub base_imponible: f64,
    pub electricity_tax: f64,
    pub subtotal_tax_base: f64,
    pub vat: f64,
}

impl BillResult {
    /// JSON key of the first line item that is infinite or NaN
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("totalBill", self.total_bill),
            ("billingDays", self.billing_days),
            ("totalConsumption", self.total_consumption),
            ("powerTermP1", self.power_term_p1),
            ("powerTermP2", self.power_term_p2),
            ("powerTerm", self.power_term),
            ("meterRentalTerm", self.meter_rental_term),
            ("proratedFixedFee", self.prorated_fixed_fee),
            ("fixedCharges", self.fixed_charges),
            ("costPunta", self.cost_punta),
            ("costLlano", self.cost_llano),
            ("costValle", self.cost_valle),
            ("energyTerm", self.energy_term),
            ("socialBonoFinancingCost", self.social_bono_financing_cost),
            ("socialBonoDiscount", self.social_bono_discount),
            ("baseImponible", self.base_imponible),
            ("electricityTax", self.electricity_tax),
            ("subtotalTaxBase", self.subtotal_tax_base),
            ("vat", self.vat),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(key, _)| key)
    }
}
