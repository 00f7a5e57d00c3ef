pub mod calculator;
pub mod input;
pub mod models;

pub use calculator::{calculate, calculate_checked, MONTH_DAYS};
pub use input::{bill_input_from_value, parse_bill_input, BillField, BillInputBuilder, InputError};
pub use models::{BillInput, BillResult, DEFAULT_BILLING_DAYS};
