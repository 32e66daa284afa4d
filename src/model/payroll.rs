use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayrollStatus {
    Paid,
    Unpaid,
}

/// One payroll run for one account. Written only through the admin payroll
/// endpoints; the attendance core never mutates these.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2)]
    pub account_id: u64,
    #[schema(example = "2026-07-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,
    #[schema(example = "2026-07-31", value_type = String, format = "date")]
    pub period_end: NaiveDate,
    #[schema(example = 5000.0)]
    pub base_salary: f64,
    #[schema(example = 500.0)]
    pub bonus: f64,
    #[schema(example = 200.0)]
    pub deductions: f64,
    #[schema(example = 5300.0)]
    pub net_pay: f64,
    pub status: PayrollStatus,
}

#[derive(Debug, Clone)]
pub struct NewPayroll {
    pub account_id: u64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub base_salary: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub status: PayrollStatus,
}

#[derive(Debug, Clone, Default)]
pub struct PayrollUpdate {
    pub base_salary: Option<f64>,
    pub bonus: Option<f64>,
    pub deductions: Option<f64>,
    pub net_pay: Option<f64>,
    pub status: Option<PayrollStatus>,
}
