//! Monthly salary ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Amounts are stored with two fractional digits.
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound of a `NUMERIC(15,2)` column.
pub fn amount_limit() -> Decimal {
    Decimal::from(10_000_000_000_000_i64)
}

fn amount_too_large() -> ValidationError {
    let mut err = ValidationError::new("amount_too_large");
    err.message = Some("Amount must be less than 10000000000000".into());
    err
}

fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("amount_negative");
        err.message = Some("Amount must be zero or greater".into());
        return Err(err);
    }
    if value.round_dp(AMOUNT_SCALE) >= amount_limit() {
        return Err(amount_too_large());
    }
    Ok(())
}

/// `base + bonus`, rounded to the stored scale. Never taken from the client.
pub fn compute_total(base_salary: Decimal, bonus: Decimal) -> Decimal {
    (base_salary + bonus).round_dp(AMOUNT_SCALE)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSalaryRequest {
    pub employee_id: i64,
    #[validate(custom(function = "validate_amount"))]
    pub base_salary: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub bonus: Option<Decimal>,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSalaryRequest {
    #[validate(custom(function = "validate_amount"))]
    pub base_salary: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub bonus: Option<Decimal>,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

/// Values written to a salary row after server-side derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryFigures {
    pub base_salary: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
    pub month: i32,
    pub year: i32,
    pub note: Option<String>,
}

impl SalaryFigures {
    pub fn new(
        base_salary: Decimal,
        bonus: Option<Decimal>,
        month: i32,
        year: i32,
        note: Option<String>,
    ) -> Self {
        let base_salary = base_salary.round_dp(AMOUNT_SCALE);
        let bonus = bonus.unwrap_or(Decimal::ZERO).round_dp(AMOUNT_SCALE);
        Self {
            base_salary,
            bonus,
            total: compute_total(base_salary, bonus),
            month,
            year,
            note,
        }
    }
}

impl SalaryFigures {
    /// Each amount fits on its own, but their sum may still overflow the
    /// `total` column.
    pub fn validate_total(&self) -> Result<(), ValidationErrors> {
        if self.total < amount_limit() {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        errors.add("total", amount_too_large());
        Err(errors)
    }
}

impl From<&CreateSalaryRequest> for SalaryFigures {
    fn from(req: &CreateSalaryRequest) -> Self {
        SalaryFigures::new(req.base_salary, req.bonus, req.month, req.year, req.note.clone())
    }
}

impl From<&UpdateSalaryRequest> for SalaryFigures {
    fn from(req: &UpdateSalaryRequest) -> Self {
        SalaryFigures::new(req.base_salary, req.bonus, req.month, req.year, req.note.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryResponse {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub month: i32,
    pub year: i32,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSalariesQuery {
    pub employee_id: Option<i64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MySalariesQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
