use crate::error::{FundError, Result};
use crate::money::parse_amount;
use rust_decimal::Decimal;

/// Largest amount a single request or deposit may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// A fund request form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub amount: Decimal,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidDeposit {
    pub amount: Decimal,
    pub added_by: String,
    pub reason: String,
}

fn in_range(amount: &Decimal) -> bool {
    *amount > Decimal::ZERO && *amount <= Decimal::from(MAX_AMOUNT)
}

/// Trimmed, lower-cased email. Applied on every write and every comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_fund_request(amount: &str, reason: &str) -> Result<ValidRequest> {
    let reason = reason.trim();
    let amount = parse_amount(amount).filter(in_range);

    match amount {
        Some(amount) if !reason.is_empty() => Ok(ValidRequest {
            amount,
            reason: reason.to_string(),
        }),
        _ => Err(FundError::Validation("Please fill in all fields.".to_string())),
    }
}

pub fn validate_department_fund(added_by: &str, amount: &str, reason: Option<&str>) -> Result<ValidDeposit> {
    let added_by = added_by.trim();
    let amount = parse_amount(amount).filter(in_range);

    match amount {
        Some(amount) if !added_by.is_empty() => Ok(ValidDeposit {
            amount,
            added_by: added_by.to_string(),
            reason: reason.map(str::trim).unwrap_or_default().to_string(),
        }),
        _ => Err(FundError::Validation(
            "Please fill in required fields with a valid amount!".to_string(),
        )),
    }
}

pub fn validate_recipient_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FundError::Validation("Please enter a name!".to_string()));
    }
    Ok(name.to_string())
}
