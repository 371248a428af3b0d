use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentFund {
    pub id: String,
    pub amount: Decimal,
    pub added_by: String,
    pub reason: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentFundForm {
    pub added_by: String,
    pub amount: String,
    pub reason: Option<String>,
}
