use crate::models::department_fund::DepartmentFund;
use crate::models::fund_request::FundRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Counts and amount sums over a set of fund requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending_total: Decimal,
    pub approved_total: Decimal,
    pub rejected_total: Decimal,
    pub disbursed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_funds: Decimal,
    pub approved_total: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub viewer_email: String,
    pub user_count: usize,
    pub requests: Aggregates,
    pub my_approved_total: Decimal,
    pub my_balance_label: String,
    pub department_approved_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentFundsOverview {
    pub funds: Vec<DepartmentFund>,
    pub balance: BalanceSummary,
    pub total_label: String,
    pub remaining_label: String,
    pub approved_requests: Vec<FundRequest>,
}
