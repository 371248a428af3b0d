use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of a fund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FundStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FundStatus {
    pub const ALL: [FundStatus; 3] = [FundStatus::Pending, FundStatus::Approved, FundStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            FundStatus::Pending => "Pending",
            FundStatus::Approved => "Approved",
            FundStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for FundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundStatus {
    type Err = String;

    // Stored and user-supplied values differ in case ("approved" vs "Approved").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(FundStatus::Pending),
            "approved" => Ok(FundStatus::Approved),
            "rejected" => Ok(FundStatus::Rejected),
            other => Err(format!("Unknown status: {other}")),
        }
    }
}

/// Status selector used by list and report views. `"all"` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(FundStatus),
}

impl StatusFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(value) => value.parse().map(StatusFilter::Only),
        }
    }

    pub fn matches(&self, status: FundStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRequest {
    pub id: String,
    pub uid: String,
    pub email: String,
    pub amount: Decimal,
    pub reason: String,
    pub status: FundStatus,
    pub money_taken_by: Option<String>,
    pub created_at: i64,
    pub approved_at: Option<i64>,
    pub done_at: Option<i64>,
}

impl FundRequest {
    pub fn is_disbursed(&self) -> bool {
        self.money_taken_by.is_some()
    }
}

/// Raw form input for a new request; validated before anything is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRequestForm {
    pub amount: String,
    pub reason: String,
}

/// One lifecycle change of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    pub id: i64,
    pub request_id: String,
    pub from_status: Option<FundStatus>,
    pub to_status: FundStatus,
    pub actor_uid: String,
    pub note: Option<String>,
    pub at: i64,
}
