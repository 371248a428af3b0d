use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerMeta {
    pub path: String,
    pub user_count: usize,
    pub request_count: usize,
    pub fund_count: usize,
    pub last_activity_at: Option<i64>,
}
