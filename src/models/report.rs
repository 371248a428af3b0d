use serde::{Deserialize, Serialize};

/// Filter values as typed into the report form. Empty strings mean "unset".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Money Taken By")]
    pub money_taken_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub file_name: String,
    pub path: String,
    pub row_count: usize,
}
