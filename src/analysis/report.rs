use crate::error::{FundError, Result};
use crate::models::fund_request::{FundRequest, StatusFilter};
use crate::models::report::{Report, ReportFilter, ReportRow};
use chrono::{DateTime, NaiveDate};

pub const NO_RECORDS_MESSAGE: &str = "No records found.";
pub const NOTHING_TO_EXPORT_MESSAGE: &str = "No data available to export!";

const DATE_FORMAT: &str = "%Y-%m-%d";
const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parsed report filter: status plus inclusive `created_at` bounds in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub status: StatusFilter,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl ReportWindow {
    pub fn contains(&self, record: &FundRequest) -> bool {
        if !self.status.matches(record.status) {
            return false;
        }
        if self.start.is_some_and(|start| record.created_at < start) {
            return false;
        }
        if self.end.is_some_and(|end| record.created_at > end) {
            return false;
        }
        true
    }
}

pub fn parse_window(filter: &ReportFilter) -> Result<ReportWindow> {
    let status = StatusFilter::parse(filter.status.as_deref()).map_err(FundError::Validation)?;

    // Start of the first day through the last second of the end day.
    let start = parse_date(filter.start_date.as_deref(), "start")?
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp());
    let end = parse_date(filter.end_date.as_deref(), "end")?
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc().timestamp());

    Ok(ReportWindow { status, start, end })
}

fn parse_date(raw: Option<&str>, label: &str) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|e| FundError::Validation(format!("Invalid {label} date {value:?}: {e}"))),
    }
}

/// Applies the window in memory and renders rows newest first.
pub fn select_rows(records: &[FundRequest], window: &ReportWindow) -> Vec<ReportRow> {
    let mut selected: Vec<&FundRequest> = records.iter().filter(|r| window.contains(r)).collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected.into_iter().map(to_row).collect()
}

fn to_row(record: &FundRequest) -> ReportRow {
    let date = DateTime::from_timestamp(record.created_at, 0)
        .map(|dt| dt.format(ROW_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());

    ReportRow {
        user: record.email.clone(),
        amount: record.amount.to_string(),
        reason: record.reason.clone(),
        status: record.status.as_str().to_string(),
        date,
        money_taken_by: record
            .money_taken_by
            .clone()
            .unwrap_or_else(|| "-".to_string()),
    }
}

pub fn build_report(rows: Vec<ReportRow>) -> Report {
    let empty_message = rows.is_empty().then(|| NO_RECORDS_MESSAGE.to_string());
    Report { rows, empty_message }
}

/// Export file name derived from the raw filter values.
pub fn report_file_name(filter: &ReportFilter) -> String {
    let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let status = non_empty(&filter.status).unwrap_or_else(|| "all".to_string());
    let start = non_empty(&filter.start_date);
    let end = non_empty(&filter.end_date);

    let stem = if start.is_some() || end.is_some() {
        format!(
            "FundRequests_{status}_{}_{}",
            start.unwrap_or_else(|| "Start".to_string()),
            end.unwrap_or_else(|| "End".to_string())
        )
    } else if !status.eq_ignore_ascii_case("all") {
        format!("FundRequests_{status}")
    } else {
        "FundRequests_Report".to_string()
    };

    format!("{stem}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fund_request::FundStatus;
    use rust_decimal::Decimal;

    // 2024-03-10 12:00:00 UTC
    const MARCH_10_NOON: i64 = 1_710_072_000;

    fn request(id: &str, status: FundStatus, created_at: i64) -> FundRequest {
        FundRequest {
            id: id.to_string(),
            uid: "u1".to_string(),
            email: "ana@example.com".to_string(),
            amount: Decimal::from(100),
            reason: "Supplies".to_string(),
            status,
            money_taken_by: None,
            created_at,
            approved_at: None,
            done_at: None,
        }
    }

    fn filter(status: &str, start: &str, end: &str) -> ReportFilter {
        ReportFilter {
            status: Some(status.to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    #[test]
    fn end_date_includes_the_whole_day() {
        let window = parse_window(&filter("all", "2024-03-10", "2024-03-10")).expect("window");
        assert!(window.contains(&request("a", FundStatus::Pending, MARCH_10_NOON)));
        assert!(!window.contains(&request("b", FundStatus::Pending, MARCH_10_NOON + 86_400)));
    }

    #[test]
    fn range_excluding_everything_renders_placeholder() {
        let records = vec![
            request("a", FundStatus::Approved, MARCH_10_NOON),
            request("b", FundStatus::Pending, MARCH_10_NOON),
        ];
        let window = parse_window(&filter("approved", "2025-01-01", "2025-01-31")).expect("window");
        let report = build_report(select_rows(&records, &window));

        assert!(report.rows.is_empty());
        assert_eq!(report.empty_message.as_deref(), Some(NO_RECORDS_MESSAGE));
    }

    #[test]
    fn rows_are_newest_first_with_placeholder_recipient() {
        let records = vec![
            request("old", FundStatus::Approved, MARCH_10_NOON - 60),
            request("new", FundStatus::Approved, MARCH_10_NOON),
        ];
        let window = parse_window(&ReportFilter::default()).expect("window");
        let rows = select_rows(&records, &window);

        assert_eq!(rows[0].date, "2024-03-10 12:00:00");
        assert_eq!(rows[1].date, "2024-03-10 11:59:00");
        assert_eq!(rows[0].money_taken_by, "-");
        assert_eq!(rows[0].status, "Approved");
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = parse_window(&filter("all", "03/10/2024", "")).unwrap_err();
        assert!(matches!(err, FundError::Validation(_)));
    }

    #[test]
    fn file_name_follows_active_filters() {
        assert_eq!(report_file_name(&ReportFilter::default()), "FundRequests_Report.csv");
        assert_eq!(
            report_file_name(&filter("approved", "", "")),
            "FundRequests_approved.csv"
        );
        assert_eq!(
            report_file_name(&filter("all", "2024-01-01", "")),
            "FundRequests_all_2024-01-01_End.csv"
        );
        assert_eq!(
            report_file_name(&filter("rejected", "", "2024-02-01")),
            "FundRequests_rejected_Start_2024-02-01.csv"
        );
    }
}
