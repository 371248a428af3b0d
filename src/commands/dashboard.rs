use crate::analysis::aggregate::{aggregate, approved_total_for};
use crate::commands::db;
use crate::commands::settings::load_effective_settings;
use crate::error::{self, command_error, FundError};
use crate::models::fund_request::StatusFilter;
use crate::models::session::SessionState;
use crate::models::summary::DashboardStats;
use crate::money::format_currency;
use rusqlite::Connection;

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_dashboard_stats(
    data_dir: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<DashboardStats, String> {
    get_dashboard_stats_internal(&data_dir, sessions.inner())
        .map_err(|e| command_error("Load dashboard", e))
}

pub fn get_dashboard_stats_internal(data_dir: &str, sessions: &SessionState) -> error::Result<DashboardStats> {
    let session = sessions.require()?;
    let settings = load_effective_settings(data_dir).map_err(FundError::Settings)?;
    let conn = db::get_db_connection(data_dir)?;
    compute_dashboard(&conn, &session.email, &settings.currency_symbol)
}

/// Full recomputation over the request snapshot and the user count.
pub fn compute_dashboard(conn: &Connection, viewer_email: &str, currency_symbol: &str) -> error::Result<DashboardStats> {
    let requests = db::load_requests(conn, StatusFilter::All)?;
    let user_count = db::count_rows(conn, "users")?;

    let aggregates = aggregate(&requests);
    let my_approved_total = approved_total_for(&requests, viewer_email);

    Ok(DashboardStats {
        viewer_email: viewer_email.to_string(),
        user_count,
        my_balance_label: format_currency(currency_symbol, my_approved_total),
        department_approved_label: format_currency(currency_symbol, aggregates.approved_total),
        requests: aggregates,
        my_approved_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fund_request::{FundRequest, FundStatus};
    use rust_decimal::Decimal;

    fn insert(conn: &Connection, id: &str, email: &str, amount: i64, decide: Option<FundStatus>) {
        let request = FundRequest {
            id: id.to_string(),
            uid: format!("uid-{email}"),
            email: email.to_string(),
            amount: Decimal::from(amount),
            reason: "Supplies".to_string(),
            status: FundStatus::Pending,
            money_taken_by: None,
            created_at: 10,
            approved_at: None,
            done_at: None,
        };
        db::insert_fund_request(conn, &request).expect("insert");
        if let Some(status) = decide {
            db::transition_status(conn, id, status, "admin", 20).expect("decide");
        }
    }

    #[test]
    fn dashboard_splits_department_and_viewer_totals() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        db::initialize_schema(&conn).expect("schema init");

        insert(&conn, "a", "ana@example.com", 1200, Some(FundStatus::Approved));
        insert(&conn, "b", "ben@example.com", 300, Some(FundStatus::Approved));
        insert(&conn, "c", "ana@example.com", 50, None);
        insert(&conn, "d", "ben@example.com", 75, Some(FundStatus::Rejected));

        let stats = compute_dashboard(&conn, "ana@example.com", "₱").expect("dashboard");
        assert_eq!(stats.requests.total, 4);
        assert_eq!(stats.requests.pending, 1);
        assert_eq!(stats.requests.approved, 2);
        assert_eq!(stats.requests.rejected, 1);
        assert_eq!(stats.my_approved_total, Decimal::from(1200));
        assert_eq!(stats.my_balance_label, "₱1,200");
        assert_eq!(stats.department_approved_label, "₱1,500");
        assert_eq!(stats.user_count, 0);
    }
}
