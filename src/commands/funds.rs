use crate::analysis::balance::summarize_balance;
use crate::commands::db;
use crate::commands::settings::load_effective_settings;
use crate::error::{self, command_error, FundError};
use crate::models::department_fund::{DepartmentFund, DepartmentFundForm};
use crate::models::fund_request::{FundStatus, StatusFilter};
use crate::models::session::SessionState;
use crate::models::summary::DepartmentFundsOverview;
use crate::money::format_currency;
use crate::validation::validate_department_fund;

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn add_department_fund(
    data_dir: String,
    form: DepartmentFundForm,
    sessions: tauri::State<'_, SessionState>,
) -> Result<DepartmentFundsOverview, String> {
    add_department_fund_internal(&data_dir, &form, sessions.inner())
        .map_err(|e| command_error("Add fund", e))
}

/// Records a deposit and returns the refreshed overview.
pub fn add_department_fund_internal(
    data_dir: &str,
    form: &DepartmentFundForm,
    sessions: &SessionState,
) -> error::Result<DepartmentFundsOverview> {
    let session = sessions.require_admin()?;
    let valid = validate_department_fund(&form.added_by, &form.amount, form.reason.as_deref())?;

    let fund = DepartmentFund {
        id: uuid::Uuid::new_v4().to_string(),
        amount: valid.amount,
        added_by: valid.added_by,
        reason: valid.reason,
        created_at: chrono::Utc::now().timestamp(),
    };

    let conn = db::get_db_connection(data_dir)?;
    db::insert_department_fund(&conn, &fund)?;
    log::info!("{} added {} on behalf of {}", session.email, fund.amount, fund.added_by);

    get_department_funds_internal(data_dir, sessions)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_department_funds(
    data_dir: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<DepartmentFundsOverview, String> {
    get_department_funds_internal(&data_dir, sessions.inner())
        .map_err(|e| command_error("Load department funds", e))
}

/// Deposits newest first, the running balance, and approved requests with
/// their disbursal state.
pub fn get_department_funds_internal(
    data_dir: &str,
    sessions: &SessionState,
) -> error::Result<DepartmentFundsOverview> {
    sessions.require()?;
    let settings = load_effective_settings(data_dir).map_err(FundError::Settings)?;

    let conn = db::get_db_connection(data_dir)?;
    let funds = db::load_department_funds(&conn)?;
    let requests = db::load_requests(&conn, StatusFilter::All)?;
    let balance = summarize_balance(&funds, &requests);

    let approved_requests = requests
        .into_iter()
        .filter(|r| r.status == FundStatus::Approved)
        .collect();

    Ok(DepartmentFundsOverview {
        total_label: format!("Total: {}", format_currency(&settings.currency_symbol, balance.total_funds)),
        remaining_label: format!("Remaining: {}", format_currency(&settings.currency_symbol, balance.remaining)),
        funds,
        balance,
        approved_requests,
    })
}
