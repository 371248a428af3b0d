use crate::commands::db;
use crate::error::{self, command_error, FundError};
use crate::models::fund_request::{FundRequest, FundRequestForm, FundStatus, RequestEvent, StatusFilter};
use crate::models::session::SessionState;
use crate::models::user::Role;
use crate::validation::{validate_fund_request, validate_recipient_name};

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn submit_fund_request(
    data_dir: String,
    form: FundRequestForm,
    sessions: tauri::State<'_, SessionState>,
) -> Result<FundRequest, String> {
    submit_fund_request_internal(&data_dir, &form, sessions.inner())
        .map_err(|e| command_error("Submit request", e))
}

/// Validates the form and writes one `Pending` request. Nothing is written on error.
pub fn submit_fund_request_internal(
    data_dir: &str,
    form: &FundRequestForm,
    sessions: &SessionState,
) -> error::Result<FundRequest> {
    let session = sessions.require()?;
    let valid = validate_fund_request(&form.amount, &form.reason)?;

    let request = FundRequest {
        id: uuid::Uuid::new_v4().to_string(),
        uid: session.uid,
        email: session.email,
        amount: valid.amount,
        reason: valid.reason,
        status: FundStatus::Pending,
        money_taken_by: None,
        created_at: chrono::Utc::now().timestamp(),
        approved_at: None,
        done_at: None,
    };

    let conn = db::get_db_connection(data_dir)?;
    db::insert_fund_request(&conn, &request)?;
    log::info!("{} requested {} ({})", request.email, request.amount, request.id);
    Ok(request)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_my_requests(
    data_dir: String,
    status: Option<String>,
    sessions: tauri::State<'_, SessionState>,
) -> Result<Vec<FundRequest>, String> {
    list_my_requests_internal(&data_dir, status.as_deref(), sessions.inner())
        .map_err(|e| command_error("Load requests", e))
}

/// The signed-in user's requests, newest first.
pub fn list_my_requests_internal(
    data_dir: &str,
    status: Option<&str>,
    sessions: &SessionState,
) -> error::Result<Vec<FundRequest>> {
    let session = sessions.require()?;
    let filter = StatusFilter::parse(status).map_err(FundError::Validation)?;

    let conn = db::get_db_connection(data_dir)?;
    let mine = db::load_requests_by_email(&conn, &session.email)?;
    Ok(mine.into_iter().filter(|r| filter.matches(r.status)).collect())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_requests_by_status(
    data_dir: String,
    status: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<Vec<FundRequest>, String> {
    list_requests_by_status_internal(&data_dir, &status, sessions.inner())
        .map_err(|e| command_error("Load requests", e))
}

pub fn list_requests_by_status_internal(
    data_dir: &str,
    status: &str,
    sessions: &SessionState,
) -> error::Result<Vec<FundRequest>> {
    sessions.require_admin()?;
    let status: FundStatus = status.parse().map_err(FundError::Validation)?;
    let conn = db::get_db_connection(data_dir)?;
    db::load_requests(&conn, StatusFilter::Only(status))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn approve_request(
    data_dir: String,
    id: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<FundRequest, String> {
    decide_request_internal(&data_dir, &id, FundStatus::Approved, sessions.inner())
        .map_err(|e| command_error("Approve request", e))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn reject_request(
    data_dir: String,
    id: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<FundRequest, String> {
    decide_request_internal(&data_dir, &id, FundStatus::Rejected, sessions.inner())
        .map_err(|e| command_error("Reject request", e))
}

/// Approves or rejects a pending request. A request already decided by
/// another approver yields `FundError::Conflict`.
pub fn decide_request_internal(
    data_dir: &str,
    id: &str,
    decision: FundStatus,
    sessions: &SessionState,
) -> error::Result<FundRequest> {
    let session = sessions.require_admin()?;
    if decision == FundStatus::Pending {
        return Err(FundError::Validation("A request cannot be moved back to Pending".to_string()));
    }

    let conn = db::get_db_connection(data_dir)?;
    let updated = db::transition_status(&conn, id, decision, &session.uid, chrono::Utc::now().timestamp())?;
    log::info!("{} marked {} as {}", session.email, id, decision);
    Ok(updated)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn mark_money_taken(
    data_dir: String,
    id: String,
    recipient: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<FundRequest, String> {
    mark_money_taken_internal(&data_dir, &id, &recipient, sessions.inner())
        .map_err(|e| command_error("Record disbursal", e))
}

pub fn mark_money_taken_internal(
    data_dir: &str,
    id: &str,
    recipient: &str,
    sessions: &SessionState,
) -> error::Result<FundRequest> {
    let session = sessions.require_admin()?;
    let recipient = validate_recipient_name(recipient)?;

    let conn = db::get_db_connection(data_dir)?;
    let updated = db::record_disbursal(&conn, id, &recipient, &session.uid, chrono::Utc::now().timestamp())?;
    log::info!("{recipient} has taken the money for {id}");
    Ok(updated)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_request_history(
    data_dir: String,
    id: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<Vec<RequestEvent>, String> {
    get_request_history_internal(&data_dir, &id, sessions.inner())
        .map_err(|e| command_error("Load history", e))
}

/// Lifecycle events of one request. Owners see their own; admins see all.
pub fn get_request_history_internal(
    data_dir: &str,
    id: &str,
    sessions: &SessionState,
) -> error::Result<Vec<RequestEvent>> {
    let session = sessions.require()?;
    let conn = db::get_db_connection(data_dir)?;
    let request = db::load_request(&conn, id)?.ok_or_else(|| FundError::NotFound(format!("request {id}")))?;

    if request.uid != session.uid && session.role != Role::Admin {
        return Err(FundError::Forbidden(format!("request {id} belongs to another user")));
    }
    db::load_request_events(&conn, id)
}
