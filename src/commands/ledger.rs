use crate::commands::db;
use crate::error::{self, command_error};
use crate::models::ledger::LedgerMeta;
use std::path::Path;

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn open_ledger(data_dir: String) -> Result<LedgerMeta, String> {
    if !Path::new(&data_dir).is_dir() {
        return Err("PATH_NOT_FOUND: Directory does not exist".to_string());
    }

    // Settings first so a broken settings file is reported before the store is touched.
    crate::commands::settings::load_settings_from_disk(&data_dir)
        .map_err(|e| format!("INIT_FAILED: Could not initialize settings: {e}"))?;

    open_ledger_internal(&data_dir).map_err(|e| command_error("Open ledger", e))
}

pub fn open_ledger_internal(data_dir: &str) -> error::Result<LedgerMeta> {
    let conn = db::get_db_connection(data_dir)?;

    let meta = LedgerMeta {
        path: db::ledger_dir(data_dir).to_string_lossy().to_string(),
        user_count: db::count_rows(&conn, "users")?,
        request_count: db::count_rows(&conn, "fund_requests")?,
        fund_count: db::count_rows(&conn, "department_funds")?,
        last_activity_at: db::last_activity_at(&conn)?,
    };

    log::info!(
        "opened ledger at {} ({} requests, {} funds)",
        meta.path,
        meta.request_count,
        meta.fund_count
    );
    Ok(meta)
}
