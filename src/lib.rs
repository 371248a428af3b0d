pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;
pub mod money;
pub mod validation;

#[cfg(feature = "desktop")]
use commands::{
    auth::{begin_session, current_session, describe_auth_failure, end_session, register_user},
    dashboard::get_dashboard_stats,
    funds::{add_department_fund, get_department_funds},
    ledger::open_ledger,
    reports::{export_report, load_report},
    requests::{
        approve_request, get_request_history, list_my_requests, list_requests_by_status,
        mark_money_taken, reject_request, submit_fund_request,
    },
    settings::{get_settings, save_settings},
    watcher::{start_ledger_watcher, stop_ledger_watcher, WatcherSlot},
};
#[cfg(feature = "desktop")]
use models::session::SessionState;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(SessionState::default())
        .manage(WatcherSlot::default())
        .invoke_handler(tauri::generate_handler![
            open_ledger,
            register_user,
            begin_session,
            end_session,
            current_session,
            describe_auth_failure,
            submit_fund_request,
            list_my_requests,
            list_requests_by_status,
            approve_request,
            reject_request,
            mark_money_taken,
            get_request_history,
            add_department_fund,
            get_department_funds,
            get_dashboard_stats,
            load_report,
            export_report,
            start_ledger_watcher,
            stop_ledger_watcher,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
