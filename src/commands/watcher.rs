use crate::commands::dashboard::compute_dashboard;
use crate::commands::db;
use crate::error::{self, FundError};
use crate::models::summary::DashboardStats;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::sync::Mutex;
use std::time::Duration;

/// Live listener on one ledger. Dropping it detaches the listener.
pub struct LedgerWatcher {
    viewer_email: String,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl LedgerWatcher {
    pub fn viewer_email(&self) -> &str {
        &self.viewer_email
    }
}

/// Holds at most one live listener; installing a new one drops the old.
#[derive(Default)]
pub struct WatcherSlot {
    current: Mutex<Option<LedgerWatcher>>,
}

impl WatcherSlot {
    pub fn replace(&self, next: Option<LedgerWatcher>) -> error::Result<()> {
        let mut slot = self
            .current
            .lock()
            .map_err(|_| FundError::Internal("Watcher lock error".to_string()))?;
        if let Some(previous) = slot.take() {
            log::info!("detached live updates for {}", previous.viewer_email());
        }
        *slot = next;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

/// Recomputes the dashboard whenever the ledger files change.
///
/// `on_change` receives the current snapshot immediately, then once per
/// debounced change that actually alters the snapshot.
pub fn watch_ledger<F>(
    data_dir: &str,
    viewer_email: &str,
    currency_symbol: &str,
    debounce: Duration,
    mut on_change: F,
) -> error::Result<LedgerWatcher>
where
    F: FnMut(DashboardStats) + Send + 'static,
{
    // Kept open for the watcher's lifetime so SQLite never deletes and
    // recreates the WAL files underneath us.
    let conn = db::get_db_connection(data_dir)?;
    let viewer = viewer_email.to_string();
    let symbol = currency_symbol.to_string();

    let initial = compute_dashboard(&conn, &viewer, &symbol)?;
    on_change(initial.clone());
    let mut last = initial;

    let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| match res {
        Ok(events) if events.is_empty() => {}
        Ok(_) => match compute_dashboard(&conn, &viewer, &symbol) {
            Ok(stats) if stats == last => {}
            Ok(stats) => {
                last = stats.clone();
                on_change(stats);
            }
            Err(e) => log::error!("live update failed: {e}"),
        },
        Err(e) => log::warn!("ledger watch error: {e:?}"),
    })?;

    debouncer
        .watcher()
        .watch(&db::ledger_dir(data_dir), RecursiveMode::NonRecursive)?;

    log::info!("live updates attached for {viewer_email}");
    Ok(LedgerWatcher {
        viewer_email: viewer_email.to_string(),
        _debouncer: debouncer,
    })
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn start_ledger_watcher(
    data_dir: String,
    sessions: tauri::State<'_, crate::models::session::SessionState>,
    watchers: tauri::State<'_, WatcherSlot>,
    app: tauri::AppHandle,
) -> Result<(), String> {
    use tauri::Emitter;

    let attach = || -> error::Result<()> {
        let session = sessions.require()?;
        let settings = crate::commands::settings::load_effective_settings(&data_dir)
            .map_err(FundError::Settings)?;
        let app_handle = app.clone();
        let watcher = watch_ledger(
            &data_dir,
            &session.email,
            &settings.currency_symbol,
            settings.live_update_debounce,
            move |stats| {
                if let Err(e) = app_handle.emit("ledger_changed", stats) {
                    log::warn!("failed to emit ledger_changed: {e}");
                }
            },
        )?;
        watchers.replace(Some(watcher))
    };

    attach().map_err(|e| crate::error::command_error("Start live updates", e))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn stop_ledger_watcher(watchers: tauri::State<'_, WatcherSlot>) -> Result<(), String> {
    watchers
        .replace(None)
        .map_err(|e| crate::error::command_error("Stop live updates", e))
}
