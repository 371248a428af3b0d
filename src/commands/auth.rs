use crate::commands::db;
use crate::commands::settings::load_effective_settings;
use crate::error::{self, command_error, FundError};
use crate::models::session::{Session, SessionState};
use crate::models::user::{RegistrationForm, Role, UserProfile};
use crate::validation::normalize_email;

/// Stores the profile of an account the external provider just created.
#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn register_user(data_dir: String, form: RegistrationForm) -> Result<UserProfile, String> {
    register_user_internal(&data_dir, form).map_err(|e| command_error("Register", e))
}

pub fn register_user_internal(data_dir: &str, form: RegistrationForm) -> error::Result<UserProfile> {
    let uid = form.uid.trim();
    let name = form.name.trim();
    let email = normalize_email(&form.email);
    if uid.is_empty() || name.is_empty() || email.is_empty() {
        return Err(FundError::Validation("Please fill in all fields.".to_string()));
    }

    if form.role == Role::Admin {
        let settings = load_effective_settings(data_dir).map_err(FundError::Settings)?;
        let supplied = form.admin_code.as_deref().map(str::trim).unwrap_or_default();
        if supplied != settings.admin_code {
            return Err(FundError::Auth("Invalid Administrative Code!".to_string()));
        }
    }

    let profile = UserProfile {
        uid: uid.to_string(),
        name: name.to_string(),
        email,
        role: form.role,
        created_at: chrono::Utc::now().timestamp(),
    };

    let conn = db::get_db_connection(data_dir)?;
    db::insert_user(&conn, &profile)?;
    log::info!("registered {} as {}", profile.email, profile.role.as_str());
    Ok(profile)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn begin_session(
    data_dir: String,
    uid: String,
    email: String,
    sessions: tauri::State<'_, SessionState>,
) -> Result<Session, String> {
    begin_session_internal(&data_dir, &uid, &email, sessions.inner())
        .map_err(|e| command_error("Sign in", e))
}

/// Binds an identity from the external provider to its stored profile.
pub fn begin_session_internal(
    data_dir: &str,
    uid: &str,
    email: &str,
    sessions: &SessionState,
) -> error::Result<Session> {
    let conn = db::get_db_connection(data_dir)?;
    let profile = db::load_user(&conn, uid)?
        .ok_or_else(|| FundError::Auth("User record not found.".to_string()))?;

    let email = match normalize_email(email) {
        provided if provided.is_empty() => profile.email.clone(),
        provided => provided,
    };

    let session = Session {
        uid: profile.uid,
        email,
        name: profile.name,
        role: profile.role,
        landing_view: profile.role.landing_view().to_string(),
    };
    sessions.set(session.clone())?;
    log::info!("session started for {}", session.email);
    Ok(session)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn end_session(
    sessions: tauri::State<'_, SessionState>,
    watchers: tauri::State<'_, crate::commands::watcher::WatcherSlot>,
) -> Result<(), String> {
    watchers
        .replace(None)
        .and_then(|_| end_session_internal(sessions.inner()))
        .map_err(|e| command_error("Sign out", e))
}

pub fn end_session_internal(sessions: &SessionState) -> error::Result<()> {
    if let Some(previous) = sessions.clear()? {
        log::info!("session ended for {}", previous.email);
    }
    Ok(())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn current_session(sessions: tauri::State<'_, SessionState>) -> Result<Option<Session>, String> {
    sessions
        .current()
        .map_err(|e| command_error("Read session", e))
}

/// Maps a provider error code to the message shown on the sign-in form.
#[cfg_attr(feature = "desktop", tauri::command)]
pub fn describe_auth_failure(code: String, message: String) -> String {
    match code.as_str() {
        "auth/invalid-credential" => "Invalid email or password.".to_string(),
        "auth/user-not-found" => "No account found with this email.".to_string(),
        "auth/wrong-password" => "Incorrect password.".to_string(),
        _ => message,
    }
}
