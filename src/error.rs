use thiserror::Error;

/// Broad failure classes surfaced to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Auth,
    Store,
}

#[derive(Debug, Error)]
pub enum FundError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Export(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("DB error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, FundError>;

impl FundError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FundError::Validation(_) | FundError::Export(_) => ErrorKind::Validation,
            FundError::NotSignedIn | FundError::Forbidden(_) | FundError::Auth(_) => ErrorKind::Auth,
            FundError::NotFound(_)
            | FundError::Conflict(_)
            | FundError::Db(_)
            | FundError::Io(_)
            | FundError::Csv(_)
            | FundError::Watch(_)
            | FundError::Settings(_)
            | FundError::Internal(_) => ErrorKind::Store,
        }
    }
}

/// Converts a library error into the string returned over IPC.
///
/// Everything is logged. Validation and auth failures keep their message;
/// store failures collapse to a generic retry hint, except `NotFound` and
/// `Conflict` which the caller can act on.
pub fn command_error(action: &str, err: FundError) -> String {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Auth => {
            log::warn!("{action}: {err}");
            err.to_string()
        }
        ErrorKind::Store => {
            log::error!("{action}: {err}");
            match err {
                FundError::NotFound(_) | FundError::Conflict(_) => err.to_string(),
                _ => format!("{action} failed. Try again."),
            }
        }
    }
}
