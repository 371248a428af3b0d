use crate::error::{FundError, Result};
use crate::models::user::Role;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub landing_view: String,
}

/// The identity currently signed in through the external provider.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Mutex<Option<Session>>,
}

impl SessionState {
    pub fn set(&self, session: Session) -> Result<()> {
        let mut slot = self.lock()?;
        *slot = Some(session);
        Ok(())
    }

    pub fn clear(&self) -> Result<Option<Session>> {
        Ok(self.lock()?.take())
    }

    pub fn current(&self) -> Result<Option<Session>> {
        Ok(self.lock()?.clone())
    }

    pub fn require(&self) -> Result<Session> {
        self.current()?.ok_or(FundError::NotSignedIn)
    }

    pub fn require_admin(&self) -> Result<Session> {
        let session = self.require()?;
        if session.role != Role::Admin {
            return Err(FundError::Forbidden(format!(
                "{} is not an administrator",
                session.email
            )));
        }
        Ok(session)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>> {
        self.current
            .lock()
            .map_err(|_| FundError::Internal("Session lock error".to_string()))
    }
}
