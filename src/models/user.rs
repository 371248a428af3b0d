use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// View the frontend routes to after sign-in.
    pub fn landing_view(&self) -> &'static str {
        match self {
            Role::Admin => "dashboard",
            Role::User => "user-dashboard",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
}

/// Sign-up form. `uid` comes from the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub admin_code: Option<String>,
}
