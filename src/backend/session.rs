//! Session probe and role resolution.
//!
//! The backend identifies the caller from its session cookie; the client
//! probes `/user-session` once and keeps the result in an explicit,
//! narrowly scoped [`AuthContext`] rather than an ambient singleton.
//! The probe's payload is loosely cased (`"first name"` alongside
//! `first_name`), so parsing is alias-tolerant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ApiError;

use super::Backend;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Customer,
    Owner,
    Worker,
    Admin,
    /// Unrecognized role strings are preserved, not rejected; route access
    /// for them is decided by the caller.
    Unknown(String),
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "customer" | "client" => Self::Customer,
            "owner" | "business_owner" => Self::Owner,
            "worker" | "employee" => Self::Worker,
            "admin" => Self::Admin,
            _ => Self::Unknown(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Owner => write!(f, "owner"),
            Self::Worker => write!(f, "worker"),
            Self::Admin => write!(f, "admin"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(alias = "User_ID", alias = "user_id", alias = "userId")]
    pub user_id: i64,
    #[serde(alias = "first name", alias = "firstName", default)]
    pub first_name: String,
    #[serde(alias = "last name", alias = "lastName", default)]
    pub last_name: String,
    pub role: Role,
}

impl Backend {
    /// Resolve the current session from the backend's session cookie.
    pub async fn resolve_session(&self) -> Result<SessionUser, ApiError> {
        let body = self.post_envelope_empty("/user-session").await?;
        serde_json::from_value(body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Explicit session store: `init` probes once, `current` reads, `clear`
/// tears down on sign-out. Shared by cloning; no process-global state.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user: Arc<RwLock<Option<SessionUser>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session once and remember it.
    pub async fn init(&self, backend: &Backend) -> Result<SessionUser, ApiError> {
        let user = backend.resolve_session().await?;
        info!(user_id = user.user_id, role = %user.role, "session resolved");
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    pub async fn current(&self) -> Option<SessionUser> {
        self.user.read().await.clone()
    }

    /// Drop the session on sign-out.
    pub async fn clear(&self) {
        *self.user.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_accepts_spaced_keys() {
        let user: SessionUser = serde_json::from_str(
            r#"{"User_ID": 42, "first name": "Dana", "last name": "Reyes", "role": "Owner"}"#,
        )
        .unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.first_name, "Dana");
        assert_eq!(user.role, Role::Owner);
    }

    #[test]
    fn test_unknown_role_is_preserved() {
        let role = Role::from("Receptionist".to_string());
        assert_eq!(role, Role::Unknown("Receptionist".to_string()));
        assert_eq!(role.to_string(), "Receptionist");
    }

    #[tokio::test]
    async fn test_auth_context_clear() {
        let ctx = AuthContext::new();
        assert!(ctx.current().await.is_none());

        *ctx.user.write().await = Some(SessionUser {
            user_id: 1,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            role: Role::Customer,
        });
        assert!(ctx.current().await.is_some());

        ctx.clear().await;
        assert!(ctx.current().await.is_none());
    }
}
