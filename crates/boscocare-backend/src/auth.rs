use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::BackendError;

/// The account record held by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: Value,
}

/// A signed-in session as issued by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix seconds. Older servers omit it, in which case it is derived from
    /// `expires_in` when the session is received.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<Identity>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Seconds before the nominal expiry at which a session is treated as
/// expired, so a token is never sent out with only moments left.
const EXPIRY_MARGIN_SECS: i64 = 10;

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now.timestamp() + EXPIRY_MARGIN_SECS >= at,
            None => false,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    pub(crate) fn stamp_expiry(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now.timestamp() + self.expires_in);
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    /// Link embedded in the verification email.
    pub redirect_to: Option<&'a str>,
    /// Stored on the account as `user_metadata`.
    pub data: Value,
}

/// Sign-up returns a session only when the project does not require email
/// confirmation.
#[derive(Debug, Clone, Default)]
pub struct SignUpOutcome {
    pub user: Option<Identity>,
    pub session: Option<Session>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpOutcome, BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError>;

    async fn get_user(&self, access_token: &str) -> Result<Identity, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}
