use boscocare_backend::BackendError;
use thiserror::Error;

pub const UNAUTHORIZED_ROLE_MESSAGE: &str =
    "Your account role is not authorized to sign in to this application.";

/// Failures a sign-in, sign-up or sign-out can report to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The provider rejected the credentials. No session was created.
    #[error("{0}")]
    Credentials(String),

    /// Credentials were valid but the role is not allowed to sign in. The
    /// session has already been revoked.
    #[error("{}", UNAUTHORIZED_ROLE_MESSAGE)]
    UnauthorizedRole,

    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Credentials(_) => "credentials",
            AuthError::UnauthorizedRole => "unauthorized_role",
            AuthError::Provider(_) => "provider",
        }
    }
}

/// The provider's own message, or `fallback` when it gave none.
pub(crate) fn provider_message(err: &BackendError, fallback: &str) -> String {
    let message = match err {
        BackendError::Api { message, .. } => message.trim().to_string(),
        other => other.to_string(),
    };
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
