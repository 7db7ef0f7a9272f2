//! # Boscocare CLI
//!
//! Account checks run against the same hosted backend as the API.
//!
//! [`Operator`] wraps an [`AuthFacade`] and a single throwaway tab, so a
//! sign-in from the command line goes through exactly the same role gate as
//! one from the browser.
//!
//! ```ignore
//! let operator = Operator::from_config(&BackendConfig::from_env(), redirect_url)?;
//! let report = operator.check_sign_in("jane@school.edu", "password123").await?;
//! println!("{report}");
//! ```

use std::fmt;
use std::sync::Arc;

use boscocare_auth::{AuthError, AuthFacade, DevRoleOverride, RoleResolver, TabContext};
use boscocare_backend::{AuthProvider, BackendError, DataStore, GoTrueClient, PostgrestClient};
use boscocare_config::BackendConfig;
use boscocare_core::{Role, roles::is_sign_in_allowed};
use uuid::Uuid;

/// Outcome of a sign-in check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInReport {
    pub user_id: Option<Uuid>,
    pub role: Option<Role>,
    pub allowed: bool,
    /// Set when signing out again failed on the provider side.
    pub sign_out_error: Option<String>,
}

impl fmt::Display for SignInReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_id {
            Some(id) => writeln!(f, "   User id: {id}")?,
            None => writeln!(f, "   User id: unknown")?,
        }
        match self.role {
            Some(role) => writeln!(f, "   Role: {role}")?,
            None => writeln!(f, "   Role: none")?,
        }
        write!(
            f,
            "   Sign-in allowed: {}",
            if self.allowed { "yes" } else { "no" }
        )
    }
}

pub struct Operator {
    facade: AuthFacade,
    resolver: RoleResolver,
    tab: TabContext,
}

impl Operator {
    /// Must be called inside a Tokio runtime.
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        data: Arc<dyn DataStore>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            facade: AuthFacade::new(provider.clone(), data.clone(), redirect_url),
            resolver: RoleResolver::new(data),
            tab: TabContext::new(Uuid::new_v4(), provider),
        }
    }

    pub fn from_config(
        config: &BackendConfig,
        redirect_url: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let provider = Arc::new(GoTrueClient::new(config)?);
        let data = Arc::new(PostgrestClient::new(config)?);
        Ok(Self::new(provider, data, redirect_url))
    }

    pub async fn sign_up(&self, email: &str, password: &str, role: &str) -> Result<String, AuthError> {
        self.facade
            .sign_up(email, password, serde_json::json!({ "role": role }))
            .await
    }

    /// Signs in, reports the resolved role and signs out again.
    ///
    /// A role outside the allow-list is a report with `allowed: false`, not
    /// an error; the facade has already revoked that session.
    pub async fn check_sign_in(&self, email: &str, password: &str) -> Result<SignInReport, AuthError> {
        match self.facade.sign_in(&self.tab, email, password).await {
            Ok(_) => {}
            Err(AuthError::UnauthorizedRole) => {
                return Ok(SignInReport {
                    user_id: None,
                    role: None,
                    allowed: false,
                    sign_out_error: None,
                });
            }
            Err(err) => return Err(err),
        }

        let user_id = self.tab.session.user_id();
        let role = self.facade.get_user_role(&self.tab, user_id).await;
        let sign_out_error = self.facade.sign_out(&self.tab).await.err().map(|e| e.message());

        Ok(SignInReport {
            user_id,
            role,
            allowed: is_sign_in_allowed(role),
            sign_out_error,
        })
    }

    /// Role stored for an identity, read with the public key only.
    pub async fn role_of(&self, auth_user_id: Uuid) -> Option<Role> {
        self.resolver
            .resolve(&DevRoleOverride::default(), Some(auth_user_id), None)
            .await
    }
}
