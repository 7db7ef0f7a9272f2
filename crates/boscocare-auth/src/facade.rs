//! Sign-up, sign-in, sign-out and profile loading for a tab.

use std::sync::Arc;

use boscocare_backend::{AuthProvider, DataStore, Query, SignUpRequest};
use boscocare_core::{Role, roles::is_sign_in_allowed};
use boscocare_models::users::{PROFILE_COLUMNS, USERS_TABLE};
use boscocare_models::Profile;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AuthError, provider_message};
use crate::roles::RoleResolver;
use crate::session::AuthEvent;
use crate::tabs::TabContext;

pub const SIGN_UP_MESSAGE: &str =
    "Registration successful. Please check your email to verify your account.";
pub const SIGNED_IN_MESSAGE: &str = "Logged in";
pub const SIGNED_OUT_MESSAGE: &str = "Signed out";

pub struct AuthFacade {
    provider: Arc<dyn AuthProvider>,
    data: Arc<dyn DataStore>,
    resolver: RoleResolver,
    redirect_url: String,
}

impl AuthFacade {
    /// `redirect_url` is where the verification email sends the user.
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        data: Arc<dyn DataStore>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            resolver: RoleResolver::new(data.clone()),
            provider,
            data,
            redirect_url: redirect_url.into(),
        }
    }

    /// Registers an account. Never signs the tab in; the account has to be
    /// verified by email first.
    #[instrument(skip(self, password, metadata))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<String, AuthError> {
        let request = SignUpRequest {
            email,
            password,
            redirect_to: Some(&self.redirect_url),
            data: metadata,
        };

        if let Err(e) = self.provider.sign_up(request).await {
            warn!(error = %e, "Sign-up rejected by provider");
            return Err(AuthError::Provider(provider_message(
                &e,
                "Registration failed.",
            )));
        }

        let query = Query::new().select("id").eq("email", email);
        match self.data.select_single(None, USERS_TABLE, &query).await {
            Ok(_) => debug!("Profile already exists for new account"),
            Err(e) if e.is_no_rows() => {}
            Err(e) => {
                error!(error = %e, "Error checking existing profile");
                return Err(AuthError::Provider(provider_message(
                    &e,
                    "Error checking existing profile.",
                )));
            }
        }

        info!("Account registered, awaiting email verification");
        Ok(SIGN_UP_MESSAGE.to_string())
    }

    /// Password sign-in with role enforcement.
    ///
    /// Credential verification comes first. The identity's role is resolved
    /// with the new session's token before the tab sees it; a role outside
    /// the allow-list revokes the session at the provider and returns
    /// [`AuthError::UnauthorizedRole`] without it ever being published.
    #[instrument(skip(self, tab, password), fields(tab_id = %tab.id))]
    pub async fn sign_in(
        &self,
        tab: &TabContext,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let mut session = match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "Credentials rejected");
                return Err(AuthError::Credentials(provider_message(
                    &e,
                    "Login failed.",
                )));
            }
        };

        if session.user.is_none() {
            match self.provider.get_user(&session.access_token).await {
                Ok(identity) => session.user = Some(identity),
                Err(e) => warn!(error = %e, "Identity lookup after sign-in failed"),
            }
        }

        let Some(user_id) = session.user_id() else {
            warn!("Signed in without an identity id, skipping role check");
            tab.session.set_session(session, AuthEvent::SignedIn);
            return Ok(SIGNED_IN_MESSAGE.to_string());
        };

        let role = self
            .resolver
            .resolve(&tab.dev_override, Some(user_id), Some(&session.access_token))
            .await;

        if !is_sign_in_allowed(role) {
            warn!(%user_id, role = ?role, "Role not allowed to sign in, revoking session");
            if let Err(e) = self.provider.sign_out(&session.access_token).await {
                warn!(error = %e, "Provider sign-out after role rejection failed");
            }
            tab.session.clear();
            tab.clear_profile();
            return Err(AuthError::UnauthorizedRole);
        }

        tab.session.set_session(session, AuthEvent::SignedIn);
        info!(%user_id, role = ?role, "Signed in");
        Ok(SIGNED_IN_MESSAGE.to_string())
    }

    /// Ends the tab's session. Safe to call when signed out.
    ///
    /// An expired session is refreshed first so the provider sees a live
    /// token. A provider that no longer knows the session (401, 403 or 404)
    /// counts as signed out. The local session is dropped even when the
    /// provider call fails otherwise; that failure is reported as
    /// [`AuthError::Provider`].
    #[instrument(skip(self, tab), fields(tab_id = %tab.id))]
    pub async fn sign_out(&self, tab: &TabContext) -> Result<String, AuthError> {
        let Some(session) = tab.session.get_session().await else {
            tab.clear_profile();
            return Ok(SIGNED_OUT_MESSAGE.to_string());
        };

        let result = self.provider.sign_out(&session.access_token).await;
        tab.session.clear();
        tab.clear_profile();

        match result {
            Ok(()) => Ok(SIGNED_OUT_MESSAGE.to_string()),
            Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => {
                debug!(error = %e, "Provider session already gone");
                Ok(SIGNED_OUT_MESSAGE.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Provider sign-out failed");
                Err(AuthError::Provider(provider_message(&e, "Logout error.")))
            }
        }
    }

    /// Role of `user_id`, or of the tab's current identity when `None`.
    pub async fn get_user_role(&self, tab: &TabContext, user_id: Option<Uuid>) -> Option<Role> {
        let user_id = user_id.or_else(|| tab.session.user_id());
        let token = tab.session.access_token();
        self.resolver
            .resolve(&tab.dev_override, user_id, token.as_deref())
            .await
    }

    /// The `users` row of `user_id` with its student profile embedded. With
    /// a dev override set, its role replaces the stored one.
    #[instrument(skip(self, tab), fields(tab_id = %tab.id))]
    pub async fn fetch_profile(&self, tab: &TabContext, user_id: Uuid) -> Option<Profile> {
        let query = Query::new()
            .select(PROFILE_COLUMNS)
            .eq("auth_user_id", user_id);
        let token = tab.session.access_token();

        let row = match self
            .data
            .select_single(token.as_deref(), USERS_TABLE, &query)
            .await
        {
            Ok(row) => row,
            Err(e) if e.is_no_rows() => return None,
            Err(e) => {
                error!(error = %e, "Error fetching user profile");
                return None;
            }
        };

        let mut profile: Profile = match serde_json::from_value(row) {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = %e, "Error decoding user profile");
                return None;
            }
        };

        if let Some(role) = tab.dev_override.get() {
            profile.role = Some(role.as_str().to_string());
        }
        Some(profile)
    }

    /// Reloads the profile of the tab's current identity into its cache.
    pub async fn refresh_profile(&self, tab: &TabContext) -> Option<Profile> {
        let Some(user_id) = tab.session.user_id() else {
            tab.clear_profile();
            return None;
        };
        let profile = self.fetch_profile(tab, user_id).await;
        tab.store_profile(user_id, profile.clone());
        profile
    }

    /// The cached profile, loading it on first use.
    pub async fn profile(&self, tab: &TabContext) -> Option<Profile> {
        match tab.cached_profile() {
            Some(profile) => Some(profile),
            None => self.refresh_profile(tab).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boscocare_backend::{MemoryAuthProvider, MemoryDataStore, Operation};
    use serde_json::json;

    struct Harness {
        provider: Arc<MemoryAuthProvider>,
        data: Arc<MemoryDataStore>,
        facade: AuthFacade,
        tab: TabContext,
    }

    fn harness() -> Harness {
        let provider = Arc::new(MemoryAuthProvider::new());
        let data = Arc::new(MemoryDataStore::new());
        let facade = AuthFacade::new(provider.clone(), data.clone(), "http://localhost:3000/auth");
        let tab = TabContext::new(Uuid::new_v4(), provider.clone());
        Harness {
            provider,
            data,
            facade,
            tab,
        }
    }

    fn account(h: &Harness, email: &str, role: &str) -> Uuid {
        let id = h.provider.with_confirmed_account(email, "password123");
        h.data.seed(
            USERS_TABLE,
            json!({"auth_user_id": id, "email": email, "role": role, "first_name": "Jane"}),
        );
        id
    }

    #[tokio::test]
    async fn test_sign_up_does_not_authenticate() {
        let h = harness();
        let message = h
            .facade
            .sign_up("jane@school.edu", "password123", json!({"role": "guidance"}))
            .await
            .unwrap();

        assert!(message.contains("verify your account"));
        assert!(h.tab.session.current().is_none());
        assert_eq!(h.provider.active_sessions(), 0);
        assert_eq!(
            h.provider.account_metadata("jane@school.edu"),
            Some(json!({"role": "guidance"}))
        );
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_reports_provider_message() {
        let h = harness();
        h.provider.with_confirmed_account("jane@school.edu", "x");
        let err = h
            .facade
            .sign_up("jane@school.edu", "password123", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Provider("User already registered".to_string()));
    }

    #[tokio::test]
    async fn test_sign_up_profile_check_error_is_reported() {
        let h = harness();
        h.data.fail_next(USERS_TABLE, Operation::Select);
        let err = h
            .facade
            .sign_up("jane@school.edu", "password123", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "provider");
    }

    #[tokio::test]
    async fn test_unverified_sign_in_is_credential_failure() {
        let h = harness();
        h.facade
            .sign_up("jane@school.edu", "password123", Value::Null)
            .await
            .unwrap();

        let err = h
            .facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Credentials("Email not confirmed".to_string()));
        assert!(h.tab.session.current().is_none());
    }

    #[tokio::test]
    async fn test_allowed_role_signs_in() {
        let h = harness();
        let id = account(&h, "jane@school.edu", "guidance");

        let message = h
            .facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();

        assert_eq!(message, "Logged in");
        assert_eq!(h.tab.session.user_id(), Some(id));
        assert_eq!(h.facade.get_user_role(&h.tab, None).await, Some(Role::Guidance));
    }

    #[tokio::test]
    async fn test_disallowed_role_is_signed_out() {
        let h = harness();
        account(&h, "clerk@school.edu", "user");
        let mut subscription = h.tab.session.subscribe();

        let err = h
            .facade
            .sign_in(&h.tab, "clerk@school.edu", "password123")
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::UnauthorizedRole);
        assert!(h.tab.session.current().is_none());
        assert_eq!(h.provider.active_sessions(), 0);

        // The rejected session was never published to observers.
        let state = subscription.current();
        assert_eq!(state.event, AuthEvent::InitialSession);
        assert!(state.session.is_none());
    }

    #[tokio::test]
    async fn test_disallowed_role_replaces_previous_session_with_signed_out() {
        let h = harness();
        account(&h, "jane@school.edu", "guidance");
        account(&h, "clerk@school.edu", "user");
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        let mut subscription = h.tab.session.subscribe();

        let err = h
            .facade
            .sign_in(&h.tab, "clerk@school.edu", "password123")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UnauthorizedRole);

        let state = subscription.changed().await.unwrap();
        assert_eq!(state.event, AuthEvent::SignedOut);
        assert!(state.session.is_none());
        assert!(h.tab.session.current().is_none());
    }

    #[tokio::test]
    async fn test_missing_profile_row_is_unauthorized() {
        let h = harness();
        h.provider.with_confirmed_account("new@school.edu", "password123");

        let err = h
            .facade
            .sign_in(&h.tab, "new@school.edu", "password123")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UnauthorizedRole);
    }

    #[tokio::test]
    async fn test_identity_lookup_when_response_has_no_user() {
        let h = harness();
        let id = account(&h, "jane@school.edu", "pastoral");
        h.provider.omit_user_on_sign_in(true);

        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        assert_eq!(h.tab.session.user_id(), Some(id));
    }

    #[tokio::test]
    async fn test_override_lets_disallowed_role_in() {
        let h = harness();
        account(&h, "clerk@school.edu", "user");
        h.tab.dev_override.set(Some(Role::Admin));

        h.facade
            .sign_in(&h.tab, "clerk@school.edu", "password123")
            .await
            .unwrap();

        let profile = h.facade.profile(&h.tab).await.unwrap();
        assert_eq!(profile.role.as_deref(), Some("admin"));
        assert_eq!(profile.first_name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_noop() {
        let h = harness();
        let message = h.facade.sign_out(&h.tab).await.unwrap();
        assert_eq!(message, "Signed out");
        assert_eq!(h.provider.sign_out_calls(), 0);
        assert!(h.tab.session.current().is_none());

        assert!(h.facade.sign_out(&h.tab).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_provider_failure_still_clears() {
        let h = harness();
        account(&h, "jane@school.edu", "student");
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        h.provider.fail_sign_out(true);

        let err = h.facade.sign_out(&h.tab).await.unwrap_err();
        assert_eq!(err.kind(), "provider");
        assert!(h.tab.session.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_with_rejected_token_succeeds() {
        let h = harness();
        account(&h, "jane@school.edu", "student");
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        let token = h.tab.session.access_token().unwrap();
        // Another tab of the same user signed out, revoking this token too.
        h.provider.sign_out(&token).await.unwrap();

        let message = h.facade.sign_out(&h.tab).await.unwrap();
        assert_eq!(message, "Signed out");
        assert_eq!(h.provider.sign_out_calls(), 2);
        assert!(h.tab.session.current().is_none());
        assert!(h.tab.cached_profile().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_with_expired_session_succeeds() {
        let h = harness();
        account(&h, "jane@school.edu", "student");
        h.provider.set_session_ttl(0);
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();

        // The refreshed session is expired as well, so the provider answers 401.
        let message = h.facade.sign_out(&h.tab).await.unwrap();
        assert_eq!(message, "Signed out");
        assert_eq!(h.provider.sign_out_calls(), 1);
        assert!(h.tab.session.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_refreshes_expired_session_first() {
        let h = harness();
        account(&h, "jane@school.edu", "student");
        h.provider.set_session_ttl(0);
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        h.provider.set_session_ttl(3600);

        h.facade.sign_out(&h.tab).await.unwrap();
        assert_eq!(h.provider.sign_out_calls(), 1);
        assert_eq!(h.provider.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_sign_out_with_dead_refresh_token_skips_provider() {
        let h = harness();
        account(&h, "jane@school.edu", "student");
        h.provider.set_session_ttl(0);
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        h.provider.revoke_refresh_tokens();

        assert_eq!(h.facade.sign_out(&h.tab).await.unwrap(), "Signed out");
        assert_eq!(h.provider.sign_out_calls(), 0);
        assert!(h.tab.session.current().is_none());
    }

    #[tokio::test]
    async fn test_profile_fetch_error_is_absent() {
        let h = harness();
        let id = account(&h, "jane@school.edu", "guidance");
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();

        h.data.fail_next(USERS_TABLE, Operation::Select);
        assert!(h.facade.fetch_profile(&h.tab, id).await.is_none());
        assert!(h.facade.fetch_profile(&h.tab, id).await.is_some());
    }

    #[tokio::test]
    async fn test_profile_cache_cleared_on_sign_out() {
        let h = harness();
        account(&h, "jane@school.edu", "guidance");
        h.facade
            .sign_in(&h.tab, "jane@school.edu", "password123")
            .await
            .unwrap();
        assert!(h.facade.profile(&h.tab).await.is_some());
        assert!(h.tab.cached_profile().is_some());

        h.facade.sign_out(&h.tab).await.unwrap();
        assert!(h.tab.cached_profile().is_none());
        assert!(h.facade.refresh_profile(&h.tab).await.is_none());
    }
}
