use anyhow::anyhow;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use boscocare_auth::{AuthError, error::UNAUTHORIZED_ROLE_MESSAGE};
use boscocare_core::{AppError, roles::is_sign_in_allowed};
#[cfg(feature = "dev-role-override")]
use boscocare_models::DevRoleOverrideRequest;
use boscocare_models::{
    AuthScreen, MessageResponse, SessionResponse, SignInRequest, SignUpRequest,
};
use tracing::instrument;
use utoipa::ToSchema;

use crate::metrics::{track_sign_in, track_sign_up};
use crate::middleware::tab::CurrentTab;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Credential failures are 401, a rejected role 403 and anything the
/// provider got wrong 502.
pub fn auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::Credentials(message) => AppError::unauthorized(message),
        AuthError::UnauthorizedRole => AppError::forbidden(UNAUTHORIZED_ROLE_MESSAGE.to_string()),
        AuthError::Provider(message) => AppError::bad_gateway(anyhow!(message)),
    }
}

/// Sign-in screen, or a redirect home when the tab is already signed in
#[utoipa::path(
    get,
    path = "/auth",
    responses(
        (status = 200, description = "Sign-in screen", body = AuthScreen),
        (status = 303, description = "Already signed in, redirect to /")
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(tab), fields(tab_id = %tab.id))]
pub async fn auth_screen(CurrentTab(tab): CurrentTab) -> Response {
    if tab.session.get_session().await.is_some() {
        return Redirect::to("/").into_response();
    }
    Json(AuthScreen::default()).into_response()
}

/// Register an account; it must be verified by email before signing in
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Verification email sent", body = MessageResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 422, description = "A field is empty", body = ErrorResponse),
        (status = 502, description = "The auth provider rejected the sign-up", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignUpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = state
        .auth
        .sign_up(&dto.email, &dto.password, dto.metadata())
        .await;
    track_sign_up(result.is_ok());

    let message = result.map_err(auth_error)?;
    Ok(Json(MessageResponse::new(message)))
}

/// Sign the tab in with email and password
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Role not allowed to sign in", body = ErrorResponse),
        (status = 422, description = "A field is empty", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, tab, dto), fields(tab_id = %tab.id, email = %dto.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    match state.auth.sign_in(&tab, &dto.email, &dto.password).await {
        Ok(message) => {
            track_sign_in("success");
            state.auth.refresh_profile(&tab).await;
            Ok(Json(MessageResponse::new(message)))
        }
        Err(err) => {
            track_sign_in(err.kind());
            Err(auth_error(err))
        }
    }
}

/// End the tab's session
#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 502, description = "Signed out locally, provider sign-out failed", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, tab), fields(tab_id = %tab.id))]
pub async fn sign_out(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.auth.sign_out(&tab).await.map_err(auth_error)?;
    Ok(Json(MessageResponse::new(message)))
}

/// The tab's identity, role and profile
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, tab), fields(tab_id = %tab.id))]
pub async fn current_session(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
) -> Json<SessionResponse> {
    let Some(session) = tab.session.get_session().await else {
        return Json(SessionResponse::signed_out());
    };

    let user_id = session.user_id();
    let role = state.auth.get_user_role(&tab, user_id).await;
    let profile = state.auth.profile(&tab).await;

    Json(SessionResponse {
        authenticated: true,
        user_id,
        email: session.user.as_ref().and_then(|u| u.email.clone()),
        role,
        sign_in_allowed: is_sign_in_allowed(role),
        profile,
    })
}

/// Force a role for this tab (development builds only)
#[cfg(feature = "dev-role-override")]
#[utoipa::path(
    put,
    path = "/auth/dev-role-override",
    request_body = DevRoleOverrideRequest,
    responses(
        (status = 200, description = "Override set", body = MessageResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Development"
)]
#[instrument(skip(state, tab), fields(tab_id = %tab.id))]
pub async fn set_role_override(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
    Json(dto): Json<DevRoleOverrideRequest>,
) -> Json<MessageResponse> {
    tracing::warn!(role = %dto.role, "Dev role override set");
    tab.dev_override.set(Some(dto.role));
    state.auth.refresh_profile(&tab).await;
    Json(MessageResponse::new(format!("Role override set to {}", dto.role)))
}

/// Remove this tab's forced role
#[cfg(feature = "dev-role-override")]
#[utoipa::path(
    delete,
    path = "/auth/dev-role-override",
    responses(
        (status = 200, description = "Override cleared", body = MessageResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Development"
)]
#[instrument(skip(state, tab), fields(tab_id = %tab.id))]
pub async fn clear_role_override(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
) -> Json<MessageResponse> {
    tab.dev_override.set(None);
    state.auth.refresh_profile(&tab).await;
    Json(MessageResponse::new("Role override cleared"))
}
