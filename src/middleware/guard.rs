use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use boscocare_auth::{GuardState, RouteGuard, SIGN_IN_PATH, TabContext};
use boscocare_backend::Session;
use boscocare_core::AppError;
use serde_json::json;
use uuid::Uuid;

/// The signed-in identity of a guarded request.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub access_token: String,
}

impl SessionUser {
    /// The identity id, required for writes stamped with `created_by`.
    pub fn require_id(&self) -> Result<Uuid, AppError> {
        self.user_id
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
    }
}

impl From<&Session> for SessionUser {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id(),
            email: session.user.as_ref().and_then(|u| u.email.clone()),
            access_token: session.access_token.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
    }
}

/// Lets the request through only when the tab has a live session.
pub async fn require_session(mut req: Request, next: Next) -> Response {
    let Some(tab) = req.extensions().get::<Arc<TabContext>>().cloned() else {
        return AppError::internal_error("Tab context missing".to_string()).into_response();
    };

    match RouteGuard::mount(&tab.session).await.into_state() {
        GuardState::Authenticated(session) => {
            req.extensions_mut().insert(SessionUser::from(&session));
            next.run(req).await
        }
        GuardState::Loading | GuardState::Unauthenticated => {
            sign_in_redirect(wants_json(&req))
        }
    }
}

fn wants_json(req: &Request) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// `303` to the sign-in screen, or a `401` naming it for JSON clients.
pub fn sign_in_redirect(json_client: bool) -> Response {
    if json_client {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Authentication required",
                "redirect": SIGN_IN_PATH,
            })),
        )
            .into_response()
    } else {
        Redirect::to(SIGN_IN_PATH).into_response()
    }
}
