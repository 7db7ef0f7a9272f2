use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use boscocare_auth::{TabContext, create_tab_token, verify_tab_token};
use boscocare_core::AppError;
use tracing::debug;

use crate::state::AppState;

/// Request and response header carrying the tab token.
pub const TAB_HEADER: &str = "x-tab-token";

/// Attaches the caller's tab to the request.
///
/// A valid token selects its tab, recreated empty if it expired. Without one
/// a new tab is opened and its token is returned in the response header.
pub async fn tab_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(TAB_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|token| verify_tab_token(token, &state.tab_config).ok());

    let (tab, issued) = match presented {
        Some(tab_id) => (state.tabs.get_or_open(tab_id), None),
        None => {
            let tab = state.tabs.open();
            let token = match create_tab_token(tab.id, &state.tab_config) {
                Ok(token) => token,
                Err(err) => return err.into_response(),
            };
            debug!(tab_id = %tab.id, "Issued tab token");
            (tab, Some(token))
        }
    };

    req.extensions_mut().insert(tab);
    let mut response = next.run(req).await;

    if let Some(token) = issued.and_then(|t| HeaderValue::from_str(&t).ok()) {
        response.headers_mut().insert(TAB_HEADER, token);
    }
    response
}

/// The tab attached by [`tab_middleware`].
#[derive(Clone)]
pub struct CurrentTab(pub Arc<TabContext>);

impl<S> FromRequestParts<S> for CurrentTab
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<TabContext>>()
            .cloned()
            .map(CurrentTab)
            .ok_or_else(|| AppError::internal_error("Tab context missing".to_string()))
    }
}
