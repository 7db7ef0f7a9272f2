use axum::{Json, extract::State};
use tracing::instrument;

use super::model::HomeResponse;
use crate::middleware::{guard::SessionUser, tab::CurrentTab};
use crate::state::AppState;

/// Home screen sections for the signed-in role
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Home sections", body = HomeResponse),
        (status = 303, description = "Not signed in, redirect to /auth")
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Screens"
)]
#[instrument(skip(state, tab, user), fields(tab_id = %tab.id))]
pub async fn home(
    State(state): State<AppState>,
    CurrentTab(tab): CurrentTab,
    user: SessionUser,
) -> Json<HomeResponse> {
    let role = state.auth.get_user_role(&tab, user.user_id).await;
    Json(HomeResponse::for_role(user.email, role))
}
