use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_activity, create_document, delete_activity, delete_document, list_activities,
    list_documents, pastoral_hub, update_activity, update_document,
};
use crate::state::AppState;

pub fn init_pastoral_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pastoral_hub))
        .route("/activities", get(list_activities).post(create_activity))
        .route(
            "/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
        .route("/sacraments", get(list_documents).post(create_document))
        .route(
            "/sacraments/{id}",
            put(update_document).delete(delete_document),
        )
}
