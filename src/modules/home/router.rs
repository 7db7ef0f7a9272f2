use axum::{Router, routing::get};

use super::controller::home;
use crate::state::AppState;

pub fn init_home_router() -> Router<AppState> {
    Router::new().route("/", get(home))
}
