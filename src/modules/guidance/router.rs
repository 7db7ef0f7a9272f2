use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    complete_schedule, create_history, create_schedule, delete_history, delete_schedule,
    guidance_hub, list_history, list_schedules, update_history, update_schedule,
};
use crate::state::AppState;

pub fn init_guidance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(guidance_hub))
        .route(
            "/activity-schedule",
            get(list_schedules).post(create_schedule),
        )
        .route(
            "/activity-schedule/{id}",
            put(update_schedule).delete(delete_schedule),
        )
        .route("/activity-schedule/{id}/complete", post(complete_schedule))
        .route("/schedule-history", get(list_history).post(create_history))
        .route(
            "/schedule-history/{id}",
            put(update_history).delete(delete_history),
        )
}
