use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{create_record, delete_record, list_records, update_record};
use crate::state::AppState;

pub fn init_student_records_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/{id}", put(update_record).delete(delete_record))
}
