use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use boscocare_backend::Query as RecordQuery;
use boscocare_core::AppError;
use boscocare_models::{
    DeleteParams, EducationLevelFilter, MutationResponse, StudentRecord, StudentRecordForm,
    StudentRecords,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::guard::SessionUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::records::RecordService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Newest first, limited to one education level when the filter names one.
/// Mutations refetch through the same filter so the open tab stays current.
fn filtered(filter: &EducationLevelFilter) -> RecordQuery {
    let query = RecordService::list_query::<StudentRecords>();
    match filter.education_level.as_deref().map(str::trim) {
        Some(level) if !level.is_empty() => query.eq("education_level", level),
        _ => query,
    }
}

#[utoipa::path(
    get,
    path = "/student-records",
    params(
        EducationLevelFilter
    ),
    responses(
        (status = 200, description = "Student records, newest first", body = Vec<StudentRecord>),
        (status = 502, description = "Failed to fetch student records", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Student Records"
)]
#[instrument(skip(state, user))]
pub async fn list_records(
    State(state): State<AppState>,
    user: SessionUser,
    Query(filter): Query<EducationLevelFilter>,
) -> Result<Json<Vec<StudentRecord>>, AppError> {
    let rows =
        RecordService::list::<StudentRecords>(state.data.as_ref(), &user, &filtered(&filter))
            .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/student-records",
    params(
        EducationLevelFilter
    ),
    request_body = StudentRecordForm,
    responses(
        (status = 201, description = "Record created successfully", body = MutationResponse<StudentRecord>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to create record", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Student Records"
)]
#[instrument(skip(state, user, form))]
pub async fn create_record(
    State(state): State<AppState>,
    user: SessionUser,
    Query(filter): Query<EducationLevelFilter>,
    ValidatedJson(form): ValidatedJson<StudentRecordForm>,
) -> Result<(StatusCode, Json<MutationResponse<StudentRecord>>), AppError> {
    let response = RecordService::create::<StudentRecords>(
        state.data.as_ref(),
        &user,
        &form,
        &filtered(&filter),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/student-records/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id"),
        EducationLevelFilter
    ),
    request_body = StudentRecordForm,
    responses(
        (status = 200, description = "Record updated successfully", body = MutationResponse<StudentRecord>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to update record", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Student Records"
)]
#[instrument(skip(state, user, form))]
pub async fn update_record(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(filter): Query<EducationLevelFilter>,
    ValidatedJson(form): ValidatedJson<StudentRecordForm>,
) -> Result<Json<MutationResponse<StudentRecord>>, AppError> {
    let response = RecordService::update::<StudentRecords>(
        state.data.as_ref(),
        &user,
        id,
        &form,
        &filtered(&filter),
    )
    .await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/student-records/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id"),
        DeleteParams,
        EducationLevelFilter
    ),
    responses(
        (status = 200, description = "Record deleted successfully", body = MutationResponse<StudentRecord>),
        (status = 428, description = "Confirmation required", body = ErrorResponse),
        (status = 502, description = "Failed to delete record", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Student Records"
)]
#[instrument(skip(state, user))]
pub async fn delete_record(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
    Query(filter): Query<EducationLevelFilter>,
) -> Result<Json<MutationResponse<StudentRecord>>, AppError> {
    let response = RecordService::delete::<StudentRecords>(
        state.data.as_ref(),
        &user,
        id,
        params.confirm,
        &filtered(&filter),
    )
    .await?;
    Ok(Json(response))
}
