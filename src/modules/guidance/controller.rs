use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use boscocare_core::AppError;
use boscocare_models::{
    ActivitySchedule, ActivityScheduleForm, ActivitySchedules, CompleteScheduleRequest,
    DeleteParams, MutationResponse, ScheduleHistory, ScheduleHistoryForm, ScheduleHistoryRecord,
};
use tracing::instrument;
use uuid::Uuid;

use super::service::GuidanceService;
use crate::middleware::guard::SessionUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::home::model::HubResponse;
use crate::modules::records::RecordService;
use crate::state::AppState;
use crate::validator::{JsonOrDefault, ValidatedJson};

/// Guidance sub-screens
#[utoipa::path(
    get,
    path = "/guidance",
    responses(
        (status = 200, description = "Guidance hub", body = HubResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
pub async fn guidance_hub() -> Json<HubResponse> {
    Json(HubResponse::guidance())
}

#[utoipa::path(
    get,
    path = "/guidance/activity-schedule",
    responses(
        (status = 200, description = "Upcoming activities, soonest first", body = Vec<ActivitySchedule>),
        (status = 502, description = "Failed to fetch activity schedules", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user))]
pub async fn list_schedules(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<ActivitySchedule>>, AppError> {
    let query = RecordService::list_query::<ActivitySchedules>();
    let rows = RecordService::list::<ActivitySchedules>(state.data.as_ref(), &user, &query).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/guidance/activity-schedule",
    request_body = ActivityScheduleForm,
    responses(
        (status = 201, description = "Schedule created successfully", body = MutationResponse<ActivitySchedule>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to create schedule", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user, form))]
pub async fn create_schedule(
    State(state): State<AppState>,
    user: SessionUser,
    ValidatedJson(form): ValidatedJson<ActivityScheduleForm>,
) -> Result<(StatusCode, Json<MutationResponse<ActivitySchedule>>), AppError> {
    let query = RecordService::list_query::<ActivitySchedules>();
    let response =
        RecordService::create::<ActivitySchedules>(state.data.as_ref(), &user, &form, &query)
            .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/guidance/activity-schedule/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule id")
    ),
    request_body = ActivityScheduleForm,
    responses(
        (status = 200, description = "Schedule updated successfully", body = MutationResponse<ActivitySchedule>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to update schedule", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user, form))]
pub async fn update_schedule(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<ActivityScheduleForm>,
) -> Result<Json<MutationResponse<ActivitySchedule>>, AppError> {
    let query = RecordService::list_query::<ActivitySchedules>();
    let response =
        RecordService::update::<ActivitySchedules>(state.data.as_ref(), &user, id, &form, &query)
            .await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/guidance/activity-schedule/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule id"),
        DeleteParams
    ),
    responses(
        (status = 200, description = "Schedule deleted successfully", body = MutationResponse<ActivitySchedule>),
        (status = 428, description = "Confirmation required", body = ErrorResponse),
        (status = 502, description = "Failed to delete schedule", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MutationResponse<ActivitySchedule>>, AppError> {
    let query = RecordService::list_query::<ActivitySchedules>();
    let response = RecordService::delete::<ActivitySchedules>(
        state.data.as_ref(),
        &user,
        id,
        params.confirm,
        &query,
    )
    .await?;
    Ok(Json(response))
}

/// Mark a scheduled activity as done, moving it into the history
#[utoipa::path(
    post,
    path = "/guidance/activity-schedule/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Schedule id")
    ),
    request_body(content = CompleteScheduleRequest, description = "Optional completion notes"),
    responses(
        (status = 200, description = "Schedule marked as done", body = MutationResponse<ActivitySchedule>),
        (status = 400, description = "Unreadable request body", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse),
        (status = 502, description = "Failed to mark schedule as done", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user, dto))]
pub async fn complete_schedule(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    JsonOrDefault(dto): JsonOrDefault<CompleteScheduleRequest>,
) -> Result<Json<MutationResponse<ActivitySchedule>>, AppError> {
    let response =
        GuidanceService::complete_schedule(state.data.as_ref(), &user, id, dto.notes).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/guidance/schedule-history",
    responses(
        (status = 200, description = "Completed activities, latest first", body = Vec<ScheduleHistoryRecord>),
        (status = 502, description = "Failed to fetch schedule history", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user))]
pub async fn list_history(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<ScheduleHistoryRecord>>, AppError> {
    let query = RecordService::list_query::<ScheduleHistory>();
    let rows = RecordService::list::<ScheduleHistory>(state.data.as_ref(), &user, &query).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/guidance/schedule-history",
    request_body = ScheduleHistoryForm,
    responses(
        (status = 201, description = "History record created successfully", body = MutationResponse<ScheduleHistoryRecord>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to create history record", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user, form))]
pub async fn create_history(
    State(state): State<AppState>,
    user: SessionUser,
    ValidatedJson(form): ValidatedJson<ScheduleHistoryForm>,
) -> Result<(StatusCode, Json<MutationResponse<ScheduleHistoryRecord>>), AppError> {
    let query = RecordService::list_query::<ScheduleHistory>();
    let response =
        RecordService::create::<ScheduleHistory>(state.data.as_ref(), &user, &form, &query).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/guidance/schedule-history/{id}",
    params(
        ("id" = Uuid, Path, description = "History record id")
    ),
    request_body = ScheduleHistoryForm,
    responses(
        (status = 200, description = "History updated successfully", body = MutationResponse<ScheduleHistoryRecord>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to update history", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user, form))]
pub async fn update_history(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<ScheduleHistoryForm>,
) -> Result<Json<MutationResponse<ScheduleHistoryRecord>>, AppError> {
    let query = RecordService::list_query::<ScheduleHistory>();
    let response =
        RecordService::update::<ScheduleHistory>(state.data.as_ref(), &user, id, &form, &query)
            .await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/guidance/schedule-history/{id}",
    params(
        ("id" = Uuid, Path, description = "History record id"),
        DeleteParams
    ),
    responses(
        (status = 200, description = "History record deleted successfully", body = MutationResponse<ScheduleHistoryRecord>),
        (status = 428, description = "Confirmation required", body = ErrorResponse),
        (status = 502, description = "Failed to delete history record", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Guidance"
)]
#[instrument(skip(state, user))]
pub async fn delete_history(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MutationResponse<ScheduleHistoryRecord>>, AppError> {
    let query = RecordService::list_query::<ScheduleHistory>();
    let response = RecordService::delete::<ScheduleHistory>(
        state.data.as_ref(),
        &user,
        id,
        params.confirm,
        &query,
    )
    .await?;
    Ok(Json(response))
}
