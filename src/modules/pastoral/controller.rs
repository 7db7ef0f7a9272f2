use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use boscocare_core::AppError;
use boscocare_models::{
    DeleteParams, MutationResponse, PastoralActivities, PastoralActivity, PastoralActivityForm,
    SacramentDocument, SacramentDocumentForm, SacramentDocuments,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::guard::SessionUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::home::model::HubResponse;
use crate::modules::records::RecordService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Pastoral sub-screens
#[utoipa::path(
    get,
    path = "/pastoral",
    responses(
        (status = 200, description = "Pastoral hub", body = HubResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
pub async fn pastoral_hub() -> Json<HubResponse> {
    Json(HubResponse::pastoral())
}

#[utoipa::path(
    get,
    path = "/pastoral/activities",
    responses(
        (status = 200, description = "Activities, latest first", body = Vec<PastoralActivity>),
        (status = 502, description = "Failed to fetch activities", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user))]
pub async fn list_activities(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<PastoralActivity>>, AppError> {
    let query = RecordService::list_query::<PastoralActivities>();
    let rows = RecordService::list::<PastoralActivities>(state.data.as_ref(), &user, &query).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/pastoral/activities",
    request_body = PastoralActivityForm,
    responses(
        (status = 201, description = "Activity created successfully", body = MutationResponse<PastoralActivity>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to create activity", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user, form))]
pub async fn create_activity(
    State(state): State<AppState>,
    user: SessionUser,
    ValidatedJson(form): ValidatedJson<PastoralActivityForm>,
) -> Result<(StatusCode, Json<MutationResponse<PastoralActivity>>), AppError> {
    let query = RecordService::list_query::<PastoralActivities>();
    let response =
        RecordService::create::<PastoralActivities>(state.data.as_ref(), &user, &form, &query).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/pastoral/activities/{id}",
    params(
        ("id" = Uuid, Path, description = "Activity id")
    ),
    request_body = PastoralActivityForm,
    responses(
        (status = 200, description = "Activity updated successfully", body = MutationResponse<PastoralActivity>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to update activity", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user, form))]
pub async fn update_activity(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<PastoralActivityForm>,
) -> Result<Json<MutationResponse<PastoralActivity>>, AppError> {
    let query = RecordService::list_query::<PastoralActivities>();
    let response =
        RecordService::update::<PastoralActivities>(state.data.as_ref(), &user, id, &form, &query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/pastoral/activities/{id}",
    params(
        ("id" = Uuid, Path, description = "Activity id"),
        DeleteParams
    ),
    responses(
        (status = 200, description = "Activity deleted successfully", body = MutationResponse<PastoralActivity>),
        (status = 428, description = "Confirmation required", body = ErrorResponse),
        (status = 502, description = "Failed to delete activity", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user))]
pub async fn delete_activity(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MutationResponse<PastoralActivity>>, AppError> {
    let query = RecordService::list_query::<PastoralActivities>();
    let response = RecordService::delete::<PastoralActivities>(
        state.data.as_ref(),
        &user,
        id,
        params.confirm,
        &query,
    )
    .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/pastoral/sacraments",
    responses(
        (status = 200, description = "Sacrament documents, latest first", body = Vec<SacramentDocument>),
        (status = 502, description = "Failed to fetch sacrament documents", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user))]
pub async fn list_documents(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<SacramentDocument>>, AppError> {
    let query = RecordService::list_query::<SacramentDocuments>();
    let rows = RecordService::list::<SacramentDocuments>(state.data.as_ref(), &user, &query).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/pastoral/sacraments",
    request_body = SacramentDocumentForm,
    responses(
        (status = 201, description = "Document created successfully", body = MutationResponse<SacramentDocument>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to create document", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user, form))]
pub async fn create_document(
    State(state): State<AppState>,
    user: SessionUser,
    ValidatedJson(form): ValidatedJson<SacramentDocumentForm>,
) -> Result<(StatusCode, Json<MutationResponse<SacramentDocument>>), AppError> {
    let query = RecordService::list_query::<SacramentDocuments>();
    let response =
        RecordService::create::<SacramentDocuments>(state.data.as_ref(), &user, &form, &query).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/pastoral/sacraments/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    request_body = SacramentDocumentForm,
    responses(
        (status = 200, description = "Document updated successfully", body = MutationResponse<SacramentDocument>),
        (status = 422, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Failed to update document", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user, form))]
pub async fn update_document(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<SacramentDocumentForm>,
) -> Result<Json<MutationResponse<SacramentDocument>>, AppError> {
    let query = RecordService::list_query::<SacramentDocuments>();
    let response =
        RecordService::update::<SacramentDocuments>(state.data.as_ref(), &user, id, &form, &query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/pastoral/sacraments/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id"),
        DeleteParams
    ),
    responses(
        (status = 200, description = "Document deleted successfully", body = MutationResponse<SacramentDocument>),
        (status = 428, description = "Confirmation required", body = ErrorResponse),
        (status = 502, description = "Failed to delete document", body = ErrorResponse)
    ),
    security(
        ("tab_token" = [])
    ),
    tag = "Pastoral"
)]
#[instrument(skip(state, user))]
pub async fn delete_document(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MutationResponse<SacramentDocument>>, AppError> {
    let query = RecordService::list_query::<SacramentDocuments>();
    let response = RecordService::delete::<SacramentDocuments>(
        state.data.as_ref(),
        &user,
        id,
        params.confirm,
        &query,
    )
    .await?;
    Ok(Json(response))
}
