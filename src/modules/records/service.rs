use anyhow::anyhow;
use boscocare_backend::{DataStore, Query};
use boscocare_core::AppError;
use boscocare_models::{MutationResponse, RecordTable};
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::metrics::track_record_mutation;
use crate::middleware::guard::SessionUser;

pub struct RecordService;

impl RecordService {
    /// Full listing in the table's display order.
    pub fn list_query<T: RecordTable>() -> Query {
        Query::new().order(T::ORDER_BY, T::ASCENDING)
    }

    #[instrument(skip(data, user, query), fields(table = T::TABLE))]
    pub async fn list<T: RecordTable>(
        data: &dyn DataStore,
        user: &SessionUser,
        query: &Query,
    ) -> Result<Vec<T::Row>, AppError> {
        let rows = data
            .select(Some(&user.access_token), T::TABLE, query)
            .await
            .map_err(|e| {
                error!(error = %e, "Error fetching records");
                AppError::bad_gateway(anyhow!(T::TOASTS.fetch_failed))
            })?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T::Row>, _>>()
            .map_err(|e| {
                error!(error = %e, "Error decoding records");
                AppError::bad_gateway(anyhow!(T::TOASTS.fetch_failed))
            })
    }

    /// Inserts the form stamped with the caller as `created_by`.
    #[instrument(skip(data, user, form, query), fields(table = T::TABLE))]
    pub async fn create<T: RecordTable>(
        data: &dyn DataStore,
        user: &SessionUser,
        form: &T::Form,
        query: &Query,
    ) -> Result<MutationResponse<T::Row>, AppError> {
        let created_by = user.require_id()?;
        let mut payload = T::payload(form).map_err(AppError::internal)?;
        if let Value::Object(fields) = &mut payload {
            fields.insert("created_by".to_string(), json!(created_by));
        }

        let result = data
            .insert(Some(&user.access_token), T::TABLE, &payload)
            .await;
        track_record_mutation(T::TABLE, "create", result.is_ok());
        if let Err(e) = result {
            error!(error = %e, "Error creating record");
            return Err(AppError::bad_gateway(anyhow!(T::TOASTS.create_failed)));
        }

        info!(%created_by, "Record created");
        Ok(Self::respond::<T>(data, user, query, T::TOASTS.created).await)
    }

    #[instrument(skip(data, user, form, query), fields(table = T::TABLE))]
    pub async fn update<T: RecordTable>(
        data: &dyn DataStore,
        user: &SessionUser,
        id: Uuid,
        form: &T::Form,
        query: &Query,
    ) -> Result<MutationResponse<T::Row>, AppError> {
        let payload = T::payload(form).map_err(AppError::internal)?;

        let result = data
            .update(Some(&user.access_token), T::TABLE, id, &payload)
            .await;
        track_record_mutation(T::TABLE, "update", result.is_ok());
        if let Err(e) = result {
            error!(error = %e, "Error updating record");
            return Err(AppError::bad_gateway(anyhow!(T::TOASTS.update_failed)));
        }

        Ok(Self::respond::<T>(data, user, query, T::TOASTS.updated).await)
    }

    /// Deletes one row. Nothing is sent to the backend until the caller has
    /// confirmed.
    #[instrument(skip(data, user, query), fields(table = T::TABLE))]
    pub async fn delete<T: RecordTable>(
        data: &dyn DataStore,
        user: &SessionUser,
        id: Uuid,
        confirmed: bool,
        query: &Query,
    ) -> Result<MutationResponse<T::Row>, AppError> {
        if !confirmed {
            return Err(AppError::precondition_required(
                T::TOASTS.delete_prompt.to_string(),
            ));
        }

        let result = data.delete(Some(&user.access_token), T::TABLE, id).await;
        track_record_mutation(T::TABLE, "delete", result.is_ok());
        if let Err(e) = result {
            error!(error = %e, "Error deleting record");
            return Err(AppError::bad_gateway(anyhow!(T::TOASTS.delete_failed)));
        }

        Ok(Self::respond::<T>(data, user, query, T::TOASTS.deleted).await)
    }

    /// Success message plus the refetched list. A failed refetch does not
    /// undo the write; it is reported as a warning with an empty list.
    pub async fn respond<T: RecordTable>(
        data: &dyn DataStore,
        user: &SessionUser,
        query: &Query,
        message: &str,
    ) -> MutationResponse<T::Row> {
        match Self::list::<T>(data, user, query).await {
            Ok(rows) => MutationResponse {
                message: message.to_string(),
                data: rows,
                warning: None,
            },
            Err(_) => {
                warn!(table = T::TABLE, "Write succeeded but the refetch failed");
                MutationResponse {
                    message: message.to_string(),
                    data: Vec::new(),
                    warning: Some(T::TOASTS.fetch_failed.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use boscocare_backend::{MemoryDataStore, Operation};
    use boscocare_models::{ActivityScheduleForm, ActivitySchedules, PastoralActivities};

    fn user() -> SessionUser {
        SessionUser {
            user_id: Some(Uuid::new_v4()),
            email: Some("jane@school.edu".to_string()),
            access_token: "access-token".to_string(),
        }
    }

    fn form(title: &str, date: &str) -> ActivityScheduleForm {
        ActivityScheduleForm {
            title: title.to_string(),
            scheduled_date: date.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_stamps_creator_and_refetches_in_order() {
        let store = MemoryDataStore::new();
        let user = user();
        let query = RecordService::list_query::<ActivitySchedules>();

        RecordService::create::<ActivitySchedules>(&store, &user, &form("Later", "2024-07-01"), &query)
            .await
            .unwrap();
        let response = RecordService::create::<ActivitySchedules>(
            &store,
            &user,
            &form("Sooner", "2024-06-01"),
            &query,
        )
        .await
        .unwrap();

        assert_eq!(response.message, "Schedule created successfully");
        let titles: Vec<_> = response.data.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Sooner", "Later"]);
        assert!(response.data.iter().all(|r| r.created_by == user.user_id));
        assert!(store.tokens_seen().iter().all(|t| t.as_deref() == Some("access-token")));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = MemoryDataStore::new();
        let id = store.seed(PastoralActivities::TABLE, json!({"title": "Mass", "activity_date": "2024-05-01"}));

        let err = RecordService::delete::<PastoralActivities>(
            &store,
            &user(),
            id,
            false,
            &RecordService::list_query::<PastoralActivities>(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::PRECONDITION_REQUIRED);
        assert_eq!(err.error.to_string(), "Are you sure you want to delete this activity?");
        assert_eq!(store.rows(PastoralActivities::TABLE).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_insert_reports_toast() {
        let store = MemoryDataStore::new();
        store.fail_next(ActivitySchedules::TABLE, Operation::Insert);

        let err = RecordService::create::<ActivitySchedules>(
            &store,
            &user(),
            &form("Retreat", "2024-06-14"),
            &RecordService::list_query::<ActivitySchedules>(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.error.to_string(), "Failed to create schedule");
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_write() {
        let store = MemoryDataStore::new();
        let id = store.seed(ActivitySchedules::TABLE, json!({"title": "Retreat", "scheduled_date": "2024-06-14"}));
        store.fail_next(ActivitySchedules::TABLE, Operation::Select);

        let response = RecordService::update::<ActivitySchedules>(
            &store,
            &user(),
            id,
            &form("Retreat (moved)", "2024-06-21"),
            &RecordService::list_query::<ActivitySchedules>(),
        )
        .await
        .unwrap();

        assert_eq!(response.message, "Schedule updated successfully");
        assert!(response.data.is_empty());
        assert_eq!(response.warning.as_deref(), Some("Failed to fetch activity schedules"));
        assert_eq!(
            store.rows(ActivitySchedules::TABLE)[0]["title"],
            json!("Retreat (moved)")
        );
    }
}
