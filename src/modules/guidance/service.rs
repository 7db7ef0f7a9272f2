use anyhow::anyhow;
use boscocare_backend::{DataStore, Query};
use boscocare_core::AppError;
use boscocare_models::{
    ActivitySchedule, ActivitySchedules, MutationResponse, RecordTable, ScheduleHistory,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::metrics::track_schedule_completed;
use crate::middleware::guard::SessionUser;
use crate::modules::records::RecordService;

pub const SCHEDULE_COMPLETED: &str = "Schedule marked as done";
pub const SCHEDULE_COMPLETE_FAILED: &str = "Failed to mark schedule as done";

pub struct GuidanceService;

impl GuidanceService {
    /// Moves a scheduled activity into the history table.
    ///
    /// The history row is written first and the schedule deleted second. The
    /// backend offers no transaction across the two, so a failed delete
    /// removes the new history row again; if that fails too, both ids are
    /// logged for manual cleanup.
    #[instrument(skip(data, user, notes))]
    pub async fn complete_schedule(
        data: &dyn DataStore,
        user: &SessionUser,
        schedule_id: Uuid,
        notes: Option<String>,
    ) -> Result<MutationResponse<ActivitySchedule>, AppError> {
        let result = Self::move_to_history(data, user, schedule_id, notes).await;
        track_schedule_completed(result.is_ok());
        result?;

        info!(%schedule_id, "Schedule marked as done");
        Ok(RecordService::respond::<ActivitySchedules>(
            data,
            user,
            &RecordService::list_query::<ActivitySchedules>(),
            SCHEDULE_COMPLETED,
        )
        .await)
    }

    async fn move_to_history(
        data: &dyn DataStore,
        user: &SessionUser,
        schedule_id: Uuid,
        notes: Option<String>,
    ) -> Result<(), AppError> {
        let created_by = user.require_id()?;
        let token = Some(user.access_token.as_str());

        let query = Query::new().eq("id", schedule_id);
        let row = match data
            .select_single(token, ActivitySchedules::TABLE, &query)
            .await
        {
            Ok(row) => row,
            Err(e) if e.is_no_rows() => {
                return Err(AppError::not_found(anyhow!("Schedule not found")));
            }
            Err(e) => {
                error!(error = %e, "Error reading schedule");
                return Err(completion_failed());
            }
        };
        let schedule: ActivitySchedule = serde_json::from_value(row).map_err(|e| {
            error!(error = %e, "Error decoding schedule");
            completion_failed()
        })?;

        let history = json!({
            "title": schedule.title,
            "description": schedule.description,
            "completed_date": Utc::now().to_rfc3339(),
            "notes": notes,
            "created_by": created_by,
        });
        let inserted = data
            .insert(token, ScheduleHistory::TABLE, &history)
            .await
            .map_err(|e| {
                error!(error = %e, "Error writing schedule history");
                completion_failed()
            })?;

        if let Err(e) = data
            .delete(token, ActivitySchedules::TABLE, schedule_id)
            .await
        {
            error!(error = %e, "Error deleting completed schedule, rolling back history");
            Self::discard_history(data, token, schedule_id, &inserted).await;
            return Err(completion_failed());
        }

        Ok(())
    }

    async fn discard_history(
        data: &dyn DataStore,
        token: Option<&str>,
        schedule_id: Uuid,
        inserted: &Value,
    ) {
        let Some(history_id) = inserted
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| id.parse::<Uuid>().ok())
        else {
            error!(%schedule_id, "History row has no id, schedule is now duplicated in history");
            return;
        };

        if let Err(e) = data.delete(token, ScheduleHistory::TABLE, history_id).await {
            error!(
                %schedule_id,
                %history_id,
                error = %e,
                "Rollback failed, schedule is now duplicated in history"
            );
        }
    }
}

fn completion_failed() -> AppError {
    AppError::bad_gateway(anyhow!(SCHEDULE_COMPLETE_FAILED))
}
