//! Completed guidance activities.

use boscocare_core::serde::blank_as_none;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::records::{RecordTable, Toasts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleHistoryRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScheduleHistoryForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "completed_date is required"))]
    pub completed_date: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

/// Optional notes recorded when a scheduled activity is marked as done.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CompleteScheduleRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

pub struct ScheduleHistory;

impl RecordTable for ScheduleHistory {
    const TABLE: &'static str = "guidance_schedule_history";
    const ORDER_BY: &'static str = "completed_date";
    const ASCENDING: bool = false;
    const TOASTS: Toasts = Toasts {
        fetch_failed: "Failed to fetch schedule history",
        created: "History record created successfully",
        create_failed: "Failed to create history record",
        updated: "History updated successfully",
        update_failed: "Failed to update history",
        deleted: "History record deleted successfully",
        delete_failed: "Failed to delete history record",
        delete_prompt: "Are you sure you want to delete this history record?",
    };

    type Row = ScheduleHistoryRecord;
    type Form = ScheduleHistoryForm;
}
