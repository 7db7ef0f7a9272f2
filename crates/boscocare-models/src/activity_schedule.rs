//! Upcoming guidance activities.

use boscocare_core::serde::{blank_as_none, lenient_i32};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::records::{RecordTable, Toasts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivitySchedule {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub scheduled_date: String,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ActivityScheduleForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    #[schema(example = "Career orientation")]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "scheduled_date is required"))]
    #[schema(example = "2024-06-14T09:00")]
    pub scheduled_date: String,
    /// Whole minutes; text that is not a number is stored as `null`.
    #[serde(default, deserialize_with = "lenient_i32")]
    #[schema(value_type = Option<String>, example = "90")]
    pub duration_minutes: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
}

pub struct ActivitySchedules;

impl RecordTable for ActivitySchedules {
    const TABLE: &'static str = "guidance_activity_schedule";
    const ORDER_BY: &'static str = "scheduled_date";
    const ASCENDING: bool = true;
    const TOASTS: Toasts = Toasts {
        fetch_failed: "Failed to fetch activity schedules",
        created: "Schedule created successfully",
        create_failed: "Failed to create schedule",
        updated: "Schedule updated successfully",
        update_failed: "Failed to update schedule",
        deleted: "Schedule deleted successfully",
        delete_failed: "Failed to delete schedule",
        delete_prompt: "Are you sure you want to delete this schedule?",
    };

    type Row = ActivitySchedule;
    type Form = ActivityScheduleForm;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_nulls_blank_fields_and_parses_duration() {
        let form: ActivityScheduleForm = serde_json::from_value(json!({
            "title": "Career orientation",
            "description": "",
            "scheduled_date": "2024-06-14T09:00",
            "duration_minutes": "90",
            "location": "  "
        }))
        .unwrap();

        let payload = ActivitySchedules::payload(&form).unwrap();
        assert_eq!(
            payload,
            json!({
                "title": "Career orientation",
                "description": null,
                "scheduled_date": "2024-06-14T09:00",
                "duration_minutes": 90,
                "location": null
            })
        );
    }

    #[test]
    fn test_unparseable_duration_becomes_null() {
        let form: ActivityScheduleForm = serde_json::from_value(json!({
            "title": "Retreat",
            "scheduled_date": "2024-06-14",
            "duration_minutes": "about an hour"
        }))
        .unwrap();
        assert_eq!(form.duration_minutes, None);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let form: ActivityScheduleForm =
            serde_json::from_value(json!({ "scheduled_date": "2024-06-14" })).unwrap();
        assert!(form.validate().is_err());
    }
}
