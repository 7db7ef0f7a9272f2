//! Pastoral activities.

use boscocare_core::serde::{blank_as_none, lenient_i32};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::records::{RecordTable, Toasts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PastoralActivity {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub activity_date: String,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub participants_count: Option<i32>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PastoralActivityForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    #[schema(example = "Lenten recollection")]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "activity_date is required"))]
    pub activity_date: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub activity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    #[schema(value_type = Option<String>, example = "120")]
    pub participants_count: Option<i32>,
}

pub struct PastoralActivities;

impl RecordTable for PastoralActivities {
    const TABLE: &'static str = "pastoral_activities";
    const ORDER_BY: &'static str = "activity_date";
    const ASCENDING: bool = false;
    const TOASTS: Toasts = Toasts {
        fetch_failed: "Failed to fetch activities",
        created: "Activity created successfully",
        create_failed: "Failed to create activity",
        updated: "Activity updated successfully",
        update_failed: "Failed to update activity",
        deleted: "Activity deleted successfully",
        delete_failed: "Failed to delete activity",
        delete_prompt: "Are you sure you want to delete this activity?",
    };

    type Row = PastoralActivity;
    type Form = PastoralActivityForm;
}
