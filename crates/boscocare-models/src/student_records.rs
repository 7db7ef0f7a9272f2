//! Student records, grouped on screen by education level.

use boscocare_core::serde::{blank_as_none, lenient_f64};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::records::{RecordTable, Toasts};

pub const EDUCATION_LEVELS: [&str; 4] = ["Elementary", "Junior High", "Senior High", "College"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentRecord {
    pub id: Uuid,
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    pub year_level: String,
    #[serde(default)]
    pub section_program: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub parent_guardian_name: Option<String>,
    #[serde(default)]
    pub parent_contact_number: Option<String>,
    #[serde(default)]
    pub parent_relationship: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub subjects_courses: Option<String>,
    #[serde(default)]
    pub average_grade: Option<f64>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_status() -> String {
    "Active".to_string()
}

fn default_education_level() -> String {
    "Elementary".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StudentRecordForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "student_id is required"))]
    #[schema(example = "2024-00123")]
    pub student_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "year_level is required"))]
    pub year_level: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section_program: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email_address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_guardian_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_contact_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_relationship: Option<String>,
    #[serde(default = "default_status")]
    #[validate(length(min = 1, message = "current_status is required"))]
    pub current_status: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subjects_courses: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schema(value_type = Option<String>, example = "91.5")]
    pub average_grade: Option<f64>,
    #[serde(default = "default_education_level")]
    #[validate(length(min = 1, message = "education_level is required"))]
    pub education_level: String,
}

/// Restricts a student record listing to one education level tab.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EducationLevelFilter {
    pub education_level: Option<String>,
}

pub struct StudentRecords;

impl RecordTable for StudentRecords {
    const TABLE: &'static str = "student_records";
    const ORDER_BY: &'static str = "created_at";
    const ASCENDING: bool = false;
    const TOASTS: Toasts = Toasts {
        fetch_failed: "Failed to fetch student records",
        created: "Record created successfully",
        create_failed: "Failed to create record",
        updated: "Record updated successfully",
        update_failed: "Failed to update record",
        deleted: "Record deleted successfully",
        delete_failed: "Failed to delete record",
        delete_prompt: "Are you sure you want to delete this record?",
    };

    type Row = StudentRecord;
    type Form = StudentRecordForm;
}
