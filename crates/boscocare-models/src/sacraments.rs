//! Sacrament documents.

use boscocare_core::serde::blank_as_none;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::records::{RecordTable, Toasts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SacramentDocument {
    pub id: Uuid,
    /// The student's name as entered on the form.
    pub student_id: String,
    pub sacrament_type: String,
    pub document_date: String,
    #[serde(default)]
    pub document_number: Option<String>,
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
pub struct SacramentDocumentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "student_id is required"))]
    #[schema(example = "Maria Santos")]
    pub student_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "sacrament_type is required"))]
    #[schema(example = "Confirmation")]
    pub sacrament_type: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "document_date is required"))]
    pub document_date: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub document_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

pub struct SacramentDocuments;

impl RecordTable for SacramentDocuments {
    const TABLE: &'static str = "sacrament_documents";
    const ORDER_BY: &'static str = "document_date";
    const ASCENDING: bool = false;
    const TOASTS: Toasts = Toasts {
        fetch_failed: "Failed to fetch sacrament documents",
        created: "Document created successfully",
        create_failed: "Failed to create document",
        updated: "Document updated successfully",
        update_failed: "Failed to update document",
        deleted: "Document deleted successfully",
        delete_failed: "Failed to delete document",
        delete_prompt: "Are you sure you want to delete this document?",
    };

    type Row = SacramentDocument;
    type Form = SacramentDocumentForm;
}
