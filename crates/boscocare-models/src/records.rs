//! Shared shape of the record screens.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Messages a screen shows for each outcome.
#[derive(Debug, Clone, Copy)]
pub struct Toasts {
    pub fetch_failed: &'static str,
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
    pub delete_prompt: &'static str,
}

/// A backend table edited through a record screen.
pub trait RecordTable: Send + Sync + 'static {
    const TABLE: &'static str;
    /// Column the list is ordered by.
    const ORDER_BY: &'static str;
    const ASCENDING: bool;
    const TOASTS: Toasts;

    type Row: DeserializeOwned + Serialize + Send;
    type Form: Serialize + Validate + Send + Sync;

    /// The form as the row payload sent on insert and update.
    fn payload(form: &Self::Form) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(form)
    }
}

/// Result of a create, update or delete.
///
/// `data` is the list refetched after the write. When that refetch fails the
/// write still stands; `data` is then empty and `warning` carries the fetch
/// failure message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse<T> {
    pub message: String,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    /// Must be `true`; otherwise the confirmation prompt is returned.
    #[serde(default)]
    pub confirm: bool,
}
