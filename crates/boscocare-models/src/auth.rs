//! Authentication DTOs.

use boscocare_core::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::Profile;

const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// Roles offered on the sign-up form. The value is stored as account
/// metadata; the application role itself is assigned in `users`.
pub const SIGN_UP_ROLES: [&str; 3] = ["guidance", "pastoral", "student_records"];

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    #[schema(example = "jane@school.edu")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    #[schema(example = "jane@school.edu")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    #[schema(example = "guidance")]
    pub role: String,
}

impl SignUpRequest {
    /// Metadata stored on the new account.
    pub fn metadata(&self) -> Value {
        serde_json::json!({ "role": self.role })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What the sign-in screen needs to render.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthScreen {
    pub sign_up_roles: Vec<String>,
    pub required_message: String,
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self {
            sign_up_roles: SIGN_UP_ROLES.iter().map(|r| r.to_string()).collect(),
            required_message: FILL_ALL_FIELDS.to_string(),
        }
    }
}

/// The tab's current identity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub sign_in_allowed: bool,
    #[schema(value_type = Option<Object>)]
    pub profile: Option<Profile>,
}

impl SessionResponse {
    pub fn signed_out() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            email: None,
            role: None,
            sign_in_allowed: false,
            profile: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DevRoleOverrideRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_missing_fields_fail_validation() {
        let request: SignInRequest = serde_json::from_str(r#"{"email":"jane@school.edu"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let password_errors = &errors.field_errors()["password"];
        assert_eq!(
            password_errors[0].message.as_deref(),
            Some("Please fill in all fields")
        );
    }

    #[test]
    fn test_sign_up_metadata_carries_role() {
        let request = SignUpRequest {
            email: "jane@school.edu".to_string(),
            password: "password123".to_string(),
            role: "guidance".to_string(),
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.metadata(), serde_json::json!({"role": "guidance"}));
    }
}
