//! Role resolution.

use std::str::FromStr;
use std::sync::{Arc, RwLock};

use boscocare_backend::{DataStore, Query};
use boscocare_core::Role;
use boscocare_models::users::{RoleRow, USERS_TABLE};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Role forced for one tab during local testing.
///
/// Only settable in builds with the `dev-role-override` feature. In any
/// other build the value is always absent.
#[derive(Debug, Default)]
pub struct DevRoleOverride {
    role: RwLock<Option<Role>>,
}

impl DevRoleOverride {
    pub fn get(&self) -> Option<Role> {
        *self.role.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(any(test, feature = "dev-role-override"))]
    pub fn set(&self, role: Option<Role>) {
        *self.role.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = role;
    }
}

/// Looks up the application role of an identity in `users`.
#[derive(Clone)]
pub struct RoleResolver {
    data: Arc<dyn DataStore>,
}

impl RoleResolver {
    pub fn new(data: Arc<dyn DataStore>) -> Self {
        Self { data }
    }

    /// First match wins: the override, then `users.role` keyed by
    /// `auth_user_id`. Lookup failures and unknown role strings resolve to
    /// `None`.
    #[instrument(skip(self, dev_override, token))]
    pub async fn resolve(
        &self,
        dev_override: &DevRoleOverride,
        user_id: Option<Uuid>,
        token: Option<&str>,
    ) -> Option<Role> {
        let user_id = user_id?;

        if let Some(role) = dev_override.get() {
            debug!(%role, "Using dev role override");
            return Some(role);
        }

        let query = Query::new().select("role").eq("auth_user_id", user_id);
        let row = match self.data.select_single(token, USERS_TABLE, &query).await {
            Ok(row) => row,
            Err(e) if e.is_no_rows() => return None,
            Err(e) => {
                error!(error = %e, "Error querying users for role");
                return None;
            }
        };

        let stored = match serde_json::from_value::<RoleRow>(row) {
            Ok(RoleRow { role: Some(role) }) => role,
            Ok(RoleRow { role: None }) => return None,
            Err(e) => {
                error!(error = %e, "Unexpected users row shape");
                return None;
            }
        };

        match Role::from_str(&stored) {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "Ignoring unknown role");
                None
            }
        }
    }
}
