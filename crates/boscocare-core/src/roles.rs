//! User roles.
//!
//! Roles are stored as plain strings in the `users.role` column. Parsing them
//! into [`Role`] happens at the edge; everything past that point compares
//! enum values. [`Role::can_sign_in`] is the one place the sign-in allow-list
//! is defined.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Accounting,
    Registrar,
    Admin,
    Superadmin,
    Student,
    Pastoral,
    Guidance,
}

/// Roles permitted to complete a sign-in.
pub const SIGN_IN_ALLOWED: [Role; 5] = [
    Role::Student,
    Role::Guidance,
    Role::Pastoral,
    Role::Admin,
    Role::Superadmin,
];

impl Role {
    pub const ALL: [Role; 8] = [
        Role::User,
        Role::Accounting,
        Role::Registrar,
        Role::Admin,
        Role::Superadmin,
        Role::Student,
        Role::Pastoral,
        Role::Guidance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Accounting => "accounting",
            Role::Registrar => "registrar",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
            Role::Student => "student",
            Role::Pastoral => "pastoral",
            Role::Guidance => "guidance",
        }
    }

    pub fn can_sign_in(self) -> bool {
        SIGN_IN_ALLOWED.contains(&self)
    }
}

/// Gate for a role that may be absent (no profile row, unknown string).
pub fn is_sign_in_allowed(role: Option<Role>) -> bool {
    role.is_some_and(Role::can_sign_in)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
