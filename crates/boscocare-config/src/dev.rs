//! Debug-only switches.
//!
//! `DEV_ROLE_OVERRIDE_ENABLED=true` lets a tab force its resolved role for
//! local testing. The flag is ignored in release builds: `from_env` only reads
//! it when debug assertions are on, and the server additionally needs the
//! `dev-role-override` cargo feature to mount the override routes.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DevConfig {
    pub role_override_enabled: bool,
}

impl DevConfig {
    pub fn from_env() -> Self {
        let requested = std::env::var("DEV_ROLE_OVERRIDE_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self {
            role_override_enabled: cfg!(debug_assertions) && requested,
        }
    }
}
