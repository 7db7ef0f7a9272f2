//! Hosted backend configuration.
//!
//! The backend exposes its auth service under `/auth/v1` and its data
//! service under `/rest/v1` of a single project URL. Requests carry the
//! project's public (anon) key; row-level policies on the backend decide what
//! a signed-in user can see.
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL`: Project URL (default: `http://localhost:54321`)
//! - `SUPABASE_ANON_KEY`: Public API key (default: empty)
//! - `BACKEND_TIMEOUT_SECS`: Per-request timeout (default: 15)

use std::env;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("SUPABASE_URL").unwrap_or_else(|_| "http://localhost:54321".to_string()),
            anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            timeout_secs: env_or("BACKEND_TIMEOUT_SECS", 15),
        }
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.base())
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_urls_strip_trailing_slash() {
        let config = BackendConfig {
            url: "https://project.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(config.auth_url(), "https://project.supabase.co/auth/v1");
        assert_eq!(config.rest_url(), "https://project.supabase.co/rest/v1");
    }
}
