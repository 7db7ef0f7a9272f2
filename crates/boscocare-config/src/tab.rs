use std::env;

use crate::env_or;

/// Signing settings for tab tokens.
#[derive(Clone, Debug)]
pub struct TabConfig {
    pub secret: String,
    /// Lifetime of a tab, in seconds, measured from its last request.
    pub expiry_secs: i64,
}

impl TabConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("TAB_TOKEN_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            expiry_secs: env_or("TAB_TOKEN_EXPIRY", 86400), // 1 day
        }
    }
}
