//! Tab token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a tab token.
///
/// The token only names the tab; the session itself never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabClaims {
    /// Tab ID (subject claim)
    pub sub: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
