//! # Boscocare Config
//!
//! Configuration types for Boscocare.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`backend`]: Hosted backend (auth + data) location and credentials
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`dev`]: Debug-only switches such as the dev role override
//! - [`server`]: Listener addresses and the public site URL
//! - [`tab`]: Tab token signing configuration
//!
//! # Example
//!
//! ```ignore
//! use boscocare_config::{BackendConfig, CorsConfig, ServerConfig, TabConfig};
//!
//! // Load all configs from environment
//! let backend = BackendConfig::from_env();
//! let cors = CorsConfig::from_env();
//! let server = ServerConfig::from_env();
//! let tabs = TabConfig::from_env();
//! ```

pub mod backend;
pub mod cors;
pub mod dev;
pub mod server;
pub mod tab;

// Re-export commonly used types at crate root
pub use backend::BackendConfig;
pub use cors::CorsConfig;
pub use dev::DevConfig;
pub use server::ServerConfig;
pub use tab::TabConfig;

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
