//! # Boscocare Core
//!
//! Core types, errors, and utilities for Boscocare.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`roles`]: The closed set of user roles and the sign-in allow-list
//! - [`serde`]: Lenient deserializers for form-style payloads
//!
//! # Example
//!
//! ```ignore
//! use boscocare_core::{AppError, Role};
//!
//! let role: Role = "guidance".parse()?;
//! if !role.can_sign_in() {
//!     return Err(AppError::forbidden("role not allowed".to_string()));
//! }
//! ```

pub mod errors;
pub mod roles;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use roles::{Role, UnknownRole};
