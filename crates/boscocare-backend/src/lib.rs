//! # Boscocare Backend
//!
//! Thin clients for the hosted backend-as-a-service.
//!
//! Boscocare keeps no data of its own. Accounts and sessions live in the
//! hosted auth service and every record lives in the hosted relational store,
//! which enforces row-level policies against the caller's access token. This
//! crate only wraps the calls the application makes:
//!
//! - [`auth`]: the [`AuthProvider`] seam (sign-up, password sign-in, token
//!   refresh, user lookup, sign-out) and its session types
//! - [`data`]: the [`DataStore`] seam (filtered select, single-row select,
//!   insert, update and delete by id) and the [`Query`] builder
//! - [`gotrue`]: HTTP implementation of [`AuthProvider`]
//! - [`postgrest`]: HTTP implementation of [`DataStore`]
//! - `memory`: in-process implementations for tests (`test-utils` feature)
//!
//! # Example
//!
//! ```ignore
//! use boscocare_backend::{GoTrueClient, PostgrestClient, Query};
//! use boscocare_config::BackendConfig;
//!
//! let config = BackendConfig::from_env();
//! let auth = GoTrueClient::new(&config)?;
//! let data = PostgrestClient::new(&config)?;
//!
//! let session = auth.sign_in_with_password("jane@school.edu", "password123").await?;
//! let rows = data
//!     .select(Some(&session.access_token), "pastoral_activities", &Query::new().order("activity_date", false))
//!     .await?;
//! ```

pub mod auth;
pub mod data;
pub mod error;
pub mod gotrue;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgrest;

pub use auth::{AuthProvider, Identity, Session, SignUpOutcome, SignUpRequest};
pub use data::{DataStore, Query};
pub use error::{BackendError, NO_ROWS_CODE};
pub use gotrue::GoTrueClient;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryAuthProvider, MemoryDataStore, Operation};
pub use postgrest::PostgrestClient;
