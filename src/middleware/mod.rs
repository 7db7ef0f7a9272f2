//! Request middleware and the extractors that read what it leaves behind.
//!
//! # Modules
//!
//! - [`tab`]: resolves the `x-tab-token` header to a [`TabContext`], issuing
//!   a new tab when the header is absent or invalid
//! - [`guard`]: the route guard for screens that need a session
//!
//! # Request Flow
//!
//! 1. `tab_middleware` verifies the tab token and attaches the tab
//! 2. `require_session` mounts the route guard on the tab's session store
//! 3. Unauthenticated requests are sent to `/auth`; the rest reach the
//!    handler with a [`SessionUser`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::{guard::SessionUser, tab::CurrentTab};
//!
//! async fn home(CurrentTab(tab): CurrentTab, user: SessionUser) -> impl IntoResponse {
//!     // ...
//! }
//! ```
//!
//! [`TabContext`]: boscocare_auth::TabContext
//! [`SessionUser`]: guard::SessionUser

pub mod guard;
pub mod tab;
