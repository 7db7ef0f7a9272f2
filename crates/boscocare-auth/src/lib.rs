//! # Boscocare Auth
//!
//! Session handling and role-gated sign-in for the Boscocare API.
//!
//! Each browser tab gets its own [`TabContext`]: a [`SessionStore`] holding the
//! provider session and a [`DevRoleOverride`]. Tabs are identified by signed
//! tab tokens and live in the process-wide [`TabRegistry`].
//!
//! - [`claims`], [`jwt`]: tab token claims, creation and verification
//! - [`session`]: the per-tab session store and its change subscription
//! - [`roles`]: role resolution with the development override
//! - [`facade`]: sign-up, sign-in with allow-list enforcement, sign-out and
//!   profile loading
//! - [`guard`]: the route guard state machine
//! - [`tabs`]: tab contexts and the registry
//!
//! # Sign-in
//!
//! Credential verification and authorization are separate gates. A sign-in
//! with valid credentials whose role is not in the allow-list is signed out
//! again before the call returns:
//!
//! ```ignore
//! match facade.sign_in(&tab, "jane@school.edu", "password123").await {
//!     Ok(message) => println!("{message}"),
//!     Err(AuthError::UnauthorizedRole) => assert!(tab.session.current().is_none()),
//!     Err(err) => eprintln!("{}", err.message()),
//! }
//! ```

pub mod claims;
pub mod error;
pub mod facade;
pub mod guard;
pub mod jwt;
pub mod roles;
pub mod session;
pub mod tabs;

pub use claims::TabClaims;
pub use error::AuthError;
pub use facade::AuthFacade;
pub use guard::{GuardState, RouteGuard, SIGN_IN_PATH};
pub use jwt::{create_tab_token, verify_tab_token};
pub use roles::{DevRoleOverride, RoleResolver};
pub use session::{AuthEvent, SessionState, SessionStore, SessionSubscription};
pub use tabs::{TabContext, TabRegistry};
