//! # Boscocare API
//!
//! A role-gated school administration service built with Rust and Axum. It
//! covers guidance scheduling, pastoral activities, sacrament documents and
//! student records, with all accounts and data held by a hosted auth and
//! data service.
//!
//! ## Overview
//!
//! Boscocare sits between the browser and the hosted backend. It keeps each
//! browser tab's session on the server, decides which screens the tab may
//! reach, and forwards record reads and writes with the tab's access token so
//! the backend's row-level policies apply.
//!
//! - **Tabs**: every browser tab is identified by a signed `x-tab-token`
//! - **Sign-in**: password sign-in followed by a role check; roles outside
//!   the allow-list are signed out again immediately
//! - **Route guard**: screens redirect to `/auth` without a live session
//! - **Record screens**: list, create, update and confirm-then-delete for
//!   each table
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/          # Tab resolution and the route guard
//! ├── modules/             # Feature modules
//! │   ├── auth/           # Sign-up, sign-in, sign-out, session
//! │   ├── home/           # Home sections and hub descriptors
//! │   ├── guidance/       # Activity schedule and schedule history
//! │   ├── pastoral/       # Pastoral activities and sacrament documents
//! │   ├── student_records/
//! │   └── records/        # CRUD shared by every record screen
//! ├── docs.rs              # OpenAPI document
//! ├── logging.rs           # Tracing setup and request logging
//! ├── metrics.rs           # Prometheus metrics
//! ├── router.rs
//! └── state.rs
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic, where a screen has more than CRUD
//! - `model.rs`: Screen-specific response types
//! - `router.rs`: Axum router configuration
//!
//! ## Roles
//!
//! | Role | Signs in | Home section |
//! |------|----------|--------------|
//! | `guidance` | yes | Guidance |
//! | `pastoral` | yes | Pastoral |
//! | `student` | yes | Student Records |
//! | `admin`, `superadmin` | yes | none |
//! | `user`, `accounting`, `registrar` | no | |
//!
//! ## Quick Start
//!
//! ### Environment Variables
//!
//! ```bash
//! SUPABASE_URL=https://project.supabase.co
//! SUPABASE_ANON_KEY=your-anon-key
//! SITE_URL=http://localhost:3000
//! TAB_TOKEN_SECRET=your-secure-secret-key
//! ```
//!
//! ### API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`
//!
//! ## Modules
//!
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Tracing subscriber and request logging
//! - [`metrics`]: Prometheus metrics endpoint
//! - [`middleware`]: Tab and session middleware
//! - [`modules`]: Feature modules
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`validator`]: Request validation utilities

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use boscocare_auth;
pub use boscocare_backend;
pub use boscocare_config;
pub use boscocare_core;
pub use boscocare_models;
