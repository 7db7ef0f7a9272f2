//! # Boscocare Models
//!
//! Rows, forms and DTOs for the Boscocare API.
//!
//! Every record screen is backed by one table. Each table module provides the
//! row as returned by the data service, the form a screen submits, and a
//! marker type implementing [`RecordTable`] that ties the two together with
//! the table name, list ordering and the messages shown to the user.
//!
//! # Modules
//!
//! - [`auth`]: Sign-up, sign-in and session DTOs
//! - [`records`]: The [`RecordTable`] trait and mutation responses
//! - [`users`]: Profiles and role lookups
//! - [`activity_schedule`], [`schedule_history`]: Guidance tables
//! - [`pastoral_activities`], [`sacraments`]: Pastoral tables
//! - [`student_records`]: Student records
//!
//! # Example
//!
//! ```ignore
//! use boscocare_models::{ActivitySchedules, RecordTable};
//!
//! assert_eq!(ActivitySchedules::TABLE, "guidance_activity_schedule");
//! let payload = ActivitySchedules::payload(&form)?;
//! ```

pub mod activity_schedule;
pub mod auth;
pub mod pastoral_activities;
pub mod records;
pub mod sacraments;
pub mod schedule_history;
pub mod student_records;
pub mod users;

pub use activity_schedule::{ActivitySchedule, ActivityScheduleForm, ActivitySchedules};
pub use auth::{
    AuthScreen, DevRoleOverrideRequest, MessageResponse, SessionResponse, SignInRequest,
    SignUpRequest,
};
pub use pastoral_activities::{PastoralActivities, PastoralActivity, PastoralActivityForm};
pub use records::{DeleteParams, MutationResponse, RecordTable, Toasts};
pub use sacraments::{SacramentDocument, SacramentDocumentForm, SacramentDocuments};
pub use schedule_history::{
    CompleteScheduleRequest, ScheduleHistory, ScheduleHistoryForm, ScheduleHistoryRecord,
};
pub use student_records::{
    EducationLevelFilter, StudentRecord, StudentRecordForm, StudentRecords,
};
pub use users::{Profile, RoleRow};
