pub mod auth;
pub mod guidance;
pub mod home;
pub mod pastoral;
pub mod records;
pub mod student_records;

pub use self::auth::controller::ErrorResponse;
pub use self::records::service::RecordService;
