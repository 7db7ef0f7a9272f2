//! CRUD shared by every record screen.

pub mod service;

pub use service::RecordService;
