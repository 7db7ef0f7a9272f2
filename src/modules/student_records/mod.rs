//! Student records, tabbed by education level.

pub mod controller;
pub mod router;
