//! Home screen. Hub descriptors for the guidance and pastoral screens live
//! in [`model`] too.

pub mod controller;
pub mod model;
pub mod router;
