//! Guidance screens: the activity schedule, its history, and the transition
//! that moves a schedule into history once it has taken place.

pub mod controller;
pub mod router;
pub mod service;
