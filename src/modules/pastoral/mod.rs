//! Pastoral screens: activities and sacrament documents.

pub mod controller;
pub mod router;
