//! Sign-in screen: sign-up, sign-in, sign-out and the tab's session.

pub mod controller;
pub mod router;
