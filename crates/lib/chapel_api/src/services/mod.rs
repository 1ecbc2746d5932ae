//! Service layer between handlers and `chapel_core`.

pub mod auth;
