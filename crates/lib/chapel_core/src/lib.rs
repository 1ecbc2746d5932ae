//! # chapel_core
//!
//! Core domain logic for Chapel: admin principals, token issuance and
//! verification, the authorization gate, and the site's content resources.

pub mod auth;
pub mod content;
pub mod migrate;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
