//! Domain models shared by the API server and the admin client.

pub mod auth;
pub mod content;
pub mod wire;
