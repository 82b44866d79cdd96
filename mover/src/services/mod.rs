//! Infrastructure Services
//!
//! - **client**: collaborator traits (fetch, credentials, upload, local files)
//!   and their reqwest / tokio implementations
//! - **config**: migration configuration and process defaults
//! - **errors**: fatal and per-resource error types

pub mod client;
pub mod config;
pub mod errors;
