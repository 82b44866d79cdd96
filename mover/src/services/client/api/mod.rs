//! HTTP operations behind `CloudClient`, one file per concern

pub mod fetch;
pub mod upload;

pub use fetch::fetch_impl;
pub use upload::{acquire_upload_credentials_impl, upload_files_impl};
