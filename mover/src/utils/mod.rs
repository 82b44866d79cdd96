//! Helpers shared by the migration components
//!
//! - **url**: resource reference shapes, filename extraction, cache busting
//!   and `data:` URL decoding

pub mod url;

pub use url::*;
