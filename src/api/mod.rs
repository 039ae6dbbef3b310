//! Content API access

mod client;

pub use client::{ApiClient, API_KEY_HEADER};
