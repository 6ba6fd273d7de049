//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod zuper_http_client;

pub use zuper_http_client::{DEFAULT_ZUPER_API_URL, ZuperHttpClient};
