//! Authenticated HTTP client for API listing and artifact downloads.

mod client;

pub use client::HttpClient;
