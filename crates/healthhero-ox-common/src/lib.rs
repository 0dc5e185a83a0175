#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client abstractions for the healthhero-ox client
//!
//! This crate provides the request-building and stream-framing plumbing used
//! by the API-surface crate, kept separate so the endpoint code stays thin.

pub mod error;
pub mod request_builder;
pub mod streaming;

pub use error::CommonRequestError;
pub use request_builder::{Endpoint, HttpMethod, RequestBuilder, RequestConfig};
pub use streaming::SseParser;

/// Re-export common types for convenience
pub use futures_util::stream::BoxStream;
pub use serde::{Deserialize, Serialize};
