#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Async client for the Health Hero backend (`/api/v1`): user accounts,
//! health/exercise/sleep record CRUD, analytics queries, and the AI chat
//! assistant with both buffered and server-sent streaming endpoints.

pub mod analytics;
pub mod chat;
pub mod client;
pub mod error;
pub mod prelude;
pub mod records;
pub mod session;
pub mod users;

// Re-export main types
pub use chat::{
    CHAT_UNAVAILABLE_MESSAGE, ChatReply, ChatRequest, ChatSink, ChatStreamSession, StreamFrame,
};
pub use client::HealthHero;
pub use error::HealthHeroRequestError;
pub use session::{MemorySession, SessionProvider};
