//! fwz Client - HTTP client for the merchant backend
//!
//! Provides the REST calls the terminal makes (login, order lists, terminal
//! detail, verification) and the local session store.

pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod store;

pub use config::{ClientConfig, Endpoints};
pub use error::{ClientError, ClientResult};
pub use http::FwzClient;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SessionStore, StoreError};

// Re-export shared types for convenience
pub use shared::response::ApiResponse;
