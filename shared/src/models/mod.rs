//! Data models
//!
//! Wire types for the merchant backend plus the local session record.
//! Field names follow the backend's camelCase JSON.

pub mod auth;
pub mod idcard;
pub mod order;
pub mod session;
pub mod social_card;
pub mod terminal;
pub mod verification;

// Re-exports
pub use auth::*;
pub use idcard::*;
pub use order::*;
pub use session::*;
pub use social_card::*;
pub use terminal::*;
pub use verification::*;
