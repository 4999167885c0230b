//! Shared types for the fwz terminal
//!
//! Wire types of the merchant backend, the local session record, card
//! results and scan payloads. Used by both `fwz-client` and `fwz-terminal`.

pub mod error;
pub mod models;
pub mod response;
pub mod scan;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{BusinessError, ErrorCategory};
pub use response::ApiResponse;
pub use scan::{ScanError, ScanPayload};
