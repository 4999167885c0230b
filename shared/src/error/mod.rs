//! Error types shared by the client and the terminal
//!
//! - [`BusinessError`]: a `success=false` envelope turned into a Rust error
//! - [`ErrorCategory`]: how a failure is presented to the operator
//!
//! # Example
//!
//! ```
//! use shared::error::{BusinessError, ErrorCategory};
//!
//! let err = BusinessError::new("401", "token expired");
//! assert!(err.is_session_expired());
//! assert_eq!(err.category(), ErrorCategory::SessionExpired);
//! ```

mod category;

pub use category::ErrorCategory;

use thiserror::Error;

use crate::response::SESSION_EXPIRED_CODE;

/// Business failure reported by the backend (`success=false`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {msg}")]
pub struct BusinessError {
    pub code: String,
    pub msg: String,
}

impl BusinessError {
    pub fn new(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
        }
    }

    /// `code == "401"`
    pub fn is_session_expired(&self) -> bool {
        self.code == SESSION_EXPIRED_CODE
    }

    pub fn category(&self) -> ErrorCategory {
        if self.is_session_expired() {
            ErrorCategory::SessionExpired
        } else {
            ErrorCategory::Business
        }
    }
}
