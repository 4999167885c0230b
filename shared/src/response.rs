//! API Response types
//!
//! Every backend endpoint answers with the same envelope:
//! ```json
//! {
//!     "code": "00000",
//!     "success": true,
//!     "data": { ... },
//!     "msg": "ok"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::BusinessError;

/// 核销成功时服务端返回的 code
pub const VERIFY_OK_CODE: &str = "00000";

/// 会话过期 code
pub const SESSION_EXPIRED_CODE: &str = "401";

/// Code attached locally when a successful envelope carries no `data`.
pub const EMPTY_DATA_CODE: &str = "EMPTY_DATA";

/// Unified API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Business code (`"00000"` on success, `"401"` when the session expired)
    #[serde(default, deserialize_with = "crate::util::lenient::string")]
    pub code: String,
    /// Business success flag; callers branch on this, not on HTTP status
    #[serde(default)]
    pub success: bool,
    /// Payload
    #[serde(default)]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, deserialize_with = "crate::util::lenient::string")]
    pub msg: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: VERIFY_OK_CODE.to_string(),
            success: true,
            data: Some(data),
            msg: "ok".to_string(),
        }
    }

    /// Create a business failure
    pub fn error(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            success: false,
            data: None,
            msg: msg.into(),
        }
    }

    /// `code == "401"`: the token is no longer accepted, force re-login
    pub fn is_session_expired(&self) -> bool {
        self.code == SESSION_EXPIRED_CODE
    }

    /// Message for display, falling back when the server sent none
    pub fn msg_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.msg.trim().is_empty() {
            fallback
        } else {
            &self.msg
        }
    }

    /// Split the envelope into the payload or a [`BusinessError`]
    pub fn into_data(self) -> Result<T, BusinessError> {
        if !self.success {
            return Err(BusinessError::new(self.code, self.msg));
        }
        self.data
            .ok_or_else(|| BusinessError::new(EMPTY_DATA_CODE, self.msg))
    }

    /// Drop the payload, keeping code / success / msg
    pub fn status(&self) -> ApiResponse<()> {
        ApiResponse {
            code: self.code.clone(),
            success: self.success,
            data: None,
            msg: self.msg.clone(),
        }
    }
}
