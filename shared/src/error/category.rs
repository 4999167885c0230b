//! Error category classification

use serde::{Deserialize, Serialize};

/// How a failure surfaces to the operator
///
/// - `Transport`: network or decode failure, shown as a generic retry prompt
/// - `Business`: `success=false`, message shown verbatim
/// - `SessionExpired`: `code == "401"`, session cleared and login forced
/// - `Vendor`: card SDK failure, opaque code + message
///
/// Every category is terminal for the current action; nothing retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Transport,
    Business,
    SessionExpired,
    Vendor,
}

impl ErrorCategory {
    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Business => "business",
            Self::SessionExpired => "session_expired",
            Self::Vendor => "vendor",
        }
    }

    /// Whether the session must be dropped before anything else happens
    pub fn forces_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
