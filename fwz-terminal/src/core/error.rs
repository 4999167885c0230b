//! Terminal error types

use fwz_client::{ClientError, StoreError};
use serde::{Deserialize, Serialize};
use shared::error::{BusinessError, ErrorCategory};
use shared::scan::ScanError;
use thiserror::Error;

/// Failure reported by a vendor SDK (ID-card decoder, ESS checker)
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct VendorFailure {
    pub code: i32,
    pub message: String,
}

impl VendorFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// 读卡桥接错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("设备不支持NFC")]
    NfcUnsupported,

    #[error("请在系统设置中先启用NFC功能")]
    NfcDisabled,

    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorFailure),
}

/// Application error, one variant per source
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Business error: {0}")]
    Business(#[from] BusinessError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Merchant id missing")]
    MissingMerchant,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Client(e) => e.category(),
            Self::Business(e) => e.category(),
            Self::Card(_) => ErrorCategory::Vendor,
            _ => ErrorCategory::Business,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        self.category().forces_login()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let expired: AppError = BusinessError::new("401", "expired").into();
        assert!(expired.is_session_expired());

        let transport: AppError = ClientError::InvalidResponse("eof".into()).into();
        assert_eq!(transport.category(), ErrorCategory::Transport);

        let card: AppError = CardError::NfcDisabled.into();
        assert_eq!(card.category(), ErrorCategory::Vendor);
        assert_eq!(card.to_string(), "Card error: 请在系统设置中先启用NFC功能");
    }
}
