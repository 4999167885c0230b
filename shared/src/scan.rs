//! QR scan payload classification
//!
//! Order QR codes look like `1568758870_8780-0` (order id, `_`, ticket code).
//! Anything without `_` is an electronic social-security card QR code.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("扫码结果为空")]
    Empty,

    #[error("无法识别的二维码格式")]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPayload {
    OrderTicket { order_id: String, ticket_code: String },
    SocialSecurityQr(String),
}

impl ScanPayload {
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScanError::Empty);
        }
        match raw.split_once('_') {
            Some((order_id, ticket_code)) => {
                if order_id.is_empty() {
                    return Err(ScanError::Unrecognized);
                }
                Ok(Self::OrderTicket {
                    order_id: order_id.to_string(),
                    ticket_code: ticket_code.to_string(),
                })
            }
            None => Ok(Self::SocialSecurityQr(raw.to_string())),
        }
    }
}
