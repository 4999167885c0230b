//! Client configuration

use std::time::Duration;

/// Production backend
pub const DEFAULT_BASE_URL: &str = "https://yktlycs.e-tecsun.com";

/// Image host prefixed to relative picture paths
pub const DEFAULT_PIC_URL: &str = "https://yktlyimcs.e-tecsun.com/mall4cloud";

/// API paths, relative to the base URL
pub struct Endpoints;

impl Endpoints {
    pub const LOGIN: &'static str = "/mall4cloud_auth/ua/login";
    pub const MERCHANT_ORDER: &'static str = "/mall4cloud_order/m/merchantOrder/pageMerchantOrder";
    pub const TERMINAL_DETAIL: &'static str = "/mall4cloud_multishop/terminal/getTerminalDetail";
    pub const VERIFICATION_ORDER: &'static str =
        "/mall4cloud_order/m/merchantOrder/pageVerificationOrder";
    pub const VERIFICATION_INFO: &'static str = "/mall4cloud_order/m/merchantOrder/verificationInfo";
    pub const VERIFICATION: &'static str = "/mall4cloud_order/m/merchantOrder/verification";
    pub const GET_VERIFICATION_ORDER: &'static str =
        "/mall4cloud_order/m/merchantOrder/getVerificationOrder";
}

/// Client configuration for connecting to the merchant backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://yktlycs.e-tecsun.com")
    pub base_url: String,

    /// Request timeout. `None` leaves requests unbounded, the terminal
    /// relies on the operator abandoning a stuck call.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Join the base URL and an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let config = ClientConfig::new("http://127.0.0.1:9000/");
        assert_eq!(
            config.url(Endpoints::LOGIN),
            "http://127.0.0.1:9000/mall4cloud_auth/ua/login"
        );
    }

    #[test]
    fn test_default_has_no_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
