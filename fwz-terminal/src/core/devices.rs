//! Device seams
//!
//! The terminal talks to four vendor components: the NFC radio, the ID-card
//! decoder, the social-security card reader and the electronic
//! social-security (ESS) QR checker. Each one is a trait so the flows can run
//! against recorded fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{EssCheckResult, SocialCardOutcome};

use super::error::VendorFailure;

/// Opaque handle of a detected NFC tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTag {
    pub id: String,
    /// Technologies reported by the radio (`IsoDep`, `NfcB`, ...)
    #[serde(default)]
    pub techs: Vec<String>,
}

impl NfcTag {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            techs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfcStatus {
    /// Hardware present
    pub available: bool,
    /// Switched on in system settings
    pub enabled: bool,
}

impl NfcStatus {
    pub fn is_ready(&self) -> bool {
        self.available && self.enabled
    }

    pub fn label(&self) -> &'static str {
        match (self.available, self.enabled) {
            (false, _) => "不支持",
            (true, false) => "未启用",
            (true, true) => "可用",
        }
    }
}

#[async_trait]
pub trait NfcRadio: Send + Sync {
    async fn status(&self) -> NfcStatus;
    async fn enable_reader_mode(&self);
    async fn disable_reader_mode(&self);
}

#[async_trait]
pub trait IdCardDecoder: Send + Sync {
    /// Cheap check, no network
    fn is_id_card(&self, tag: &NfcTag) -> bool;

    /// Decode the card; `Ok` carries the vendor JSON string
    async fn read_id_card(&self, tag: &NfcTag, busi_serial: &str) -> Result<String, VendorFailure>;
}

#[async_trait]
pub trait SocialCardReader: Send + Sync {
    /// Returns the vendor status code
    async fn init_params(&self, url: &str, platform_id: &str) -> i32;

    async fn read_card_bas(&self, tag: &NfcTag, card_type: i32, scene_code: &str)
    -> SocialCardOutcome;
}

#[async_trait]
pub trait EssCardChecker: Send + Sync {
    async fn init_params(&self, url: &str, platform_id: &str) -> Result<i32, VendorFailure>;

    async fn check(&self, qr: &str, channel: &str) -> Result<EssCheckResult, VendorFailure>;
}

/// Camera scanner; `None` when the operator cancels
#[async_trait]
pub trait QrScanner: Send + Sync {
    async fn scan(&self) -> Option<String>;
}

/// All device handles used by one terminal
#[derive(Clone)]
pub struct Devices {
    pub nfc: Arc<dyn NfcRadio>,
    pub id_card: Arc<dyn IdCardDecoder>,
    pub social_card: Arc<dyn SocialCardReader>,
    pub ess: Arc<dyn EssCardChecker>,
    pub scanner: Arc<dyn QrScanner>,
}

impl std::fmt::Debug for Devices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Devices").finish_non_exhaustive()
    }
}
