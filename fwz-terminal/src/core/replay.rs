//! Fixture-replaying devices
//!
//! A JSON file describes what the hardware would answer. Used by the `fwz`
//! binary (`--devices`) and by tests. Without a fixture the terminal behaves
//! like a device with no NFC hardware.
//!
//! ```json
//! {
//!   "nfc": { "available": true, "enabled": true },
//!   "tags": [{ "id": "04A1B2" }],
//!   "idCardJson": "{\"name\":\"张三\",\"idNum\":\"440101199001010011\"}",
//!   "socialCard": { "resultCode": 0, "resultInfo": "440100|440101199001010011|张三" },
//!   "ess": { "resultCode": 0, "idNo": "440101199001010011" },
//!   "delayMs": 200
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{EssCheckResult, SocialCardOutcome};

use super::devices::{
    Devices, EssCardChecker, IdCardDecoder, NfcRadio, NfcStatus, NfcTag, QrScanner,
    SocialCardReader,
};
use super::error::{AppError, VendorFailure};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceFixture {
    pub nfc: NfcStatus,
    /// Tags presented to the reader, in order
    pub tags: Vec<NfcTag>,
    /// Tag ids that are not ID cards
    pub foreign_tags: Vec<String>,
    /// Raw JSON returned by the ID-card decoder
    pub id_card_json: Option<String>,
    pub id_card_error: Option<VendorFailure>,
    pub social_card: Option<SocialCardOutcome>,
    pub ess: Option<EssCheckResult>,
    pub ess_error: Option<VendorFailure>,
    /// Next camera scan
    pub qr: Option<String>,
    /// Simulated decode latency
    pub delay_ms: u64,
}

impl DeviceFixture {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }
}

/// Answers every device call from a [`DeviceFixture`]
#[derive(Debug, Default)]
pub struct ReplayDevices {
    fixture: DeviceFixture,
    reader_mode: AtomicBool,
    reads: AtomicUsize,
    serials: std::sync::Mutex<Vec<String>>,
}

impl ReplayDevices {
    pub fn new(fixture: DeviceFixture) -> Arc<Self> {
        Arc::new(Self {
            fixture,
            ..Default::default()
        })
    }

    pub fn fixture(&self) -> &DeviceFixture {
        &self.fixture
    }

    pub fn reader_mode_enabled(&self) -> bool {
        self.reader_mode.load(Ordering::SeqCst)
    }

    /// Number of card decodes started
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Business serials seen by the ID-card decoder
    pub fn serials(&self) -> Vec<String> {
        self.serials.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn devices(self: &Arc<Self>) -> Devices {
        Devices {
            nfc: self.clone(),
            id_card: self.clone(),
            social_card: self.clone(),
            ess: self.clone(),
            scanner: self.clone(),
        }
    }

    async fn latency(&self) {
        if self.fixture.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.fixture.delay_ms)).await;
        }
    }
}

impl Devices {
    /// No NFC hardware, every vendor call fails
    pub fn unavailable() -> Self {
        ReplayDevices::new(DeviceFixture::default()).devices()
    }
}

#[async_trait]
impl NfcRadio for ReplayDevices {
    async fn status(&self) -> NfcStatus {
        self.fixture.nfc
    }

    async fn enable_reader_mode(&self) {
        self.reader_mode.store(true, Ordering::SeqCst);
    }

    async fn disable_reader_mode(&self) {
        self.reader_mode.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdCardDecoder for ReplayDevices {
    fn is_id_card(&self, tag: &NfcTag) -> bool {
        !self.fixture.foreign_tags.contains(&tag.id)
    }

    async fn read_id_card(&self, tag: &NfcTag, busi_serial: &str) -> Result<String, VendorFailure> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut serials) = self.serials.lock() {
            serials.push(busi_serial.to_string());
        }
        tracing::debug!(tag = %tag.id, busi_serial, "Replaying ID card read");
        self.latency().await;

        if let Some(err) = &self.fixture.id_card_error {
            return Err(err.clone());
        }
        self.fixture
            .id_card_json
            .clone()
            .ok_or_else(|| VendorFailure::new(-1, "读卡超时"))
    }
}

#[async_trait]
impl SocialCardReader for ReplayDevices {
    async fn init_params(&self, _url: &str, _platform_id: &str) -> i32 {
        0
    }

    async fn read_card_bas(
        &self,
        tag: &NfcTag,
        card_type: i32,
        scene_code: &str,
    ) -> SocialCardOutcome {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(tag = %tag.id, card_type, scene_code, "Replaying social card read");
        self.latency().await;

        self.fixture
            .social_card
            .clone()
            .unwrap_or_else(|| SocialCardOutcome {
                result_code: -1,
                error_info: "未识别到社保卡".to_string(),
                result_info: String::new(),
            })
    }
}

#[async_trait]
impl EssCardChecker for ReplayDevices {
    async fn init_params(&self, _url: &str, _platform_id: &str) -> Result<i32, VendorFailure> {
        Ok(0)
    }

    async fn check(&self, qr: &str, channel: &str) -> Result<EssCheckResult, VendorFailure> {
        tracing::debug!(qr_len = qr.len(), channel, "Replaying ESS check");
        if let Some(err) = &self.fixture.ess_error {
            return Err(err.clone());
        }
        self.fixture
            .ess
            .clone()
            .ok_or_else(|| VendorFailure::new(-1, "电子社保卡核验服务不可用"))
    }
}

#[async_trait]
impl QrScanner for ReplayDevices {
    async fn scan(&self) -> Option<String> {
        self.fixture.qr.clone()
    }
}
