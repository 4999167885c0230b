//! CardBridge - 读卡桥接层
//!
//! 管理 NFC 读卡模式，把识别到的卡片交给对应的厂商 SDK 解码，
//! 并通过 broadcast 通道发布读卡事件。
//!
//! # 状态
//!
//! ```text
//! Off ──start_reading──▶ Idle ──tag──▶ Reading ──done──▶ Idle
//!  ▲                      │                │
//!  └──────stop_reading────┴────────────────┘  (in-flight result discarded)
//! ```
//!
//! While a read is in flight every new tag is ignored.

use std::sync::{Arc, Mutex};

use shared::models::{
    CONTACTLESS_CARD_TYPE, DEFAULT_SCENE_CODE, IdCardInfo, SocialCardRecord,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::devices::{Devices, NfcStatus, NfcTag};
use super::error::CardError;
use crate::events::{
    ACCESS_INFO_HINT, CARD_EVENT_NAME, CardEvent, CardEventStatus, CardKind, CardPayload,
    ERR_ID_CARD_PARSE, ERR_NOT_ID_CARD,
};

/// Broadcast capacity; slow subscribers lag instead of blocking the reader
const EVENT_CAPACITY: usize = 64;

/// Vendor code that means the access credentials were rejected
const VENDOR_ACCESS_DENIED: i32 = 2;

/// Social-card SDK endpoint
#[derive(Debug, Clone)]
pub struct ReaderEndpoint {
    pub url: String,
    pub platform_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// Decode started
    Accepted,
    /// A read is already in flight
    Ignored,
    /// Reader mode is off
    NotListening,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderState {
    Off,
    Idle(CardKind),
    Reading(CardKind),
}

#[derive(Debug)]
struct Slot {
    state: ReaderState,
    /// Bumped by every start/stop so a finishing task can tell it is stale
    generation: u64,
    cancel: Option<CancellationToken>,
}

struct Inner {
    devices: Devices,
    endpoint: ReaderEndpoint,
    tx: broadcast::Sender<CardEvent>,
    slot: Mutex<Slot>,
}

/// Shared handle to the card reader
#[derive(Clone)]
pub struct CardBridge {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CardBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardBridge")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CardBridge {
    pub fn new(devices: Devices, endpoint: ReaderEndpoint) -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                devices,
                endpoint,
                tx,
                slot: Mutex::new(Slot {
                    state: ReaderState::Off,
                    generation: 0,
                    cancel: None,
                }),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CardEvent> {
        self.inner.tx.subscribe()
    }

    pub fn state(&self) -> ReaderState {
        self.lock().state.clone()
    }

    pub async fn check_nfc_available(&self) -> NfcStatus {
        self.inner.devices.nfc.status().await
    }

    /// Enable reader mode for `kind`. Calling it again while enabled only
    /// switches the kind.
    pub async fn start_reading(&self, kind: CardKind) -> Result<(), CardError> {
        let status = self.inner.devices.nfc.status().await;
        if !status.available {
            tracing::warn!("NFC hardware not present");
            return Err(CardError::NfcUnsupported);
        }
        if !status.enabled {
            tracing::warn!("NFC disabled in system settings");
            return Err(CardError::NfcDisabled);
        }

        let was_off = {
            let mut slot = self.lock();
            match slot.state {
                ReaderState::Off => {
                    slot.generation += 1;
                    slot.state = ReaderState::Idle(kind);
                    true
                }
                ReaderState::Idle(_) => {
                    slot.state = ReaderState::Idle(kind);
                    false
                }
                ReaderState::Reading(_) => false,
            }
        };

        if was_off {
            self.inner.devices.nfc.enable_reader_mode().await;
            tracing::info!(?kind, "Reader mode enabled");
        }
        Ok(())
    }

    /// Disable reader mode. An in-flight decode is cancelled and its result
    /// never published.
    pub async fn stop_reading(&self) {
        let was_on = {
            let mut slot = self.lock();
            if let Some(token) = slot.cancel.take() {
                token.cancel();
            }
            let was_on = slot.state != ReaderState::Off;
            slot.state = ReaderState::Off;
            slot.generation += 1;
            was_on
        };

        if was_on {
            self.inner.devices.nfc.disable_reader_mode().await;
            tracing::info!("Reader mode disabled");
        }
    }

    /// Radio callback. Must be called from within a tokio runtime.
    pub fn on_tag_detected(&self, tag: NfcTag) -> TagOutcome {
        let (kind, generation, token) = {
            let mut slot = self.lock();
            let kind = match slot.state {
                ReaderState::Off => return TagOutcome::NotListening,
                ReaderState::Reading(_) => {
                    tracing::debug!(tag = %tag.id, "Read in progress, tag ignored");
                    return TagOutcome::Ignored;
                }
                ReaderState::Idle(kind) => kind,
            };
            let token = CancellationToken::new();
            slot.state = ReaderState::Reading(kind);
            slot.cancel = Some(token.clone());
            (kind, slot.generation, token)
        };

        tracing::info!(tag = %tag.id, ?kind, "Card detected");
        self.emit(CardEvent::new(kind, CardEventStatus::Start));

        let bridge = self.clone();
        tokio::spawn(async move {
            let status = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(?kind, "Read cancelled");
                    return;
                }
                status = bridge.decode(kind, &tag) => status,
            };
            bridge.finish(kind, generation, status);
        });

        TagOutcome::Accepted
    }

    async fn decode(&self, kind: CardKind, tag: &NfcTag) -> CardEventStatus {
        match kind {
            CardKind::IdCard => self.decode_id_card(tag).await,
            CardKind::SocialCard => self.decode_social_card(tag).await,
        }
    }

    async fn decode_id_card(&self, tag: &NfcTag) -> CardEventStatus {
        let decoder = &self.inner.devices.id_card;
        if !decoder.is_id_card(tag) {
            return CardEventStatus::Error {
                code: None,
                message: ERR_NOT_ID_CARD.to_string(),
            };
        }

        // 业务流水号
        let busi_serial = uuid::Uuid::new_v4().simple().to_string();
        tracing::debug!(%busi_serial, "Reading ID card");

        match decoder.read_id_card(tag, &busi_serial).await {
            Ok(raw) => match IdCardInfo::from_vendor_json(&raw) {
                Ok(info) => CardEventStatus::Success(CardPayload::IdCard(Box::new(info))),
                Err(e) => {
                    tracing::warn!(error = %e, "ID card payload unreadable");
                    CardEventStatus::Error {
                        code: None,
                        message: ERR_ID_CARD_PARSE.to_string(),
                    }
                }
            },
            Err(failure) => {
                let mut message = failure.message;
                if failure.code == VENDOR_ACCESS_DENIED {
                    message.push_str(ACCESS_INFO_HINT);
                }
                CardEventStatus::Error {
                    code: Some(failure.code),
                    message,
                }
            }
        }
    }

    async fn decode_social_card(&self, tag: &NfcTag) -> CardEventStatus {
        let reader = &self.inner.devices.social_card;
        let endpoint = &self.inner.endpoint;
        let init = reader.init_params(&endpoint.url, &endpoint.platform_id).await;
        tracing::debug!(init, "Social card reader initialized");

        let outcome = reader
            .read_card_bas(tag, CONTACTLESS_CARD_TYPE, DEFAULT_SCENE_CODE)
            .await;
        if !outcome.is_success() {
            return CardEventStatus::Error {
                code: Some(outcome.result_code),
                message: outcome.error_info,
            };
        }

        match SocialCardRecord::parse(&outcome.result_info) {
            Ok(record) => CardEventStatus::Success(CardPayload::SocialCard(record)),
            Err(e) => CardEventStatus::Error {
                code: Some(outcome.result_code),
                message: e.0,
            },
        }
    }

    fn finish(&self, kind: CardKind, generation: u64, status: CardEventStatus) {
        {
            let mut slot = self.lock();
            if slot.generation != generation || slot.state != ReaderState::Reading(kind) {
                tracing::debug!(?kind, "Stale read result dropped");
                return;
            }
            slot.state = ReaderState::Idle(kind);
            slot.cancel = None;
        }

        match &status {
            CardEventStatus::Error { code, message } => {
                tracing::warn!(?kind, ?code, %message, "Card read failed");
            }
            _ => tracing::info!(?kind, "Card read succeeded"),
        }
        self.emit(CardEvent::new(kind, status));
    }

    fn emit(&self, event: CardEvent) {
        tracing::trace!(name = CARD_EVENT_NAME, payload = %event.to_wire(), "Card event");
        // 没有订阅者时直接丢弃
        let _ = self.inner.tx.send(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
