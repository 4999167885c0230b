//! 等待读卡 (刷身份证 / 刷社保卡)
//!
//! Enables the card bridge while focused. A successful read opens the
//! verification list for the card holder's ID number.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use super::next_card_event;
use crate::core::feedback::{MSG_LOGIN_FIRST, MSG_STORE_FAILED, TITLE_ERROR, TITLE_HINT};
use crate::core::{AppContext, Channel, Route, VerificationListParams};
use crate::events::{CardEvent, CardEventStatus, CardKind};

pub struct WaitingCardScreen {
    ctx: Arc<AppContext>,
    kind: CardKind,
    rx: Option<broadcast::Receiver<CardEvent>>,
    reading: bool,
    last_error: Option<String>,
}

impl WaitingCardScreen {
    pub fn new(ctx: Arc<AppContext>, kind: CardKind) -> Self {
        Self {
            ctx,
            kind,
            rx: None,
            reading: false,
            last_error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn prompt(&self) -> &'static str {
        match self.kind {
            CardKind::SocialCard => "请将社保卡放在读卡区域",
            CardKind::IdCard => "请将身份证放在读卡区域",
        }
    }

    /// Spinner text while a read is running
    pub fn reading_text(&self) -> Option<&'static str> {
        self.reading.then_some(match self.kind {
            CardKind::SocialCard => "正在读取社保卡...",
            CardKind::IdCard => "正在读取身份证...",
        })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Subscribe and switch the reader on. False when NFC is not usable.
    pub async fn on_focus(&mut self) -> bool {
        self.rx = Some(self.ctx.bridge().subscribe());
        match self.ctx.bridge().start_reading(self.kind).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(kind = ?self.kind, error = %e, "Reader not started");
                self.ctx.alert(TITLE_HINT, e.to_string());
                false
            }
        }
    }

    pub async fn on_blur(&mut self) {
        self.ctx.bridge().stop_reading().await;
        self.rx = None;
        self.reading = false;
    }

    /// Wait for the next card event of this screen's kind and act on it
    pub async fn next_event(&mut self, wait: Duration) -> Option<CardEvent> {
        let rx = self.rx.as_mut()?;
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let left = deadline.saturating_duration_since(tokio::time::Instant::now());
            let event = next_card_event(rx, left).await?;
            if event.kind == self.kind {
                self.handle_event(&event);
                return Some(event);
            }
        }
    }

    pub fn handle_event(&mut self, event: &CardEvent) {
        match &event.status {
            CardEventStatus::Start => {
                self.reading = true;
                self.last_error = None;
            }
            CardEventStatus::Success(payload) => {
                self.reading = false;
                self.open_list(payload.id_number());
            }
            CardEventStatus::Error { message, .. } => {
                self.reading = false;
                self.last_error = Some(message.clone());
                self.ctx.alert("读卡信息", message.clone());
            }
        }
    }

    fn open_list(&self, id_no: &str) {
        match self.ctx.token() {
            Ok(Some(_)) => {
                tracing::info!(kind = ?self.kind, "Card read, opening verification list");
                self.ctx.navigate(Route::VerificationList(VerificationListParams::id_card(
                    id_no,
                    Channel::Card,
                )));
            }
            Ok(None) => {
                self.ctx.alert(TITLE_HINT, MSG_LOGIN_FIRST);
                self.ctx.navigate(Route::Login);
            }
            Err(e) => {
                tracing::error!(error = %e, "Session store unreadable");
                self.ctx.alert(TITLE_ERROR, MSG_STORE_FAILED);
            }
        }
    }
}
