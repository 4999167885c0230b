//! 身份证读取演示

use std::sync::Arc;
use std::time::Duration;

use shared::models::{IdCardInfo, IdCardType};
use tokio::sync::broadcast;

use super::next_card_event;
use crate::core::feedback::{TITLE_ERROR, TITLE_HINT};
use crate::core::{AppContext, NfcStatus};
use crate::events::{CardEvent, CardEventStatus, CardKind, CardPayload};

pub struct IdCardDemoScreen {
    ctx: Arc<AppContext>,
    rx: Option<broadcast::Receiver<CardEvent>>,
    nfc: NfcStatus,
    status: String,
    info: Option<IdCardInfo>,
}

impl IdCardDemoScreen {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            rx: None,
            nfc: NfcStatus::default(),
            status: "准备就绪".to_string(),
            info: None,
        }
    }

    pub fn nfc(&self) -> NfcStatus {
        self.nfc
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn info(&self) -> Option<&IdCardInfo> {
        self.info.as_ref()
    }

    pub async fn on_mount(&mut self) {
        self.nfc = self.ctx.bridge().check_nfc_available().await;
        tracing::debug!(available = self.nfc.available, enabled = self.nfc.enabled, "NFC status");
    }

    pub async fn start(&mut self) -> bool {
        self.nfc = self.ctx.bridge().check_nfc_available().await;
        if !self.nfc.available {
            self.ctx.alert(TITLE_ERROR, "设备不支持NFC功能");
            return false;
        }
        if !self.nfc.enabled {
            self.ctx.alert(TITLE_HINT, "请先在系统设置中启用NFC功能");
            return false;
        }

        self.status = "启动身份证读取模式...".to_string();
        self.rx = Some(self.ctx.bridge().subscribe());
        match self.ctx.bridge().start_reading(CardKind::IdCard).await {
            Ok(()) => {
                self.status = "请将身份证贴近设备背面".to_string();
                true
            }
            Err(e) => {
                self.status = "启动失败".to_string();
                self.rx = None;
                self.ctx.alert(TITLE_ERROR, format!("启动身份证读取失败: {e}"));
                false
            }
        }
    }

    pub async fn stop(&mut self) {
        self.ctx.bridge().stop_reading().await;
        self.rx = None;
        self.status = "已停止读取".to_string();
    }

    pub async fn next_event(&mut self, wait: Duration) -> Option<CardEvent> {
        let rx = self.rx.as_mut()?;
        let event = next_card_event(rx, wait).await?;
        if event.kind == CardKind::IdCard {
            self.handle_event(&event);
        }
        Some(event)
    }

    pub fn handle_event(&mut self, event: &CardEvent) {
        match &event.status {
            CardEventStatus::Start => {
                self.status = "正在读取身份证...".to_string();
                self.info = None;
            }
            CardEventStatus::Success(CardPayload::IdCard(info)) => {
                self.status = "读取成功".to_string();
                self.info = Some((**info).clone());
            }
            CardEventStatus::Success(CardPayload::SocialCard(_)) => {}
            CardEventStatus::Error { message, .. } => {
                self.status = format!("读取失败: {message}");
                let shown = if message.is_empty() { "未知错误" } else { message.as_str() };
                self.ctx.alert("读取失败", shown);
            }
        }
    }

    /// 身份证信息 rows; type-specific rows follow the common ones
    pub fn info_rows(&self) -> Vec<(&'static str, String)> {
        let Some(info) = &self.info else {
            return Vec::new();
        };
        let mut rows = vec![
            ("姓名", info.name.clone()),
            ("性别", info.gender.clone()),
            ("民族", info.nation.clone()),
            ("出生日期", info.formatted_birthday()),
            ("住址", info.address.clone()),
            ("身份证号", info.id_num.clone()),
            ("签发机关", info.issue_org.clone()),
            ("有效期限", info.validity()),
        ];
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match info.card_type() {
            IdCardType::Foreigner => {
                rows.push(("国籍", opt(&info.nationality)));
                rows.push(("英文姓名", opt(&info.english_name)));
            }
            IdCardType::HongKongMacauTaiwan => {
                rows.push(("签发次数", opt(&info.sign_count)));
                rows.push(("通行证号", opt(&info.pass_num)));
            }
            IdCardType::Resident => rows.push(("DN", opt(&info.dn))),
        }
        match info.photo_bytes() {
            Some(Ok(bytes)) => rows.push(("照片", format!("{} 字节", bytes.len()))),
            Some(Err(e)) => tracing::warn!(error = %e, "ID card photo undecodable"),
            None => {}
        }
        rows
    }
}
