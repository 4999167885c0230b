//! 首页
//!
//! Terminal info card plus the entry points: 扫码核销, 刷身份证, 刷社保卡,
//! 订单查询 and 退出登录.

use std::sync::Arc;

use shared::models::TerminalDetail;

use super::scan::{ScanTarget, scan_and_open};
use crate::core::{AppContext, AppError, Route};
use crate::events::CardKind;

pub struct HomeScreen {
    ctx: Arc<AppContext>,
    terminal: Option<TerminalDetail>,
}

impl HomeScreen {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            terminal: None,
        }
    }

    pub fn terminal(&self) -> Option<&TerminalDetail> {
        self.terminal.as_ref()
    }

    /// Shop picture, absolute
    pub fn picture_url(&self) -> Option<String> {
        self.terminal
            .as_ref()
            .and_then(|t| t.picture_url(&self.ctx.settings().pic_url))
    }

    /// Load the terminal detail and store its merchant id. Failures are
    /// logged only, except an expired session.
    pub async fn on_mount(&mut self) {
        let token = match self.ctx.token() {
            Ok(Some(t)) => t,
            Ok(None) => {
                self.ctx.replace(Route::Login);
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Session store unreadable");
                return;
            }
        };

        let user_id = match self.ctx.session().user_id() {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!("No userId in session, terminal detail skipped");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Session store unreadable");
                return;
            }
        };

        let result = self
            .ctx
            .client()
            .terminal_detail(user_id, Some(&token))
            .await
            .map_err(AppError::from)
            .and_then(|r| self.ctx.check(r));

        match result {
            Ok(detail) => {
                if let Some(merchant_id) = detail.merchant_id {
                    if let Err(e) = self.ctx.session().set_merchant_id(merchant_id) {
                        tracing::error!(error = %e, "Failed to store merchantId");
                    }
                }
                tracing::info!(
                    account = %detail.account_name,
                    merchant = %detail.merchant_name,
                    "Terminal detail loaded"
                );
                self.terminal = Some(detail);
            }
            Err(e) if e.is_session_expired() => self.ctx.expire_session(),
            Err(e) => tracing::warn!(error = %e, "Failed to load terminal detail"),
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.ctx.session().clear() {
            tracing::error!(error = %e, "Failed to clear session");
        }
        self.terminal = None;
        self.ctx.replace(Route::Login);
    }

    /// Open the camera; a cancelled scan does nothing
    pub async fn scan(&self) -> Option<ScanTarget> {
        let raw = self.ctx.devices().scanner.scan().await?;
        Some(self.handle_scan(&raw).await)
    }

    pub async fn handle_scan(&self, raw: &str) -> ScanTarget {
        scan_and_open(&self.ctx, raw).await
    }

    pub fn open_card(&self, kind: CardKind) {
        self.ctx.navigate(Route::WaitingCard(kind));
    }

    pub fn open_orders(&self) {
        self.ctx.navigate(Route::OrderQuery);
    }

    pub fn open_id_card_demo(&self) {
        self.ctx.navigate(Route::IdCardDemo);
    }
}
