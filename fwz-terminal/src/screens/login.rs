//! 登录页

use std::sync::Arc;

use shared::models::Session;

use crate::core::feedback::{MSG_NETWORK, TITLE_ERROR};
use crate::core::{AppContext, Route};

pub struct LoginScreen {
    ctx: Arc<AppContext>,
}

impl LoginScreen {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Skip the form when a token is already stored
    pub fn on_mount(&self) -> bool {
        match self.ctx.token() {
            Ok(Some(_)) => {
                tracing::info!("Session found, skipping login");
                self.ctx.replace(Route::Home);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Session store unreadable");
                false
            }
        }
    }

    /// Returns true when the operator is now logged in
    pub async fn submit(&self, username: &str, password: &str) -> bool {
        if username.trim().is_empty() || password.trim().is_empty() {
            self.ctx.alert(TITLE_ERROR, "请输入用户名和密码");
            return false;
        }

        let equipment_coding = &self.ctx.settings().equipment_coding;
        let response = match self
            .ctx
            .client()
            .login(username, password, equipment_coding)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Login request failed");
                self.ctx.alert(TITLE_ERROR, MSG_NETWORK);
                return false;
            }
        };

        let msg = response.msg_or("登录失败").to_string();
        let data = match response.into_data() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(code = %e.code, "Login rejected");
                self.ctx.alert(TITLE_ERROR, msg);
                return false;
            }
        };

        let session = Session::from_login(&data, equipment_coding.clone());
        if let Err(e) = self.ctx.session().save(&session) {
            tracing::error!(error = %e, "Failed to persist session");
            self.ctx.alert(TITLE_ERROR, "登录信息保存失败");
            return false;
        }

        tracing::info!(
            user_id = ?session.user_id,
            merchant_id = ?session.merchant_id,
            "Login succeeded"
        );
        self.ctx.replace(Route::Home);
        true
    }
}
