//! 核销结果

use std::sync::Arc;

use crate::core::feedback::{MSG_LOGIN_FIRST, MSG_NO_MERCHANT, TITLE_HINT};
use crate::core::{AppContext, Route, VerificationOutcome};

pub struct VerificationResultScreen {
    ctx: Arc<AppContext>,
    outcome: VerificationOutcome,
}

impl VerificationResultScreen {
    pub fn new(ctx: Arc<AppContext>, outcome: VerificationOutcome) -> Self {
        Self { ctx, outcome }
    }

    pub fn outcome(&self) -> &VerificationOutcome {
        &self.outcome
    }

    pub fn headline(&self) -> String {
        self.outcome.headline()
    }

    pub fn detail(&self) -> Option<&str> {
        self.outcome.detail()
    }

    pub fn go_home(&self) {
        self.ctx.navigate(Route::Home);
    }

    /// 查看订单
    pub fn view_order(&self) -> bool {
        match self.ctx.token() {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.ctx.alert(TITLE_HINT, MSG_LOGIN_FIRST);
                self.ctx.replace(Route::Login);
                return false;
            }
            Err(e) => {
                self.ctx.report(TITLE_HINT, "", &e);
                return false;
            }
        }

        let merchant_id = match self.ctx.session().merchant_id() {
            Ok(Some(id)) => id,
            _ => {
                self.ctx.alert(TITLE_HINT, MSG_NO_MERCHANT);
                return false;
            }
        };

        // ID-card queries carry the ID number here; one ending in X is no order id
        let Ok(order_id) = self.outcome.order_id.trim().parse::<i64>() else {
            self.ctx.alert(TITLE_HINT, "未获取到订单信息");
            return false;
        };

        self.ctx.navigate(Route::OrderDetail {
            order_id,
            merchant_id,
        });
        true
    }
}
