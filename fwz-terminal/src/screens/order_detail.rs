//! 订单详情

use std::sync::Arc;

use shared::models::{Order, STATUS_REFUNDED};

use crate::core::feedback::{MSG_NETWORK, TITLE_HINT};
use crate::core::AppContext;

pub struct OrderDetailScreen {
    ctx: Arc<AppContext>,
    order_id: i64,
    merchant_id: i64,
    order: Option<Order>,
}

impl OrderDetailScreen {
    pub fn new(ctx: Arc<AppContext>, order_id: i64, merchant_id: i64) -> Self {
        Self {
            ctx,
            order_id,
            merchant_id,
            order: None,
        }
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn merchant_id(&self) -> i64 {
        self.merchant_id
    }

    pub async fn on_mount(&mut self) {
        let token = match self.ctx.require_token() {
            Ok(t) => t,
            Err(e) => {
                self.ctx.report(TITLE_HINT, "", &e);
                return;
            }
        };

        match self
            .ctx
            .client()
            .verification_order(self.order_id, Some(&token))
            .await
        {
            Ok(response) => match self.ctx.check(response) {
                Ok(order) => self.order = Some(order),
                Err(e) if e.is_session_expired() => self.ctx.expire_session(),
                Err(e) => {
                    tracing::warn!(order_id = self.order_id, error = %e, "Order detail unavailable");
                }
            },
            Err(e) => {
                tracing::error!(order_id = self.order_id, error = %e, "Order detail request failed");
                self.ctx.alert(TITLE_HINT, MSG_NETWORK);
                self.ctx.go_back();
            }
        }
    }

    /// Labelled rows in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let Some(o) = &self.order else {
            return Vec::new();
        };
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut rows = vec![
            ("订单号", o.order_id.to_string()),
            ("商品名称", o.spu_name.clone()),
            ("商品类型", o.order_type_text()),
            ("商品数量", o.spu_count.to_string()),
            ("订单金额", o.amount_text()),
            ("创建时间", text(&o.create_time)),
            ("支付时间", text(&o.pay_time)),
            ("支付方式", text(&o.pay_type_str)),
            ("订单状态", o.status_text()),
        ];
        if o.status == STATUS_REFUNDED {
            rows.push(("退款金额", o.refund_text().unwrap_or_default()));
        }
        rows.push(("用户账号", o.member_account.clone()));
        if let Some(date) = o.select_date.as_ref().filter(|d| !d.is_empty()) {
            rows.push(("出游日期", date.clone()));
        }
        rows.push(("核销方式", o.verification_type_text().unwrap_or_default()));
        rows
    }
}
