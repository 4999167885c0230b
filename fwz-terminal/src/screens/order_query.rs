//! 订单查询
//!
//! Keyword search over the merchant's orders, paged, with verification of
//! any listed order.

use std::sync::Arc;

use shared::BusinessError;
use shared::models::{MerchantOrderQuery, Order, VerificationRequest};

use super::verification_modal::{ModalOutcome, VerificationModal};
use crate::core::pagination::PageRequest;
use crate::core::{AppContext, AppError, PagedList, Route, VerificationPlan};

const TITLE_LOAD_FAILED: &str = "获取订单失败";
const TITLE_VERIFY_FAILED: &str = "核销失败";

pub struct OrderQueryScreen {
    ctx: Arc<AppContext>,
    keyword: String,
    orders: PagedList<Order>,
    total: u64,
    modal: Option<VerificationModal>,
}

impl OrderQueryScreen {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let page_size = ctx.settings().page_size;
        Self {
            ctx,
            keyword: String::new(),
            orders: PagedList::new(page_size),
            total: 0,
            modal: None,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.items()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.orders.cursor().has_more()
    }

    pub fn modal(&self) -> Option<&VerificationModal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut VerificationModal> {
        self.modal.as_mut()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub async fn on_mount(&mut self) {
        self.refresh().await;
    }

    /// 搜索: clear and load page 1
    pub async fn search(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
        self.orders.clear();
        self.total = 0;
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        let request = self.orders.cursor_mut().begin_refresh();
        self.load(request).await;
    }

    /// Returns false when nothing was requested
    pub async fn load_more(&mut self) -> bool {
        match self.orders.cursor_mut().begin_load_more() {
            Some(request) => {
                self.load(request).await;
                true
            }
            None => false,
        }
    }

    async fn load(&mut self, request: PageRequest) {
        match self.fetch(request).await {
            Ok(page) => {
                tracing::debug!(
                    page = request.page,
                    rows = page.list.len(),
                    total = page.total,
                    "Orders loaded"
                );
                self.total = page.total;
                self.orders.apply(request, page);
            }
            // 后台有时只在 msg 里提示 token 失效
            Err(AppError::Business(e)) if e.msg.contains("token") => {
                tracing::warn!(code = %e.code, msg = %e.msg, "Token rejected by order query");
                self.orders.cursor_mut().fail();
                self.ctx.expire_session();
            }
            Err(e) => {
                self.orders.cursor_mut().fail();
                self.ctx.report(TITLE_LOAD_FAILED, "请稍后重试", &e);
            }
        }
    }

    async fn fetch(&self, request: PageRequest) -> Result<shared::models::OrderPage<Order>, AppError> {
        let token = self.ctx.require_token()?;
        let session = self.ctx.session();

        let mut query = MerchantOrderQuery::page(request.page, self.orders.cursor().page_size());
        query.key_word = Some(self.keyword.trim().to_string()).filter(|k| !k.is_empty());
        query.tenant_id = session.tenant_id()?;
        query.merchant_id = session.merchant_id()?;

        let response = self
            .ctx
            .client()
            .page_merchant_orders(&query, Some(&token))
            .await?;
        self.ctx.check(response)
    }

    /// 核销: single-unit orders go straight to the backend, the rest open
    /// the modal.
    pub async fn verify(&mut self, order: &Order) {
        match VerificationPlan::for_order(order) {
            VerificationPlan::Direct(request) => self.submit_direct(request).await,
            VerificationPlan::Select => {
                self.modal = VerificationModal::open(self.ctx.clone(), order.clone()).await;
            }
        }
    }

    async fn submit_direct(&self, request: VerificationRequest) {
        let token = match self.ctx.require_token() {
            Ok(t) => t,
            Err(e) => {
                self.ctx.report(TITLE_VERIFY_FAILED, "", &e);
                return;
            }
        };

        match self
            .ctx
            .client()
            .submit_verification(&request, Some(&token))
            .await
        {
            Ok(response) if response.success => {
                tracing::info!(order_id = request.order_id(), "Order verified");
                self.ctx.alert("核销成功", "订单已成功核销");
                self.ctx.navigate(Route::Home);
            }
            Ok(response) => {
                let err = AppError::from(BusinessError::new(response.code, response.msg));
                self.ctx.report(TITLE_VERIFY_FAILED, "核销请求失败", &err);
            }
            Err(e) => {
                tracing::error!(error = %e, "Verification request failed");
                self.ctx.alert(TITLE_VERIFY_FAILED, "请求过程中发生错误，请重试");
            }
        }
    }

    /// Submit the open modal
    pub async fn submit_selection(&mut self) -> Option<ModalOutcome> {
        let outcome = self.modal.as_ref()?.submit().await;
        match &outcome {
            ModalOutcome::Submitted(result) => {
                self.modal = None;
                self.ctx.navigate(Route::VerificationResult(result.clone()));
            }
            ModalOutcome::Closed => self.modal = None,
            ModalOutcome::Retry => {}
        }
        Some(outcome)
    }
}
