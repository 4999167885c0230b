//! 待核销订单列表 (扫码核销 / 刷卡核销)
//!
//! Queries by ID number or order id. When the query returns nothing, or the
//! backend refuses it, the screen swaps the list for a result view.

use std::sync::Arc;

use shared::models::{Order, OrderPage, VerificationOrderQuery};
use shared::response::ApiResponse;

use super::scan::{ScanTarget, resolve_scan};
use super::verification_modal::{ModalOutcome, VerificationModal};
use crate::core::feedback::{MSG_NETWORK, MSG_NO_MERCHANT, TITLE_HINT};
use crate::core::pagination::{LoadMode, PageRequest};
use crate::core::{
    AppContext, AppError, Channel, PagedList, Route, VerificationListParams, VerificationOutcome,
    VerificationPlan, VerificationQuery,
};

pub struct VerificationListScreen {
    ctx: Arc<AppContext>,
    params: VerificationListParams,
    orders: PagedList<Order>,
    result: Option<VerificationOutcome>,
    modal: Option<VerificationModal>,
}

impl VerificationListScreen {
    pub fn new(ctx: Arc<AppContext>, params: VerificationListParams) -> Self {
        let page_size = ctx.settings().page_size;
        Self {
            ctx,
            params,
            orders: PagedList::new(page_size),
            result: None,
            modal: None,
        }
    }

    pub fn params(&self) -> &VerificationListParams {
        &self.params
    }

    pub fn title(&self) -> &'static str {
        match self.params.channel {
            Channel::Card => "刷卡核销",
            Channel::Scan => "扫码核销",
        }
    }

    /// "继续扫码核销" is offered for scans only
    pub fn can_continue_scanning(&self) -> bool {
        self.params.channel != Channel::Card
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.items()
    }

    pub fn has_more(&self) -> bool {
        self.orders.cursor().has_more()
    }

    /// Result view shown instead of the list
    pub fn result(&self) -> Option<&VerificationOutcome> {
        self.result.as_ref()
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

    pub async fn refresh(&mut self) {
        let request = self.orders.cursor_mut().begin_refresh();
        self.load(request).await;
    }

    pub async fn load_more(&mut self) -> bool {
        match self.orders.cursor_mut().begin_load_more() {
            Some(request) => {
                self.load(request).await;
                true
            }
            None => false,
        }
    }

    /// Point the screen at a new query and load it
    pub async fn requery(&mut self, params: VerificationListParams) {
        self.params = params;
        self.orders = PagedList::new(self.orders.cursor().page_size());
        self.result = None;
        self.refresh().await;
    }

    async fn load(&mut self, request: PageRequest) {
        let token = match self.ctx.require_token() {
            Ok(t) => t,
            Err(e) => {
                self.orders.cursor_mut().fail();
                self.ctx.report(TITLE_HINT, "", &e);
                return;
            }
        };
        let merchant_id = match self.ctx.session().merchant_id() {
            Ok(Some(id)) => id,
            Ok(None) => {
                self.orders.cursor_mut().fail();
                self.ctx.alert(TITLE_HINT, MSG_NO_MERCHANT);
                return;
            }
            Err(e) => {
                self.orders.cursor_mut().fail();
                self.ctx.report(TITLE_HINT, "", &AppError::from(e));
                return;
            }
        };

        let page_size = self.orders.cursor().page_size();
        let query = match &self.params.query {
            VerificationQuery::ByIdCard(id_no) => {
                VerificationOrderQuery::by_id_card(merchant_id, id_no, request.page, page_size)
            }
            VerificationQuery::ByOrderId(order_id) => {
                VerificationOrderQuery::by_order_id(merchant_id, order_id, request.page, page_size)
            }
        };

        match self
            .ctx
            .client()
            .page_verification_orders(&query, Some(&token))
            .await
        {
            Ok(response) => self.apply(request, response),
            Err(e) => {
                tracing::error!(error = %e, "Verification order query failed");
                self.orders.cursor_mut().fail();
                if request.mode == LoadMode::Replace {
                    self.show_result(VerificationOutcome::failed(
                        self.params.query.value(),
                        MSG_NETWORK,
                    ));
                }
            }
        }
    }

    fn apply(&mut self, request: PageRequest, response: ApiResponse<OrderPage<Order>>) {
        if response.is_session_expired() {
            self.orders.cursor_mut().fail();
            self.ctx.expire_session();
            return;
        }

        let status = response.status();
        match response.data {
            Some(page) if status.success && !page.list.is_empty() => {
                self.result = None;
                self.orders.apply(request, page);
            }
            _ if request.mode == LoadMode::Append => {
                tracing::debug!(page = request.page, "No more verification orders");
                self.orders.cursor_mut().exhaust();
            }
            _ => {
                tracing::info!(code = %status.code, msg = %status.msg, "No verification orders");
                self.orders.cursor_mut().exhaust();
                self.show_result(VerificationOutcome::from_response(
                    self.params.query.value(),
                    &status,
                ));
            }
        }
    }

    fn show_result(&mut self, outcome: VerificationOutcome) {
        self.orders.clear();
        self.result = Some(outcome);
    }

    /// 核销. Single-unit orders are submitted here and the result replaces
    /// the list; others open the modal.
    pub async fn verify(&mut self, order: &Order) {
        match VerificationPlan::for_order(order) {
            VerificationPlan::Direct(request) => {
                let token = match self.ctx.require_token() {
                    Ok(t) => t,
                    Err(e) => {
                        self.ctx.report(TITLE_HINT, "", &e);
                        return;
                    }
                };
                let order_id = request.order_id().to_string();
                let outcome = match self
                    .ctx
                    .client()
                    .submit_verification(&request, Some(&token))
                    .await
                {
                    Ok(response) if response.is_session_expired() => {
                        self.ctx.expire_session();
                        return;
                    }
                    Ok(response) => {
                        tracing::info!(%order_id, code = %response.code, "Verification submitted");
                        VerificationOutcome::from_response(order_id, &response)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Verification request failed");
                        VerificationOutcome::failed(order_id, "请求过程中发生错误，请重试")
                    }
                };
                self.show_result(outcome);
            }
            VerificationPlan::Select => {
                self.modal = VerificationModal::open(self.ctx.clone(), order.clone()).await;
            }
        }
    }

    /// Submit the open modal. On success the first order leaves the list
    /// (back to Home when it empties) and the result screen opens.
    pub async fn submit_selection(&mut self) -> Option<ModalOutcome> {
        let outcome = self.modal.as_ref()?.submit().await;
        match &outcome {
            ModalOutcome::Submitted(result) => {
                self.modal = None;
                self.orders.remove_first();
                if self.orders.is_empty() {
                    self.ctx.navigate(Route::Home);
                }
                self.ctx.navigate(Route::VerificationResult(result.clone()));
            }
            ModalOutcome::Closed => self.modal = None,
            ModalOutcome::Retry => {}
        }
        Some(outcome)
    }

    /// 继续扫码核销: scan again and re-query in place
    pub async fn continue_scanning(&mut self) -> Option<ScanTarget> {
        let raw = self.ctx.devices().scanner.scan().await?;
        Some(self.handle_scan(&raw).await)
    }

    pub async fn handle_scan(&mut self, raw: &str) -> ScanTarget {
        let target = resolve_scan(&self.ctx, raw).await;
        if let ScanTarget::List(params) = &target {
            self.requery(params.clone()).await;
        }
        target
    }

    pub fn go_home(&self) {
        self.ctx.navigate(Route::Home);
    }
}
