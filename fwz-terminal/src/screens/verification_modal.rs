//! 核销弹窗
//!
//! Opened for orders with more than one ticket or tourist. Loads the
//! verification info first; the owning screen decides what happens after a
//! successful submission.

use std::sync::Arc;

use shared::models::Order;

use crate::core::feedback::TITLE_HINT;
use crate::core::{AppContext, AppError, VerificationOutcome, VerificationSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// Backend accepted the verification
    Submitted(VerificationOutcome),
    /// Input rejected or backend refused, the modal stays open
    Retry,
    /// Transport failure, the modal closes
    Closed,
}

pub struct VerificationModal {
    ctx: Arc<AppContext>,
    order: Order,
    selection: VerificationSelection,
}

impl VerificationModal {
    /// Fetch the verification info. `None` (after an alert) when it cannot
    /// be loaded.
    pub async fn open(ctx: Arc<AppContext>, order: Order) -> Option<Self> {
        let token = match ctx.require_token() {
            Ok(t) => t,
            Err(e) => {
                ctx.report(TITLE_HINT, "", &e);
                return None;
            }
        };

        let result = ctx
            .client()
            .verification_info(order.order_id, Some(&token))
            .await
            .map_err(AppError::from)
            .and_then(|r| ctx.check(r));

        match result {
            Ok(info) => {
                tracing::debug!(
                    order_id = order.order_id,
                    remaining = info.remaining_count,
                    "Verification info loaded"
                );
                let selection = VerificationSelection::new(order.order_id, order.order_type(), info);
                Some(Self {
                    ctx,
                    order,
                    selection,
                })
            }
            Err(e) => {
                ctx.report_as(TITLE_HINT, "获取核销信息失败", "获取核销信息失败，请重试", &e);
                None
            }
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn selection(&self) -> &VerificationSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut VerificationSelection {
        &mut self.selection
    }

    pub async fn submit(&self) -> ModalOutcome {
        let request = match self.selection.build_request() {
            Ok(r) => r,
            Err(e) => {
                self.ctx.alert(TITLE_HINT, e.to_string());
                return ModalOutcome::Retry;
            }
        };

        let token = match self.ctx.require_token() {
            Ok(t) => t,
            Err(e) => {
                self.ctx.report(TITLE_HINT, "", &e);
                return ModalOutcome::Closed;
            }
        };

        match self
            .ctx
            .client()
            .submit_verification(&request, Some(&token))
            .await
        {
            Ok(response) if response.success => {
                tracing::info!(order_id = request.order_id(), "Verification accepted");
                ModalOutcome::Submitted(VerificationOutcome::from_response(
                    request.order_id().to_string(),
                    &response,
                ))
            }
            Ok(response) => {
                let err = AppError::from(shared::BusinessError::new(response.code, response.msg));
                self.ctx.report(TITLE_HINT, "核销失败", &err);
                if err.is_session_expired() {
                    ModalOutcome::Closed
                } else {
                    ModalOutcome::Retry
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Verification request failed");
                self.ctx.alert(TITLE_HINT, "核销过程中发生错误，请重试");
                ModalOutcome::Closed
            }
        }
    }
}
