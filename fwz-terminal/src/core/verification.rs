//! 核销流程
//!
//! Single-unit orders are redeemed directly; everything else goes through a
//! selection step (ticket quantity or tourist list) backed by the order's
//! `verificationInfo`.

use std::collections::BTreeSet;

use shared::models::{Order, OrderType, Tourist, VerificationInfo, VerificationRequest};
use shared::response::{ApiResponse, VERIFY_OK_CODE};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationPlan {
    /// Submit right away
    Direct(VerificationRequest),
    /// Fetch verificationInfo and let the operator choose
    Select,
}

impl VerificationPlan {
    pub fn for_order(order: &Order) -> Self {
        if order.unit_count() == 1 {
            Self::Direct(VerificationRequest::single(order.order_id, order.order_type()))
        } else {
            Self::Select
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("请输入有效的核销数量")]
    InvalidQuantity,

    #[error("核销数量不能大于剩余待核销数量")]
    ExceedsRemaining,

    #[error("请选择至少一位游客进行核销")]
    NoTouristSelected,
}

/// State of the verification modal
#[derive(Debug, Clone)]
pub struct VerificationSelection {
    order_id: i64,
    order_type: OrderType,
    info: VerificationInfo,
    quantity: String,
    selected: BTreeSet<i64>,
}

impl VerificationSelection {
    pub fn new(order_id: i64, order_type: OrderType, info: VerificationInfo) -> Self {
        Self {
            order_id,
            order_type,
            info,
            quantity: "1".to_string(),
            selected: BTreeSet::new(),
        }
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn info(&self) -> &VerificationInfo {
        &self.info
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn set_quantity(&mut self, input: impl Into<String>) {
        self.quantity = input.into();
    }

    /// Toggle a tourist from the remaining list. Returns whether the tourist
    /// is now selected; unknown ids are never selected.
    pub fn toggle_tourist(&mut self, tourist_id: i64) -> bool {
        if self.info.remaining_tourist(tourist_id).is_none() {
            return false;
        }
        if !self.selected.remove(&tourist_id) {
            self.selected.insert(tourist_id);
            true
        } else {
            false
        }
    }

    /// Select without toggling; repeating an id keeps it selected.
    /// Returns false for ids not in the remaining list.
    pub fn select_tourist(&mut self, tourist_id: i64) -> bool {
        if self.info.remaining_tourist(tourist_id).is_none() {
            return false;
        }
        self.selected.insert(tourist_id);
        true
    }

    pub fn is_selected(&self, tourist_id: i64) -> bool {
        self.selected.contains(&tourist_id)
    }

    pub fn selected_tourists(&self) -> Vec<&Tourist> {
        self.info
            .remaining_list
            .iter()
            .filter(|t| self.selected.contains(&t.tourist_id))
            .collect()
    }

    pub fn build_request(&self) -> Result<VerificationRequest, SelectionError> {
        match self.order_type {
            OrderType::Ticket => {
                let count = self
                    .quantity
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(SelectionError::InvalidQuantity)?;
                if i64::from(count) > self.info.remaining_count {
                    return Err(SelectionError::ExceedsRemaining);
                }
                Ok(VerificationRequest::tickets(self.order_id, count))
            }
            OrderType::Tour => {
                if self.selected.is_empty() {
                    return Err(SelectionError::NoTouristSelected);
                }
                Ok(VerificationRequest::tourists(
                    self.order_id,
                    self.selected.iter().copied().collect(),
                ))
            }
            other => Ok(VerificationRequest::single(self.order_id, other)),
        }
    }
}

/// Result of a submission, as shown by the result view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub order_id: String,
    pub success: bool,
    pub code: String,
    pub msg: String,
}

impl VerificationOutcome {
    pub fn from_response<T>(order_id: impl Into<String>, response: &ApiResponse<T>) -> Self {
        Self {
            order_id: order_id.into(),
            success: response.success,
            code: response.code.clone(),
            msg: response.msg.clone(),
        }
    }

    /// Local failure, no backend answer
    pub fn failed(order_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            success: false,
            code: String::new(),
            msg: msg.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == VERIFY_OK_CODE
    }

    pub fn headline(&self) -> String {
        if !self.is_ok() {
            "核销失败".to_string()
        } else if self.msg == "ok" {
            "核销成功".to_string()
        } else {
            self.msg.clone()
        }
    }

    /// Second line under a failure headline
    pub fn detail(&self) -> Option<&str> {
        (!self.is_ok()).then_some(self.msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(order_type: &str, spu_count: i64) -> Order {
        serde_json::from_value(serde_json::json!({
            "orderId": 1001, "orderType": order_type, "status": 10, "spuCount": spu_count
        }))
        .unwrap()
    }

    fn info(remaining: i64, tourists: &[(i64, &str)]) -> VerificationInfo {
        serde_json::from_value(serde_json::json!({
            "orderId": 1001,
            "orderType": "3",
            "spuName": "两日游",
            "spuCount": 4,
            "usedCount": 4 - remaining,
            "usedList": [],
            "remainingCount": remaining,
            "remainingList": tourists.iter()
                .map(|(id, name)| serde_json::json!({"touristId": id, "name": name, "number": "4401"}))
                .collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn test_single_unit_orders_go_direct() {
        assert_eq!(
            VerificationPlan::for_order(&order("2", 1)),
            VerificationPlan::Direct(VerificationRequest::tickets(1001, 1))
        );
        assert_eq!(
            VerificationPlan::for_order(&order("3", 1)),
            VerificationPlan::Direct(VerificationRequest::tickets(1001, 1))
        );
        match VerificationPlan::for_order(&order("1", 1)) {
            VerificationPlan::Direct(req) => assert_eq!(req.verification_num(), None),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(VerificationPlan::for_order(&order("2", 3)), VerificationPlan::Select);
    }

    #[test]
    fn test_ticket_quantity_validation() {
        let mut sel = VerificationSelection::new(1001, OrderType::Ticket, info(3, &[]));
        assert_eq!(sel.quantity(), "1");
        assert_eq!(sel.build_request(), Ok(VerificationRequest::tickets(1001, 1)));

        sel.set_quantity("0");
        assert_eq!(sel.build_request(), Err(SelectionError::InvalidQuantity));
        sel.set_quantity("abc");
        assert_eq!(sel.build_request(), Err(SelectionError::InvalidQuantity));
        sel.set_quantity("4");
        assert_eq!(sel.build_request(), Err(SelectionError::ExceedsRemaining));
        sel.set_quantity(" 3 ");
        assert_eq!(sel.build_request(), Ok(VerificationRequest::tickets(1001, 3)));
    }

    #[test]
    fn test_tourist_selection() {
        let mut sel =
            VerificationSelection::new(1001, OrderType::Tour, info(2, &[(7, "张三"), (8, "李四")]));
        assert_eq!(sel.build_request(), Err(SelectionError::NoTouristSelected));
        assert_eq!(
            SelectionError::NoTouristSelected.to_string(),
            "请选择至少一位游客进行核销"
        );

        assert!(!sel.toggle_tourist(99), "not in remaining list");
        assert!(sel.toggle_tourist(8));
        assert!(sel.toggle_tourist(7));
        assert!(!sel.toggle_tourist(8), "second toggle deselects");
        assert!(sel.is_selected(7));
        assert!(!sel.is_selected(8));
        assert_eq!(sel.selected_tourists().len(), 1);
        assert_eq!(sel.build_request(), Ok(VerificationRequest::tourists(1001, vec![7])));
    }

    #[test]
    fn test_repeated_select_keeps_tourist() {
        let mut sel =
            VerificationSelection::new(1001, OrderType::Tour, info(2, &[(7, "张三"), (8, "李四")]));
        assert!(sel.select_tourist(7));
        assert!(sel.select_tourist(7));
        assert!(!sel.select_tourist(99));
        assert!(sel.is_selected(7));
        assert_eq!(sel.build_request(), Ok(VerificationRequest::tourists(1001, vec![7])));
    }

    #[test]
    fn test_outcome_headlines() {
        let ok = VerificationOutcome::from_response("1", &ApiResponse::<()>::error("00000", "ok"));
        assert_eq!(ok.headline(), "核销成功");
        assert_eq!(ok.detail(), None);

        let partial =
            VerificationOutcome::from_response("1", &ApiResponse::<()>::error("00000", "已核销2张"));
        assert_eq!(partial.headline(), "已核销2张");

        let failed = VerificationOutcome::from_response(
            "1",
            &ApiResponse::<()>::error("A0001", "订单已退款"),
        );
        assert_eq!(failed.headline(), "核销失败");
        assert_eq!(failed.detail(), Some("订单已退款"));

        let local = VerificationOutcome::failed("1", "请求过程中发生错误，请重试");
        assert_eq!(local.headline(), "核销失败");
    }
}
