//! Merchant order model
//!
//! Orders are server-owned and read-only on the terminal; the only mutation
//! goes through the verification submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 订单状态: 待核销
pub const STATUS_PENDING_VERIFICATION: i64 = 10;
/// 订单状态: 售后退款
pub const STATUS_REFUNDED: i64 = 7;

/// 商品类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// 1 小程序商城订单
    Mall,
    /// 2 景区门票订单
    Ticket,
    /// 3 跟团游线路订单
    Tour,
    Unknown(i64),
}

impl OrderType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Mall,
            2 => Self::Ticket,
            3 => Self::Tour,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Mall => 1,
            Self::Ticket => 2,
            Self::Tour => 3,
            Self::Unknown(c) => *c,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mall => "小程序商城订单",
            Self::Ticket => "景区门票订单",
            Self::Tour => "跟团游线路订单",
            Self::Unknown(_) => "",
        }
    }

    /// Ticket and tour orders are redeemed per unit
    pub fn counts_units(&self) -> bool {
        matches!(self, Self::Ticket | Self::Tour)
    }
}

/// Order row returned by `pageMerchantOrder`, `pageVerificationOrder` and
/// `getVerificationOrder`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "crate::util::lenient::i64")]
    pub order_id: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::opt_i64")]
    pub merchant_id: Option<i64>,
    /// 1 商城 2 门票 3 跟团游 (sent as a string)
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub order_type: i64,
    #[serde(default)]
    pub order_type_str: Option<String>,
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub status: i64,
    #[serde(default)]
    pub status_str: Option<String>,
    /// 订单金额 (分)
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub total: i64,
    /// 退款金额 (分)
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub refund_amount: i64,
    #[serde(default)]
    pub spu_name: String,
    /// 门票总数 / 游客总数 (sent as a string)
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub spu_count: i64,
    #[serde(default)]
    pub member_account: String,
    #[serde(default)]
    pub pay_time: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub pay_type: Option<String>,
    #[serde(default)]
    pub pay_type_str: Option<String>,
    /// 1 小程序核销 2 pos机核销
    #[serde(default)]
    pub verification_type: Option<String>,
    #[serde(default)]
    pub verification_type_str: Option<String>,
    /// 出游日期
    #[serde(default)]
    pub select_date: Option<String>,
}

/// Format an amount in cents as `¥x.yy`
pub fn yuan(cents: i64) -> String {
    format!("¥{}", Decimal::new(cents, 2))
}

impl Order {
    pub fn order_type(&self) -> OrderType {
        OrderType::from_code(self.order_type)
    }

    /// Tickets or tourists held by the order
    pub fn unit_count(&self) -> i64 {
        self.spu_count
    }

    pub fn is_verifiable(&self) -> bool {
        self.status == STATUS_PENDING_VERIFICATION
    }

    pub fn status_text(&self) -> String {
        if let Some(s) = self.status_str.as_deref().filter(|s| !s.is_empty()) {
            return s.to_string();
        }
        match self.status {
            1 => "待付款",
            2 => "待发货",
            3 => "待收货",
            4 => "待评价",
            5 => "已完成",
            6 => "已取消",
            7 => "售后退款",
            8 => "已完成",
            _ => "未知状态",
        }
        .to_string()
    }

    pub fn order_type_text(&self) -> String {
        match self.order_type_str.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => self.order_type().label().to_string(),
        }
    }

    pub fn amount_text(&self) -> String {
        yuan(self.total)
    }

    /// Only refunded orders with a positive refund show the amount
    pub fn refund_text(&self) -> Option<String> {
        (self.status == STATUS_REFUNDED && self.refund_amount > 0).then(|| yuan(self.refund_amount))
    }

    pub fn verification_type_text(&self) -> Option<String> {
        let code = self.verification_type.as_deref().filter(|s| !s.is_empty())?;
        if let Some(s) = self.verification_type_str.as_deref().filter(|s| !s.is_empty()) {
            return Some(s.to_string());
        }
        Some(
            match code {
                "1" => "小程序核销",
                "2" => "pos机核销",
                _ => "未知",
            }
            .to_string(),
        )
    }

    /// 下单时间: pay time, else creation time
    pub fn display_time(&self) -> &str {
        self.pay_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.create_time.as_deref())
            .unwrap_or_default()
    }

    pub fn count_label(&self) -> &'static str {
        if self.order_type() == OrderType::Tour {
            "游客总数"
        } else {
            "门票总数"
        }
    }
}

/// Paginated list (`{list, pages, total}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "crate::util::lenient::vec",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )]
    pub list: Vec<T>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

impl<T> Default for OrderPage<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            pages: 0,
            total: 0,
        }
    }
}

/// Query for `GET pageMerchantOrder`. `None` fields are left out of the query string.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantOrderQuery {
    pub page_num: u32,
    pub page_size: u32,
    pub key_word: Option<String>,
    pub member_account: Option<String>,
    pub merchant_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub order_by: Option<String>,
    pub status: Option<String>,
    /// Repeated as `columns=a&columns=b`
    pub columns: Vec<String>,
    pub orders: Vec<String>,
}

impl MerchantOrderQuery {
    pub fn page(page_num: u32, page_size: u32) -> Self {
        Self {
            page_num,
            page_size,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(json: &str) -> Order {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_order_accepts_string_numbers() {
        let o = order(
            r#"{"orderId":1568758870,"orderType":"2","spuCount":"3","status":10,
                "total":12050,"refundAmount":0,"spuName":"门票","memberAccount":"138"}"#,
        );
        assert_eq!(o.order_type(), OrderType::Ticket);
        assert_eq!(o.unit_count(), 3);
        assert!(o.is_verifiable());
        assert_eq!(o.amount_text(), "¥120.50");
        assert_eq!(o.count_label(), "门票总数");
    }

    #[test]
    fn test_status_text_fallback() {
        let mut o = Order { status: 6, ..Default::default() };
        assert_eq!(o.status_text(), "已取消");
        o.status = 99;
        assert_eq!(o.status_text(), "未知状态");
        o.status_str = Some("待核销".into());
        assert_eq!(o.status_text(), "待核销");
    }

    #[test]
    fn test_refund_only_for_refunded_orders() {
        let mut o = Order { status: 7, refund_amount: 500, ..Default::default() };
        assert_eq!(o.refund_text().as_deref(), Some("¥5.00"));
        o.status = 5;
        assert!(o.refund_text().is_none());
        o.status = 7;
        o.refund_amount = 0;
        assert!(o.refund_text().is_none());
    }

    #[test]
    fn test_display_time_prefers_pay_time() {
        let mut o = Order {
            create_time: Some("2024-05-01 10:00:00".into()),
            ..Default::default()
        };
        assert_eq!(o.display_time(), "2024-05-01 10:00:00");
        o.pay_time = Some("2024-05-01 10:05:00".into());
        assert_eq!(o.display_time(), "2024-05-01 10:05:00");
    }

    #[test]
    fn test_verification_type_text() {
        let mut o = Order::default();
        assert!(o.verification_type_text().is_none());
        o.verification_type = Some("2".into());
        assert_eq!(o.verification_type_text().as_deref(), Some("pos机核销"));
        o.verification_type_str = Some("POS核销".into());
        assert_eq!(o.verification_type_text().as_deref(), Some("POS核销"));
    }

    #[test]
    fn test_tour_label() {
        let o = Order { order_type: 3, ..Default::default() };
        assert_eq!(o.count_label(), "游客总数");
        assert_eq!(o.order_type_text(), "跟团游线路订单");
    }
}
