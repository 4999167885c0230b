//! Verification (核销) DTOs

use serde::{Deserialize, Serialize};

use super::order::OrderType;

/// 入口类型 for `pageVerificationOrder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationEntry {
    /// 1: 扫电子社保卡二维码
    SocialSecurityQr,
    /// 2: 扫订单核销二维码
    OrderQr,
    /// 3: 刷身份证或社保卡
    Card,
}

impl VerificationEntry {
    pub fn code(&self) -> i32 {
        match self {
            Self::SocialSecurityQr => 1,
            Self::OrderQr => 2,
            Self::Card => 3,
        }
    }
}

/// Query for `GET pageVerificationOrder`
///
/// `idCard` goes with types 1 and 3, `orderId` with type 2.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOrderQuery {
    pub merchant_id: i64,
    pub page_num: u32,
    pub page_size: u32,
    #[serde(rename = "type")]
    pub entry_type: i32,
    pub id_card: Option<String>,
    pub order_id: Option<String>,
}

impl VerificationOrderQuery {
    pub fn by_id_card(merchant_id: i64, id_card: impl Into<String>, page_num: u32, page_size: u32) -> Self {
        Self {
            merchant_id,
            page_num,
            page_size,
            entry_type: VerificationEntry::SocialSecurityQr.code(),
            id_card: Some(id_card.into()),
            order_id: None,
        }
    }

    pub fn by_order_id(merchant_id: i64, order_id: impl Into<String>, page_num: u32, page_size: u32) -> Self {
        Self {
            merchant_id,
            page_num,
            page_size,
            entry_type: VerificationEntry::OrderQr.code(),
            id_card: None,
            order_id: Some(order_id.into()),
        }
    }
}

/// 游客
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tourist {
    #[serde(deserialize_with = "crate::util::lenient::i64")]
    pub tourist_id: i64,
    #[serde(default)]
    pub name: String,
    /// 证件号
    #[serde(default)]
    pub number: String,
}

/// Snapshot from `GET verificationInfo`, fetched before a selective submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationInfo {
    #[serde(deserialize_with = "crate::util::lenient::i64")]
    pub order_id: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub order_type: i64,
    #[serde(default)]
    pub order_type_str: Option<String>,
    #[serde(default)]
    pub spu_name: String,
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub spu_count: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub used_count: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::vec")]
    pub used_list: Vec<Tourist>,
    #[serde(default, deserialize_with = "crate::util::lenient::i64")]
    pub remaining_count: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::vec")]
    pub remaining_list: Vec<Tourist>,
}

impl VerificationInfo {
    pub fn order_type(&self) -> OrderType {
        OrderType::from_code(self.order_type)
    }

    pub fn remaining_tourist(&self, tourist_id: i64) -> Option<&Tourist> {
        self.remaining_list.iter().find(|t| t.tourist_id == tourist_id)
    }
}

/// Body of `POST verification`
///
/// Ticket orders carry `verificationNum`, tour orders carry `touristIds`;
/// the constructors keep the two mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    order_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tourist_ids: Option<Vec<i64>>,
}

impl VerificationRequest {
    /// Redeem `count` tickets
    pub fn tickets(order_id: i64, count: u32) -> Self {
        Self {
            order_id,
            verification_num: Some(count),
            tourist_ids: None,
        }
    }

    /// Redeem the listed tourists
    pub fn tourists(order_id: i64, tourist_ids: Vec<i64>) -> Self {
        Self {
            order_id,
            verification_num: None,
            tourist_ids: Some(tourist_ids),
        }
    }

    /// Single-unit order: implicit quantity 1 for ticket and tour orders,
    /// nothing for mall orders
    pub fn single(order_id: i64, order_type: OrderType) -> Self {
        Self {
            order_id,
            verification_num: order_type.counts_units().then_some(1),
            tourist_ids: None,
        }
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn verification_num(&self) -> Option<u32> {
        self.verification_num
    }

    pub fn tourist_ids(&self) -> Option<&[i64]> {
        self.tourist_ids.as_deref()
    }
}
