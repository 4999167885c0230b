//! Terminal (POS device) detail

use serde::{Deserialize, Serialize};

/// Response of `GET getTerminalDetail`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalDetail {
    /// 账号名称
    #[serde(default)]
    pub account_name: String,
    /// 设备编码
    #[serde(default)]
    pub equipment_coding: String,
    /// 主账号 YES / NO
    #[serde(default)]
    pub is_main: String,
    #[serde(default, deserialize_with = "crate::util::lenient::opt_i64")]
    pub merchant_id: Option<i64>,
    #[serde(default)]
    pub merchant_name: String,
    /// 店铺地址
    #[serde(default)]
    pub addr: String,
    /// 店铺图片 (relative path)
    #[serde(default)]
    pub pic: String,
}

impl TerminalDetail {
    pub fn is_main_account(&self) -> bool {
        self.is_main == "YES"
    }

    pub fn account_type_label(&self) -> &'static str {
        if self.is_main_account() { "主账号" } else { "子账号" }
    }

    /// Absolute picture URL, `None` when the shop has no picture
    pub fn picture_url(&self, pic_base: &str) -> Option<String> {
        if self.pic.is_empty() {
            None
        } else {
            Some(format!("{}{}", pic_base, self.pic))
        }
    }
}
