//! Social-security card results from the card vendor SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 非接触式操作卡
pub const CONTACTLESS_CARD_TYPE: i32 = 2;
/// 场景编码
pub const DEFAULT_SCENE_CODE: &str = "000001";
/// 电子社保卡二维码核验时传给 SDK 的业务描述
pub const ESS_CHECK_CHANNEL: &str = "01|票务核销|000001|";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("无法解析读卡结果: {0}")]
pub struct SocialCardParseError(pub String);

/// Raw outcome of `iReadCardBas`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialCardOutcome {
    /// 0 on success
    pub result_code: i32,
    #[serde(default)]
    pub error_info: String,
    /// `|`-separated card fields
    #[serde(default)]
    pub result_info: String,
}

impl SocialCardOutcome {
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

/// Parsed social-security card read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialCardRecord {
    /// 身份证号 (second field)
    pub id_no: String,
    pub fields: Vec<String>,
    pub raw: String,
}

impl SocialCardRecord {
    pub fn parse(result_info: &str) -> Result<Self, SocialCardParseError> {
        let fields: Vec<String> = result_info.split('|').map(str::to_string).collect();
        match fields.get(1) {
            Some(id_no) if !id_no.trim().is_empty() => Ok(Self {
                id_no: id_no.trim().to_string(),
                fields,
                raw: result_info.to_string(),
            }),
            _ => Err(SocialCardParseError(result_info.to_string())),
        }
    }
}

/// Result of the electronic social-security QR check (`checkESSCard`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssCheckResult {
    pub result_code: i32,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub result_str: String,
    #[serde(default)]
    pub id_no: String,
}

impl EssCheckResult {
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }

    /// errorMsg, else resultStr
    pub fn failure_message(&self) -> &str {
        if self.error_msg.is_empty() {
            &self.result_str
        } else {
            &self.error_msg
        }
    }
}
