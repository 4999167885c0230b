//! Identity card data decoded by the NFC vendor SDK
//!
//! Produced transiently by a read; never persisted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdCardParseError {
    #[error("vendor payload is not a JSON object")]
    NotAnObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 证件类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdCardType {
    /// 居民身份证
    Resident,
    /// "I" 外国人永久居留身份证
    Foreigner,
    /// "J" 港澳台居民居住证
    HongKongMacauTaiwan,
}

impl IdCardType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "I" => Self::Foreigner,
            "J" => Self::HongKongMacauTaiwan,
            _ => Self::Resident,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCardInfo {
    pub name: String,
    pub gender: String,
    pub nation: String,
    /// YYYYMMDD
    pub birthday: String,
    pub address: String,
    pub id_num: String,
    pub issue_org: String,
    pub effect_date: String,
    pub expire_date: String,
    /// Base64 JPEG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub id_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dn: Option<String>,
}

fn field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl IdCardInfo {
    /// Parse the JSON string handed back by the vendor decoder.
    ///
    /// Type-specific fields depend on `idType`: foreigners carry nationality
    /// (sent in `nation`) and an English name, HK/Macau/Taiwan residents carry
    /// the sign count and pass number, resident cards carry `dn`.
    pub fn from_vendor_json(raw: &str) -> Result<Self, IdCardParseError> {
        let value: Value = serde_json::from_str(raw)?;
        let obj = value.as_object().ok_or(IdCardParseError::NotAnObject)?;

        let photo = field(obj, "photo");
        let id_type = field(obj, "idType");

        let mut info = Self {
            name: field(obj, "name"),
            gender: field(obj, "gender"),
            nation: field(obj, "nation"),
            birthday: field(obj, "birthday"),
            address: field(obj, "address"),
            id_num: field(obj, "idNum"),
            issue_org: field(obj, "issueOrg"),
            effect_date: field(obj, "effectDate"),
            expire_date: field(obj, "expireDate"),
            photo: (!photo.is_empty()).then_some(photo),
            id_type,
            ..Default::default()
        };

        match info.card_type() {
            IdCardType::Foreigner => {
                info.nationality = Some(field(obj, "nation"));
                info.english_name = Some(field(obj, "englishName"));
            }
            IdCardType::HongKongMacauTaiwan => {
                info.sign_count = Some(field(obj, "signCount"));
                info.pass_num = Some(field(obj, "passNum"));
            }
            IdCardType::Resident => {
                info.dn = Some(field(obj, "dn"));
            }
        }

        Ok(info)
    }

    pub fn card_type(&self) -> IdCardType {
        IdCardType::from_code(&self.id_type)
    }

    /// `19900101` → `1990-01-01`; anything else is returned unchanged
    pub fn formatted_birthday(&self) -> String {
        let b = &self.birthday;
        if b.len() == 8 && b.chars().all(|c| c.is_ascii_digit()) {
            format!("{}-{}-{}", &b[0..4], &b[4..6], &b[6..8])
        } else {
            b.clone()
        }
    }

    pub fn validity(&self) -> String {
        format!("{} - {}", self.effect_date, self.expire_date)
    }

    /// Decoded photo bytes
    pub fn photo_bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.photo.as_deref().map(|p| STANDARD.decode(p.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resident_card() {
        let info = IdCardInfo::from_vendor_json(
            r#"{"name":"张三","gender":"男","nation":"汉","birthday":"19900101","address":"广州",
                "idNum":"440101199001010011","issueOrg":"广州市公安局","effectDate":"20200101",
                "expireDate":"20400101","idType":"","dn":"DN01","photo":"aGVsbG8="}"#,
        )
        .unwrap();
        assert_eq!(info.card_type(), IdCardType::Resident);
        assert_eq!(info.dn.as_deref(), Some("DN01"));
        assert!(info.nationality.is_none());
        assert_eq!(info.formatted_birthday(), "1990-01-01");
        assert_eq!(info.photo_bytes().unwrap().unwrap(), b"hello");
    }

    #[test]
    fn test_foreigner_card_takes_nationality_from_nation() {
        let info = IdCardInfo::from_vendor_json(
            r#"{"name":"JOHN","nation":"USA","idType":"I","englishName":"JOHN SMITH"}"#,
        )
        .unwrap();
        assert_eq!(info.card_type(), IdCardType::Foreigner);
        assert_eq!(info.nationality.as_deref(), Some("USA"));
        assert_eq!(info.english_name.as_deref(), Some("JOHN SMITH"));
        assert!(info.dn.is_none());
        assert!(info.photo.is_none());
    }

    #[test]
    fn test_hk_macau_taiwan_card() {
        let info = IdCardInfo::from_vendor_json(r#"{"idType":"J","signCount":2,"passNum":"H123"}"#)
            .unwrap();
        assert_eq!(info.sign_count.as_deref(), Some("2"));
        assert_eq!(info.pass_num.as_deref(), Some("H123"));
    }

    #[test]
    fn test_invalid_payload() {
        assert!(IdCardInfo::from_vendor_json("not json").is_err());
        assert!(matches!(
            IdCardInfo::from_vendor_json("[1,2]"),
            Err(IdCardParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_birthday_passthrough() {
        let info = IdCardInfo { birthday: "1990-1-1".into(), ..Default::default() };
        assert_eq!(info.formatted_birthday(), "1990-1-1");
    }
}
