//! Card reader event definitions
//!
//! The card bridge publishes a [`CardEvent`] for every step of a read. Screens
//! consume the typed form; [`CardEvent::to_wire`] renders the flat
//! `onReadCardError` payload the device layer has always emitted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use shared::models::{IdCardInfo, SocialCardRecord};

/// Wire event name
pub const CARD_EVENT_NAME: &str = "onReadCardError";

/// Appended to vendor code-2 failures
pub const ACCESS_INFO_HINT: &str = ",请检查传入的接入信息";

pub const ERR_NOT_ID_CARD: &str = "不是有效的身份证";
pub const ERR_ID_CARD_PARSE: &str = "身份证信息解析失败";

/// Which reader mode produced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// 二代身份证 (NFC 解码)
    IdCard,
    /// 社保卡 (非接触式)
    SocialCard,
}

impl CardKind {
    /// Route parameter used by the waiting screen: 1 社保卡, 2 身份证
    pub fn code(&self) -> i32 {
        match self {
            Self::SocialCard => 1,
            Self::IdCard => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::SocialCard),
            2 => Some(Self::IdCard),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SocialCard => "社保卡读取",
            Self::IdCard => "身份证读取",
        }
    }
}

impl std::str::FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" | "idcard" | "id-card" => Ok(Self::IdCard),
            "social" | "social-card" | "sscard" => Ok(Self::SocialCard),
            other => Err(format!("unknown card kind: {other}")),
        }
    }
}

/// Decoded card content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardPayload {
    IdCard(Box<IdCardInfo>),
    SocialCard(SocialCardRecord),
}

impl CardPayload {
    /// The ID number every flow keys on
    pub fn id_number(&self) -> &str {
        match self {
            Self::IdCard(info) => &info.id_num,
            Self::SocialCard(record) => &record.id_no,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEventStatus {
    Start,
    Success(CardPayload),
    Error { code: Option<i32>, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEvent {
    pub kind: CardKind,
    pub status: CardEventStatus,
    /// Unix millis
    pub timestamp: i64,
}

impl CardEvent {
    pub fn new(kind: CardKind, status: CardEventStatus) -> Self {
        Self {
            kind,
            status,
            timestamp: shared::util::now_millis(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, CardEventStatus::Start)
    }

    /// Flat payload of the `onReadCardError` device event
    pub fn to_wire(&self) -> Value {
        let mut obj = match (&self.kind, &self.status) {
            (CardKind::IdCard, CardEventStatus::Start) => wire_object(json!({
                "status": "idcard_start",
                "type": "idcard",
            })),
            (CardKind::IdCard, CardEventStatus::Success(payload)) => {
                let mut obj = match payload {
                    CardPayload::IdCard(info) => {
                        wire_object(serde_json::to_value(info).unwrap_or(Value::Null))
                    }
                    CardPayload::SocialCard(record) => wire_object(json!({ "idNum": record.id_no })),
                };
                obj.insert("status".into(), "idcard_success".into());
                obj.insert("type".into(), "idcard".into());
                obj
            }
            (CardKind::IdCard, CardEventStatus::Error { code, message }) => {
                let mut obj = wire_object(json!({
                    "status": "idcard_error",
                    "type": "idcard",
                    "errorInfo": message,
                }));
                if let Some(code) = code {
                    obj.insert("errorCode".into(), (*code).into());
                }
                obj
            }
            (CardKind::SocialCard, CardEventStatus::Start) => {
                wire_object(json!({ "status": "start" }))
            }
            (CardKind::SocialCard, CardEventStatus::Success(payload)) => {
                let result_info = match payload {
                    CardPayload::SocialCard(record) => record.raw.clone(),
                    CardPayload::IdCard(info) => info.id_num.clone(),
                };
                wire_object(json!({
                    "status": "result",
                    "errorInfo": "",
                    "resultInfo": result_info,
                    "resultCode": 0,
                }))
            }
            (CardKind::SocialCard, CardEventStatus::Error { code, message }) => {
                wire_object(json!({
                    "status": "result",
                    "errorInfo": message,
                    "resultInfo": "",
                    "resultCode": code.unwrap_or(-1),
                }))
            }
        };
        obj.insert("timestamp".into(), self.timestamp.into());
        Value::Object(obj)
    }
}

fn wire_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
