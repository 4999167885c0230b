//! Session record persisted on the terminal
//!
//! Stored as flat key-value pairs; there is no relational structure.

use serde::{Deserialize, Serialize};

use super::auth::LoginData;

pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_REFRESH_TOKEN: &str = "refreshToken";
pub const KEY_TENANT_ID: &str = "tenantId";
pub const KEY_MERCHANT_ID: &str = "merchantId";
pub const KEY_MERCHANT_ACCOUNT: &str = "merchantAccount";
pub const KEY_MERCHANT_NAME: &str = "merchantName";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_EQUIPMENT_CODING: &str = "equipmentCoding";

/// Every key a session may occupy in the local store
pub const SESSION_KEYS: [&str; 8] = [
    KEY_ACCESS_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_TENANT_ID,
    KEY_MERCHANT_ID,
    KEY_MERCHANT_ACCOUNT,
    KEY_MERCHANT_NAME,
    KEY_USER_ID,
    KEY_EQUIPMENT_CODING,
];

/// 登录会话
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub tenant_id: Option<i64>,
    pub merchant_id: Option<i64>,
    pub merchant_account: Option<String>,
    pub merchant_name: Option<String>,
    pub user_id: Option<i64>,
    pub equipment_coding: String,
}

impl Session {
    /// Build the session from a successful login
    pub fn from_login(data: &LoginData, equipment_coding: impl Into<String>) -> Self {
        Self {
            access_token: data.access_token.clone(),
            refresh_token: data.refresh_token.clone(),
            tenant_id: data.tenant_id,
            merchant_id: data.merchant_id,
            merchant_account: data.merchant_account.clone().filter(|s| !s.is_empty()),
            merchant_name: data.merchant_name.clone().filter(|s| !s.is_empty()),
            user_id: data.user_id,
            equipment_coding: equipment_coding.into(),
        }
    }

    /// Key-value pairs to persist. Optional fields the server left empty are skipped.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (KEY_ACCESS_TOKEN, self.access_token.clone()),
            (KEY_REFRESH_TOKEN, self.refresh_token.clone()),
        ];
        if let Some(id) = self.tenant_id {
            pairs.push((KEY_TENANT_ID, id.to_string()));
        }
        if let Some(id) = self.merchant_id {
            pairs.push((KEY_MERCHANT_ID, id.to_string()));
        }
        if let Some(account) = &self.merchant_account {
            pairs.push((KEY_MERCHANT_ACCOUNT, account.clone()));
        }
        if let Some(name) = &self.merchant_name {
            pairs.push((KEY_MERCHANT_NAME, name.clone()));
        }
        if let Some(id) = self.user_id {
            pairs.push((KEY_USER_ID, id.to_string()));
        }
        pairs.push((KEY_EQUIPMENT_CODING, self.equipment_coding.clone()));
        pairs
    }

    /// Rebuild a session from a key lookup. `None` without an access token.
    pub fn from_lookup<F>(mut get: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let access_token = get(KEY_ACCESS_TOKEN).filter(|t| !t.is_empty())?;
        let parse = |v: Option<String>| v.and_then(|s| s.trim().parse::<i64>().ok());
        Some(Self {
            access_token,
            refresh_token: get(KEY_REFRESH_TOKEN).unwrap_or_default(),
            tenant_id: parse(get(KEY_TENANT_ID)),
            merchant_id: parse(get(KEY_MERCHANT_ID)),
            merchant_account: get(KEY_MERCHANT_ACCOUNT),
            merchant_name: get(KEY_MERCHANT_NAME),
            user_id: parse(get(KEY_USER_ID)),
            equipment_coding: get(KEY_EQUIPMENT_CODING).unwrap_or_default(),
        })
    }
}
