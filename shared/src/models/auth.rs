//! Login DTOs

use serde::{Deserialize, Serialize};

/// 商户终端登录使用的系统类型
pub const TERMINAL_SYS_TYPE: i32 = 8;

/// Login request body for `POST /ua/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// 用户名
    pub principal: String,
    /// 密码
    pub credentials: String,
    pub sys_type: i32,
    /// 设备唯一编码
    #[serde(default)]
    pub equipment_coding: String,
}

impl LoginRequest {
    pub fn terminal(
        username: impl Into<String>,
        password: impl Into<String>,
        equipment_coding: impl Into<String>,
    ) -> Self {
        Self {
            principal: username.into(),
            credentials: password.into(),
            sys_type: TERMINAL_SYS_TYPE,
            equipment_coding: equipment_coding.into(),
        }
    }
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, deserialize_with = "crate::util::lenient::opt_i64")]
    pub tenant_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::util::lenient::opt_i64")]
    pub merchant_id: Option<i64>,
    #[serde(default)]
    pub merchant_account: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default, deserialize_with = "crate::util::lenient::opt_i64")]
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_shape() {
        let req = LoginRequest::terminal("ydrzd02", "secret", "dev-1");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["principal"], "ydrzd02");
        assert_eq!(json["credentials"], "secret");
        assert_eq!(json["sysType"], 8);
        assert_eq!(json["equipmentCoding"], "dev-1");
    }

    #[test]
    fn test_login_data_tolerates_partial_payload() {
        let data: LoginData = serde_json::from_str(
            r#"{"accessToken":"a","refreshToken":"r","expiresIn":7200,"tenantId":"12","userId":3}"#,
        )
        .unwrap();
        assert_eq!(data.tenant_id, Some(12));
        assert_eq!(data.user_id, Some(3));
        assert!(data.merchant_id.is_none());
        assert!(data.merchant_name.is_none());
    }
}
