//! HTTP client for the merchant backend
//!
//! Every operation issues exactly one request and hands back the decoded
//! envelope; interpreting `success`/`code` is left to the caller.

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    LoginData, LoginRequest, MerchantOrderQuery, Order, OrderPage, TerminalDetail,
    VerificationInfo, VerificationOrderQuery, VerificationRequest,
};

use crate::query::to_query_pairs;
use crate::{ApiResponse, ClientConfig, ClientError, ClientResult, Endpoints};

/// Merchant backend client
#[derive(Debug, Clone)]
pub struct FwzClient {
    client: Client,
    config: ClientConfig,
}

impl FwzClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The backend expects the bare token, without a `Bearer` prefix
    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) if !token.is_empty() => {
                request.header(reqwest::header::AUTHORIZATION, token)
            }
            _ => request,
        }
    }

    /// Make a GET request with query parameters
    pub async fn get<T, Q>(
        &self,
        path: &str,
        params: &Q,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        let pairs = to_query_pairs(params)?;
        tracing::debug!(%url, params = pairs.len(), "GET");

        let request = Self::authorize(self.client.get(&url).query(&pairs), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        tracing::debug!(%url, "POST");

        let request = Self::authorize(self.client.post(&url).json(body), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Decode the envelope. A non-2xx body that still parses as an envelope
    /// is returned as-is so the caller sees the backend's code and message.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return match serde_json::from_str::<ApiResponse<T>>(&body) {
                Ok(envelope) => {
                    tracing::warn!(status = status.as_u16(), code = %envelope.code, "Request failed");
                    Ok(envelope)
                }
                Err(_) => {
                    tracing::warn!(status = status.as_u16(), "Request failed without envelope");
                    Err(ClientError::Status {
                        status: status.as_u16(),
                        body,
                    })
                }
            };
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ========== Auth API ==========

    /// 登录 (no token)
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        equipment_coding: &str,
    ) -> ClientResult<ApiResponse<LoginData>> {
        let request = LoginRequest::terminal(username, password, equipment_coding);
        self.post(Endpoints::LOGIN, &request, None).await
    }

    // ========== Order API ==========

    /// 订单查询列表
    pub async fn page_merchant_orders(
        &self,
        query: &MerchantOrderQuery,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<OrderPage<Order>>> {
        self.get(Endpoints::MERCHANT_ORDER, query, token).await
    }

    /// 终端详情
    pub async fn terminal_detail(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<TerminalDetail>> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Params {
            user_id: i64,
        }

        self.get(Endpoints::TERMINAL_DETAIL, &Params { user_id }, token)
            .await
    }

    // ========== Verification API ==========

    /// 待核销订单列表 (by id card or order id)
    pub async fn page_verification_orders(
        &self,
        query: &VerificationOrderQuery,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<OrderPage<Order>>> {
        self.get(Endpoints::VERIFICATION_ORDER, query, token).await
    }

    /// 核销信息: used / remaining counts and tourists
    pub async fn verification_info(
        &self,
        order_id: i64,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<VerificationInfo>> {
        self.get(Endpoints::VERIFICATION_INFO, &OrderIdParams { order_id }, token)
            .await
    }

    /// 提交核销
    pub async fn submit_verification(
        &self,
        request: &VerificationRequest,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<serde_json::Value>> {
        tracing::info!(
            order_id = request.order_id(),
            num = ?request.verification_num(),
            tourists = ?request.tourist_ids().map(<[i64]>::len),
            "Submitting verification"
        );
        self.post(Endpoints::VERIFICATION, request, token).await
    }

    /// 订单详情
    pub async fn verification_order(
        &self,
        order_id: i64,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<Order>> {
        self.get(
            Endpoints::GET_VERIFICATION_ORDER,
            &OrderIdParams { order_id },
            token,
        )
        .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderIdParams {
    order_id: i64,
}
