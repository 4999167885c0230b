//! AppContext - 应用上下文
//!
//! One per terminal. Every screen controller borrows it for the API client,
//! the session store, the navigator, the alert queue and the devices.

use std::sync::{Mutex, MutexGuard};

use fwz_client::{FwzClient, JsonFileStore, KeyValueStore, SessionStore};
use shared::response::ApiResponse;

use super::card::CardBridge;
use super::devices::Devices;
use super::error::{AppError, AppResult, CardError};
use super::feedback::{
    Alert, AlertQueue, MSG_LOGIN_FIRST, MSG_NETWORK, MSG_NO_MERCHANT, MSG_RELOGIN,
    MSG_STORE_FAILED, TITLE_ERROR, TITLE_HINT, TITLE_SESSION_EXPIRED,
};
use super::navigation::{Navigator, Route};
use super::replay::{DeviceFixture, ReplayDevices};
use crate::config::AppSettings;

pub type TerminalSession = SessionStore<Box<dyn KeyValueStore>>;

pub struct AppContext {
    client: FwzClient,
    session: TerminalSession,
    devices: Devices,
    bridge: CardBridge,
    settings: AppSettings,
    navigator: Mutex<Navigator>,
    alerts: AlertQueue,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("base_url", &self.client.base_url())
            .field("route", &self.current_route().name())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(
        settings: AppSettings,
        client: FwzClient,
        store: Box<dyn KeyValueStore>,
        devices: Devices,
    ) -> Self {
        let bridge = CardBridge::new(devices.clone(), settings.reader_endpoint());
        Self {
            client,
            session: SessionStore::new(store),
            devices,
            bridge,
            settings,
            navigator: Mutex::new(Navigator::default()),
            alerts: AlertQueue::default(),
        }
    }

    /// Build everything from settings: file-backed session in the data
    /// directory, devices from the fixture (none when unset).
    pub fn from_settings(settings: AppSettings) -> AppResult<Self> {
        let client = FwzClient::new(&settings.client_config())?;
        let store = JsonFileStore::open(&settings.data_dir)?;
        let devices = match &settings.devices {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading device fixture");
                ReplayDevices::new(DeviceFixture::load(path)?).devices()
            }
            None => Devices::unavailable(),
        };
        Ok(Self::new(settings, client, Box::new(store), devices))
    }

    pub fn client(&self) -> &FwzClient {
        &self.client
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn bridge(&self) -> &CardBridge {
        &self.bridge
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    // ========== Navigation ==========

    pub fn navigate(&self, route: Route) {
        self.nav().navigate(route);
    }

    pub fn replace(&self, route: Route) {
        self.nav().replace(route);
    }

    pub fn go_back(&self) -> bool {
        self.nav().go_back()
    }

    pub fn reset(&self, route: Route) {
        self.nav().reset(route);
    }

    pub fn current_route(&self) -> Route {
        self.nav().current().clone()
    }

    pub fn navigator(&self) -> Navigator {
        self.nav().clone()
    }

    fn nav(&self) -> MutexGuard<'_, Navigator> {
        self.navigator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========== Alerts ==========

    pub fn alert(&self, title: impl Into<String>, message: impl Into<String>) {
        self.alerts.push(Alert::new(title, message));
    }

    pub fn take_alerts(&self) -> Vec<Alert> {
        self.alerts.drain()
    }

    pub fn last_alert(&self) -> Option<Alert> {
        self.alerts.last()
    }

    // ========== Session ==========

    pub fn token(&self) -> AppResult<Option<String>> {
        Ok(self.session.access_token()?)
    }

    pub fn require_token(&self) -> AppResult<String> {
        self.token()?.ok_or(AppError::NotAuthenticated)
    }

    pub fn require_merchant(&self) -> AppResult<i64> {
        self.session
            .merchant_id()?
            .ok_or(AppError::MissingMerchant)
    }

    /// 登录已过期: clear everything and start over at Login
    pub fn expire_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        self.alert(TITLE_SESSION_EXPIRED, MSG_RELOGIN);
        self.reset(Route::Login);
    }

    /// Split an envelope, turning `success=false` into [`AppError::Business`]
    pub fn check<T>(&self, response: ApiResponse<T>) -> AppResult<T> {
        Ok(response.into_data()?)
    }

    /// Show `err` to the operator.
    ///
    /// `title` and `fallback` are the call site's alert title and the message
    /// used when the backend sent none.
    pub fn report(&self, title: &str, fallback: &str, err: &AppError) {
        self.report_as(title, fallback, MSG_NETWORK, err);
    }

    /// Like [`report`](Self::report) with a call-site specific message for
    /// transport failures.
    pub fn report_as(&self, title: &str, fallback: &str, network_msg: &str, err: &AppError) {
        tracing::warn!(category = err.category().name(), error = %err, title, "Operation failed");

        if err.is_session_expired() {
            self.expire_session();
            return;
        }

        match err {
            AppError::Client(_) => self.alert(title, network_msg),
            AppError::Business(e) => {
                let msg = if e.msg.trim().is_empty() {
                    fallback
                } else {
                    e.msg.as_str()
                };
                self.alert(title, msg);
            }
            AppError::NotAuthenticated => {
                self.alert(TITLE_HINT, MSG_LOGIN_FIRST);
                self.replace(Route::Login);
            }
            AppError::MissingMerchant => self.alert(TITLE_HINT, MSG_NO_MERCHANT),
            AppError::Store(_) => {
                self.alert(TITLE_ERROR, MSG_STORE_FAILED);
                self.reset(Route::Login);
            }
            AppError::Card(CardError::Vendor(failure)) => self.alert(title, &failure.message),
            AppError::Card(e) => self.alert(title, e.to_string()),
            AppError::Scan(e) => self.alert(title, e.to_string()),
            AppError::Config(msg) => self.alert(TITLE_ERROR, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwz_client::{ClientConfig, ClientError, MemoryStore};
    use shared::error::BusinessError;
    use shared::models::{KEY_ACCESS_TOKEN, KEY_MERCHANT_ID};

    fn context() -> AppContext {
        let client = FwzClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        AppContext::new(
            AppSettings::default(),
            client,
            Box::new(MemoryStore::new()),
            Devices::unavailable(),
        )
    }

    #[test]
    fn test_session_expired_resets_to_login() {
        let ctx = context();
        ctx.session()
            .inner()
            .set_many(&[(KEY_ACCESS_TOKEN, "tok".into()), (KEY_MERCHANT_ID, "9".into())])
            .unwrap();
        ctx.reset(Route::Home);
        ctx.navigate(Route::OrderQuery);

        ctx.report("获取订单失败", "请稍后重试", &BusinessError::new("401", "token失效").into());

        assert_eq!(ctx.current_route(), Route::Login);
        assert_eq!(ctx.navigator().depth(), 1);
        assert_eq!(ctx.token().unwrap(), None);
        assert_eq!(ctx.session().merchant_id().unwrap(), None);
        assert_eq!(
            ctx.take_alerts(),
            vec![Alert::new("登录已过期", "请重新登录")]
        );
    }

    #[test]
    fn test_report_messages() {
        let ctx = context();
        ctx.report(
            "获取订单失败",
            "请稍后重试",
            &ClientError::InvalidResponse("eof".into()).into(),
        );
        ctx.report("获取订单失败", "请稍后重试", &BusinessError::new("A01", "").into());
        ctx.report("核销失败", "核销请求失败", &BusinessError::new("A02", "已退款").into());
        ctx.report("核销失败", "", &AppError::MissingMerchant);

        let messages: Vec<_> = ctx.take_alerts().into_iter().map(|a| a.message).collect();
        assert_eq!(
            messages,
            vec!["网络错误，请稍后重试", "请稍后重试", "已退款", "未获取到商户信息"]
        );
    }

    #[test]
    fn test_require_session_values() {
        let ctx = context();
        assert!(matches!(ctx.require_token(), Err(AppError::NotAuthenticated)));
        assert!(matches!(ctx.require_merchant(), Err(AppError::MissingMerchant)));

        ctx.reset(Route::Home);
        ctx.report("", "", &AppError::NotAuthenticated);
        assert_eq!(ctx.current_route(), Route::Login);
        assert_eq!(ctx.last_alert().unwrap().message, "请先登录");
    }
}
