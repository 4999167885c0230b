//! Operator-facing alerts

use std::collections::VecDeque;
use std::sync::Mutex;

pub const TITLE_HINT: &str = "提示";
pub const TITLE_ERROR: &str = "错误";
pub const TITLE_SESSION_EXPIRED: &str = "登录已过期";

pub const MSG_NETWORK: &str = "网络错误，请稍后重试";
pub const MSG_RELOGIN: &str = "请重新登录";
pub const MSG_LOGIN_FIRST: &str = "请先登录";
pub const MSG_NO_MERCHANT: &str = "未获取到商户信息";
pub const MSG_STORE_FAILED: &str = "获取登录信息失败，请重新登录";

/// Modal alert (title + message, single OK button)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "【{}】{}", self.title, self.message)
    }
}

/// FIFO of alerts not yet shown
#[derive(Debug, Default)]
pub struct AlertQueue {
    inner: Mutex<VecDeque<Alert>>,
}

impl AlertQueue {
    pub fn push(&self, alert: Alert) {
        tracing::info!(title = %alert.title, message = %alert.message, "Alert");
        if let Ok(mut q) = self.inner.lock() {
            q.push_back(alert);
        }
    }

    pub fn drain(&self) -> Vec<Alert> {
        self.inner
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Alert> {
        self.inner.lock().ok().and_then(|q| q.back().cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
