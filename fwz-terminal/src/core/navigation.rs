//! Navigation stack
//!
//! Mirrors a native stack navigator: `navigate` returns to an existing screen
//! of the same name instead of stacking a duplicate.

use crate::core::verification::VerificationOutcome;
use crate::events::CardKind;

/// What the verification list queries by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationQuery {
    /// 身份证号 (type 1)
    ByIdCard(String),
    /// 订单号 (type 2)
    ByOrderId(String),
}

impl VerificationQuery {
    pub fn value(&self) -> &str {
        match self {
            Self::ByIdCard(v) | Self::ByOrderId(v) => v,
        }
    }
}

/// How the operator got to the verification list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Scan,
    Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationListParams {
    pub query: VerificationQuery,
    pub channel: Channel,
}

impl VerificationListParams {
    pub fn scanned_order(order_id: impl Into<String>) -> Self {
        Self {
            query: VerificationQuery::ByOrderId(order_id.into()),
            channel: Channel::Scan,
        }
    }

    pub fn id_card(id_no: impl Into<String>, channel: Channel) -> Self {
        Self {
            query: VerificationQuery::ByIdCard(id_no.into()),
            channel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    OrderQuery,
    VerificationList(VerificationListParams),
    VerificationResult(VerificationOutcome),
    OrderDetail { order_id: i64, merchant_id: i64 },
    WaitingCard(CardKind),
    IdCardDemo,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
            Self::OrderQuery => "order-query",
            Self::VerificationList(_) => "verification-list",
            Self::VerificationResult(_) => "verification-result",
            Self::OrderDetail { .. } => "order-detail",
            Self::WaitingCard(_) => "waiting-card",
            Self::IdCardDemo => "idcard-demo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Navigator {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    /// Go to `route`. If a screen with the same name is already on the
    /// stack, pop back to it and update its params.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(to = route.name(), "navigate");
        match self.stack.iter().position(|r| r.name() == route.name()) {
            Some(pos) => {
                self.stack.truncate(pos + 1);
                self.stack[pos] = route;
            }
            None => self.stack.push(route),
        }
    }

    /// Swap the top screen
    pub fn replace(&mut self, route: Route) {
        tracing::debug!(to = route.name(), "replace");
        self.stack.pop();
        self.stack.push(route);
    }

    /// Pop the top screen; the root is never popped
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self, route: Route) {
        tracing::debug!(to = route.name(), "reset");
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn current(&self) -> &Route {
        // stack is never empty
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }
}
