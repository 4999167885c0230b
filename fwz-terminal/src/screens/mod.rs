//! Screen controllers
//!
//! One controller per page of the terminal. Controllers hold the page state
//! and drive the shared [`AppContext`](crate::core::AppContext): API calls,
//! session reads, navigation and alerts.

pub mod home;
pub mod idcard_demo;
pub mod login;
pub mod order_detail;
pub mod order_query;
pub mod scan;
pub mod verification_list;
pub mod verification_modal;
pub mod verification_result;
pub mod waiting_card;

pub use home::HomeScreen;
pub use idcard_demo::IdCardDemoScreen;
pub use login::LoginScreen;
pub use order_detail::OrderDetailScreen;
pub use order_query::OrderQueryScreen;
pub use scan::ScanTarget;
pub use verification_list::VerificationListScreen;
pub use verification_modal::{ModalOutcome, VerificationModal};
pub use verification_result::VerificationResultScreen;
pub use waiting_card::WaitingCardScreen;

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};

use crate::events::CardEvent;

/// Card event listener of a screen
///
/// Waits up to `wait` for the next event; lagged events are skipped.
pub(crate) async fn next_card_event(
    rx: &mut broadcast::Receiver<CardEvent>,
    wait: Duration,
) -> Option<CardEvent> {
    let recv = async {
        loop {
            match rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Card events dropped, listener lagging");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    };
    tokio::time::timeout(wait, recv).await.ok().flatten()
}
