//! `fwz` subcommand handlers
//!
//! Each handler mounts the screen controllers a terminal operator would walk
//! through and prints what the page would show. Alerts raised on the way
//! are printed after the command.
//!
//! # Usage
//!
//! ```bash
//! fwz login -u ydrzd02 -p ******
//! fwz orders --keyword 1568758870 --pages 2
//! fwz scan 1568758870_8780-0
//! fwz verify 1568758870 --quantity 2
//! fwz read-card --kind social --devices fixtures/devices.json
//! ```

mod card;
mod orders;
mod render;
mod session;

use std::sync::Arc;

use crate::config::Command;
use crate::core::AppContext;

pub use render::print_alerts;

pub async fn run(ctx: Arc<AppContext>, command: Command) -> anyhow::Result<()> {
    let result = match command {
        Command::Login { username, password } => {
            session::login(&ctx, &username, &password).await
        }
        Command::Logout => session::logout(&ctx),
        Command::Home => session::home(&ctx).await,
        Command::Orders { keyword, pages } => orders::list(&ctx, keyword, pages).await,
        Command::Scan { payload } => orders::scan(&ctx, payload).await,
        Command::Verify {
            order_id,
            quantity,
            tourists,
        } => orders::verify(&ctx, order_id, quantity, tourists).await,
        Command::Detail { order_id } => orders::detail(&ctx, order_id).await,
        Command::NfcStatus => card::nfc_status(&ctx).await,
        Command::ReadCard { kind } => card::read_card(&ctx, kind).await,
        Command::IdCardDemo => card::id_card_demo(&ctx).await,
    };

    print_alerts(&ctx);
    tracing::debug!(route = ctx.current_route().name(), "Command finished");
    result
}
