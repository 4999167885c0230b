//! 扫码处理 (Home and "继续扫码核销")

use shared::models::ESS_CHECK_CHANNEL;
use shared::scan::{ScanError, ScanPayload};

use crate::core::feedback::{MSG_LOGIN_FIRST, MSG_NO_MERCHANT, TITLE_HINT};
use crate::core::{AppContext, Channel, Route, VerificationListParams};

/// Where a scan leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// Open (or re-query) the verification list
    List(VerificationListParams),
    /// Alert shown, nothing to open
    Rejected,
}

/// Classify a QR payload and resolve it to a verification list query.
///
/// Order QR codes carry the order id; anything else is checked by the
/// electronic social-security card SDK, which yields the holder's ID number.
pub async fn resolve_scan(ctx: &AppContext, raw: &str) -> ScanTarget {
    match ctx.token() {
        Ok(Some(_)) => {}
        Ok(None) => {
            ctx.alert(TITLE_HINT, MSG_LOGIN_FIRST);
            ctx.replace(Route::Login);
            return ScanTarget::Rejected;
        }
        Err(e) => {
            ctx.report(TITLE_HINT, "", &e);
            return ScanTarget::Rejected;
        }
    }

    let payload = match ScanPayload::parse(raw) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Unrecognized QR payload");
            ctx.alert("扫码错误", ScanError::Unrecognized.to_string());
            return ScanTarget::Rejected;
        }
    };

    match payload {
        ScanPayload::OrderTicket {
            order_id,
            ticket_code,
        } => {
            tracing::info!(%order_id, %ticket_code, "Order QR scanned");
            ScanTarget::List(VerificationListParams::scanned_order(order_id))
        }
        ScanPayload::SocialSecurityQr(qr) => check_ess_card(ctx, &qr).await,
    }
}

async fn check_ess_card(ctx: &AppContext, qr: &str) -> ScanTarget {
    let ess = &ctx.devices().ess;
    let settings = ctx.settings();

    if let Err(failure) = ess.init_params(&settings.ess_url, &settings.ess_platform).await {
        tracing::warn!(code = failure.code, message = %failure.message, "ESS init failed");
        ctx.alert("错误提示", failure.message);
        return ScanTarget::Rejected;
    }

    match ess.check(qr, ESS_CHECK_CHANNEL).await {
        Ok(result) if result.is_success() => {
            tracing::info!("ESS card verified");
            ScanTarget::List(VerificationListParams::id_card(result.id_no, Channel::Scan))
        }
        Ok(result) => {
            tracing::warn!(code = result.result_code, "ESS check rejected");
            ctx.alert("核销失败", result.failure_message());
            ScanTarget::Rejected
        }
        Err(failure) => {
            tracing::warn!(code = failure.code, message = %failure.message, "ESS check failed");
            ctx.alert("核销失败", failure.message);
            ScanTarget::Rejected
        }
    }
}

/// Home variant: a resolved scan opens the verification list
pub async fn scan_and_open(ctx: &AppContext, raw: &str) -> ScanTarget {
    if matches!(ctx.token(), Ok(Some(_))) && ctx.require_merchant().is_err() {
        ctx.alert(TITLE_HINT, MSG_NO_MERCHANT);
        return ScanTarget::Rejected;
    }
    let target = resolve_scan(ctx, raw).await;
    if let ScanTarget::List(params) = &target {
        ctx.navigate(Route::VerificationList(params.clone()));
    }
    target
}
