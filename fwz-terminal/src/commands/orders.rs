//! orders / scan / verify / detail

use std::sync::Arc;

use anyhow::{anyhow, bail};
use shared::models::OrderType;

use super::render::{print_order, print_orders, print_outcome, print_rows};
use crate::core::{AppContext, AppError, Route};
use crate::screens::{
    HomeScreen, ModalOutcome, OrderDetailScreen, OrderQueryScreen, ScanTarget,
    VerificationListScreen,
};

pub async fn list(ctx: &Arc<AppContext>, keyword: Option<String>, pages: u32) -> anyhow::Result<()> {
    ctx.reset(Route::Home);
    ctx.navigate(Route::OrderQuery);

    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.search(keyword.unwrap_or_default()).await;
    for _ in 1..pages {
        if !screen.load_more().await {
            break;
        }
    }

    println!("共 {} 条订单", screen.total());
    print_orders(screen.orders(), screen.has_more());
    Ok(())
}

pub async fn scan(ctx: &Arc<AppContext>, payload: Option<String>) -> anyhow::Result<()> {
    ctx.reset(Route::Home);
    let home = HomeScreen::new(ctx.clone());
    let target = match payload {
        Some(raw) => home.handle_scan(&raw).await,
        None => match home.scan().await {
            Some(target) => target,
            None => {
                println!("已取消扫码");
                return Ok(());
            }
        },
    };

    match target {
        ScanTarget::List(params) => show_list(ctx, params).await,
        ScanTarget::Rejected => Ok(()),
    }
}

pub(super) async fn show_list(
    ctx: &Arc<AppContext>,
    params: crate::core::VerificationListParams,
) -> anyhow::Result<()> {
    let mut screen = VerificationListScreen::new(ctx.clone(), params);
    screen.on_mount().await;
    println!("== {} ==", screen.title());
    match screen.result() {
        Some(outcome) => print_outcome(outcome),
        None => print_orders(screen.orders(), screen.has_more()),
    }
    Ok(())
}

pub async fn verify(
    ctx: &Arc<AppContext>,
    order_id: i64,
    quantity: Option<String>,
    tourists: Vec<i64>,
) -> anyhow::Result<()> {
    let token = ctx.require_token()?;
    let order = ctx
        .client()
        .verification_order(order_id, Some(&token))
        .await
        .map_err(AppError::from)
        .and_then(|r| ctx.check(r));
    let order = match order {
        Ok(order) => order,
        Err(e) => {
            ctx.report("核销失败", "未获取到订单信息", &e);
            return Err(anyhow!(e));
        }
    };
    print_order(&order);

    ctx.reset(Route::Home);
    ctx.navigate(Route::OrderQuery);
    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.verify(&order).await;

    let Some(modal) = screen.modal_mut() else {
        // direct verification, outcome is in the alerts
        return Ok(());
    };

    let info = modal.selection().info().clone();
    println!(
        "已核销 {} / 剩余 {}",
        info.used_count, info.remaining_count
    );
    for t in &info.remaining_list {
        println!("  游客 {} {} {}", t.tourist_id, t.name, t.number);
    }

    match modal.selection().order_type() {
        OrderType::Tour if tourists.is_empty() => {
            bail!("请使用 --tourist 选择核销游客");
        }
        OrderType::Ticket if quantity.is_none() => {
            bail!("请使用 --quantity 指定核销数量");
        }
        _ => {}
    }

    let selection = modal.selection_mut();
    if let Some(q) = quantity {
        selection.set_quantity(q);
    }
    for id in tourists {
        if !selection.select_tourist(id) {
            tracing::warn!(tourist_id = id, "Tourist not in remaining list");
        }
    }

    match screen.submit_selection().await {
        Some(ModalOutcome::Submitted(outcome)) => {
            print_outcome(&outcome);
            Ok(())
        }
        _ => bail!("核销未完成"),
    }
}

pub async fn detail(ctx: &Arc<AppContext>, order_id: i64) -> anyhow::Result<()> {
    ctx.require_token()?;
    let merchant_id = ctx.require_merchant()?;

    ctx.reset(Route::Home);
    ctx.navigate(Route::OrderDetail {
        order_id,
        merchant_id,
    });
    let mut screen = OrderDetailScreen::new(ctx.clone(), order_id, merchant_id);
    screen.on_mount().await;

    if screen.order().is_none() {
        bail!("订单详情获取失败");
    }
    println!("== 订单详情 ==");
    print_rows(&screen.rows());
    Ok(())
}
