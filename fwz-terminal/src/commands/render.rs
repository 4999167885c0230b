//! Plain-text rendering of screen state

use shared::models::Order;

use crate::core::{AppContext, VerificationOutcome};

pub fn print_alerts(ctx: &AppContext) {
    for alert in ctx.take_alerts() {
        println!("{alert}");
    }
}

pub fn print_rows(rows: &[(&str, String)]) {
    for (label, value) in rows {
        println!("  {label:<8} {value}");
    }
}

pub fn print_order(order: &Order) {
    println!("订单号 {}  [{}]", order.order_id, order.status_text());
    let mut rows = vec![
        ("商品名称", order.spu_name.clone()),
        ("商品类型", order.order_type_text()),
        (order.count_label(), order.spu_count.to_string()),
        ("订单金额", order.amount_text()),
        ("下单时间", order.display_time().to_string()),
        ("用户账号", order.member_account.clone()),
    ];
    if let Some(refund) = order.refund_text() {
        rows.push(("退款金额", refund));
    }
    if let Some(kind) = order.verification_type_text() {
        rows.push(("核销方式", kind));
    }
    print_rows(&rows);
    if order.is_verifiable() {
        println!("  -> fwz verify {}", order.order_id);
    }
}

pub fn print_orders(orders: &[Order], has_more: bool) {
    if orders.is_empty() {
        println!("暂无订单");
        return;
    }
    for order in orders {
        print_order(order);
    }
    if !has_more {
        println!("没有更多数据了");
    }
}

pub fn print_outcome(outcome: &VerificationOutcome) {
    println!("{}", outcome.headline());
    if let Some(detail) = outcome.detail().filter(|d| !d.is_empty()) {
        println!("  {detail}");
    }
}
