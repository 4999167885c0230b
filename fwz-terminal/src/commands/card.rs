//! nfc-status / read-card / id-card-demo
//!
//! Tags come from the device fixture and are presented to the reader one
//! by one, as if the operator tapped them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;

use super::orders::show_list;
use super::render::print_rows;
use crate::core::{AppContext, DeviceFixture, NfcTag, Route, TagOutcome};
use crate::events::CardKind;
use crate::screens::{IdCardDemoScreen, WaitingCardScreen};

const READ_TIMEOUT: Duration = Duration::from_secs(15);

fn fixture_tags(ctx: &AppContext) -> anyhow::Result<Vec<NfcTag>> {
    let Some(path) = &ctx.settings().devices else {
        return Ok(Vec::new());
    };
    Ok(DeviceFixture::load(path)?.tags)
}

pub async fn nfc_status(ctx: &Arc<AppContext>) -> anyhow::Result<()> {
    let status = ctx.bridge().check_nfc_available().await;
    print_rows(&[
        ("NFC状态", status.label().to_string()),
        ("硬件", status.available.to_string()),
        ("已启用", status.enabled.to_string()),
    ]);
    if !status.is_ready() {
        println!("读卡功能不可用");
    }
    Ok(())
}

pub async fn read_card(ctx: &Arc<AppContext>, kind: CardKind) -> anyhow::Result<()> {
    ctx.reset(Route::Home);
    ctx.navigate(Route::WaitingCard(kind));

    let mut screen = WaitingCardScreen::new(ctx.clone(), kind);
    println!("== {} ==", screen.title());
    if !screen.on_focus().await {
        return Ok(());
    }
    println!("{}", screen.prompt());

    let tags = fixture_tags(ctx)?;
    if tags.is_empty() {
        screen.on_blur().await;
        bail!("设备配置中没有可读取的卡片");
    }

    for tag in tags {
        if ctx.bridge().on_tag_detected(tag) != TagOutcome::Accepted {
            continue;
        }
        // Start, then the result
        while let Some(event) = screen.next_event(READ_TIMEOUT).await {
            if let Some(text) = screen.reading_text() {
                println!("{text}");
            }
            if event.is_terminal() {
                break;
            }
        }
        if let Route::VerificationList(params) = ctx.current_route() {
            screen.on_blur().await;
            return show_list(ctx, params).await;
        }
    }

    screen.on_blur().await;
    Ok(())
}

pub async fn id_card_demo(ctx: &Arc<AppContext>) -> anyhow::Result<()> {
    ctx.reset(Route::Home);
    ctx.navigate(Route::IdCardDemo);

    let mut screen = IdCardDemoScreen::new(ctx.clone());
    screen.on_mount().await;
    println!("NFC状态: {}", screen.nfc().label());
    if !screen.start().await {
        return Ok(());
    }
    println!("读取状态: {}", screen.status());

    for tag in fixture_tags(ctx)? {
        if ctx.bridge().on_tag_detected(tag) != TagOutcome::Accepted {
            continue;
        }
        while let Some(event) = screen.next_event(READ_TIMEOUT).await {
            println!("读取状态: {}", screen.status());
            if event.is_terminal() {
                break;
            }
        }
        if screen.info().is_some() {
            println!("== 身份证信息 ==");
            print_rows(&screen.info_rows());
            break;
        }
    }

    screen.stop().await;
    println!("读取状态: {}", screen.status());
    Ok(())
}
