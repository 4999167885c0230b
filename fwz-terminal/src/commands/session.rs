//! login / logout / home

use std::sync::Arc;

use anyhow::bail;

use super::render::print_rows;
use crate::core::{AppContext, Route};
use crate::screens::{HomeScreen, LoginScreen};

pub async fn login(ctx: &Arc<AppContext>, username: &str, password: &str) -> anyhow::Result<()> {
    let screen = LoginScreen::new(ctx.clone());
    if !screen.submit(username, password).await {
        bail!("登录失败");
    }
    println!("登录成功");
    home(ctx).await
}

pub fn logout(ctx: &Arc<AppContext>) -> anyhow::Result<()> {
    let mut home = HomeScreen::new(ctx.clone());
    home.logout();
    println!("已退出登录");
    Ok(())
}

pub async fn home(ctx: &Arc<AppContext>) -> anyhow::Result<()> {
    ctx.reset(Route::Home);
    let mut home = HomeScreen::new(ctx.clone());
    home.on_mount().await;
    if ctx.current_route() == Route::Login {
        bail!("未登录");
    }

    let session = ctx.session().load()?;
    match home.terminal() {
        Some(t) => {
            let mut rows = vec![
                ("商户名称", t.merchant_name.clone()),
                ("账号", format!("{} ({})", t.account_name, t.account_type_label())),
                ("设备编码", t.equipment_coding.clone()),
                ("地址", t.addr.clone()),
            ];
            if let Some(url) = home.picture_url() {
                rows.push(("店铺图片", url));
            }
            print_rows(&rows);
        }
        None => println!("终端信息获取失败"),
    }
    if let Some(s) = session {
        print_rows(&[(
            "商户ID",
            s.merchant_id.map(|id| id.to_string()).unwrap_or_default(),
        )]);
    }
    Ok(())
}
