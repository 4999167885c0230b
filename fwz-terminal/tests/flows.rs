// fwz-terminal/tests/flows.rs
// 端到端流程: 本地 axum 桩后台 + 回放设备

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::RawQuery;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use fwz_client::{ClientConfig, Endpoints, FwzClient, KeyValueStore, MemoryStore};
use fwz_terminal::core::{
    Alert, Channel, DeviceFixture, Devices, NfcStatus, NfcTag, ReplayDevices, TagOutcome,
    VerificationListParams,
};
use fwz_terminal::events::CardKind;
use fwz_terminal::core::VerificationOutcome;
use fwz_terminal::screens::{
    HomeScreen, LoginScreen, ModalOutcome, OrderDetailScreen, OrderQueryScreen, ScanTarget,
    VerificationListScreen, VerificationResultScreen, WaitingCardScreen,
};
use fwz_terminal::{AppContext, AppSettings, Route};
use serde_json::{Value, json};
use shared::models::{
    EssCheckResult, KEY_ACCESS_TOKEN, KEY_MERCHANT_ID, KEY_TENANT_ID, KEY_USER_ID,
};

const ID_NO: &str = "440101199001010011";

#[derive(Debug, Clone, Default)]
struct Captured {
    query: Option<String>,
    auth: Option<String>,
    body: Option<Value>,
}

type Log = Arc<Mutex<Vec<Captured>>>;

fn auth_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn query_value(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}

/// GET handler answering with `reply(query)`
fn recording_get<F>(log: &Log, reply: F) -> axum::routing::MethodRouter
where
    F: Fn(&str) -> Value + Clone + Send + Sync + 'static,
{
    let log = log.clone();
    get(move |RawQuery(query): RawQuery, headers: HeaderMap| {
        let log = log.clone();
        let reply = reply.clone();
        async move {
            let body = reply(query.as_deref().unwrap_or_default());
            log.lock().unwrap().push(Captured {
                query,
                auth: auth_of(&headers),
                body: None,
            });
            Json(body)
        }
    })
}

fn recording_post(log: &Log, reply: Value) -> axum::routing::MethodRouter {
    let log = log.clone();
    post(move |headers: HeaderMap, Json(body): Json<Value>| {
        let log = log.clone();
        let reply = reply.clone();
        async move {
            log.lock().unwrap().push(Captured {
                query: None,
                auth: auth_of(&headers),
                body: Some(body),
            });
            Json(reply)
        }
    })
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn context(base_url: &str, devices: Devices) -> Arc<AppContext> {
    let settings = AppSettings::default().with_base_url(base_url);
    let client = FwzClient::new(&ClientConfig::new(base_url)).unwrap();
    let ctx = AppContext::new(settings, client, Box::new(MemoryStore::new()), devices);
    ctx.reset(Route::Home);
    Arc::new(ctx)
}

fn log_in(ctx: &AppContext) {
    ctx.session()
        .inner()
        .set_many(&[
            (KEY_ACCESS_TOKEN, "tok-1".to_string()),
            (KEY_TENANT_ID, "1".to_string()),
            (KEY_MERCHANT_ID, "20".to_string()),
            (KEY_USER_ID, "300".to_string()),
        ])
        .unwrap();
}

fn ok(data: Value) -> Value {
    json!({"code": "00000", "success": true, "msg": "ok", "data": data})
}

fn expired() -> Value {
    json!({"code": "401", "success": false, "msg": "token失效", "data": null})
}

/// Session wiped, back on a lone Login page with one alert
fn assert_forced_relogin(ctx: &AppContext) {
    assert_eq!(ctx.current_route(), Route::Login);
    assert_eq!(ctx.navigator().depth(), 1);
    assert_eq!(ctx.token().unwrap(), None);
    assert_eq!(ctx.session().merchant_id().unwrap(), None);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("登录已过期", "请重新登录")]);
}

fn order(order_id: i64, order_type: i64, spu_count: i64) -> Value {
    json!({
        "orderId": order_id.to_string(), "orderType": order_type, "status": 10,
        "total": 1990, "spuName": "成人票", "spuCount": spu_count, "memberAccount": "u1"
    })
}

fn card_devices(nfc: NfcStatus) -> (Arc<ReplayDevices>, Devices) {
    let replay = ReplayDevices::new(DeviceFixture {
        nfc,
        id_card_json: Some(format!(r#"{{"name":"张三","idNum":"{ID_NO}"}}"#)),
        ess: Some(EssCheckResult {
            result_code: 0,
            error_msg: String::new(),
            result_str: String::new(),
            id_no: ID_NO.to_string(),
        }),
        ..Default::default()
    });
    let devices = replay.devices();
    (replay, devices)
}

// ========== 登录 ==========

#[tokio::test]
async fn test_login_persists_session_and_opens_home() {
    let log = Log::default();
    let reply = ok(json!({
        "accessToken": "tok-9", "refreshToken": "ref", "tenantId": 1,
        "merchantId": 20, "userId": 300
    }));
    let url = spawn(Router::new().route(Endpoints::LOGIN, recording_post(&log, reply))).await;
    let ctx = context(&url, Devices::unavailable());
    ctx.reset(Route::Login);

    let screen = LoginScreen::new(ctx.clone());
    assert!(screen.submit("ydrzd02", "pw").await);

    assert_eq!(ctx.current_route(), Route::Home);
    assert_eq!(ctx.navigator().depth(), 1);
    assert_eq!(ctx.token().unwrap().as_deref(), Some("tok-9"));
    assert_eq!(ctx.session().merchant_id().unwrap(), Some(20));
    assert_eq!(ctx.session().user_id().unwrap(), Some(300));
    assert!(ctx.take_alerts().is_empty());

    // a second mount skips the form
    ctx.reset(Route::Login);
    assert!(LoginScreen::new(ctx.clone()).on_mount());
    assert_eq!(ctx.current_route(), Route::Home);
}

#[tokio::test]
async fn test_rejected_login_writes_nothing() {
    let log = Log::default();
    let reply = json!({"code": "A00001", "success": false, "msg": "密码错误", "data": null});
    let url = spawn(Router::new().route(Endpoints::LOGIN, recording_post(&log, reply))).await;
    let ctx = context(&url, Devices::unavailable());
    ctx.reset(Route::Login);

    let screen = LoginScreen::new(ctx.clone());
    assert!(!screen.submit("  ", "pw").await);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("错误", "请输入用户名和密码")]);
    assert!(log.lock().unwrap().is_empty());

    assert!(!screen.submit("ydrzd02", "bad").await);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("错误", "密码错误")]);
    assert_eq!(ctx.current_route(), Route::Login);
    assert_eq!(ctx.token().unwrap(), None);
    assert_eq!(ctx.session().merchant_id().unwrap(), None);
}

// ========== 订单查询 ==========

#[tokio::test]
async fn test_expired_token_clears_session() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::MERCHANT_ORDER,
        recording_get(&log, |_| expired()),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderQuery);

    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.search("").await;

    assert_forced_relogin(&ctx);
    assert_eq!(log.lock().unwrap()[0].auth.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_order_pages_until_short_page() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::MERCHANT_ORDER,
        recording_get(&log, |query| {
            let page: i64 = query_value(query, "pageNum").unwrap().parse().unwrap();
            let rows = if page == 1 { 10 } else { 3 };
            let list: Vec<Value> = (0..rows).map(|i| order(page * 100 + i, 2, 2)).collect();
            ok(json!({"pages": 2, "total": 13, "list": list}))
        }),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.set_keyword("  成人票 ");
    screen.on_mount().await;
    assert_eq!(screen.orders().len(), 10);
    assert_eq!(screen.total(), 13);
    assert!(screen.has_more());

    assert!(screen.load_more().await);
    assert_eq!(screen.orders().len(), 13);
    assert!(!screen.has_more());
    assert!(!screen.load_more().await);

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2);
    let first = calls[0].query.as_deref().unwrap();
    assert_eq!(query_value(first, "merchantId").as_deref(), Some("20"));
    assert_eq!(query_value(first, "tenantId").as_deref(), Some("1"));
    assert!(query_value(first, "keyWord").is_some());
}

#[tokio::test]
async fn test_single_unit_order_is_verified_directly() {
    let log = Log::default();
    let url = spawn(
        Router::new().route(Endpoints::VERIFICATION, recording_post(&log, ok(Value::Null))),
    )
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderQuery);

    let ticket: shared::models::Order = serde_json::from_value(order(1001, 2, 1)).unwrap();
    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.verify(&ticket).await;

    assert!(screen.modal().is_none());
    assert_eq!(ctx.current_route(), Route::Home);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("核销成功", "订单已成功核销")]);
    let calls = log.lock().unwrap();
    assert_eq!(
        calls[0].body,
        Some(json!({"orderId": 1001, "verificationNum": 1}))
    );
}

// ========== 待核销列表 ==========

#[tokio::test]
async fn test_ticket_selection_from_scanned_order() {
    let list_log = Log::default();
    let info_log = Log::default();
    let submit_log = Log::default();
    let app = Router::new()
        .route(
            Endpoints::VERIFICATION_ORDER,
            recording_get(&list_log, |_| {
                ok(json!({"pages": 1, "total": 1, "list": [order(1568758870, 2, 3)]}))
            }),
        )
        .route(
            Endpoints::VERIFICATION_INFO,
            recording_get(&info_log, |_| {
                ok(json!({
                    "orderId": 1568758870, "orderType": 2, "spuCount": 3,
                    "usedCount": 0, "usedList": null, "remainingCount": 3, "remainingList": null
                }))
            }),
        )
        .route(Endpoints::VERIFICATION, recording_post(&submit_log, ok(Value::Null)));
    let url = spawn(app).await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let params = VerificationListParams::scanned_order("1568758870");
    ctx.navigate(Route::VerificationList(params.clone()));
    let mut screen = VerificationListScreen::new(ctx.clone(), params);
    screen.on_mount().await;
    assert_eq!(screen.title(), "扫码核销");
    assert_eq!(screen.orders().len(), 1);
    assert!(screen.result().is_none());

    let query = list_log.lock().unwrap()[0].query.clone().unwrap();
    assert_eq!(query_value(&query, "type").as_deref(), Some("2"));
    assert_eq!(query_value(&query, "orderId").as_deref(), Some("1568758870"));

    let first = screen.orders()[0].clone();
    screen.verify(&first).await;
    let modal = screen.modal_mut().expect("modal open");
    assert_eq!(modal.selection().info().remaining_count, 3);

    modal.selection_mut().set_quantity("5");
    assert_eq!(screen.submit_selection().await, Some(ModalOutcome::Retry));
    assert_eq!(
        ctx.take_alerts(),
        vec![Alert::new("提示", "核销数量不能大于剩余待核销数量")]
    );
    assert!(submit_log.lock().unwrap().is_empty());

    screen.modal_mut().unwrap().selection_mut().set_quantity("2");
    let outcome = screen.submit_selection().await;
    assert!(matches!(outcome, Some(ModalOutcome::Submitted(ref o)) if o.is_ok()));
    assert!(screen.modal().is_none());
    assert!(screen.orders().is_empty());

    let stack: Vec<_> = ctx.navigator().stack().iter().map(|r| r.name()).collect();
    assert_eq!(stack, vec!["home", "verification-result"]);
    match ctx.current_route() {
        Route::VerificationResult(result) => assert_eq!(result.headline(), "核销成功"),
        other => panic!("unexpected route {other:?}"),
    }
    assert_eq!(
        submit_log.lock().unwrap()[0].body,
        Some(json!({"orderId": 1568758870, "verificationNum": 2}))
    );
}

#[tokio::test]
async fn test_no_orders_shows_result_view() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::VERIFICATION_ORDER,
        recording_get(&log, |_| {
            json!({"code": "A00005", "success": false, "msg": "未找到待核销订单", "data": null})
        }),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let params = VerificationListParams::id_card(ID_NO, Channel::Card);
    let mut screen = VerificationListScreen::new(ctx.clone(), params);
    screen.on_mount().await;

    assert_eq!(screen.title(), "刷卡核销");
    assert!(!screen.can_continue_scanning());
    assert!(screen.orders().is_empty());
    assert!(!screen.has_more());
    let result = screen.result().expect("result view");
    assert_eq!(result.order_id, ID_NO);
    assert_eq!(result.headline(), "核销失败");
    assert_eq!(result.detail(), Some("未找到待核销订单"));

    let query = log.lock().unwrap()[0].query.clone().unwrap();
    assert_eq!(query_value(&query, "type").as_deref(), Some("1"));
    assert_eq!(query_value(&query, "idCard").as_deref(), Some(ID_NO));
}

// ========== 读卡 ==========

#[tokio::test]
async fn test_reader_refuses_without_nfc() {
    let ctx = context("http://127.0.0.1:9", Devices::unavailable());
    log_in(&ctx);

    let mut screen = WaitingCardScreen::new(ctx.clone(), CardKind::IdCard);
    assert!(!screen.on_focus().await);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("提示", "设备不支持NFC")]);

    let (_, devices) = card_devices(NfcStatus {
        available: true,
        enabled: false,
    });
    let ctx = context("http://127.0.0.1:9", devices);
    let mut screen = WaitingCardScreen::new(ctx.clone(), CardKind::IdCard);
    assert!(!screen.on_focus().await);
    assert_eq!(
        ctx.take_alerts(),
        vec![Alert::new("提示", "请在系统设置中先启用NFC功能")]
    );
    assert_eq!(ctx.bridge().on_tag_detected(NfcTag::new("t1")), TagOutcome::NotListening);
}

#[tokio::test]
async fn test_id_card_read_opens_card_list() {
    let (replay, devices) = card_devices(NfcStatus {
        available: true,
        enabled: true,
    });
    let ctx = context("http://127.0.0.1:9", devices);
    log_in(&ctx);
    ctx.navigate(Route::WaitingCard(CardKind::IdCard));

    let mut screen = WaitingCardScreen::new(ctx.clone(), CardKind::IdCard);
    assert!(screen.on_focus().await);
    assert!(replay.reader_mode_enabled());

    assert_eq!(ctx.bridge().on_tag_detected(NfcTag::new("04A1")), TagOutcome::Accepted);
    while let Some(event) = screen.next_event(Duration::from_secs(5)).await {
        if event.is_terminal() {
            break;
        }
    }

    assert_eq!(
        ctx.current_route(),
        Route::VerificationList(VerificationListParams::id_card(ID_NO, Channel::Card))
    );
    assert_eq!(replay.reads(), 1);

    screen.on_blur().await;
    assert!(!replay.reader_mode_enabled());
}

// ========== 扫码 ==========

#[tokio::test]
async fn test_scans_open_verification_list() {
    let (_, devices) = card_devices(NfcStatus::default());
    let ctx = context("http://127.0.0.1:9", devices);
    log_in(&ctx);
    let home = HomeScreen::new(ctx.clone());

    let target = home.handle_scan("1568758870_8780-0").await;
    let expected = VerificationListParams::scanned_order("1568758870");
    assert_eq!(target, ScanTarget::List(expected.clone()));
    assert_eq!(ctx.current_route(), Route::VerificationList(expected));

    ctx.reset(Route::Home);
    let target = home.handle_scan("ESSQR0123456789").await;
    let expected = VerificationListParams::id_card(ID_NO, Channel::Scan);
    assert_eq!(target, ScanTarget::List(expected.clone()));
    assert_eq!(ctx.current_route(), Route::VerificationList(expected));
    assert!(ctx.take_alerts().is_empty());
}

#[tokio::test]
async fn test_scan_requires_login() {
    let ctx = context("http://127.0.0.1:9", Devices::unavailable());
    let home = HomeScreen::new(ctx.clone());

    assert_eq!(home.handle_scan("1_2").await, ScanTarget::Rejected);
    assert_eq!(ctx.current_route(), Route::Login);
    assert_eq!(ctx.take_alerts(), vec![Alert::new("提示", "请先登录")]);

    log_in(&ctx);
    ctx.reset(Route::Home);
    // ESS service missing from the unavailable devices
    assert_eq!(home.handle_scan("ESSQR").await, ScanTarget::Rejected);
    assert_eq!(ctx.current_route(), Route::Home);
    assert_eq!(ctx.last_alert().unwrap().title, "核销失败");
}

#[tokio::test]
async fn test_continue_scanning_requeries_in_place() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::VERIFICATION_ORDER,
        recording_get(&log, |query| {
            let id = query_value(query, "orderId").unwrap_or_default();
            let order_id: i64 = id.parse().unwrap_or(1);
            ok(json!({"pages": 1, "total": 1, "list": [order(order_id, 2, 2)]}))
        }),
    ))
    .await;
    let replay = ReplayDevices::new(DeviceFixture {
        qr: Some("2002_0001-0".to_string()),
        ..Default::default()
    });
    let ctx = context(&url, replay.devices());
    log_in(&ctx);

    let mut screen =
        VerificationListScreen::new(ctx.clone(), VerificationListParams::scanned_order("1001"));
    screen.on_mount().await;
    assert_eq!(screen.orders()[0].order_id, 1001);
    assert!(screen.can_continue_scanning());

    let target = screen.continue_scanning().await;
    let expected = VerificationListParams::scanned_order("2002");
    assert_eq!(target, Some(ScanTarget::List(expected.clone())));
    assert_eq!(screen.params(), &expected);
    assert_eq!(screen.orders().len(), 1);
    assert_eq!(screen.orders()[0].order_id, 2002);
    assert_eq!(log.lock().unwrap().len(), 2);
}

// ========== 首页 / 结果页 ==========

#[tokio::test]
async fn test_home_entries_and_result_view_order() {
    let ctx = context("http://127.0.0.1:9", Devices::unavailable());
    log_in(&ctx);
    let home = HomeScreen::new(ctx.clone());

    home.open_card(CardKind::SocialCard);
    assert_eq!(ctx.current_route(), Route::WaitingCard(CardKind::SocialCard));
    home.open_orders();
    home.open_id_card_demo();
    let names: Vec<_> = ctx.navigator().stack().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["home", "waiting-card", "order-query", "idcard-demo"]);

    ctx.reset(Route::Home);
    let by_id_card = VerificationResultScreen::new(
        ctx.clone(),
        VerificationOutcome::failed("44010119900101001X", "未找到待核销订单"),
    );
    assert!(!by_id_card.view_order());
    assert_eq!(ctx.take_alerts(), vec![Alert::new("提示", "未获取到订单信息")]);

    let by_order = VerificationResultScreen::new(
        ctx.clone(),
        VerificationOutcome::failed("1568758870", "已核销"),
    );
    assert!(by_order.view_order());
    assert_eq!(
        ctx.current_route(),
        Route::OrderDetail {
            order_id: 1568758870,
            merchant_id: 20
        }
    );
}

// ========== 会话过期 ==========

#[tokio::test]
async fn test_home_terminal_detail_expiry() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::TERMINAL_DETAIL,
        recording_get(&log, |_| expired()),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let mut home = HomeScreen::new(ctx.clone());
    home.on_mount().await;

    assert_forced_relogin(&ctx);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_verification_list_expiry() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::VERIFICATION_ORDER,
        recording_get(&log, |_| expired()),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let params = VerificationListParams::scanned_order("1001");
    ctx.navigate(Route::VerificationList(params.clone()));
    let mut screen = VerificationListScreen::new(ctx.clone(), params);
    screen.on_mount().await;

    assert_forced_relogin(&ctx);
    assert!(screen.result().is_none());
    assert!(screen.orders().is_empty());
}

#[tokio::test]
async fn test_verification_info_expiry_keeps_modal_closed() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::VERIFICATION_INFO,
        recording_get(&log, |_| expired()),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderQuery);

    let tickets: shared::models::Order = serde_json::from_value(order(1001, 2, 3)).unwrap();
    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.verify(&tickets).await;

    assert!(screen.modal().is_none());
    assert_forced_relogin(&ctx);
}

#[tokio::test]
async fn test_modal_submit_expiry_closes_modal() {
    let submit_log = Log::default();
    let info_log = Log::default();
    let app = Router::new()
        .route(
            Endpoints::VERIFICATION_INFO,
            recording_get(&info_log, |_| {
                ok(json!({
                    "orderId": 1001, "orderType": 2, "spuCount": 3,
                    "usedCount": 0, "usedList": null, "remainingCount": 3, "remainingList": null
                }))
            }),
        )
        .route(Endpoints::VERIFICATION, recording_post(&submit_log, expired()));
    let url = spawn(app).await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderQuery);

    let tickets: shared::models::Order = serde_json::from_value(order(1001, 2, 3)).unwrap();
    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.verify(&tickets).await;
    screen.modal_mut().expect("modal open").selection_mut().set_quantity("1");

    assert_eq!(screen.submit_selection().await, Some(ModalOutcome::Closed));
    assert!(screen.modal().is_none());
    assert_forced_relogin(&ctx);
    assert_eq!(submit_log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_direct_verify_in_list_expiry_shows_no_result() {
    let list_log = Log::default();
    let submit_log = Log::default();
    let app = Router::new()
        .route(
            Endpoints::VERIFICATION_ORDER,
            recording_get(&list_log, |_| {
                ok(json!({"pages": 1, "total": 1, "list": [order(1001, 2, 1)]}))
            }),
        )
        .route(Endpoints::VERIFICATION, recording_post(&submit_log, expired()));
    let url = spawn(app).await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);

    let params = VerificationListParams::scanned_order("1001");
    ctx.navigate(Route::VerificationList(params.clone()));
    let mut screen = VerificationListScreen::new(ctx.clone(), params);
    screen.on_mount().await;
    let first = screen.orders()[0].clone();
    screen.verify(&first).await;

    assert!(screen.result().is_none());
    assert_forced_relogin(&ctx);
    assert_eq!(submit_log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_detail_expiry() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::GET_VERIFICATION_ORDER,
        recording_get(&log, |_| expired()),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderDetail {
        order_id: 1001,
        merchant_id: 20,
    });

    let mut screen = OrderDetailScreen::new(ctx.clone(), 1001, 20);
    screen.on_mount().await;

    assert!(screen.rows().is_empty());
    assert_forced_relogin(&ctx);
}

#[tokio::test]
async fn test_order_query_token_message_forces_login() {
    let log = Log::default();
    let url = spawn(Router::new().route(
        Endpoints::MERCHANT_ORDER,
        recording_get(&log, |_| {
            json!({"code": "A0001", "success": false, "msg": "token invalid", "data": null})
        }),
    ))
    .await;
    let ctx = context(&url, Devices::unavailable());
    log_in(&ctx);
    ctx.navigate(Route::OrderQuery);

    let mut screen = OrderQueryScreen::new(ctx.clone());
    screen.on_mount().await;

    assert!(screen.orders().is_empty());
    assert_forced_relogin(&ctx);
}
