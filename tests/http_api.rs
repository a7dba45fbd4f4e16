use marketcube::application::bootstrap::{PersistenceBootstrap, ServicesBootstrap};
use marketcube::application::licensing::webhook::sign_payload;
use marketcube::config::Config;
use marketcube::infrastructure::observability::Metrics;
use marketcube::interfaces::http::{AppState, build_router};
use serde_json::{Value, json};
use std::net::SocketAddr;

const SECRET: &str = "http-secret";
// Nothing listens on the discard port, so every upstream fails fast
const DEAD_UPSTREAM: &str = "http://127.0.0.1:9";

async fn spawn_server() -> SocketAddr {
    let mut config = Config::default();
    config.upstream.binance_base_url = DEAD_UPSTREAM.to_string();
    config.upstream.coingecko_base_url = DEAD_UPSTREAM.to_string();
    config.upstream.alternative_me_base_url = DEAD_UPSTREAM.to_string();
    config.upstream.max_retries = 0;
    config.upstream.request_timeout_secs = 2;
    config.upstream.connect_timeout_secs = 1;
    config.license.webhook_secret = Some(SECRET.to_string());
    config.server.fallback_seed = Some(3);

    let metrics = Metrics::new().unwrap();
    let persistence = PersistenceBootstrap::init(&config.license).await.unwrap();
    let services = ServicesBootstrap::init(&config, &persistence, Some(metrics.clone()));
    let app = build_router(AppState::new(services, Some(metrics)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_health_and_metrics() {
    let addr = spawn_server().await;
    let client = client();

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let metrics = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("marketcube_"));
}

#[tokio::test]
async fn test_purchase_then_fetch_with_cookie() {
    let addr = spawn_server().await;
    let client = client();

    // Anonymous callers get demo data
    let demo: Value = client
        .get(format!("http://{}/api/market-data", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(demo["isDemo"], true);

    // Buy an Elite license with a chosen key
    let body = json!({
        "meta": {
            "event_name": "order_created",
            "custom_data": { "license_key": "MC-C0FFEE000001" }
        },
        "data": {
            "attributes": { "customer_email": "vip@example.com", "total_usd_cents": 49_700 }
        }
    })
    .to_string();
    let signature = sign_payload(SECRET, body.as_bytes()).unwrap();
    let webhook = client
        .post(format!("http://{}/api/webhook/lemon", addr))
        .header("X-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(webhook.status(), 200);

    // Verify it
    let verify = client
        .post(format!("http://{}/api/license/verify", addr))
        .json(&json!({ "licenseKey": "MC-C0FFEE000001" }))
        .send()
        .await
        .unwrap();
    assert_eq!(verify.status(), 200);
    let verify: Value = verify.json().await.unwrap();
    assert_eq!(verify["valid"], true);
    assert_eq!(verify["license"]["plan"], "elite");

    // Live data through the cookie; every upstream is down
    let live = client
        .get(format!("http://{}/api/market-data", addr))
        .header("Cookie", "license_key=MC-C0FFEE000001")
        .send()
        .await
        .unwrap();
    assert_eq!(live.status(), 200);
    let live: Value = live.json().await.unwrap();
    assert!(live.get("isDemo").is_none());
    assert_eq!(live["sentiment"], 50.0);
    assert_eq!(live["confidence"], 30.0);
    assert_eq!(live["marketRegime"], "SLIGHTLY BEARISH");
    assert_eq!(live["dataSources"]["ticker"], "offline");
    assert_eq!(live["licenseTier"], "elite");
    assert_eq!(live["callsToday"], 1);
    assert_eq!(live["callsLimit"], 10_000);
}

#[tokio::test]
async fn test_rejections() {
    let addr = spawn_server().await;
    let client = client();

    let unknown = client
        .get(format!("http://{}/api/market-data?key=MC-123456789ABC", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 403);

    let unsigned = client
        .post(format!("http://{}/api/webhook/lemon", addr))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(unsigned.status(), 401);
    let error: Value = unsigned.json().await.unwrap();
    assert_eq!(error["error"], "Invalid signature");

    let missing = client
        .post(format!("http://{}/api/license/verify", addr))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);
}

#[tokio::test]
async fn test_proxies_degrade_to_fallback_documents() {
    let addr = spawn_server().await;
    let client = client();

    let fear_greed = client
        .get(format!("http://{}/api/proxy/alternative", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(fear_greed.status(), 200);
    assert_eq!(fear_greed.headers()["x-cache"], "FALLBACK");

    let global: Value = client
        .get(format!("http://{}/api/proxy/coingecko", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(global["data"]["market_cap_percentage"]["btc"], 52.5);

    let binance = client
        .get(format!("http://{}/api/proxy/binance", addr))
        .send()
        .await
        .unwrap();
    assert!(binance.status().is_server_error());
}
