//! 用本地假 Shopify 服务走完整的授权和查询流程

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use fundboard::infrastructure::storage::MemoryStorage;
use fundboard::{router, AppState, Config};

const ACCESS_TOKEN: &str = "shpat_test";

async fn access_token(Json(body): Json<Value>) -> impl IntoResponse {
    if body["code"] != "good-code" || body["client_secret"] != "secret-1" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_request" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "access_token": ACCESS_TOKEN, "scope": "read_products,read_orders" })),
    )
}

async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if headers.get("X-Shopify-Access-Token").and_then(|v| v.to_str().ok()) != Some(ACCESS_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "errors": "Invalid API key" })));
    }

    let query = body["query"].as_str().unwrap_or_default();
    let first = body["variables"]["first"].as_u64().unwrap_or(0) as usize;

    let payload = if query.contains("getProducts") {
        json!({ "data": { "products": { "edges": [
            { "node": { "id": "gid://shopify/Product/1", "title": "Tote Bag" } },
            { "node": { "id": "gid://shopify/Product/2", "title": "Water Bottle" } }
        ] } } })
    } else if query.contains("getOrders") {
        let edges: Vec<Value> = (1..=3)
            .take(first)
            .map(|n| json!({ "node": { "id": format!("gid://shopify/Order/{}", n), "name": format!("#100{}", n) } }))
            .collect();
        json!({ "data": { "orders": { "edges": edges } } })
    } else {
        json!({ "errors": [{ "message": "unknown query" }] })
    };
    (StatusCode::OK, Json(payload))
}

async fn spawn_fake_shopify() -> String {
    let app = Router::new()
        .route("/admin/oauth/access_token", post(access_token))
        .route("/admin/api/2023-10/graphql.json", post(graphql));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn dashboard() -> Router {
    let mut config = Config::default();
    config.shopify.api_key = "key-1".to_string();
    config.shopify.api_secret = "secret-1".to_string();
    config.shopify.admin_origin = Some(spawn_fake_shopify().await);

    let state = AppState::new(&config, Arc::new(MemoryStorage::new()));
    router(state, Duration::from_secs(5))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(resp: &axum::response::Response) -> String {
    resp.headers()[header::LOCATION].to_str().unwrap().to_string()
}

/// 发起授权并取回 state
async fn authorize_state(app: &Router) -> String {
    let resp = call(app, Method::GET, "/api/auth/shopify?shop=demo", None).await;
    assert!(resp.status().is_redirection());

    let url = Url::parse(&location(&resp)).unwrap();
    assert_eq!(url.path(), "/admin/oauth/authorize");
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "key-1");
    params["state"].clone()
}

async fn install(app: &Router) {
    let state = authorize_state(app).await;
    let resp = call(
        app,
        Method::GET,
        &format!("/api/auth/shopify/callback?shop=demo&code=good-code&state={}", state),
        None,
    )
    .await;
    assert!(resp.status().is_redirection());
    assert_eq!(
        location(&resp),
        "http://localhost:3000/dashboard?shop=demo.myshopify.com&installed=true"
    );
}

#[tokio::test]
async fn test_oauth_then_products_and_orders() {
    let app = dashboard().await;
    install(&app).await;

    let resp = call(&app, Method::GET, "/api/shopify/products?shop=demo", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["title"], "Tote Bag");

    let resp = call(
        &app,
        Method::GET,
        "/api/shopify/orders?shop=demo.myshopify.com&limit=2",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1]["name"], "#1002");
}

#[tokio::test]
async fn test_forged_callback_keeps_install_pending() {
    let app = dashboard().await;
    let state = authorize_state(&app).await;

    let resp = call(
        &app,
        Method::GET,
        "/api/auth/shopify/callback?shop=demo&code=good-code&state=forged",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Failed to create session");

    let resp = call(
        &app,
        Method::GET,
        &format!("/api/auth/shopify/callback?shop=demo&code=good-code&state={}", state),
        None,
    )
    .await;
    assert!(resp.status().is_redirection());
    assert!(location(&resp).ends_with("installed=true"));
}

#[tokio::test]
async fn test_foreign_shop_never_receives_credentials() {
    let app = dashboard().await;

    let resp = call(&app, Method::GET, "/api/auth/shopify?shop=attacker.example", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Invalid shop domain");

    let resp = call(
        &app,
        Method::GET,
        "/api/auth/shopify/callback?shop=attacker.example&code=good-code&state=x",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejected_code_surfaces_as_server_error() {
    let app = dashboard().await;
    let state = authorize_state(&app).await;

    let resp = call(
        &app,
        Method::GET,
        &format!("/api/auth/shopify/callback?shop=demo&code=bad-code&state={}", state),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(resp).await["message"],
        "Failed to complete Shopify authentication"
    );

    // 换取失败不会留下会话
    let resp = call(&app, Method::GET, "/api/shopify/products?shop=demo", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_connection_lifecycle() {
    let app = dashboard().await;

    let resp = call(
        &app,
        Method::POST,
        "/api/shopify/connection",
        Some(json!({ "storeUrl": "demo" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    install(&app).await;

    let resp = call(
        &app,
        Method::POST,
        "/api/shopify/connection",
        Some(json!({ "storeUrl": "https://demo.myshopify.com/" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["connected"], true);
    assert_eq!(body["data"]["storeUrl"], "demo.myshopify.com");

    let resp = call(&app, Method::GET, "/api/shopify/connection", None).await;
    assert_eq!(json_body(resp).await["data"]["connected"], true);

    let resp = call(&app, Method::DELETE, "/api/shopify/connection", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = call(&app, Method::GET, "/api/shopify/connection", None).await;
    assert_eq!(json_body(resp).await["data"]["connected"], false);
}
