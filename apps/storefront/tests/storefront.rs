//! End-to-end command tests against an in-process mock backend and
//! in-memory local storage.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pharmacy_client::{ApiClient, DEFAULT_TIMEOUT};
use pharmacy_core::{AppState, Money, OrderStatus, ShippingAddress, StorageKey};
use pharmacy_storage::{Database, DbConfig, LocalStorageRepository};
use pharmacy_storefront::commands::{admin, cart, checkout, orders, search, user};
use pharmacy_storefront::error::ErrorCode;
use pharmacy_storefront::state::{StoreState, StorefrontConfig};
use pharmacy_storefront::AppContext;
use serde_json::{json, Value};

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Clone, Default)]
struct Backend {
    orders: Arc<Mutex<HashMap<String, Value>>>,
    last_order: Arc<Mutex<Option<Value>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn seed_order(&self, id: &str, status: &str) {
        self.orders.lock().unwrap().insert(
            id.to_string(),
            json!({
                "_id": id,
                "orderItems": [{ "name": "Zinc", "price": 20, "quantity": 2, "product": "p3" }],
                "paymentMethod": "PayPal",
                "itemsPrice": 40, "shippingPrice": 10, "DiscountPrice": 4, "totalPrice": 46,
                "status": status,
                "rejectReason": ""
            }),
        );
    }
}

fn product_json(id: &str, name: &str, price: f64, stock: u32) -> Value {
    json!({
        "_id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "image": format!("/images/{id}.jpg"),
        "brand": "Acme",
        "category": "Vitamins",
        "description": "",
        "price": price,
        "countInStock": stock,
        "rating": 4.0,
        "numReviews": 1,
        "reviews": []
    })
}

fn catalogue(id: &str) -> Option<Value> {
    match id {
        "p1" => Some(product_json("p1", "Vitamin C", 12.5, 2)),
        "p2" => Some(product_json("p2", "Ibuprofen", 8.0, 0)),
        "p3" => Some(product_json("p3", "Zinc", 20.0, 10)),
        _ => None,
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No Token" }))).into_response()
}

async fn product_by_id(Path(id): Path<String>) -> Response {
    match catalogue(&id) {
        Some(product) => Json(product).into_response(),
        None => not_found("Product Not Found"),
    }
}

async fn search_products(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    backend.record(format!("search {query}"));
    let products: Vec<Value> = ["p1", "p2", "p3"]
        .iter()
        .filter_map(|id| catalogue(id))
        .filter(|p| {
            p["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&query.to_lowercase()))
        })
        .collect();
    Json(json!({ "products": products, "countProducts": products.len(), "page": 1, "pages": 1 }))
}

async fn signin(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }
    let is_admin = email.starts_with("admin");
    let id = if is_admin { "u-admin" } else { "u1" };
    Json(json!({
        "_id": id,
        "name": if is_admin { "Admin" } else { "Amina" },
        "email": email,
        "isAdmin": is_admin,
        "token": format!("token-{id}")
    }))
    .into_response()
}

async fn upload(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "secure_url": "https://files.example.com/rx-1.png" })).into_response()
}

async fn create_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    *backend.last_order.lock().unwrap() = Some(body.clone());

    let mut order = body;
    order["_id"] = json!("o1");
    order["status"] = json!("pending");
    backend
        .orders
        .lock()
        .unwrap()
        .insert("o1".to_string(), order.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "message": "New Order Created", "order": order })),
    )
        .into_response()
}

async fn my_orders(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let orders: Vec<Value> = backend.orders.lock().unwrap().values().cloned().collect();
    Json(orders).into_response()
}

async fn order_by_id(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    match backend.orders.lock().unwrap().get(&id) {
        Some(order) => Json(order.clone()).into_response(),
        None => not_found("Order Not Found"),
    }
}

async fn cancel_order(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    backend.record(format!("cancel {id}"));
    if let Some(order) = backend.orders.lock().unwrap().get_mut(&id) {
        order["status"] = json!("cancelled");
    }
    // reply without the order, like the real endpoint
    Json(json!({ "message": "Order Cancelled" })).into_response()
}

async fn update_status(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    backend.record(format!("status {id} {}", body["status"].as_str().unwrap_or_default()));
    let mut orders = backend.orders.lock().unwrap();
    match orders.get_mut(&id) {
        Some(order) => {
            order["status"] = body["status"].clone();
            order["rejectReason"] = body["rejectReason"].clone();
            Json(json!({ "message": "Order Updated", "order": order.clone() })).into_response()
        }
        None => not_found("Order Not Found"),
    }
}

async fn report(Path(id): Path<String>) -> impl IntoResponse {
    (
        [("content-type", "application/pdf")],
        format!("%PDF-1.4 invoice {id}").into_bytes(),
    )
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/products/search", get(search_products))
        .route("/api/products/{id}", get(product_by_id))
        .route("/api/users/signin", post(signin))
        .route("/api/upload", post(upload))
        .route("/api/orders", post(create_order))
        .route("/api/orders/mine", get(my_orders))
        .route("/api/orders/{id}", get(order_by_id))
        .route("/api/orders/{id}/cancel", put(cancel_order))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/orders/{id}/report", get(report))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), backend)
}

async fn context() -> (AppContext, Backend, LocalStorageRepository) {
    let (url, backend) = spawn_backend().await;
    let repo = Database::new(DbConfig::in_memory())
        .await
        .unwrap()
        .local_storage();

    let config = StorefrontConfig {
        api_url: url.clone(),
        debounce_ms: 20,
        ..Default::default()
    };
    let client = ApiClient::new(&url, DEFAULT_TIMEOUT).unwrap();
    let store = StoreState::load(repo.clone()).await.unwrap();

    (AppContext::from_parts(config, client, store), backend, repo)
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Amina Hassan".to_string(),
        address: "12 Nile St".to_string(),
        city: "Cairo".to_string(),
        postal_code: "11511".to_string(),
        country: "Egypt".to_string(),
        ..Default::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pharmacy-storefront-{}-{name}", std::process::id()))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_checkout_flow() {
    let (ctx, backend, repo) = context().await;
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    cart::add_to_cart(&ctx, "p1").await.unwrap();
    let view = cart::add_to_cart(&ctx, "p1").await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.item_count, 2);
    assert_eq!(view.pricing.items_price, Money::from_cents(2500));
    assert_eq!(view.pricing.shipping_price, Money::from_cents(1000));
    assert_eq!(view.pricing.discount_price, Money::from_cents(250));
    assert_eq!(view.pricing.total_price, Money::from_cents(3250));

    // only 2 in stock
    let err = cart::add_to_cart(&ctx, "p1").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfStock);
    assert_eq!(err.message, "Sorry. Product is out of stock");
    assert_eq!(cart::get_cart(&ctx).item_count, 2);

    checkout::save_shipping_address(&ctx, address(), None)
        .await
        .unwrap();
    checkout::save_payment_method(&ctx, "PayPal").await.unwrap();

    let preview = checkout::preview_order(&ctx).unwrap();
    assert_eq!(preview.pricing.total_price, Money::from_cents(3250));

    let order = checkout::place_order(&ctx).await.unwrap();
    assert_eq!(order.id, "o1");
    assert_eq!(order.status, OrderStatus::Pending);

    let sent = backend.last_order.lock().unwrap().clone().unwrap();
    assert_eq!(sent["totalPrice"], json!(32.5));
    assert_eq!(sent["DiscountPrice"], json!(2.5));
    assert_eq!(sent["orderItems"][0]["quantity"], json!(2));

    // cart cleared, address and payment kept
    assert!(cart::get_cart(&ctx).items.is_empty());
    let keys = repo.keys().await.unwrap();
    assert!(!keys.contains(&StorageKey::CartItems.as_str().to_string()));
    assert!(keys.contains(&StorageKey::PaymentMethod.as_str().to_string()));
}

#[tokio::test]
async fn test_out_of_stock_product_is_refused() {
    let (ctx, _, repo) = context().await;

    let err = cart::add_to_cart(&ctx, "p2").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfStock);
    assert!(cart::get_cart(&ctx).items.is_empty());
    assert!(repo.keys().await.unwrap().is_empty());

    let err = cart::add_to_cart(&ctx, "nope").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Product Not Found");
}

#[tokio::test]
async fn test_update_quantity_checks_fresh_stock() {
    let (ctx, _, _) = context().await;
    cart::add_to_cart(&ctx, "p3").await.unwrap();

    let view = cart::update_quantity(&ctx, "p3", 6).await.unwrap();
    assert_eq!(view.items[0].quantity, 6);
    // 120.00 is over the threshold: free shipping
    assert_eq!(view.pricing.shipping_price, Money::zero());
    assert_eq!(view.pricing.total_price, Money::from_cents(10800));

    let err = cart::update_quantity(&ctx, "p3", 11).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfStock);
    assert_eq!(cart::get_cart(&ctx).items[0].quantity, 6);

    let err = cart::update_quantity(&ctx, "p1", 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CartError);

    let view = cart::remove_from_cart(&ctx, "p3").await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.pricing.total_price, Money::zero());
}

#[tokio::test]
async fn test_place_order_preconditions() {
    let (ctx, backend, _) = context().await;

    let err = checkout::place_order(&ctx).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();
    let err = checkout::place_order(&ctx).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CartError);

    cart::add_to_cart(&ctx, "p3").await.unwrap();
    let err = checkout::save_payment_method(&ctx, "PayPal").await.unwrap_err();
    assert_eq!(err.message, "Please enter a shipping address first");

    let err = checkout::place_order(&ctx).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "paymentMethod is required");

    assert!(backend.last_order.lock().unwrap().is_none());
    assert_eq!(cart::get_cart(&ctx).items.len(), 1);
}

#[tokio::test]
async fn test_shipping_with_prescription_and_map_location() {
    let (ctx, _, _) = context().await;
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    let dir = scratch_dir("rx");
    std::fs::create_dir_all(&dir).unwrap();
    let rx = dir.join("rx.png");
    std::fs::write(&rx, b"\x89PNG fake").unwrap();

    let location = pharmacy_core::GeoLocation {
        lat: 30.0444,
        lng: 31.2357,
        address: Some("Cairo".to_string()),
        name: None,
    };
    checkout::save_map_location(&ctx, location.clone())
        .await
        .unwrap();

    let saved = checkout::save_shipping_address(&ctx, address(), Some(&rx))
        .await
        .unwrap();
    assert_eq!(
        saved.prescription.as_deref(),
        Some("https://files.example.com/rx-1.png")
    );
    // the earlier map pick survives the form save
    assert_eq!(saved.location, Some(location));

    // an upload failure saves nothing
    let mut other = address();
    other.full_name = "Someone Else".to_string();
    let err = checkout::save_shipping_address(&ctx, other, Some(&dir.join("missing.png")))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(
        ctx.store.snapshot().cart.shipping_address.full_name,
        "Amina Hassan"
    );

    let err = checkout::save_map_location(
        &ctx,
        pharmacy_core::GeoLocation {
            lat: 91.0,
            lng: 0.0,
            address: None,
            name: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_cancel_follows_lifecycle() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o-delivered", "delivered");
    backend.seed_order("o-pending", "pending");

    let err = orders::cancel_order(&ctx, "o-pending").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    let err = orders::cancel_order(&ctx, "o-delivered").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert!(!backend.calls().contains(&"cancel o-delivered".to_string()));

    // the reply carries no order; the change is applied locally
    let cancelled = orders::cancel_order(&ctx, "o-pending").await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(backend.calls().contains(&"cancel o-pending".to_string()));

    let err = orders::cancel_order(&ctx, "o-pending").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);

    let history = orders::my_orders(&ctx).await;
    assert_eq!(history.data().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_admin_review() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o7", "pending");

    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();
    let err = admin::approve_order(&ctx, "o7").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    user::signout(&ctx).await.unwrap();
    user::signin(&ctx, "admin@example.com", "secret").await.unwrap();

    let err = admin::reject_order(&ctx, "o7", "   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "reason is required");
    assert!(backend.calls().is_empty());

    let rejected = admin::reject_order(&ctx, "o7", "Prescription expired")
        .await
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.reject_reason(), Some("Prescription expired"));

    let err = admin::approve_order(&ctx, "o7").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert_eq!(backend.calls(), vec!["status o7 rejected".to_string()]);

    // the reason is stored and shows up when the customer reads the order back
    user::signout(&ctx).await.unwrap();
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    let detail = orders::order_detail(&ctx, "o7").await;
    let order = detail.data().unwrap();
    assert_eq!(order.status, OrderStatus::Rejected);
    assert_eq!(order.reject_reason(), Some("Prescription expired"));

    let history = orders::my_orders(&ctx).await;
    let listed = history.data().unwrap();
    assert_eq!(listed[0].reject_reason(), Some("Prescription expired"));
}

#[tokio::test]
async fn test_approved_order_has_no_reject_reason() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o10", "pending");
    user::signin(&ctx, "admin@example.com", "secret").await.unwrap();

    admin::approve_order(&ctx, "o10").await.unwrap();

    let detail = orders::order_detail(&ctx, "o10").await;
    let order = detail.data().unwrap();
    assert_eq!(order.status, OrderStatus::Approved);
    assert_eq!(order.reject_reason(), None);
}

#[tokio::test]
async fn test_second_change_of_same_order_is_refused_while_first_runs() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o11", "pending");
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    let first = ctx.mutations.begin("order:o11").unwrap();
    let err = orders::cancel_order(&ctx, "o11").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert!(backend.calls().is_empty());

    drop(first);
    let cancelled = orders::cancel_order(&ctx, "o11").await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(!ctx.mutations.is_in_flight("order:o11"));
}

#[tokio::test]
async fn test_place_order_is_single_flight() {
    let (ctx, backend, _) = context().await;
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();
    cart::add_to_cart(&ctx, "p3").await.unwrap();
    checkout::save_shipping_address(&ctx, address(), None)
        .await
        .unwrap();
    checkout::save_payment_method(&ctx, "Cash").await.unwrap();

    let first = ctx.mutations.begin("place_order").unwrap();
    let err = checkout::place_order(&ctx).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert!(backend.last_order.lock().unwrap().is_none());
    assert_eq!(cart::get_cart(&ctx).items.len(), 1);

    drop(first);
    checkout::place_order(&ctx).await.unwrap();
    assert!(cart::get_cart(&ctx).items.is_empty());
}

#[tokio::test]
async fn test_screen_errors_keep_their_code() {
    let (ctx, _, _) = context().await;

    let history = orders::my_orders(&ctx).await;
    let err = history.error().unwrap();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Please sign in first");

    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();
    let missing = orders::order_detail(&ctx, "nope").await;
    let err = missing.error().unwrap();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Order Not Found");
}

#[tokio::test]
async fn test_admin_deliver_from_approved() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o8", "pending");
    user::signin(&ctx, "admin@example.com", "secret").await.unwrap();

    let approved = admin::approve_order(&ctx, "o8").await.unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);
    assert_eq!(approved.reject_reason(), None);

    let delivered = admin::deliver_order(&ctx, "o8").await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let err = orders::cancel_order(&ctx, "o8").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
}

#[tokio::test]
async fn test_invoice_download() {
    let (ctx, backend, _) = context().await;
    backend.seed_order("o9", "approved");
    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();

    let dir = scratch_dir("invoices");
    let path = orders::download_invoice(&ctx, "o9", Some(&dir)).await.unwrap();

    assert_eq!(path, dir.join("invoice_o9.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_signin_failure_and_signout() {
    let (ctx, _, repo) = context().await;

    let err = user::signin(&ctx, "amina@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Invalid email or password");
    assert!(!ctx.store.snapshot().is_signed_in());

    let err = user::signin(&ctx, "not-an-email", "secret").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    user::signin(&ctx, "amina@example.com", "secret").await.unwrap();
    cart::add_to_cart(&ctx, "p3").await.unwrap();
    checkout::save_shipping_address(&ctx, address(), None)
        .await
        .unwrap();
    assert_eq!(repo.keys().await.unwrap().len(), 3);

    user::signout(&ctx).await.unwrap();
    assert!(repo.keys().await.unwrap().is_empty());
    assert_eq!(ctx.store.snapshot(), AppState::default());
}

#[tokio::test]
async fn test_suggestions_are_debounced() {
    let (ctx, backend, _) = context().await;
    let suggestions = search::SearchSuggestions::from_context(&ctx);
    let mut results = suggestions.subscribe();

    suggestions.on_input("v");
    suggestions.on_input("vi");
    suggestions.on_input("zinc");

    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .unwrap()
        .unwrap();
    let names: Vec<String> = suggestions.current().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Zinc"]);
    assert_eq!(backend.calls(), vec!["search zinc".to_string()]);

    suggestions.on_input("");
    assert!(suggestions.current().is_empty());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn test_full_search() {
    let (ctx, _, _) = context().await;
    let found = search::search(&ctx, "vitamin").await;
    assert_eq!(found.data().map(|r| r.products.len()), Some(1));

    let too_long = "x".repeat(101);
    let refused = search::search(&ctx, &too_long).await;
    let err = refused.error().unwrap();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "query must be at most 100 characters");
}
