//! Client tests against an in-process mock backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pharmacy_client::{ApiClient, ClientError, NewReview, DEFAULT_TIMEOUT};
use pharmacy_core::{CartItem, Money, NewOrder, OrderStatus, ShippingAddress};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Backend {
    last_body: Arc<Mutex<Option<Value>>>,
}

fn product_json(id: &str, stock: u32) -> Value {
    json!({
        "_id": id,
        "name": "Vitamin C 1000mg",
        "slug": "vitamin-c-1000mg",
        "image": "/images/vitc.jpg",
        "brand": "Acme",
        "category": "Vitamins",
        "description": "Effervescent tablets",
        "price": 12.5,
        "countInStock": stock,
        "rating": 4.5,
        "numReviews": 2,
        "reviews": []
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> axum::response::Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No Token" }))).into_response()
}

async fn list_products() -> Json<Value> {
    Json(json!([product_json("p1", 5), product_json("p2", 0)]))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    let products = if query == "vitamin c" {
        vec![product_json("p1", 5)]
    } else {
        Vec::new()
    };
    Json(json!({ "products": products, "countProducts": products.len(), "page": 1, "pages": 1 }))
}

async fn product_by_id(Path(id): Path<String>) -> axum::response::Response {
    if id == "p1" {
        Json(product_json("p1", 5)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "Product Not Found" }))).into_response()
    }
}

async fn create_review(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    *backend.last_body.lock().unwrap() = Some(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Review Created",
            "review": {
                "name": body["name"],
                "comment": body["comment"],
                "rating": body["rating"]
            },
            "numReviews": 3,
            "rating": 4.67
        })),
    )
        .into_response()
}

async fn create_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    if bearer(&headers) != Some("token-123") {
        return unauthorized();
    }
    *backend.last_body.lock().unwrap() = Some(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "New Order Created",
            "order": {
                "_id": "o1",
                "orderItems": [],
                "shippingAddress": body["shippingAddress"],
                "paymentMethod": body["paymentMethod"],
                "itemsPrice": body["itemsPrice"],
                "shippingPrice": body["shippingPrice"],
                "DiscountPrice": body["DiscountPrice"],
                "totalPrice": body["totalPrice"],
                "status": "pending",
                "createdAt": "2026-01-05T10:00:00.000Z"
            }
        })),
    )
        .into_response()
}

async fn update_status(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    *backend.last_body.lock().unwrap() = Some(body.clone());
    Json(json!({ "message": "Order Updated", "order": {
        "_id": id, "itemsPrice": 40, "shippingPrice": 10, "DiscountPrice": 4, "totalPrice": 46,
        "status": body["status"], "rejectReason": body["rejectReason"]
    }}))
}

async fn report(Path(id): Path<String>) -> impl IntoResponse {
    ([("content-type", "application/pdf")], format!("%PDF-1.4 invoice {id}").into_bytes())
}

async fn signin(Json(body): Json<Value>) -> axum::response::Response {
    if body["password"] == "secret" {
        Json(json!({
            "_id": "u1",
            "name": "Amina",
            "email": body["email"],
            "isAdmin": false,
            "token": "token-123"
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid email or password" })))
            .into_response()
    }
}

async fn spawn_backend() -> (ApiClient, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/products", get(list_products))
        .route(
            "/api/products/categories",
            get(|| async { Json(json!(["Vitamins", "Pain Relief"])) }),
        )
        .route("/api/products/search", get(search))
        .route("/api/products/{id}", get(product_by_id))
        .route("/api/products/{id}/reviews", post(create_review))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/orders/{id}/report", get(report))
        .route("/api/users/signin", post(signin))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    (client, backend)
}

#[tokio::test]
async fn test_catalogue_endpoints() {
    let (client, _) = spawn_backend().await;

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Money::from_cents(1250));

    assert_eq!(client.categories().await.unwrap(), vec!["Vitamins", "Pain Relief"]);

    let results = client.search("vitamin c").await.unwrap();
    assert_eq!(results.products.len(), 1);
    assert!(client.search("nothing").await.unwrap().products.is_empty());
}

#[tokio::test]
async fn test_missing_product_reports_backend_message() {
    let (client, _) = spawn_backend().await;

    let err = client.product_by_id("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Product Not Found");
}

#[tokio::test]
async fn test_signin_then_place_order() {
    let (client, backend) = spawn_backend().await;

    let err = client.signin("amina@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.user_message(), "Invalid email or password");

    let session = client.signin("amina@example.com", "secret").await.unwrap();
    let authed = client.with_token(session.token.clone());

    let order = NewOrder::new(
        vec![CartItem::new("p1", "Vitamin C", Money::from_cents(2000), 2, 5)],
        ShippingAddress {
            full_name: "Amina".to_string(),
            ..Default::default()
        },
        "PayPal",
    );
    let created = authed.create_order(&order).await.unwrap();
    let placed = created.order.unwrap();

    assert_eq!(placed.id, "o1");
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.total_price, Money::from_cents(4600));

    let body = backend.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["DiscountPrice"], json!(4.0));
    assert_eq!(body["orderItems"][0]["_id"], "p1");
}

#[tokio::test]
async fn test_authed_calls_need_a_token() {
    let (client, _) = spawn_backend().await;

    let review = NewReview {
        rating: 5,
        comment: "Great",
        name: "Amina",
    };
    assert!(matches!(
        client.create_review("p1", &review).await,
        Err(ClientError::MissingToken)
    ));

    let summary = client
        .with_token("token-123")
        .create_review("p1", &review)
        .await
        .unwrap();
    assert_eq!(summary.num_reviews, 3);
    assert_eq!(summary.review.comment, "Great");
}

#[tokio::test]
async fn test_reject_sends_reason() {
    let (client, backend) = spawn_backend().await;
    let client = client.with_token("token-123");

    let updated = client
        .update_order_status("o1", OrderStatus::Rejected, Some("Prescription expired"))
        .await
        .unwrap();
    let order = updated.order.unwrap();
    assert_eq!(order.reject_reason(), Some("Prescription expired"));

    client
        .update_order_status("o1", OrderStatus::Approved, None)
        .await
        .unwrap();
    let body = backend.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body, json!({ "status": "approved", "rejectReason": "" }));
}

#[tokio::test]
async fn test_invoice_bytes() {
    let (client, _) = spawn_backend().await;
    let pdf = client.with_token("token-123").order_report("o1").await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // bind then drop so nothing is listening on the port
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Request(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_upload_missing_file() {
    let (client, _) = spawn_backend().await;
    let err = client
        .with_token("token-123")
        .upload_file(std::path::Path::new("/definitely/not/here.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::File { .. }));
}
