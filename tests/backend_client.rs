use std::net::{SocketAddr, TcpListener};

use axum::{
    extract::{Json, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};

use chauffeur::auth::Session;
use chauffeur::client::BackendClient;
use chauffeur::entities::{filter_by_status, BookingStatus};
use chauffeur::error::BACKEND_ERROR;

const TOKEN: &str = "tok-1";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "user": { "id": "u-1", "name": "Ada", "email": body["email"], "role": "customer" },
            "token": TOKEN,
        })),
    )
}

async fn bookings(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!([
            { "id": "b-1", "pickupAddress": "JFK", "dropoffAddress": "Midtown", "status": "completed", "totalAmount": 254.4 },
            { "id": "b-2", "pickup": "Soho", "dropoff": "Newark Airport", "pricing": { "total": 310.0 } },
            { "id": "b-3", "pickup": "Harlem", "dropoff": "LGA", "status": "cancelled" }
        ])),
    )
}

async fn cancel(Path(id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Booking {} not found", id) })),
    )
}

async fn remove(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn health() -> &'static str {
    "ok"
}

fn start_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/api/bookings", get(bookings))
        .route("/api/bookings/:id", delete(remove))
        .route("/api/bookings/:id/cancel", post(cancel))
        .route("/api/health", get(health));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);

    addr
}

#[tokio::test]
async fn login_authenticates_later_requests() {
    let addr = start_backend();
    let session = Session::anonymous();
    let client = BackendClient::new(format!("http://{}", addr), session.clone());

    let err = client.list_bookings(None).await.unwrap_err();
    assert_eq!(err.code, BACKEND_ERROR);
    assert_eq!(err.message, "Unauthorized");

    let user = client.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(session.token().as_deref(), Some(TOKEN));

    let bookings = client.list_bookings(Some("u-1")).await.unwrap();
    assert_eq!(bookings.len(), 3);
    assert_eq!(bookings[0].pickup, "JFK");
    assert_eq!(bookings[1].status, BookingStatus::Confirmed);
    assert_eq!(bookings[1].total, 310.0);
    assert_eq!(filter_by_status(&bookings, BookingStatus::Cancelled).len(), 1);

    client.delete_booking("b-3").await.unwrap();
}

#[tokio::test]
async fn backend_failures_are_surfaced() {
    let addr = start_backend();
    let client = BackendClient::new(format!("http://{}", addr), Session::with_token(TOKEN));

    let err = client.cancel_booking("b-9", Some("plans changed")).await.unwrap_err();
    assert_eq!(err.code, BACKEND_ERROR);
    assert_eq!(err.message, "Booking b-9 not found");

    let err = client.login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.message, "Invalid credentials");
    assert!(client.session().is_authenticated());

    client.logout().await.unwrap();
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn health_check() {
    let addr = start_backend();

    assert!(BackendClient::new(format!("http://{}", addr), Session::anonymous())
        .is_reachable()
        .await);

    let closed = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    assert!(!BackendClient::new(format!("http://{}", closed), Session::anonymous())
        .is_reachable()
        .await);
}
