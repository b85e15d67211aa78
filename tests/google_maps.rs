use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

use chauffeur::api::RouteAPI;
use chauffeur::engine::{fallback::RandomSampler, Engine};
use chauffeur::entities::{RouteRequest, RouteStatus};
use chauffeur::error::{TRANSPORT_ERROR, UPSTREAM_ERROR};
use chauffeur::external::{google_maps::GoogleMaps, DirectionsProvider, DynProvider};

const KEY: &str = "SECRET-MAPS-KEY";

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn directions(
    Extension(seen): Extension<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let origin = params.get("origin").cloned().unwrap_or_default();
    seen.lock().unwrap().push(params);

    match origin.as_str() {
        "Closed Road" => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
        "Nowhere" => (
            StatusCode::OK,
            Json(json!({ "status": "ZERO_RESULTS", "routes": [] })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "routes": [{
                    "summary": "Van Wyck Expy",
                    "overview_polyline": { "points": "a~l~Fjk~uOwHJy@P" },
                    "legs": [
                        { "distance": { "value": 12000 }, "duration": { "value": 1200 } },
                        { "distance": { "value": 7795 }, "duration": { "value": 900 } }
                    ]
                }]
            })),
        ),
    }
}

fn start_maps() -> (SocketAddr, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/maps/api/directions/json", get(directions))
        .layer(Extension(seen.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);

    (addr, seen)
}

fn maps_at(base: String) -> GoogleMaps {
    GoogleMaps::new(base, KEY.into())
}

#[tokio::test]
async fn query_carries_route_and_key() {
    let (addr, seen) = start_maps();
    let maps = maps_at(format!("http://{}", addr));

    let stops = vec!["Queens Mall".to_string(), "Brooklyn Bridge".to_string()];
    let directions = maps
        .find_directions("JFK Airport", "Manhattan Hotel", &stops)
        .await
        .unwrap();

    assert_eq!(directions.distance_meters, 19795.0);
    assert_eq!(directions.duration_seconds, 2100.0);

    maps.find_directions("JFK Airport", "Manhattan Hotel", &[])
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0]["origin"], "JFK Airport");
    assert_eq!(seen[0]["destination"], "Manhattan Hotel");
    assert_eq!(seen[0]["waypoints"], "Queens Mall|Brooklyn Bridge");
    assert_eq!(seen[0]["mode"], "driving");
    assert_eq!(seen[0]["traffic_model"], "best_guess");
    assert_eq!(seen[0]["departure_time"], "now");
    assert_eq!(seen[0]["key"], KEY);
    assert!(!seen[1].contains_key("waypoints"));
}

#[tokio::test]
async fn provider_failures_are_classified() {
    let (addr, _) = start_maps();
    let maps = maps_at(format!("http://{}", addr));

    let err = maps
        .find_directions("Closed Road", "Manhattan Hotel", &[])
        .await
        .unwrap_err();
    assert_eq!(err.code, TRANSPORT_ERROR);
    assert_eq!(err.message, "HTTP error! status: 503");

    let err = maps
        .find_directions("Nowhere", "Manhattan Hotel", &[])
        .await
        .unwrap_err();
    assert_eq!(err.code, UPSTREAM_ERROR);
    assert_eq!(err.message, "Google Maps API Error: ZERO_RESULTS - Unknown error");
}

#[tokio::test]
async fn degraded_response_never_exposes_the_key() {
    let provider = Box::new(maps_at("127.0.0.1:1".into())) as DynProvider;
    let engine = Engine::new(
        Some(provider),
        Box::new(RandomSampler(StdRng::seed_from_u64(5))),
    );

    let response = engine
        .calculate_route(RouteRequest::new("JFK Airport", "Manhattan Hotel"))
        .await;

    assert_eq!(response.status, RouteStatus::Fallback);
    let body = serde_json::to_string(&response).unwrap();
    assert!(!body.contains(KEY));
    assert!(response.error.unwrap().starts_with("reqwest error"));
}
