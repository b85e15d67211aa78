use std::net::{SocketAddr, TcpListener};

use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};

use chauffeur::client::{HttpTransport, RouteEstimator};
use chauffeur::engine::{fallback::RandomSampler, Engine};
use chauffeur::entities::{find_vehicle, round_minutes, RouteRequest, SourceTag};
use chauffeur::error::{provider_error, Error};
use chauffeur::external::{Directions, DirectionsProvider};
use chauffeur::server::serve_on;

struct FixedDirections(Result<Directions, Error>);

#[async_trait]
impl DirectionsProvider for FixedDirections {
    async fn find_directions(
        &self,
        _origin: &str,
        _destination: &str,
        _waypoints: &[String],
    ) -> Result<Directions, Error> {
        self.0.clone()
    }
}

fn engine(provider: Option<FixedDirections>) -> Engine {
    let provider = provider.map(|p| Box::new(p) as chauffeur::external::DynProvider);

    Engine::new(provider, Box::new(RandomSampler(StdRng::seed_from_u64(3))))
}

fn start(engine: Engine) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve_on(engine, listener));

    addr
}

fn estimator_for(addr: SocketAddr) -> RouteEstimator {
    let transport =
        HttpTransport::new(format!("http://{}/api/calculate-route", addr), None).unwrap();

    RouteEstimator::new(
        Box::new(transport),
        Box::new(RandomSampler(StdRng::seed_from_u64(11))),
    )
}

fn airport_run() -> RouteRequest {
    RouteRequest::new("JFK Airport Terminal 4", "Manhattan Hotel")
}

#[tokio::test]
async fn live_route_through_the_endpoint_is_priced() {
    let addr = start(engine(Some(FixedDirections(Ok(Directions {
        distance_meters: 19795.0,
        duration_seconds: 2100.0,
        summary: "Van Wyck Expy".into(),
        polyline: "a~l~Fjk~uOwHJy@P".into(),
    })))));

    let sedan = find_vehicle("1").unwrap();
    let (estimate, pricing) = estimator_for(addr)
        .quote(&airport_run(), &sedan)
        .await
        .unwrap();

    assert_eq!(estimate.source, SourceTag::Live);
    assert_eq!(estimate.distance_miles, 12.3);
    assert_eq!(estimate.duration_minutes, 35);
    assert_eq!(estimate.summary, "Van Wyck Expy");
    assert!((pricing.total - 254.4).abs() < 1e-9);
}

#[tokio::test]
async fn degraded_endpoint_answer_is_passed_through() {
    let addr = start(engine(Some(FixedDirections(Err(provider_error(
        "OVER_QUERY_LIMIT",
        None,
    ))))));

    let request = airport_run().with_stops(["Queens Mall", " ", "Brooklyn Bridge"]);
    let estimate = estimator_for(addr).estimate(&request).await.unwrap();

    assert_eq!(estimate.source, SourceTag::Fallback);
    assert_eq!(
        estimate.summary,
        "Estimated route with 2 stops (API unavailable)"
    );
    assert_eq!(
        estimate.waypoints,
        vec![
            "JFK Airport Terminal 4",
            "Queens Mall",
            "Brooklyn Bridge",
            "Manhattan Hotel"
        ]
    );
}

#[tokio::test]
async fn missing_api_key_is_reported_in_the_body() {
    let addr = start(engine(None));

    let body: Value = reqwest::Client::new()
        .post(format!("http://{}/api/calculate-route", addr))
        .json(&json!({ "pickup": "Union Station", "dropoff": "Navy Pier" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "fallback");
    assert_eq!(body["error"], "Google Maps API key not configured");
    assert!(body["distance"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn unreadable_body_gets_the_last_resort_estimate() {
    let addr = start(engine(None));

    let res = reqwest::Client::new()
        .post(format!("http://{}/api/calculate-route", addr))
        .header("content-type", "application/json")
        .body(r#"{"stops": ["Museum", "", "Harbor"]"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fallback");
    assert_eq!(body["distance"], 8.0);
    assert_eq!(body["duration"], 22);
    assert_eq!(body["summary"], "Estimated route (API unavailable)");
}

#[tokio::test]
async fn unreachable_endpoint_is_estimated_locally() {
    // reserve a port, then free it so nothing is listening there
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let estimate = estimator_for(addr).estimate(&airport_run()).await.unwrap();

    assert_eq!(estimate.source, SourceTag::Fallback);
    assert!(estimate.distance_miles > 0.0);
    assert_eq!(
        estimate.duration_minutes,
        round_minutes(estimate.distance_miles * 3.2)
    );
    assert_eq!(
        estimate.summary,
        "Estimated route with 0 stops (network error)"
    );
}

#[tokio::test]
async fn overlapping_estimates_all_resolve() {
    let addr = start(engine(None));
    let estimator = estimator_for(addr);

    let requests: Vec<RouteRequest> = (0..5)
        .map(|i| airport_run().with_stops(vec![format!("Stop {}", i); i]))
        .collect();

    let results =
        futures::future::join_all(requests.iter().map(|r| estimator.estimate(r))).await;

    for (i, result) in results.into_iter().enumerate() {
        let estimate = result.unwrap();
        assert!(estimate.is_fallback());
        assert_eq!(estimate.waypoints.len(), i + 2);
    }
}

#[tokio::test]
async fn vehicles_and_quotes() {
    let addr = start(engine(None));
    let client = reqwest::Client::new();

    let vehicles: Value = client
        .get(format!("http://{}/api/vehicles", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vehicles.as_array().unwrap().len(), 3);

    let quote: Value = client
        .post(format!("http://{}/api/quotes", addr))
        .json(&json!({ "vehicle_id": "3", "distance": 10.0, "duration": 20.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(quote["pricing"]["total"], 50.0 + 30.0 + 10.0 + 300.0);

    let res = client
        .post(format!("http://{}/api/quotes", addr))
        .json(&json!({ "vehicle_id": "9", "distance": 10.0, "duration": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    let health: Value = client
        .get(format!("http://{}/api/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
}
