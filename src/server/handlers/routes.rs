use axum::body::Bytes;
use axum::extract::{Extension, Json};

use crate::engine::fallback;
use crate::entities::{is_blank, RouteRequest, RouteResponse};
use crate::server::DynAPI;

// Best effort: a body that is not a route request may still carry a stop list.
fn stop_count_hint(body: &[u8]) -> usize {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("stops").and_then(|s| s.as_array()).cloned())
        .map(|stops| {
            stops
                .iter()
                .filter_map(|s| s.as_str())
                .filter(|s| !is_blank(s))
                .count()
        })
        .unwrap_or(0)
}

pub async fn calculate(Extension(api): Extension<DynAPI>, body: Bytes) -> Json<RouteResponse> {
    let response = match serde_json::from_slice::<RouteRequest>(&body) {
        Ok(request) => api.calculate_route(request).await,
        Err(err) => {
            tracing::warn!(error = %err, "unreadable route request");

            RouteResponse::degraded(
                fallback::last_resort(stop_count_hint(&body)),
                format!("invalid request body: {}", err),
            )
        }
    };

    Json(response)
}

#[test]
fn stop_hint_counts_non_blank_strings() {
    assert_eq!(stop_count_hint(br#"{"stops": ["a", " ", 3, "b"]}"#), 2);
    assert_eq!(stop_count_hint(br#"{"pickup": 1}"#), 0);
    assert_eq!(stop_count_hint(b"not json"), 0);
}
