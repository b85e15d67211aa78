use super::{fallback, Engine};

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::{
        round_miles, round_minutes, Location, RouteEstimate, RouteRequest, RouteResponse,
        SourceTag, METERS_PER_MILE,
    },
    external::Directions,
};

fn live_estimate(directions: Directions, waypoints: Vec<Location>) -> RouteEstimate {
    let summary = if directions.summary.is_empty() {
        "Route calculated".into()
    } else {
        directions.summary
    };

    RouteEstimate {
        distance_miles: round_miles(directions.distance_meters / METERS_PER_MILE),
        duration_minutes: round_minutes(directions.duration_seconds / 60.0),
        summary,
        source: SourceTag::Live,
        polyline: directions.polyline,
        waypoints,
    }
}

impl Engine {
    async fn degraded(&self, waypoints: &[Location], error: String) -> RouteResponse {
        let mut sampler = self.sampler.lock().await;
        let estimate = fallback::estimate(&mut **sampler, waypoints, "API unavailable");

        RouteResponse::degraded(estimate, error)
    }
}

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn calculate_route(&self, request: RouteRequest) -> RouteResponse {
        let waypoints = request.waypoints();

        let provider = match &self.provider {
            Some(provider) => provider,
            None => {
                return self
                    .degraded(&waypoints, "Google Maps API key not configured".into())
                    .await
            }
        };

        let result = provider
            .find_directions(&request.pickup, &request.dropoff, &request.filled_stops())
            .await;

        match result {
            Ok(directions) => {
                let estimate = live_estimate(directions, waypoints);
                tracing::info!(
                    distance = estimate.distance_miles,
                    duration = estimate.duration_minutes,
                    "route calculated"
                );

                RouteResponse::success(estimate)
            }
            Err(err) => {
                tracing::warn!(error = %err, "route calculation failed, estimating");
                self.degraded(&waypoints, err.message).await
            }
        }
    }
}
