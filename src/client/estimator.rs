use tokio::sync::Mutex;

use crate::client::transport::{DynTransport, HttpTransport};
use crate::config::Config;
use crate::engine::fallback::{self, DynSampler};
use crate::entities::{PricingResult, PricingTable, RouteEstimate, RouteRequest, VehicleTier};
use crate::error::Error;

/// Turns pickup, stops and dropoff into a route estimate, preferring the live endpoint.
///
/// Each call is independent: no caching, no retry, and overlapping calls are not
/// ordered against each other.
pub struct RouteEstimator {
    transport: DynTransport,
    sampler: Mutex<DynSampler>,
    pricing: PricingTable,
}

impl RouteEstimator {
    pub fn new(transport: DynTransport, sampler: DynSampler) -> Self {
        Self {
            transport,
            sampler: Mutex::new(sampler),
            pricing: PricingTable::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let transport = HttpTransport::new(config.route_endpoint.clone(), config.route_timeout)?;

        Ok(Self::new(Box::new(transport), fallback::entropy_sampler()))
    }

    /// Fails only when pickup or dropoff is blank; every other failure ends in a
    /// locally computed fallback estimate.
    #[tracing::instrument(skip(self))]
    pub async fn estimate(&self, request: &RouteRequest) -> Result<RouteEstimate, Error> {
        request.validate()?;

        let request = request.normalized();

        let result = self
            .transport
            .calculate_route(&request)
            .await
            .and_then(|response| response.into_estimate());

        match result {
            Ok(estimate) => Ok(estimate),
            Err(err) => {
                tracing::warn!(error = %err, "route endpoint unavailable, estimating locally");

                let mut sampler = self.sampler.lock().await;
                Ok(fallback::estimate(
                    &mut **sampler,
                    &request.waypoints(),
                    "network error",
                ))
            }
        }
    }

    /// Estimate and price in one step, as done whenever the route or vehicle changes.
    pub async fn quote(
        &self,
        request: &RouteRequest,
        vehicle: &VehicleTier,
    ) -> Result<(RouteEstimate, PricingResult), Error> {
        let estimate = self.estimate(request).await?;
        let pricing = self.pricing.price_estimate(&estimate, vehicle)?;

        Ok((estimate, pricing))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_test::block_on;

    use super::RouteEstimator;
    use crate::client::transport::RouteTransport;
    use crate::engine::fallback::{FixedFraction, RandomSampler};
    use crate::entities::{
        find_vehicle, round_minutes, RouteRequest, RouteResponse, RouteStatus, SourceTag,
    };
    use crate::error::{http_status_error, Error};

    struct StubTransport {
        response: Result<RouteResponse, Error>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RouteTransport for StubTransport {
        async fn calculate_route(&self, request: &RouteRequest) -> Result<RouteResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.stops.iter().all(|s| !s.trim().is_empty()));
            self.response.clone()
        }
    }

    fn estimator(response: Result<RouteResponse, Error>) -> (RouteEstimator, Arc<AtomicUsize>) {
        use rand::{rngs::StdRng, SeedableRng};

        let calls = Arc::new(AtomicUsize::new(0));
        let transport = StubTransport {
            response,
            calls: calls.clone(),
        };

        let sampler = RandomSampler(StdRng::seed_from_u64(42));
        (
            RouteEstimator::new(Box::new(transport), Box::new(sampler)),
            calls,
        )
    }

    fn response(distance: f64, duration: u32, status: RouteStatus, summary: &str) -> RouteResponse {
        RouteResponse {
            distance,
            duration,
            summary: summary.into(),
            polyline: String::new(),
            waypoints: vec![],
            status,
            error: None,
        }
    }

    fn airport_run() -> RouteRequest {
        RouteRequest::new("JFK Airport Terminal 4", "Manhattan Hotel")
    }

    #[test]
    fn blank_locations_fail_without_network() {
        let (estimator, calls) = estimator(Err(http_status_error(500)));

        for request in [
            RouteRequest::new("", "Manhattan Hotel"),
            RouteRequest::new("JFK", "   "),
        ] {
            let err = block_on(estimator.estimate(&request)).unwrap_err();
            assert!(err.is_invalid_input());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn live_route_is_priced() {
        let (estimator, calls) = estimator(Ok(response(
            12.3,
            35,
            RouteStatus::Success,
            "Van Wyck Expy",
        )));
        let sedan = find_vehicle("1").unwrap();

        let (estimate, pricing) = block_on(estimator.quote(&airport_run(), &sedan)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(estimate.source, SourceTag::Live);
        assert_eq!(estimate.summary, "Van Wyck Expy");
        assert!((pricing.total - 254.4).abs() < 1e-9);
    }

    #[test]
    fn unreachable_endpoint_falls_back_locally() {
        let (estimator, calls) = estimator(Err(http_status_error(502)));

        for _ in 0..20 {
            let estimate = block_on(estimator.estimate(&airport_run())).unwrap();

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

        assert_eq!(calls.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn degraded_endpoint_summary_is_kept() {
        let (estimator, _) = estimator(Ok(response(
            20.0,
            60,
            RouteStatus::Fallback,
            "Estimated route with 2 stops (API unavailable)",
        )));

        let request = airport_run().with_stops(["Queens Mall", "", "Brooklyn Bridge"]);
        let estimate = block_on(estimator.estimate(&request)).unwrap();

        assert_eq!(estimate.source, SourceTag::Fallback);
        assert_eq!(estimate.distance_miles, 20.0);
        assert_eq!(estimate.duration_minutes, 60);
        assert_eq!(
            estimate.summary,
            "Estimated route with 2 stops (API unavailable)"
        );
    }

    #[test]
    fn malformed_numbers_fall_back_locally() {
        let (estimator, _) = estimator(Ok(response(f64::NAN, 10, RouteStatus::Success, "")));

        let estimate = block_on(estimator.estimate(&airport_run())).unwrap();
        assert!(estimate.is_fallback());
    }

    #[test]
    fn stops_add_at_least_the_stop_penalty() {
        use crate::client::transport::DynTransport;

        let transport: DynTransport = Box::new(StubTransport {
            response: Err(http_status_error(503)),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let estimator = RouteEstimator::new(transport, Box::new(FixedFraction(0.3)));

        let direct = block_on(estimator.estimate(&airport_run())).unwrap();
        let with_stop =
            block_on(estimator.estimate(&airport_run().with_stops(["Queens Plaza"]))).unwrap();

        assert!(with_stop.duration_minutes >= direct.duration_minutes + 3);
        assert!(with_stop.summary.contains("1 stops"));
    }
}
