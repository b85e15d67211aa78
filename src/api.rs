use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Quote, RouteRequest, RouteResponse, VehicleTier};
use crate::error::Error;

#[async_trait]
pub trait RouteAPI {
    /// Live route when the provider answers, a fallback estimate otherwise. Never fails.
    async fn calculate_route(&self, request: RouteRequest) -> RouteResponse;
}

pub trait QuoteAPI {
    fn list_vehicles(&self) -> Vec<VehicleTier>;

    fn create_quote(
        &self,
        vehicle_id: &str,
        distance_miles: f64,
        duration_minutes: f64,
    ) -> Result<Quote, Error>;
}

pub trait API: RouteAPI + QuoteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
